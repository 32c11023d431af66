//! Workspace confinement for local tools

use std::path::{Component, Path, PathBuf};

use overwatch_config::expand_home;

use crate::{Result, ToolHostError};

/// Resolve `path` against `workspace` and reject anything that lands outside
///
/// Relative paths are joined to the workspace; absolute and `~` paths are
/// taken as given. Existing paths are canonicalized so symlinks cannot
/// escape; missing ones are resolved through their parent.
pub async fn resolve_in_workspace(path: &str, workspace: &Path) -> Result<PathBuf> {
    let candidate = if path.starts_with('/') || path.starts_with('~') {
        expand_home(path)
    } else {
        workspace.join(path)
    };

    let root = canonical_or_normalized(workspace).await?;
    let resolved = canonical_or_normalized(&candidate).await?;

    if !resolved.starts_with(&root) {
        return Err(ToolHostError::OutsideWorkspace {
            path: path.to_string(),
            workspace: root.display().to_string(),
        });
    }

    Ok(resolved)
}

async fn canonical_or_normalized(path: &Path) -> Result<PathBuf> {
    if let Ok(canonical) = tokio::fs::canonicalize(path).await {
        return Ok(canonical);
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };
    let normalized = normalize(&absolute);

    // A missing leaf under an existing directory still resolves symlinks above it
    if let (Some(parent), Some(name)) = (normalized.parent(), normalized.file_name()) {
        if let Ok(parent) = tokio::fs::canonicalize(parent).await {
            return Ok(parent.join(name));
        }
    }
    Ok(normalized)
}

/// Lexically fold `.` and `..`
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
