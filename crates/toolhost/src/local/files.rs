//! Read-only filesystem tools

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use tracing::debug;

use super::paths::resolve_in_workspace;
use super::LocalTool;
use crate::{Result, ToolHostError};

fn parse<T: for<'de> Deserialize<'de>>(args: Map<String, Value>) -> Result<T> {
    serde_json::from_value(Value::Object(args))
        .map_err(|e| ToolHostError::InvalidArguments(e.to_string()))
}

/// Lists a workspace directory
pub struct ListFilesTool {
    workspace: PathBuf,
}

impl ListFilesTool {
    pub fn new(workspace: PathBuf) -> Self {
        Self { workspace }
    }
}

#[derive(Deserialize)]
struct ListArgs {
    #[serde(default = "workspace_root")]
    path: String,
}

fn workspace_root() -> String {
    ".".to_string()
}

#[async_trait]
impl LocalTool for ListFilesTool {
    fn name(&self) -> &str {
        "list_files"
    }

    fn description(&self) -> &str {
        "List the contents of a workspace directory."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": { "path": { "type": "string", "description": "Directory, defaults to the workspace root" } }
        })
    }

    async fn execute(&self, args: Map<String, Value>) -> Result<String> {
        let args: ListArgs = parse(args)?;
        let path = resolve_in_workspace(&args.path, &self.workspace).await?;

        debug!("◆ RECON: {:?}", path);
        if !path.is_dir() {
            return Err(ToolHostError::InvalidArguments(format!(
                "not a directory: {}",
                args.path
            )));
        }

        let mut entries = tokio::fs::read_dir(&path).await?;
        let mut items = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            let prefix = if entry.file_type().await?.is_dir() {
                "[DIR] "
            } else {
                "[FILE] "
            };
            items.push(format!("{}{}", prefix, name));
        }
        items.sort();

        if items.is_empty() {
            Ok(format!("◆ EMPTY SECTOR: {}", args.path))
        } else {
            Ok(items.join("\n"))
        }
    }
}

/// Reads a workspace file
pub struct ReadFileTool {
    workspace: PathBuf,
}

impl ReadFileTool {
    pub fn new(workspace: PathBuf) -> Self {
        Self { workspace }
    }
}

#[derive(Deserialize)]
struct ReadArgs {
    path: String,
}

#[async_trait]
impl LocalTool for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read a text file from the workspace."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": { "path": { "type": "string", "description": "File path" } },
            "required": ["path"]
        })
    }

    async fn execute(&self, args: Map<String, Value>) -> Result<String> {
        let args: ReadArgs = parse(args)?;
        let path = resolve_in_workspace(&args.path, &self.workspace).await?;

        debug!("◆ RETRIEVING INTEL: {:?}", path);
        if !path.is_file() {
            return Err(ToolHostError::InvalidArguments(format!(
                "no such file: {}",
                args.path
            )));
        }
        Ok(tokio::fs::read_to_string(&path).await?)
    }
}
