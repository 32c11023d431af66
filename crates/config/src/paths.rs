//! Path utilities

use std::path::PathBuf;

/// Environment variable that relocates the data directory
pub const HOME_ENV: &str = "OVERWATCH_HOME";

/// Data directory (`$OVERWATCH_HOME`, else `~/.overwatch`)
pub fn data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(HOME_ENV) {
        if !dir.is_empty() {
            return PathBuf::from(dir);
        }
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".overwatch")
}

/// Configuration file location
pub fn config_path() -> PathBuf {
    data_dir().join("config.json")
}

/// Default workspace for the local tool host
pub fn workspace_path() -> PathBuf {
    data_dir().join("ops")
}

/// Default transcript log location
pub fn transcript_path() -> PathBuf {
    data_dir().join("logs").join("transcript.jsonl")
}

/// Expand a leading `~` against the home directory
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}
