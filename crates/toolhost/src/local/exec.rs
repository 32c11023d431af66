//! Shell command tool

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

use super::paths::resolve_in_workspace;
use super::LocalTool;
use crate::{Result, ToolHostError};

const MAX_OUTPUT_CHARS: usize = 10_000;

/// Runs a shell command inside the workspace
pub struct ExecuteCommandTool {
    workspace: PathBuf,
    timeout: Duration,
}

impl ExecuteCommandTool {
    pub fn new(workspace: PathBuf, timeout: Duration) -> Self {
        Self { workspace, timeout }
    }
}

#[derive(Deserialize)]
struct ExecuteArgs {
    command: String,
    working_dir: Option<String>,
}

#[async_trait]
impl LocalTool for ExecuteCommandTool {
    fn name(&self) -> &str {
        "execute_command"
    }

    fn description(&self) -> &str {
        "Execute a shell command in the operations workspace."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "command": { "type": "string", "description": "Shell command" },
                "working_dir": { "type": "string", "description": "Optional directory inside the workspace" }
            },
            "required": ["command"]
        })
    }

    async fn execute(&self, args: Map<String, Value>) -> Result<String> {
        let args: ExecuteArgs = serde_json::from_value(Value::Object(args))
            .map_err(|e| ToolHostError::InvalidArguments(e.to_string()))?;

        let working_dir = match args.working_dir {
            Some(dir) => resolve_in_workspace(&dir, &self.workspace).await?,
            None => self.workspace.clone(),
        };

        debug!("◆ EXECUTING: {}", args.command);
        let mut cmd = Command::new("sh");
        cmd.arg("-c")
            .arg(&args.command)
            .current_dir(working_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| {
                ToolHostError::Timeout(format!("command exceeded {}s", self.timeout.as_secs()))
            })??;

        let mut parts = Vec::new();
        if !output.stdout.is_empty() {
            parts.push(String::from_utf8_lossy(&output.stdout).to_string());
        }
        if !output.stderr.is_empty() {
            parts.push(format!("STDERR:\n{}", String::from_utf8_lossy(&output.stderr)));
        }
        if output.status.code() != Some(0) {
            parts.push(format!("EXIT CODE: {}", output.status.code().unwrap_or(-1)));
        }

        let text = parts.join("\n");
        Ok(truncate_output(text))
    }
}

fn truncate_output(text: String) -> String {
    let total = text.chars().count();
    if total <= MAX_OUTPUT_CHARS {
        return text;
    }
    let kept: String = text.chars().take(MAX_OUTPUT_CHARS).collect();
    format!(
        "{}\n◆ OUTPUT TRUNCATED: {} CHARS REMAINING",
        kept,
        total - MAX_OUTPUT_CHARS
    )
}
