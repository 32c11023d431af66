//! Tool hosts
//!
//! A [`ToolProvider`] owns a session with something that can run tools,
//! reports which tools exist, and runs them by name. Two hosts ship here:
//! [`McpToolHost`] talks MCP to a child process over stdio, and
//! [`LocalToolHost`] serves a few built-in tools confined to a workspace.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use thiserror::Error;

use overwatch_config::{Config, ToolHostKind};

pub mod local;
pub mod mcp;

pub use local::LocalToolHost;
pub use mcp::McpToolHost;

/// Tool host errors
#[derive(Error, Debug)]
pub enum ToolHostError {
    #[error("TOOL HOST LAUNCH FAILED: {0}")]
    Spawn(String),

    #[error("TOOL HOST HANDSHAKE FAILED: {0}")]
    Handshake(String),

    #[error("TOOL HOST TIMED OUT: {0}")]
    Timeout(String),

    #[error("TOOL HOST PROTOCOL ERROR: {0}")]
    Protocol(String),

    #[error("TOOL REPORTED FAILURE: {0}")]
    ToolReported(String),

    #[error("UNKNOWN TOOL: {0}")]
    UnknownTool(String),

    #[error("INVALID ARGUMENTS: {0}")]
    InvalidArguments(String),

    #[error("PATH {path} IS OUTSIDE WORKSPACE {workspace}")]
    OutsideWorkspace { path: String, workspace: String },

    #[error("TOOL HOST IO ERROR: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ToolHostError>;

/// A tool as advertised by its host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// JSON schema of the arguments, passed through untouched
    #[serde(default)]
    pub input_schema: Value,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// Something that can list and run tools
#[async_trait]
pub trait ToolProvider: Send + Sync {
    /// Establish the session; a no-op when already connected
    async fn connect(&self) -> Result<()>;

    /// Tools currently offered
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>>;

    /// Run `name` with `args` and return its text output
    async fn call_tool(&self, name: &str, args: Map<String, Value>) -> Result<String>;

    /// Tear the session down
    async fn close(&self) -> Result<()>;
}

/// Build the tool host selected by `config`
pub fn from_config(config: &Config) -> Arc<dyn ToolProvider> {
    match config.toolhost.kind {
        ToolHostKind::Mcp => Arc::new(McpToolHost::from_config(&config.toolhost)),
        ToolHostKind::Local => Arc::new(LocalToolHost::new(
            config.workspace_path(),
            config.toolhost.call_timeout_secs,
        )),
    }
}
