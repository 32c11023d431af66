//! Built-in tools for running without an MCP server

mod exec;
mod files;
pub mod paths;

pub use exec::ExecuteCommandTool;
pub use files::{ListFilesTool, ReadFileTool};

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use crate::{Result, ToolDescriptor, ToolHostError, ToolProvider};

/// A tool run in-process
#[async_trait]
pub trait LocalTool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters(&self) -> Value;
    async fn execute(&self, args: Map<String, Value>) -> Result<String>;
}

/// Tool host backed by [`LocalTool`]s confined to one workspace
pub struct LocalToolHost {
    workspace: PathBuf,
    tools: BTreeMap<String, Box<dyn LocalTool>>,
}

impl LocalToolHost {
    /// Host with the default toolset
    pub fn new(workspace: PathBuf, call_timeout_secs: u64) -> Self {
        let mut host = Self::empty(workspace.clone());
        host.register(ExecuteCommandTool::new(
            workspace.clone(),
            Duration::from_secs(call_timeout_secs),
        ));
        host.register(ListFilesTool::new(workspace.clone()));
        host.register(ReadFileTool::new(workspace));
        host
    }

    /// Host with no tools registered
    pub fn empty(workspace: PathBuf) -> Self {
        Self {
            workspace,
            tools: BTreeMap::new(),
        }
    }

    pub fn register<T: LocalTool + 'static>(&mut self, tool: T) {
        self.tools.insert(tool.name().to_string(), Box::new(tool));
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }
}

#[async_trait]
impl ToolProvider for LocalToolHost {
    async fn connect(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.workspace).await?;
        debug!("◆ LOCAL TOOLS READY IN {:?}", self.workspace);
        Ok(())
    }

    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>> {
        Ok(self
            .tools
            .values()
            .map(|t| ToolDescriptor::new(t.name(), t.description(), t.parameters()))
            .collect())
    }

    async fn call_tool(&self, name: &str, args: Map<String, Value>) -> Result<String> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolHostError::UnknownTool(name.to_string()))?;
        info!("◆ LOCAL TOOL: {}", name);
        tool.execute(args).await
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
