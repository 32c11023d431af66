//! MCP tool host over a stdio child process

use async_trait::async_trait;
use rmcp::model::{CallToolRequestParam, Content, RawContent};
use rmcp::service::{Peer, RoleClient, RunningService};
use rmcp::transport::TokioChildProcess;
use rmcp::ServiceExt;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use overwatch_config::ToolHostConfig;

use crate::{Result, ToolDescriptor, ToolHostError, ToolProvider};

/// Returned when a tool produced no text content
pub const NO_TEXT_OUTPUT: &str = "No text output";

/// MCP client that spawns its server on first use
///
/// The session lives behind a mutex so that concurrent first callers
/// serialize on the spawn instead of each launching a server.
pub struct McpToolHost {
    command: String,
    args: Vec<String>,
    env: HashMap<String, String>,
    handshake_timeout: Duration,
    call_timeout: Duration,
    session: Mutex<Option<RunningService<RoleClient, ()>>>,
}

impl McpToolHost {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        let defaults = ToolHostConfig::default();
        Self {
            command: command.into(),
            args,
            env: HashMap::new(),
            handshake_timeout: Duration::from_secs(defaults.handshake_timeout_secs),
            call_timeout: Duration::from_secs(defaults.call_timeout_secs),
            session: Mutex::new(None),
        }
    }

    pub fn from_config(config: &ToolHostConfig) -> Self {
        Self::new(config.command.clone(), config.args.clone())
            .with_env(config.env.clone())
            .with_timeouts(
                Duration::from_secs(config.handshake_timeout_secs),
                Duration::from_secs(config.call_timeout_secs),
            )
    }

    pub fn with_env(mut self, env: HashMap<String, String>) -> Self {
        self.env = env;
        self
    }

    pub fn with_timeouts(mut self, handshake: Duration, call: Duration) -> Self {
        self.handshake_timeout = handshake;
        self.call_timeout = call;
        self
    }

    pub async fn is_connected(&self) -> bool {
        self.session.lock().await.is_some()
    }

    async fn spawn(&self) -> Result<RunningService<RoleClient, ()>> {
        let mut cmd = Command::new(&self.command);
        cmd.args(&self.args);
        for (k, v) in &self.env {
            cmd.env(k, v);
        }

        let transport = TokioChildProcess::new(cmd)
            .map_err(|e| ToolHostError::Spawn(format!("{}: {}", self.command, e)))?;

        let service = tokio::time::timeout(self.handshake_timeout, ().serve(transport))
            .await
            .map_err(|_| {
                ToolHostError::Timeout(format!(
                    "handshake exceeded {}s",
                    self.handshake_timeout.as_secs()
                ))
            })?
            .map_err(|e| ToolHostError::Handshake(e.to_string()))?;

        info!("◆ TOOL HOST ONLINE: {} {}", self.command, self.args.join(" "));
        Ok(service)
    }

    /// Handle to the live session, spawning it when absent
    async fn peer(&self) -> Result<Peer<RoleClient>> {
        let mut session = self.session.lock().await;
        if session.is_none() {
            *session = Some(self.spawn().await?);
        }
        match session.as_ref() {
            Some(service) => Ok(service.peer().clone()),
            None => Err(ToolHostError::Protocol("session unavailable".to_string())),
        }
    }
}

/// Text items of a tool result joined by newlines
pub fn text_output(content: &[Content]) -> String {
    let text = content
        .iter()
        .filter_map(|c| match &c.raw {
            RawContent::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n");

    if text.is_empty() {
        NO_TEXT_OUTPUT.to_string()
    } else {
        text
    }
}

#[async_trait]
impl ToolProvider for McpToolHost {
    async fn connect(&self) -> Result<()> {
        self.peer().await.map(|_| ())
    }

    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>> {
        let peer = self.peer().await?;
        let tools = peer
            .list_all_tools()
            .await
            .map_err(|e| ToolHostError::Protocol(e.to_string()))?;

        let descriptors: Vec<ToolDescriptor> = tools
            .into_iter()
            .map(|t| ToolDescriptor {
                name: t.name.to_string(),
                description: t.description.map(|d| d.to_string()).unwrap_or_default(),
                input_schema: serde_json::to_value(&*t.input_schema).unwrap_or_default(),
            })
            .collect();

        debug!("◆ {} TOOLS DISCOVERED", descriptors.len());
        Ok(descriptors)
    }

    async fn call_tool(&self, name: &str, args: Map<String, Value>) -> Result<String> {
        let peer = self.peer().await?;
        debug!("◆ CALLING TOOL: {}", name);

        let result = tokio::time::timeout(
            self.call_timeout,
            peer.call_tool(CallToolRequestParam {
                name: name.to_string().into(),
                arguments: Some(args),
            }),
        )
        .await
        .map_err(|_| {
            ToolHostError::Timeout(format!(
                "'{}' exceeded {}s",
                name,
                self.call_timeout.as_secs()
            ))
        })?
        .map_err(|e| ToolHostError::Protocol(e.to_string()))?;

        let text = text_output(&result.content);
        if result.is_error.unwrap_or(false) {
            return Err(ToolHostError::ToolReported(text));
        }
        Ok(text)
    }

    async fn close(&self) -> Result<()> {
        let service = self.session.lock().await.take();
        if let Some(service) = service {
            info!("◆ TOOL HOST SHUTTING DOWN");
            if let Err(e) = service.cancel().await {
                warn!("◆ TOOL HOST SHUTDOWN ERROR: {}", e);
            }
        }
        Ok(())
    }
}
