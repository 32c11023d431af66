//! Tool invocation
//!
//! The invoker is the one place tool failures are absorbed. Whatever goes
//! wrong between connecting and reading the result becomes a
//! [`ToolOutcome`] whose text flows on through review and finalization.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use overwatch_toolhost::ToolProvider;

use crate::directive::ToolDirective;
use crate::registry::ToolRegistry;

/// Result of one tool call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    Completed(String),
    Failed(String),
    UnknownTool(String),
}

impl ToolOutcome {
    /// Text handed to the summarizer
    pub fn result_text(&self) -> String {
        match self {
            ToolOutcome::Completed(text) => text.clone(),
            ToolOutcome::Failed(message) => format!("Tool Execution Error: {}", message),
            ToolOutcome::UnknownTool(name) => {
                format!("Tool Execution Error: Tool '{}' not found", name)
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ToolOutcome::Completed(_))
    }
}

/// Runs directives against a [`ToolProvider`]
pub struct ToolInvoker {
    provider: Arc<dyn ToolProvider>,
    registry: RwLock<ToolRegistry>,
}

impl ToolInvoker {
    pub fn new(provider: Arc<dyn ToolProvider>) -> Self {
        Self {
            provider,
            registry: RwLock::new(ToolRegistry::new()),
        }
    }

    /// Refresh the registry from the provider
    ///
    /// On failure the registry is emptied and the error logged; the caller
    /// plans as if no tools exist.
    pub async fn discover(&self) -> ToolRegistry {
        let registry = match self.try_discover().await {
            Ok(registry) => registry,
            Err(e) => {
                warn!("◆ TOOL DISCOVERY FAILED: {}", e);
                ToolRegistry::new()
            }
        };
        *self.registry.write().await = registry.clone();
        registry
    }

    async fn try_discover(&self) -> overwatch_toolhost::Result<ToolRegistry> {
        self.provider.connect().await?;
        let descriptors = self.provider.list_tools().await?;
        Ok(ToolRegistry::from_descriptors(descriptors))
    }

    /// Tools seen by the last discovery
    pub async fn registry(&self) -> ToolRegistry {
        self.registry.read().await.clone()
    }

    /// Run `directive`; never fails
    pub async fn invoke(&self, directive: &ToolDirective) -> ToolOutcome {
        if let Err(e) = self.provider.connect().await {
            warn!("◆ TOOL HOST UNREACHABLE: {}", e);
            return ToolOutcome::Failed(e.to_string());
        }

        let known = self.registry.read().await.contains(&directive.tool_name);
        if !known && !self.discover().await.contains(&directive.tool_name) {
            warn!("◆ UNKNOWN TOOL REQUESTED: {}", directive.tool_name);
            return ToolOutcome::UnknownTool(directive.tool_name.clone());
        }

        info!("◆ DEPLOYING TOOL: {}", directive.tool_name);
        match self
            .provider
            .call_tool(&directive.tool_name, directive.args.clone())
            .await
        {
            Ok(text) => ToolOutcome::Completed(text),
            Err(e) => {
                warn!("◆ TOOL {} FAILED: {}", directive.tool_name, e);
                ToolOutcome::Failed(e.to_string())
            }
        }
    }

    pub async fn close(&self) {
        if let Err(e) = self.provider.close().await {
            warn!("◆ TOOL HOST CLOSE FAILED: {}", e);
        }
    }
}
