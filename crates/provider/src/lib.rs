//! Completion provider network
//!
//! Chat-completion access for the orchestrator. [`Provider`] is the raw
//! transport seam; [`Completer`] wraps it so callers never see an error,
//! only a tagged [`Completion`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod completer;
pub mod openrouter;

pub use completer::{Completer, Completion, DegradeReason, MOCK_RESPONSE};
pub use openrouter::OpenRouterProvider;

/// Provider errors
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("SIGNAL LOST: {0}")]
    Request(#[from] reqwest::Error),

    #[error("GARBLED PAYLOAD: {0}")]
    Json(#[from] serde_json::Error),

    #[error("UPSTREAM REJECTED: {0}")]
    Api(String),

    #[error("ACCESS DENIED: NO API KEY")]
    NoApiKey,

    #[error("CORRUPTED RESPONSE")]
    InvalidResponse,

    #[error("RATE LIMITED - STAND BY")]
    RateLimited,
}

pub type Result<T> = std::result::Result<T, ProviderError>;

/// Completion response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub content: Option<String>,
    #[serde(default)]
    pub finish_reason: String,
    #[serde(default)]
    pub usage: Usage,
}

impl ChatResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            finish_reason: "stop".to_string(),
            usage: Usage::default(),
        }
    }
}

/// Token accounting
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// One role/content pair sent to the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }
}

/// Request parameters
#[derive(Debug, Clone)]
pub struct ChatParams {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for ChatParams {
    fn default() -> Self {
        Self {
            model: String::new(),
            messages: Vec::new(),
            max_tokens: 4096,
            temperature: 0.7,
        }
    }
}

/// Chat-completion backend
#[async_trait]
pub trait Provider: Send + Sync {
    async fn chat(&self, params: ChatParams) -> Result<ChatResponse>;
    fn default_model(&self) -> String;
    fn is_configured(&self) -> bool;
}
