//! Transcript storage for conversation turns
//!
//! An append-only, ordered log of [`Message`]s. Stores assign ids on insert;
//! id order is conversation order. Nothing is ever edited in place: the only
//! mutations are [`TranscriptStore::append`] and [`TranscriptStore::clear_all`].

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod file;
pub mod memory;

pub use file::FileTranscript;
pub use memory::MemoryTranscript;

/// Transcript errors
#[derive(Error, Debug)]
pub enum TranscriptError {
    #[error("TRANSCRIPT IO ERROR: {0}")]
    Io(#[from] std::io::Error),

    #[error("TRANSCRIPT ENCODING ERROR: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TranscriptError>;

/// Speaker of a transcript entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stage of a turn that produced an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStep {
    Input,
    Execute,
    Review,
    Response,
    Error,
}

impl AgentStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentStep::Input => "input",
            AgentStep::Execute => "execute",
            AgentStep::Review => "review",
            AgentStep::Response => "response",
            AgentStep::Error => "error",
        }
    }
}

impl fmt::Display for AgentStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored transcript entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Assigned by the store, strictly increasing and never reused, even
    /// after a clear
    pub id: u64,
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub is_agentic: bool,
    #[serde(default)]
    pub agent_step: Option<AgentStep>,
    pub timestamp: DateTime<Local>,
}

/// Insert shape: everything but the store-assigned fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub role: Role,
    pub content: String,
    pub is_agentic: bool,
    pub agent_step: Option<AgentStep>,
}

impl NewMessage {
    /// Entry produced while the orchestrator processes a turn
    pub fn agentic(role: Role, step: AgentStep, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            is_agentic: true,
            agent_step: Some(step),
        }
    }

    /// Entry written outside the orchestrator
    pub fn plain(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            is_agentic: false,
            agent_step: None,
        }
    }

    /// Stamp with an id and the current time
    pub fn into_message(self, id: u64) -> Message {
        Message {
            id,
            role: self.role,
            content: self.content,
            is_agentic: self.is_agentic,
            agent_step: self.agent_step,
            timestamp: Local::now(),
        }
    }
}

/// Trailing `max_messages` entries projected to role/content pairs
pub fn history(messages: &[Message], max_messages: usize) -> Vec<overwatch_provider::Message> {
    messages
        .iter()
        .skip(messages.len().saturating_sub(max_messages))
        .map(|m| overwatch_provider::Message::new(m.role.as_str(), m.content.clone()))
        .collect()
}

/// Append-only ordered conversation log
#[async_trait]
pub trait TranscriptStore: Send + Sync {
    /// Store a new entry, assigning its id and timestamp
    async fn append(&self, message: NewMessage) -> Result<Message>;

    /// Every entry in ascending id order
    async fn list_all(&self) -> Result<Vec<Message>>;

    /// Drop every entry
    async fn clear_all(&self) -> Result<()>;
}
