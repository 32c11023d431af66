//! OPERATIVE: turn orchestration
//!
//! One user message in, one final answer out. In between the planner may
//! ask for a single tool call, which is executed, summarized, reviewed by a
//! second model, and folded into the final answer.

use thiserror::Error;

use overwatch_config::AgentConfig;
use overwatch_transcript::TranscriptError;

pub mod context;
pub mod directive;
pub mod invoker;
pub mod orchestrator;
pub mod registry;
pub mod summary;
pub mod turn;

pub use context::ContextBuilder;
pub use directive::ToolDirective;
pub use invoker::{ToolInvoker, ToolOutcome};
pub use orchestrator::{Orchestrator, TurnReport};
pub use registry::ToolRegistry;
pub use summary::{summarize, summarize_to};
pub use turn::{TurnState, TurnTracker};

/// Operative errors
///
/// Only failures the turn cannot absorb end up here; model and tool
/// failures are folded into the conversation instead.
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("◆ TRANSCRIPT FAILURE: {0}")]
    Transcript(#[from] TranscriptError),

    #[error("◆ ILLEGAL TURN TRANSITION: {from} -> {to}")]
    IllegalTransition { from: TurnState, to: TurnState },
}

pub type Result<T> = std::result::Result<T, AgentError>;

/// Orchestrator parameters
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSettings {
    /// Model for planning and finalizing
    pub model: String,
    /// Model for the review call, distinct from `model`
    pub reviewer_model: String,
    pub context_window: usize,
    pub summary_limit: usize,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self::from(&AgentConfig::default())
    }
}

impl From<&AgentConfig> for AgentSettings {
    fn from(config: &AgentConfig) -> Self {
        Self {
            model: config.model.clone(),
            reviewer_model: config.reviewer_model.clone(),
            context_window: config.context_window,
            summary_limit: config.summary_limit,
        }
    }
}
