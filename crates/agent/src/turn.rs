//! Turn lifecycle

use std::fmt;
use tracing::debug;

use crate::{AgentError, Result};

/// Where a turn is in its pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    Input,
    Planning,
    DirectResponse,
    ToolExecuting,
    Reviewing,
    Finalizing,
    Complete,
    Error,
}

impl TurnState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TurnState::Complete | TurnState::Error)
    }

    /// Whether `next` is a legal successor
    ///
    /// There is no edge back into `Planning` or `ToolExecuting`: a turn runs
    /// at most one tool.
    pub fn can_advance_to(self, next: TurnState) -> bool {
        use TurnState::*;

        if next == Error {
            return !self.is_terminal();
        }
        matches!(
            (self, next),
            (Input, Planning)
                | (Planning, DirectResponse)
                | (Planning, ToolExecuting)
                | (ToolExecuting, Reviewing)
                | (Reviewing, Finalizing)
                | (DirectResponse, Complete)
                | (Finalizing, Complete)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TurnState::Input => "input",
            TurnState::Planning => "planning",
            TurnState::DirectResponse => "direct_response",
            TurnState::ToolExecuting => "tool_executing",
            TurnState::Reviewing => "reviewing",
            TurnState::Finalizing => "finalizing",
            TurnState::Complete => "complete",
            TurnState::Error => "error",
        }
    }
}

impl fmt::Display for TurnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tracks one turn's state and the path it took
#[derive(Debug, Clone)]
pub struct TurnTracker {
    state: TurnState,
    path: Vec<TurnState>,
}

impl Default for TurnTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnTracker {
    pub fn new() -> Self {
        Self {
            state: TurnState::Input,
            path: vec![TurnState::Input],
        }
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    /// Every state visited, in order
    pub fn path(&self) -> &[TurnState] {
        &self.path
    }

    pub fn advance(&mut self, next: TurnState) -> Result<()> {
        if !self.state.can_advance_to(next) {
            return Err(AgentError::IllegalTransition {
                from: self.state,
                to: next,
            });
        }
        debug!("◆ TURN {} -> {}", self.state, next);
        self.state = next;
        self.path.push(next);
        Ok(())
    }

    /// Move to `Error` unless already terminal
    pub fn fail(&mut self) {
        if !self.state.is_terminal() {
            self.state = TurnState::Error;
            self.path.push(TurnState::Error);
        }
    }
}
