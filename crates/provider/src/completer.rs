//! Failure-free completion calls
//!
//! The orchestrator must never abort a turn because the model endpoint is
//! unreachable. [`Completer`] turns every provider outcome into a
//! [`Completion`]: genuine model output, or a placeholder text tagged with
//! the reason it was degraded.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::{ChatParams, Message, Provider, ProviderError};

/// Placeholder returned when no API key is configured
pub const MOCK_RESPONSE: &str = "I am a mock AI because no API key was configured. Please add an OpenRouter key to get real responses.";

/// Why a completion is a placeholder rather than model output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegradeReason {
    NoApiKey,
    Failed(String),
}

impl fmt::Display for DegradeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegradeReason::NoApiKey => write!(f, "no API key configured"),
            DegradeReason::Failed(reason) => write!(f, "{}", reason),
        }
    }
}

/// Outcome of a completion call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Generated(String),
    Degraded { text: String, reason: DegradeReason },
}

impl Completion {
    fn no_api_key() -> Self {
        Completion::Degraded {
            text: MOCK_RESPONSE.to_string(),
            reason: DegradeReason::NoApiKey,
        }
    }

    fn failed(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Completion::Degraded {
            text: format!("Error calling AI: {}", reason),
            reason: DegradeReason::Failed(reason),
        }
    }

    /// Content to show or persist, whatever the outcome
    pub fn text(&self) -> &str {
        match self {
            Completion::Generated(text) => text,
            Completion::Degraded { text, .. } => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Completion::Generated(text) => text,
            Completion::Degraded { text, .. } => text,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Completion::Degraded { .. })
    }
}

/// Provider wrapper that never fails
#[derive(Clone)]
pub struct Completer {
    provider: Arc<dyn Provider>,
    max_tokens: u32,
    temperature: f32,
}

impl Completer {
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        let defaults = ChatParams::default();
        Self {
            provider,
            max_tokens: defaults.max_tokens,
            temperature: defaults.temperature,
        }
    }

    pub fn with_sampling(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }

    pub fn default_model(&self) -> String {
        self.provider.default_model()
    }

    /// Run one completion; `model` overrides the provider default
    pub async fn complete(&self, messages: Vec<Message>, model: Option<&str>) -> Completion {
        if !self.provider.is_configured() {
            warn!("◆ NO API KEY CONFIGURED, RETURNING MOCK RESPONSE");
            return Completion::no_api_key();
        }

        let model = model
            .map(|m| m.to_string())
            .unwrap_or_else(|| self.provider.default_model());
        debug!("◆ COMPLETION REQUEST: model={} messages={}", model, messages.len());

        let params = ChatParams {
            model,
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        match self.provider.chat(params).await {
            Ok(response) => match response.content {
                Some(content) => Completion::Generated(content),
                None => {
                    warn!("◆ COMPLETION CARRIED NO CONTENT");
                    Completion::failed("empty completion")
                }
            },
            Err(ProviderError::NoApiKey) => Completion::no_api_key(),
            Err(e) => {
                warn!("◆ COMPLETION FAILED: {}", e);
                Completion::failed(e.to_string())
            }
        }
    }
}
