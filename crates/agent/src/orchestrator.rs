//! Turn orchestrator - core processing engine

use std::sync::Arc;
use tracing::{debug, error, info, warn};

use overwatch_provider::{Completer, Message};
use overwatch_toolhost::ToolProvider;
use overwatch_transcript::{AgentStep, NewMessage, Role, TranscriptStore};

use crate::context::ContextBuilder;
use crate::directive::ToolDirective;
use crate::invoker::{ToolInvoker, ToolOutcome};
use crate::summary::summarize_to;
use crate::turn::{TurnState, TurnTracker};
use crate::{AgentSettings, Result};

/// What happened during one turn
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReport {
    /// Final answer, also persisted as the `response` step
    pub text: String,
    pub state: TurnState,
    pub path: Vec<TurnState>,
    pub directive: Option<ToolDirective>,
    pub outcome: Option<ToolOutcome>,
    /// Whether any model call returned a placeholder
    pub degraded: bool,
}

/// Plans, optionally runs one tool, reviews it and answers
pub struct Orchestrator {
    completer: Completer,
    invoker: ToolInvoker,
    transcript: Arc<dyn TranscriptStore>,
    context: ContextBuilder,
    settings: AgentSettings,
}

impl Orchestrator {
    pub fn new(
        completer: Completer,
        tools: Arc<dyn ToolProvider>,
        transcript: Arc<dyn TranscriptStore>,
        settings: AgentSettings,
    ) -> Self {
        Self {
            completer,
            invoker: ToolInvoker::new(tools),
            transcript,
            context: ContextBuilder::new(settings.context_window),
            settings,
        }
    }

    /// Process one user message and return the final answer
    pub async fn run_turn(&self, content: &str) -> Result<String> {
        self.run_turn_detailed(content).await.map(|report| report.text)
    }

    /// [`run_turn`](Self::run_turn) with the full report
    pub async fn run_turn_detailed(&self, content: &str) -> Result<TurnReport> {
        info!("◆ TURN START: {} CHARS", content.chars().count());

        self.record(Role::User, AgentStep::Input, content).await?;

        let mut turn = TurnTracker::new();
        match self.process(content, &mut turn).await {
            Ok(report) => {
                info!(
                    "◆ TURN COMPLETE: {}",
                    report
                        .path
                        .iter()
                        .map(|s| s.as_str())
                        .collect::<Vec<_>>()
                        .join(" -> ")
                );
                Ok(report)
            }
            Err(e) => {
                error!("◆ TURN FAILED IN {}: {}", turn.state(), e);
                turn.fail();
                if let Err(log_err) = self
                    .record(Role::Assistant, AgentStep::Error, &format!("Error: {}", e))
                    .await
                {
                    warn!("◆ COULD NOT RECORD TURN ERROR: {}", log_err);
                }
                Err(e)
            }
        }
    }

    async fn process(&self, content: &str, turn: &mut TurnTracker) -> Result<TurnReport> {
        turn.advance(TurnState::Planning)?;

        let history = self.transcript.list_all().await?;
        let window = self.context.window(&history);
        let registry = self.invoker.discover().await;

        let plan = self
            .completer
            .complete(
                self.context.planner_messages(registry.descriptors(), &window),
                Some(&self.settings.model),
            )
            .await;
        let mut degraded = plan.is_degraded();
        let planned = plan.into_text();
        debug!("◆ PLANNER SAID: {}", planned);

        let Some(directive) = ToolDirective::parse(&planned) else {
            turn.advance(TurnState::DirectResponse)?;
            self.record(Role::Assistant, AgentStep::Response, &planned)
                .await?;
            turn.advance(TurnState::Complete)?;
            return Ok(TurnReport {
                text: planned,
                state: turn.state(),
                path: turn.path().to_vec(),
                directive: None,
                outcome: None,
                degraded,
            });
        };

        debug!(
            "◆ DIRECTIVE: {} {} (repaired={}) FOR {:?}",
            directive.tool_name,
            directive.args_json(),
            directive.repaired,
            content
        );

        turn.advance(TurnState::ToolExecuting)?;
        self.record(Role::Assistant, AgentStep::Execute, &directive.execute_notice())
            .await?;
        let outcome = self.invoker.invoke(&directive).await;
        let summary = summarize_to(&outcome.result_text(), self.settings.summary_limit);

        turn.advance(TurnState::Reviewing)?;
        let review = self
            .completer
            .complete(
                self.context.reviewer_messages(&directive, &summary),
                Some(&self.settings.reviewer_model),
            )
            .await;
        degraded |= review.is_degraded();
        let review = review.into_text();
        self.record(Role::Assistant, AgentStep::Review, &review)
            .await?;

        turn.advance(TurnState::Finalizing)?;
        let finalized = self
            .completer
            .complete(
                self.finalizer_messages(&window, &planned, &directive, &summary, &review),
                Some(&self.settings.model),
            )
            .await;
        degraded |= finalized.is_degraded();
        let text = finalized.into_text();
        self.record(Role::Assistant, AgentStep::Response, &text)
            .await?;

        turn.advance(TurnState::Complete)?;
        Ok(TurnReport {
            text,
            state: turn.state(),
            path: turn.path().to_vec(),
            directive: Some(directive),
            outcome: Some(outcome),
            degraded,
        })
    }

    fn finalizer_messages(
        &self,
        window: &[Message],
        planned: &str,
        directive: &ToolDirective,
        summary: &str,
        review: &str,
    ) -> Vec<Message> {
        self.context.finalizer_messages(
            window,
            planned.trim(),
            &directive.tool_name,
            summary,
            review,
        )
    }

    async fn record(&self, role: Role, step: AgentStep, content: &str) -> Result<()> {
        self.transcript
            .append(NewMessage::agentic(role, step, content))
            .await?;
        Ok(())
    }

    /// Release the tool host session
    pub async fn shutdown(&self) {
        self.invoker.close().await;
    }
}
