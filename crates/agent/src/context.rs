//! Context builder for assembling model prompts

use tracing::debug;

use overwatch_provider::Message;
use overwatch_toolhost::ToolDescriptor;
use overwatch_transcript as transcript;

use crate::directive::ToolDirective;

/// Entries of the transcript the model gets to see
pub const CONTEXT_WINDOW: usize = 10;

pub const REVIEWER_SYSTEM_PROMPT: &str = "You are a security reviewer. Be critical.";

/// Builds the message lists for the planner, reviewer and finalizer calls
#[derive(Debug, Clone)]
pub struct ContextBuilder {
    window: usize,
}

impl Default for ContextBuilder {
    fn default() -> Self {
        Self::new(CONTEXT_WINDOW)
    }
}

impl ContextBuilder {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    pub fn window_size(&self) -> usize {
        self.window
    }

    /// Trailing entries of the transcript as role/content pairs
    ///
    /// Older entries are dropped outright, nothing is summarized.
    pub fn window(&self, messages: &[transcript::Message]) -> Vec<Message> {
        transcript::history(messages, self.window)
    }

    /// System prompt listing the available tools
    pub fn planner_prompt<'a>(&self, tools: impl IntoIterator<Item = &'a ToolDescriptor>) -> String {
        let catalogue: Vec<String> = tools
            .into_iter()
            .map(|t| format!("- {}: {}", t.name, t.description))
            .collect();

        let tools_section = if catalogue.is_empty() {
            "No tools are currently available.".to_string()
        } else {
            format!("You have access to the following tools:\n{}", catalogue.join("\n"))
        };

        format!(
            r#"You are an AI operations assistant.

{}

If you need to use a tool, reply ONLY with:
TOOL: <tool_name> <json_args>
where <json_args> is a JSON object with the tool's arguments.
Otherwise, just answer the user directly."#,
            tools_section
        )
    }

    /// Planner call: tool prompt followed by the window
    pub fn planner_messages<'a>(
        &self,
        tools: impl IntoIterator<Item = &'a ToolDescriptor>,
        window: &[Message],
    ) -> Vec<Message> {
        let mut messages = vec![Message::system(self.planner_prompt(tools))];
        messages.extend_from_slice(window);
        debug!("◆ PLANNER CONTEXT: {} MESSAGES", messages.len());
        messages
    }

    /// Reviewer call: critique of the executed action
    pub fn reviewer_messages(&self, directive: &ToolDirective, summary: &str) -> Vec<Message> {
        let prompt = format!(
            "The Executor ran '{}' with args '{}'. Result: {}. Review this action. Is it safe and correct? Reply with a short comment.",
            directive.tool_name,
            directive.args_json(),
            summary
        );
        vec![Message::system(REVIEWER_SYSTEM_PROMPT), Message::user(prompt)]
    }

    /// Finalizer call: window, the directive as the assistant's turn, and
    /// the outcome restated as a system instruction
    pub fn finalizer_messages(
        &self,
        window: &[Message],
        directive_line: &str,
        tool_name: &str,
        summary: &str,
        review: &str,
    ) -> Vec<Message> {
        let mut messages = window.to_vec();
        messages.push(Message::assistant(directive_line));
        messages.push(Message::system(format!(
            "Tool '{}' executed. Result: {}. Reviewer said: {}. Provide the final answer to the user.",
            tool_name, summary, review
        )));
        messages
    }
}
