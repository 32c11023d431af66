//! Tests for the context builder

use serde_json::json;

use overwatch_agent::context::{CONTEXT_WINDOW, REVIEWER_SYSTEM_PROMPT};
use overwatch_agent::{ContextBuilder, ToolDirective};
use overwatch_provider::Message;
use overwatch_toolhost::ToolDescriptor;
use overwatch_transcript::{AgentStep, NewMessage, Role};

fn transcript(n: u64) -> Vec<overwatch_transcript::Message> {
    (1..=n)
        .map(|i| {
            let role = if i % 2 == 1 { Role::User } else { Role::Assistant };
            NewMessage::agentic(role, AgentStep::Response, format!("m{}", i)).into_message(i)
        })
        .collect()
}

#[test]
fn test_default_window_is_ten() {
    assert_eq!(CONTEXT_WINDOW, 10);
    assert_eq!(ContextBuilder::default().window_size(), 10);
}

#[test]
fn test_window_keeps_most_recent_entries() {
    let builder = ContextBuilder::default();
    let window = builder.window(&transcript(25));

    assert_eq!(window.len(), 10);
    assert_eq!(window.first().unwrap().content, "m16");
    assert_eq!(window.last().unwrap().content, "m25");
}

#[test]
fn test_window_projects_role_and_content() {
    let builder = ContextBuilder::default();
    let window = builder.window(&transcript(2));

    assert_eq!(window, vec![Message::user("m1"), Message::assistant("m2")]);
}

#[test]
fn test_window_of_empty_transcript() {
    assert!(ContextBuilder::default().window(&[]).is_empty());
}

#[test]
fn test_custom_window() {
    let builder = ContextBuilder::new(3);
    let window = builder.window(&transcript(5));
    let contents: Vec<&str> = window.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["m3", "m4", "m5"]);
}

#[test]
fn test_planner_prompt_lists_tools() {
    let tools = vec![
        ToolDescriptor::new("nmap_scan", "Scan ports", json!({})),
        ToolDescriptor::new("execute_command", "Run a command", json!({})),
    ];
    let prompt = ContextBuilder::default().planner_prompt(&tools);

    assert!(prompt.contains("- nmap_scan: Scan ports\n- execute_command: Run a command"));
    assert!(prompt.contains("reply ONLY with:\nTOOL: <tool_name> <json_args>"));
    assert!(!prompt.contains("No tools are currently available."));
}

#[test]
fn test_planner_prompt_without_tools() {
    let none: Vec<ToolDescriptor> = Vec::new();
    let prompt = ContextBuilder::default().planner_prompt(&none);
    assert!(prompt.contains("No tools are currently available."));
}

#[test]
fn test_planner_messages_prepend_system() {
    let window = vec![Message::user("hi")];
    let none: Vec<ToolDescriptor> = Vec::new();
    let messages = ContextBuilder::default().planner_messages(&none, &window);

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, "system");
    assert_eq!(messages[1], Message::user("hi"));
}

#[test]
fn test_reviewer_messages() {
    let directive = ToolDirective::parse("TOOL: execute_command whoami").unwrap();
    let messages = ContextBuilder::default().reviewer_messages(&directive, "root");

    assert_eq!(messages[0], Message::system(REVIEWER_SYSTEM_PROMPT));
    assert_eq!(messages[1].role, "user");
    assert_eq!(
        messages[1].content,
        r#"The Executor ran 'execute_command' with args '{"command":"whoami"}'. Result: root. Review this action. Is it safe and correct? Reply with a short comment."#
    );
}

#[test]
fn test_finalizer_messages() {
    let window = vec![Message::user("who am i?")];
    let messages = ContextBuilder::default().finalizer_messages(
        &window,
        "TOOL: execute_command whoami",
        "execute_command",
        "root",
        "Harmless",
    );

    assert_eq!(
        messages,
        vec![
            Message::user("who am i?"),
            Message::assistant("TOOL: execute_command whoami"),
            Message::system(
                "Tool 'execute_command' executed. Result: root. Reviewer said: Harmless. Provide the final answer to the user."
            ),
        ]
    );
}
