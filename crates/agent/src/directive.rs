//! Planner tool directives
//!
//! A planner reply that starts with `TOOL:` asks for a tool call:
//!
//! ```text
//! TOOL: nmap_scan {"target": "10.0.0.5"}
//! ```
//!
//! Models often get the JSON wrong, so arguments that don't parse as an
//! object are repaired from the raw text for the tools that take a single
//! string argument.

use serde_json::{Map, Value};

/// Literal that marks a directive; matched case-sensitively at offset 0
pub const DIRECTIVE_PREFIX: &str = "TOOL:";

/// Argument text assumed when the directive has none
pub const EMPTY_ARGS: &str = "{}";

/// A parsed tool request
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDirective {
    pub tool_name: String,
    /// Argument text as written, trimmed; empty when absent
    pub raw_args: String,
    pub args: Map<String, Value>,
    /// Whether `args` came from the fallback rather than the JSON
    pub repaired: bool,
}

impl ToolDirective {
    /// Parse a planner reply; `None` means a direct answer
    pub fn parse(text: &str) -> Option<Self> {
        let rest = text.strip_prefix(DIRECTIVE_PREFIX)?.trim();

        let (tool_name, raw_args) = match rest.split_once(char::is_whitespace) {
            Some((name, remainder)) => (name, remainder.trim()),
            None => (rest, ""),
        };

        let arg_text = if raw_args.is_empty() { EMPTY_ARGS } else { raw_args };
        let (args, repaired) = match serde_json::from_str::<Value>(arg_text) {
            Ok(Value::Object(map)) => (map, false),
            _ => (repair(tool_name, raw_args), true),
        };

        Some(Self {
            tool_name: tool_name.to_string(),
            raw_args: raw_args.to_string(),
            args,
            repaired,
        })
    }

    /// `args` as compact JSON
    pub fn args_json(&self) -> String {
        Value::Object(self.args.clone()).to_string()
    }

    /// Transcript line announcing the call
    pub fn execute_notice(&self) -> String {
        format!("Executing tool: {} {}", self.tool_name, self.raw_args)
            .trim_end()
            .to_string()
    }
}

/// Fallback arguments keyed by tool name
fn repair(tool_name: &str, raw: &str) -> Map<String, Value> {
    let key = match tool_name {
        "execute_command" => "command",
        "nmap_scan" => "target",
        "run_python_script" => "script_content",
        _ => return Map::new(),
    };

    let mut args = Map::new();
    args.insert(key.to_string(), Value::String(raw.to_string()));
    args
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_direct_answer_is_not_a_directive() {
        assert!(ToolDirective::parse("Hello there").is_none());
        assert!(ToolDirective::parse("").is_none());
    }

    #[test]
    fn test_prefix_is_case_sensitive_and_anchored() {
        assert!(ToolDirective::parse("tool: list_files").is_none());
        assert!(ToolDirective::parse(" TOOL: list_files").is_none());
        assert!(ToolDirective::parse("\nTOOL: list_files").is_none());
        assert!(ToolDirective::parse("Sure. TOOL: list_files").is_none());
    }

    #[test]
    fn test_no_argument_directive() {
        let d = ToolDirective::parse("TOOL: list_files").unwrap();
        assert_eq!(d.tool_name, "list_files");
        assert_eq!(d.raw_args, "");
        assert_eq!(d.args_json(), "{}");
        assert!(d.args.is_empty());
        assert!(!d.repaired);
    }

    #[test]
    fn test_json_arguments() {
        let d = ToolDirective::parse(r#"TOOL: nmap_scan {"target": "10.0.0.5", "ports": "1-1024"}"#)
            .unwrap();
        assert_eq!(d.tool_name, "nmap_scan");
        assert_eq!(Value::Object(d.args.clone()), json!({"target": "10.0.0.5", "ports": "1-1024"}));
        assert!(!d.repaired);
    }

    #[test]
    fn test_whitespace_run_and_trailing_space() {
        let d = ToolDirective::parse("TOOL:   read_file \t {\"path\": \"a.txt\"}  \n").unwrap();
        assert_eq!(d.tool_name, "read_file");
        assert_eq!(d.raw_args, r#"{"path": "a.txt"}"#);
        assert_eq!(d.args["path"], "a.txt");
    }

    #[test]
    fn test_no_space_after_prefix() {
        let d = ToolDirective::parse("TOOL:list_files").unwrap();
        assert_eq!(d.tool_name, "list_files");
    }

    #[test]
    fn test_repair_execute_command() {
        let d = ToolDirective::parse("TOOL: execute_command ls -la").unwrap();
        assert_eq!(Value::Object(d.args.clone()), json!({"command": "ls -la"}));
        assert!(d.repaired);
    }

    #[test]
    fn test_repair_nmap_scan() {
        let d = ToolDirective::parse("TOOL: nmap_scan 192.168.1.1").unwrap();
        assert_eq!(Value::Object(d.args), json!({"target": "192.168.1.1"}));
    }

    #[test]
    fn test_repair_python_script() {
        let d = ToolDirective::parse("TOOL: run_python_script print('hi')").unwrap();
        assert_eq!(Value::Object(d.args), json!({"script_content": "print('hi')"}));
    }

    #[test]
    fn test_repair_unknown_tool_is_empty() {
        let d = ToolDirective::parse("TOOL: unknown_tool ls -la").unwrap();
        assert!(d.args.is_empty());
        assert!(d.repaired);
    }

    #[test]
    fn test_non_object_json_is_repaired() {
        let d = ToolDirective::parse(r#"TOOL: execute_command "whoami""#).unwrap();
        assert_eq!(Value::Object(d.args), json!({"command": "\"whoami\""}));

        let d = ToolDirective::parse("TOOL: nmap_scan [1, 2]").unwrap();
        assert_eq!(Value::Object(d.args), json!({"target": "[1, 2]"}));
    }

    #[test]
    fn test_multiline_raw_args_kept() {
        let d = ToolDirective::parse("TOOL: run_python_script import os\nprint(os.getcwd())").unwrap();
        assert_eq!(d.args["script_content"], "import os\nprint(os.getcwd())");
    }

    #[test]
    fn test_execute_notice() {
        let d = ToolDirective::parse("TOOL: list_files").unwrap();
        assert_eq!(d.execute_notice(), "Executing tool: list_files");

        let d = ToolDirective::parse("TOOL: execute_command ls -la").unwrap();
        assert_eq!(d.execute_notice(), "Executing tool: execute_command ls -la");
    }

    #[test]
    fn test_args_json() {
        let d = ToolDirective::parse("TOOL: execute_command id").unwrap();
        assert_eq!(d.args_json(), r#"{"command":"id"}"#);
    }
}
