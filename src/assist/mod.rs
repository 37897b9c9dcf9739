//! External assistant integration
//!
//! Completion, improvement, explanation and execution simulation are
//! answered by a collaborator behind the [`Assistant`] trait. Failures never
//! reach the editor: the `request_*` helpers turn them into the fallback
//! values shown to the user.

mod client;
mod types;

use std::sync::OnceLock;
use std::time::Duration;

use regex::Regex;
use thiserror::Error;

use crate::workspace::Language;

pub use client::CommandAssistant;
pub use types::{AssistRequest, RequestKind};

/// Shown in place of an improved file when the request fails
pub const IMPROVE_FAILED: &str = "Error generating suggestions.";
/// Shown in place of an explanation when the request fails
pub const EXPLAIN_FAILED: &str = "Error connecting to the assistant.";
/// Console output when simulation fails
pub const EXECUTION_FAILED: &str = ">>> Critical execution error.";
/// Console output when the program prints nothing
pub const NO_OUTPUT: &str = ">>> No output.";

/// Characters before the caret sent as completion context
pub const COMPLETION_CONTEXT_CHARS: usize = 500;

/// Errors that can occur while talking to the assistant
#[derive(Debug, Error)]
pub enum CollaboratorError {
    #[error("No assistant command configured")]
    NotConfigured,

    #[error("Assistant command not found: {0}")]
    CommandNotFound(String),

    #[error("Failed to start assistant: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Failed to send request to assistant: {0}")]
    StdinWrite(#[source] std::io::Error),

    #[error("Assistant timed out after {0:?}")]
    Timeout(Duration),

    #[error("Assistant failed (exit {}): {}", .exit_code.map_or_else(|| "signal".to_string(), |c| c.to_string()), .stderr.trim())]
    Failed { stderr: String, exit_code: Option<i32> },

    #[error("Assistant output was not valid UTF-8")]
    InvalidUtf8,

    #[error("Failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The external assistant
pub trait Assistant: Send + Sync {
    /// Ordered completion candidates for the text at `caret`
    fn complete(&self, content: &str, language: Language, caret: usize) -> Result<Vec<String>, CollaboratorError>;

    /// A rewritten file, possibly wrapped in prose and a fenced block
    fn improve(&self, content: &str, language: Language, instruction: &str) -> Result<String, CollaboratorError>;

    /// A prose explanation of the file
    fn explain(&self, content: &str, language: Language) -> Result<String, CollaboratorError>;

    /// Predicted console output of running the file
    fn simulate(&self, content: &str, language: Language) -> Result<String, CollaboratorError>;
}

/// Assistant used when no command is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineAssistant;

impl Assistant for OfflineAssistant {
    fn complete(&self, _: &str, _: Language, _: usize) -> Result<Vec<String>, CollaboratorError> {
        Err(CollaboratorError::NotConfigured)
    }

    fn improve(&self, _: &str, _: Language, _: &str) -> Result<String, CollaboratorError> {
        Err(CollaboratorError::NotConfigured)
    }

    fn explain(&self, _: &str, _: Language) -> Result<String, CollaboratorError> {
        Err(CollaboratorError::NotConfigured)
    }

    fn simulate(&self, _: &str, _: Language) -> Result<String, CollaboratorError> {
        Err(CollaboratorError::NotConfigured)
    }
}

/// Up to [`COMPLETION_CONTEXT_CHARS`] characters ending at `caret`
pub fn completion_prefix(content: &str, caret: usize) -> &str {
    let end = content
        .char_indices()
        .nth(caret)
        .map_or(content.len(), |(idx, _)| idx);
    let start = content[..end]
        .char_indices()
        .rev()
        .nth(COMPLETION_CONTEXT_CHARS - 1)
        .map_or(0, |(idx, _)| idx);
    &content[start..end]
}

/// Read a completion response: a JSON array of strings, or an object with a
/// `suggestions` array. Anything else is no suggestions.
pub fn parse_suggestions(raw: &str) -> Vec<String> {
    let value: serde_json::Value = match serde_json::from_str(raw.trim()) {
        Ok(value) => value,
        Err(_) => return Vec::new(),
    };

    let items = match &value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(map) => match map.get("suggestions") {
            Some(serde_json::Value::Array(items)) => items,
            _ => return Vec::new(),
        },
        _ => return Vec::new(),
    };

    items
        .iter()
        .filter_map(|item| item.as_str())
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Contents of the first fenced code block, or the whole text if there is none
pub fn extract_code_block(text: &str) -> &str {
    static FENCE: OnceLock<Option<Regex>> = OnceLock::new();
    let fence = FENCE.get_or_init(|| Regex::new(r"```(?:\w+)?\n([\s\S]*?)```").ok());

    fence
        .as_ref()
        .and_then(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map_or(text, |m| m.as_str())
}

/// Completions with failures mapped to an empty list
pub fn request_suggestions(assistant: &dyn Assistant, content: &str, language: Language, caret: usize) -> Vec<String> {
    match assistant.complete(content, language, caret) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(error = %e, "completion request failed");
            Vec::new()
        }
    }
}

/// The assistant's full answer, or [`IMPROVE_FAILED`]. Apply it with
/// [`extract_code_block`].
pub fn request_improvement(assistant: &dyn Assistant, content: &str, language: Language, instruction: &str) -> String {
    match assistant.improve(content, language, instruction) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "improvement request failed");
            IMPROVE_FAILED.to_string()
        }
    }
}

/// Explanation, or [`EXPLAIN_FAILED`]
pub fn request_explanation(assistant: &dyn Assistant, content: &str, language: Language) -> String {
    match assistant.explain(content, language) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "explanation request failed");
            EXPLAIN_FAILED.to_string()
        }
    }
}

/// Console output for a run, with the failure and empty-output fallbacks
pub fn simulate_execution(assistant: &dyn Assistant, content: &str, language: Language) -> String {
    match assistant.simulate(content, language) {
        Ok(output) if output.trim().is_empty() => NO_OUTPUT.to_string(),
        Ok(output) => output,
        Err(e) => {
            tracing::warn!(error = %e, "execution simulation failed");
            EXECUTION_FAILED.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(&'static str);

    impl Assistant for Canned {
        fn complete(&self, _: &str, _: Language, _: usize) -> Result<Vec<String>, CollaboratorError> {
            Ok(parse_suggestions(self.0))
        }

        fn improve(&self, _: &str, _: Language, _: &str) -> Result<String, CollaboratorError> {
            Ok(self.0.to_string())
        }

        fn explain(&self, _: &str, _: Language) -> Result<String, CollaboratorError> {
            Ok(self.0.to_string())
        }

        fn simulate(&self, _: &str, _: Language) -> Result<String, CollaboratorError> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn test_parse_suggestions() {
        assert_eq!(parse_suggestions(r#"["print()", "pass"]"#), vec!["print()", "pass"]);
        assert_eq!(
            parse_suggestions(r#"{"suggestions": ["a", "", 3, "b"]}"#),
            vec!["a", "b"]
        );
        assert!(parse_suggestions("not json").is_empty());
        assert!(parse_suggestions(r#"{"other": []}"#).is_empty());
        assert!(parse_suggestions("").is_empty());
    }

    #[test]
    fn test_extract_code_block() {
        assert_eq!(extract_code_block("```js\nlet a;\n```"), "let a;\n");
        assert_eq!(extract_code_block("see:\n```\nx\n```\n```\ny\n```"), "x\n");
        assert_eq!(extract_code_block("plain code"), "plain code");
    }

    #[test]
    fn test_completion_prefix() {
        assert_eq!(completion_prefix("hello world", 5), "hello");
        assert_eq!(completion_prefix("año", 3), "año");

        let long = "x".repeat(600) + "tail";
        let prefix = completion_prefix(&long, 604);
        assert_eq!(prefix.chars().count(), COMPLETION_CONTEXT_CHARS);
        assert!(prefix.ends_with("tail"));
    }

    #[test]
    fn test_offline_fallbacks() {
        let offline = OfflineAssistant;
        assert!(request_suggestions(&offline, "abc", Language::Python, 3).is_empty());
        assert_eq!(request_improvement(&offline, "abc", Language::Python, ""), IMPROVE_FAILED);
        assert_eq!(request_explanation(&offline, "abc", Language::Python), EXPLAIN_FAILED);
        assert_eq!(simulate_execution(&offline, "abc", Language::Python), EXECUTION_FAILED);
    }

    #[test]
    fn test_empty_output() {
        assert_eq!(simulate_execution(&Canned("  \n"), "", Language::Python), NO_OUTPUT);
        assert_eq!(simulate_execution(&Canned("120\n"), "", Language::Python), "120\n");
    }

    #[test]
    fn test_improvement_keeps_prose() {
        let canned = Canned("Cleaner:\n```python\nprint(1)\n```");
        let answer = request_improvement(&canned, "", Language::Python, "tidy");
        assert!(answer.starts_with("Cleaner:"));
        assert_eq!(extract_code_block(&answer), "print(1)\n");
    }

    #[test]
    fn test_error_messages() {
        let err = CollaboratorError::Failed {
            stderr: "boom\n".to_string(),
            exit_code: Some(2),
        };
        assert_eq!(err.to_string(), "Assistant failed (exit 2): boom");
    }
}
