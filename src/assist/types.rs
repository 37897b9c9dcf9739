//! Wire types for the assistant command

use serde::Serialize;

/// What the assistant is asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// Short completions at the caret
    Complete,
    /// Rewrite the whole file
    Improve,
    /// Describe the file in prose
    Explain,
    /// Predict console output
    Simulate,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Complete => "complete",
            RequestKind::Improve => "improve",
            RequestKind::Explain => "explain",
            RequestKind::Simulate => "simulate",
        }
    }
}

/// One request, written as a single JSON document to the command's stdin
#[derive(Debug, Clone, Serialize)]
pub struct AssistRequest<'a> {
    pub kind: RequestKind,
    pub language: &'a str,
    pub content: &'a str,
    /// Caret offset in characters (completions only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caret: Option<usize>,
    /// Text just before the caret (completions only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<&'a str>,
    /// Free-form user instruction (improvements only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instruction: Option<&'a str>,
}

impl<'a> AssistRequest<'a> {
    pub fn new(kind: RequestKind, language: &'a str, content: &'a str) -> Self {
        Self {
            kind,
            language,
            content,
            caret: None,
            prefix: None,
            instruction: None,
        }
    }
}
