//! Find/replace over raw buffer text
//!
//! A query compiles into a [`Matcher`]; literal queries are escaped so every
//! character matches itself. Match positions are character offsets so they
//! line up with caret offsets.

use regex::{NoExpand, Regex, RegexBuilder};
use thiserror::Error;

/// Errors that can occur while compiling a query
#[derive(Debug, Error)]
pub enum SearchError {
    /// The query is not a valid regular expression
    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Find/replace panel state
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    /// Text or pattern to look for
    pub query: String,
    /// Literal replacement text
    pub replacement: String,
    /// Match case exactly (default: false)
    pub case_sensitive: bool,
    /// Treat the query as a regular expression (default: false)
    pub regex_mode: bool,
}

impl SearchQuery {
    pub fn compile(&self) -> Result<Matcher, SearchError> {
        Matcher::compile(&self.query, self.case_sensitive, self.regex_mode)
    }
}

/// A match as a half-open range of character offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    pub start: usize,
    pub end: usize,
}

/// Compiled search pattern, independent of any content
#[derive(Debug, Clone)]
pub struct Matcher {
    /// None for the empty query, which matches nothing
    regex: Option<Regex>,
}

impl Matcher {
    /// Compile a query. Only fails in regex mode.
    pub fn compile(query: &str, case_sensitive: bool, regex_mode: bool) -> Result<Self, SearchError> {
        if query.is_empty() {
            return Ok(Self { regex: None });
        }

        let pattern = if regex_mode {
            query.to_string()
        } else {
            regex::escape(query)
        };

        let regex = RegexBuilder::new(&pattern)
            .case_insensitive(!case_sensitive)
            .build()?;
        Ok(Self { regex: Some(regex) })
    }

    /// Whether this matcher came from an empty query
    pub fn is_empty(&self) -> bool {
        self.regex.is_none()
    }
}

/// Convert a byte index to a character index in a string
fn byte_to_char_idx(s: &str, byte_idx: usize) -> usize {
    s[..byte_idx.min(s.len())].chars().count()
}

/// Convert a character index to a byte index in a string
fn char_to_byte_idx(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(idx, _)| idx)
        .unwrap_or(s.len())
}

fn to_match(content: &str, m: regex::Match<'_>) -> Match {
    let start = byte_to_char_idx(content, m.start());
    Match {
        start,
        end: start + m.as_str().chars().count(),
    }
}

/// First match in `content`, always scanning from the start
pub fn find_next(content: &str, matcher: &Matcher) -> Option<Match> {
    let regex = matcher.regex.as_ref()?;
    regex.find(content).map(|m| to_match(content, m))
}

/// First match starting at or after character `offset`, wrapping to the
/// start of `content` when nothing follows
pub fn find_from(content: &str, matcher: &Matcher, offset: usize) -> Option<Match> {
    let regex = matcher.regex.as_ref()?;
    let start = char_to_byte_idx(content, offset);
    regex
        .find_at(content, start)
        .or_else(|| regex.find(content))
        .map(|m| to_match(content, m))
}

/// Number of non-overlapping matches
pub fn count_matches(content: &str, matcher: &Matcher) -> usize {
    matcher
        .regex
        .as_ref()
        .map_or(0, |regex| regex.find_iter(content).count())
}

/// Replace the first match with the literal `replacement`
pub fn replace_next(content: &str, matcher: &Matcher, replacement: &str) -> String {
    match &matcher.regex {
        Some(regex) => regex.replacen(content, 1, NoExpand(replacement)).into_owned(),
        None => content.to_string(),
    }
}

/// Replace every non-overlapping match with the literal `replacement`
pub fn replace_all(content: &str, matcher: &Matcher, replacement: &str) -> String {
    match &matcher.regex {
        Some(regex) => regex.replace_all(content, NoExpand(replacement)).into_owned(),
        None => content.to_string(),
    }
}
