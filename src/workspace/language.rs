//! Language classification by file name

use serde::{Deserialize, Serialize};

/// Language of a workspace file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Language {
    Markup,
    Style,
    Script,
    Python,
    /// Tag not recognised in a loaded snapshot
    Unknown,
}

impl Language {
    /// Classify a file by its extension. Unrecognised names are markup.
    pub fn from_file_name(name: &str) -> Self {
        if name.ends_with(".py") {
            Language::Python
        } else if name.ends_with(".js") {
            Language::Script
        } else if name.ends_with(".css") {
            Language::Style
        } else {
            Language::Markup
        }
    }

    /// Tag used in snapshots, languages.toml and assistant requests
    pub fn tag(&self) -> &'static str {
        match self {
            Language::Markup => "html",
            Language::Style => "css",
            Language::Script => "javascript",
            Language::Python => "python",
            Language::Unknown => "unknown",
        }
    }

    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "html" => Language::Markup,
            "css" => Language::Style,
            "javascript" | "js" => Language::Script,
            "python" => Language::Python,
            _ => Language::Unknown,
        }
    }

    /// Content of a new file when languages.toml has no template
    pub fn default_template(&self) -> &'static str {
        match self {
            Language::Python => "# Python Script\nprint(\"Hello World\")",
            Language::Markup => "<!DOCTYPE html>\n<html>\n<body>\n\n</body>\n</html>",
            Language::Script => "// JavaScript\nconsole.log(\"Hello World\");",
            Language::Style => "/* Styles */\n",
            Language::Unknown => "",
        }
    }

    /// Whether the execution simulator handles this language
    pub fn is_runnable(&self) -> bool {
        matches!(self, Language::Python)
    }
}

impl From<String> for Language {
    fn from(tag: String) -> Self {
        Language::from_tag(&tag)
    }
}

impl From<Language> for String {
    fn from(language: Language) -> Self {
        language.tag().to_string()
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.tag())
    }
}
