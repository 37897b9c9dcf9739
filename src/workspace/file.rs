use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::language::Language;

/// Opaque, stable file identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
    /// Fresh id derived from a display name, e.g. `util_js_<uuid>`
    pub fn generate(name: &str) -> Self {
        Self(format!(
            "{}_{}",
            name.replace('.', "_"),
            Uuid::new_v4().simple()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A file in the workspace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    pub id: FileId,
    /// Display name, also decides the language
    pub name: String,
    pub language: Language,
    pub content: String,
}

impl File {
    pub fn new(id: FileId, name: impl Into<String>, content: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id,
            language: Language::from_file_name(&name),
            name,
            content: content.into(),
        }
    }
}
