//! Language-specific configuration
//!
//! Loads settings from ~/.config/droidcode/languages.toml, keyed by language
//! tag (`html`, `css`, `javascript`, `python`).

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Configuration for a single language
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LanguageConfig {
    /// Content of new files in this language
    pub template: Option<String>,
    /// Tab width override for this language
    pub tab_width: Option<usize>,
}

/// All language configurations loaded from languages.toml
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LanguagesConfig {
    #[serde(flatten)]
    pub languages: HashMap<String, LanguageConfig>,
}

impl LanguagesConfig {
    /// Get the new-file template override for a language tag
    pub fn get_template(&self, language: &str) -> Option<&str> {
        self.languages
            .get(language)
            .and_then(|config| config.template.as_deref())
    }

    /// Get tab width override for a language tag
    pub fn get_tab_width(&self, language: &str) -> Option<usize> {
        self.languages
            .get(language)
            .and_then(|config| config.tab_width)
    }
}

/// Get the path to languages.toml
pub fn languages_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".config/droidcode/languages.toml"))
}

/// Default template for languages.toml with examples
fn default_languages_template() -> &'static str {
    r#"# droidcode language configuration
# Per-language settings, keyed by language tag.
# Example configurations are commented out below.

# [python]
# tab_width = 4
# template = """
# def main():
#     print("Hello World")
#
# main()
# """

# [javascript]
# tab_width = 2

# [css]
# tab_width = 2
# template = "* { box-sizing: border-box; }\n"

# [html]
# tab_width = 2
"#
}

/// Ensure languages.toml exists with template
fn ensure_languages_config_exists() {
    let Some(path) = languages_config_path() else {
        return;
    };

    if let Some(parent) = path.parent() {
        if !parent.exists() {
            let _ = std::fs::create_dir_all(parent);
        }
    }

    if !path.exists() {
        let _ = std::fs::write(&path, default_languages_template());
    }
}

/// Load languages configuration from ~/.config/droidcode/languages.toml
/// Returns default (empty) config if file doesn't exist or can't be parsed
pub fn load_languages_config() -> LanguagesConfig {
    ensure_languages_config_exists();

    match languages_config_path() {
        Some(path) => load_languages_config_from(&path),
        None => LanguagesConfig::default(),
    }
}

/// Load languages configuration from a specific file
pub fn load_languages_config_from(path: &Path) -> LanguagesConfig {
    if !path.exists() {
        return LanguagesConfig::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str::<LanguagesConfig>(&content) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to parse languages.toml");
                LanguagesConfig::default()
            }
        },
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read languages.toml");
            LanguagesConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_by_tag() {
        let config: LanguagesConfig = toml::from_str(
            "[python]\ntab_width = 2\ntemplate = \"print('hi')\\n\"\n\n[css]\ntab_width = 8\n",
        )
        .unwrap();

        assert_eq!(config.get_tab_width("python"), Some(2));
        assert_eq!(config.get_template("python"), Some("print('hi')\n"));
        assert_eq!(config.get_tab_width("css"), Some(8));
        assert_eq!(config.get_template("css"), None);
        assert_eq!(config.get_tab_width("html"), None);
    }

    #[test]
    fn test_template_is_all_comments() {
        let config: LanguagesConfig = toml::from_str(default_languages_template()).unwrap();
        assert!(config.languages.is_empty());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_languages_config_from(&dir.path().join("languages.toml"));
        assert!(config.languages.is_empty());
    }
}
