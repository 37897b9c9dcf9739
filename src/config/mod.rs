//! Configuration system for droidcode
//!
//! Loads settings from ~/.config/droidcode/config.toml
//! Language-specific settings from ~/.config/droidcode/languages.toml

pub mod languages;

use serde::Deserialize;
use std::path::{Path, PathBuf};

pub use languages::{load_languages_config, LanguageConfig, LanguagesConfig};

/// Main settings structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub editor: EditorSettings,
    pub overlay: OverlaySettings,
    pub suggest: SuggestSettings,
    pub assist: AssistSettings,
    pub storage: StorageSettings,
}

/// Editor behavior settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Number of spaces inserted by Tab (default: 4)
    pub tab_width: usize,
    /// Enable soft word wrap (default: true)
    pub wrap: bool,
    /// Width of one monospace cell in pixels (default: 7.8)
    pub cell_width: f32,
    /// Line height in pixels (default: 24)
    pub line_height: f32,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            tab_width: 4,
            wrap: true,
            cell_width: 7.8,
            line_height: 24.0,
        }
    }
}

/// Placement of the suggestion dropdown
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    /// Minimum distance from the viewport's right edge (default: 220)
    pub right_margin: f32,
    /// Distance below the caret's top (default: 25)
    pub vertical_offset: f32,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            right_margin: 220.0,
            vertical_offset: 25.0,
        }
    }
}

/// Inline suggestion settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SuggestSettings {
    /// Request suggestions while typing (default: true)
    pub enabled: bool,
    /// Quiet period before a request is sent, in milliseconds (default: 600)
    pub debounce_ms: u64,
    /// Content must be longer than this many characters (default: 2)
    pub min_length: usize,
}

impl Default for SuggestSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            debounce_ms: 600,
            min_length: 2,
        }
    }
}

/// External assistant settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AssistSettings {
    /// Command that answers assistant requests (empty disables the assistant)
    pub command: String,
    /// Arguments passed to the command
    pub args: Vec<String>,
    /// Timeout per attempt in seconds (default: 15)
    pub timeout_secs: u64,
    /// Extra attempts after a failure (default: 1)
    pub retries: u32,
}

impl Default for AssistSettings {
    fn default() -> Self {
        Self {
            command: String::new(),
            args: Vec::new(),
            timeout_secs: 15,
            retries: 1,
        }
    }
}

/// Workspace persistence settings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Snapshot file (default: <data dir>/droidcode/workspace.json)
    pub path: Option<PathBuf>,
}

impl StorageSettings {
    /// Snapshot location after applying the default
    pub fn snapshot_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| data_dir().join("workspace.json"))
    }
}

/// Get the path to the config file
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config/droidcode/config.toml"))
}

/// Directory for the workspace snapshot and logs
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("droidcode")
}

/// Template config file with comments explaining all options
/// This is generated when no config file exists
fn default_config_template() -> &'static str {
    r#"# droidcode configuration
# Only add settings you want to change from the defaults.

# [editor]
# tab_width = 4          # Spaces inserted by Tab
# wrap = true            # Soft wrap long lines
# cell_width = 7.8       # Monospace cell width in pixels
# line_height = 24.0     # Line height in pixels

# [overlay]
# right_margin = 220.0   # Keep the suggestion list this far from the right edge
# vertical_offset = 25.0 # Drop the suggestion list this far below the caret

# [suggest]
# enabled = true
# debounce_ms = 600      # Quiet period before asking for suggestions
# min_length = 2         # Skip tiny buffers

# [assist]
# command = ""           # Program that answers assistant requests on stdin/stdout
# args = []
# timeout_secs = 15
# retries = 1

# [storage]
# path = "/path/to/workspace.json"
"#
}

/// Ensure config directory and template file exist
fn ensure_config_exists() {
    let Some(path) = config_path() else {
        return;
    };

    if let Some(parent) = path.parent() {
        if !parent.exists() {
            let _ = std::fs::create_dir_all(parent);
        }
    }

    if !path.exists() {
        let _ = std::fs::write(&path, default_config_template());
    }
}

/// Load settings from the config file
/// Returns default settings if the file doesn't exist or can't be parsed
pub fn load_config() -> Settings {
    ensure_config_exists();

    match config_path() {
        Some(path) => load_config_from(&path),
        None => Settings::default(),
    }
}

/// Load settings from a specific file
pub fn load_config_from(path: &Path) -> Settings {
    if !path.exists() {
        return Settings::default();
    }

    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str::<Settings>(&content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to parse config file");
                Settings::default()
            }
        },
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read config file");
            Settings::default()
        }
    }
}
