pub mod app;
pub mod assist;
pub mod commands;
pub mod config;
pub mod editor;
pub mod search;
pub mod suggest;
pub mod workspace;

pub use app::App;
pub use assist::{Assistant, CommandAssistant, OfflineAssistant};
pub use config::{load_config, load_languages_config, Settings};
pub use editor::{Buffer, CaretProjector};
pub use search::{Matcher, SearchQuery};
pub use suggest::SuggestionSession;
pub use workspace::{FileId, JsonFileStore, WorkspaceStore};
