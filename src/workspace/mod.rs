//! Multi-file workspace state
//!
//! Owns the files, the open tab strip and the active file. Every mutation is
//! written through to a [`SnapshotStore`]; storage failures are logged and
//! never interrupt editing.

mod file;
mod language;
pub mod storage;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assist::extract_code_block;
use crate::config::LanguagesConfig;
use crate::editor::buffer::{self, INDENT_WIDTH};
use crate::search::{self, Matcher};

pub use file::{File, FileId};
pub use language::Language;
pub use storage::{JsonFileStore, MemoryStore, SnapshotStore, StorageError};

/// Id of the seeded markup file
pub const SEED_MARKUP_ID: &str = "index_html";
/// Id of the seeded python file
pub const SEED_PYTHON_ID: &str = "main_py";

const SEED_MARKUP: &str = r#"<!DOCTYPE html>
<html>
<head>
  <style>
    body { background: #1a1a1a; color: white; font-family: sans-serif; display: flex; justify-content: center; align-items: center; height: 100vh; margin: 0; }
    .btn { background: #3b82f6; color: white; border: none; padding: 10px 20px; border-radius: 5px; cursor: pointer; }
  </style>
</head>
<body>
  <div style="text-align: center;">
    <h1>DroidCode</h1>
    <p>Code editor with an assistant</p>
    <button class="btn" onclick="alert('Hello from the preview!')">Try it</button>
  </div>
</body>
</html>"#;

const SEED_PYTHON: &str = r#"def factorial(n):
    if n == 0: return 1
    return n * factorial(n-1)

print(f"5! is {factorial(5)}")
# Ask the assistant for more code!"#;

/// Errors from edits aimed at the workspace
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WorkspaceError {
    #[error("No file with id {0}")]
    UnknownFile(FileId),
}

/// Serializable workspace state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub files: BTreeMap<FileId, File>,
    /// Active file; `None` when nothing is open
    #[serde(default)]
    pub active_id: Option<FileId>,
    /// Tab strip order, no duplicates
    #[serde(default)]
    pub open_tabs: Vec<FileId>,
}

impl Workspace {
    /// The state a fresh install starts with
    pub fn seed() -> Self {
        let markup = File::new(FileId::from(SEED_MARKUP_ID), "index.html", SEED_MARKUP);
        let python = File::new(FileId::from(SEED_PYTHON_ID), "main.py", SEED_PYTHON);

        let mut files = BTreeMap::new();
        files.insert(markup.id.clone(), markup);
        files.insert(python.id.clone(), python);

        Self {
            files,
            active_id: Some(FileId::from(SEED_PYTHON_ID)),
            open_tabs: vec![FileId::from(SEED_PYTHON_ID), FileId::from(SEED_MARKUP_ID)],
        }
    }

    /// Drop references to files that do not exist. Returns true if anything changed.
    pub fn repair(&mut self) -> bool {
        let before = (self.open_tabs.len(), self.active_id.clone());

        let files = &self.files;
        let mut seen = Vec::with_capacity(self.open_tabs.len());
        self.open_tabs.retain(|id| {
            if files.contains_key(id) && !seen.contains(id) {
                seen.push(id.clone());
                true
            } else {
                false
            }
        });

        if let Some(active) = &self.active_id {
            if !self.files.contains_key(active) {
                self.active_id = None;
            }
        }

        before != (self.open_tabs.len(), self.active_id.clone())
    }
}

/// Confirmation collaborator consulted before destructive actions
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Workspace state machine with write-through persistence
pub struct WorkspaceStore {
    state: Workspace,
    storage: Box<dyn SnapshotStore>,
    languages: LanguagesConfig,
    tab_width: usize,
}

impl WorkspaceStore {
    /// Load the persisted snapshot, falling back to the seed state when it
    /// is missing or unreadable
    pub fn load(storage: Box<dyn SnapshotStore>) -> Self {
        let state = match storage.load() {
            Ok(Some(mut state)) => {
                if state.repair() {
                    tracing::warn!("snapshot referenced missing files; repaired");
                }
                tracing::debug!(files = state.files.len(), "loaded workspace snapshot");
                state
            }
            Ok(None) => {
                tracing::debug!("no snapshot; starting from seed");
                Workspace::seed()
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to load snapshot; starting from seed");
                Workspace::seed()
            }
        };

        Self {
            state,
            storage,
            languages: LanguagesConfig::default(),
            tab_width: INDENT_WIDTH,
        }
    }

    /// Per-language templates and tab widths
    pub fn with_languages(mut self, languages: LanguagesConfig) -> Self {
        self.languages = languages;
        self
    }

    /// Default indent width
    pub fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width;
        self
    }

    pub fn state(&self) -> &Workspace {
        &self.state
    }

    pub fn file(&self, id: &FileId) -> Option<&File> {
        self.state.files.get(id)
    }

    pub fn files(&self) -> impl Iterator<Item = &File> {
        self.state.files.values()
    }

    pub fn open_tabs(&self) -> &[FileId] {
        &self.state.open_tabs
    }

    pub fn active_id(&self) -> Option<&FileId> {
        self.state.active_id.as_ref()
    }

    pub fn active_file(&self) -> Option<&File> {
        self.state.active_id.as_ref().and_then(|id| self.state.files.get(id))
    }

    /// Indent width for a file, honouring languages.toml
    pub fn tab_width_for(&self, language: Language) -> usize {
        self.languages
            .get_tab_width(language.tag())
            .unwrap_or(self.tab_width)
    }

    /// Create a file from a display name. Blank names are ignored.
    pub fn create_file(&mut self, name: &str) -> Option<FileId> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let language = Language::from_file_name(name);
        let content = self
            .languages
            .get_template(language.tag())
            .unwrap_or_else(|| language.default_template())
            .to_string();

        let id = FileId::generate(name);
        let file = File {
            id: id.clone(),
            name: name.to_string(),
            language,
            content,
        };
        self.state.files.insert(id.clone(), file);
        self.push_tab(&id);
        self.state.active_id = Some(id.clone());

        tracing::debug!(%id, %language, "created file");
        self.persist();
        Some(id)
    }

    /// Activate a file from the explorer, opening a tab if needed
    pub fn open_file(&mut self, id: &FileId) -> Result<(), WorkspaceError> {
        self.ensure_exists(id)?;
        self.push_tab(id);
        self.state.active_id = Some(id.clone());
        self.persist();
        Ok(())
    }

    /// Activate a file from the tab strip
    pub fn activate(&mut self, id: &FileId) -> Result<(), WorkspaceError> {
        self.ensure_exists(id)?;
        self.state.active_id = Some(id.clone());
        self.persist();
        Ok(())
    }

    /// Delete a file after confirmation. Returns whether it was deleted.
    pub fn delete_file(&mut self, id: &FileId, confirm: &mut dyn Confirm) -> Result<bool, WorkspaceError> {
        let name = match self.state.files.get(id) {
            Some(file) => file.name.clone(),
            None => return Err(WorkspaceError::UnknownFile(id.clone())),
        };

        if !confirm.confirm(&format!("Delete {}?", name)) {
            return Ok(false);
        }

        self.state.files.remove(id);
        self.state.open_tabs.retain(|tab| tab != id);
        if self.state.active_id.as_ref() == Some(id) {
            self.state.active_id = self.state.open_tabs.first().cloned();
        }

        tracing::debug!(%id, "deleted file");
        self.persist();
        Ok(true)
    }

    /// Close a tab without deleting the file
    pub fn close_tab(&mut self, id: &FileId) {
        let Some(pos) = self.state.open_tabs.iter().position(|tab| tab == id) else {
            return;
        };
        self.state.open_tabs.remove(pos);

        if self.state.active_id.as_ref() == Some(id) {
            let tabs = &self.state.open_tabs;
            self.state.active_id = tabs
                .get(pos)
                .or_else(|| pos.checked_sub(1).and_then(|prev| tabs.get(prev)))
                .cloned();
        }

        tracing::debug!(%id, "closed tab");
        self.persist();
    }

    /// Replace a file's content
    pub fn set_content(&mut self, id: &FileId, content: impl Into<String>) -> Result<(), WorkspaceError> {
        let file = self.file_mut(id)?;
        file.content = content.into();
        self.persist();
        Ok(())
    }

    /// Insert text at a character offset
    pub fn insert_at(&mut self, id: &FileId, offset: usize, text: &str) -> Result<(), WorkspaceError> {
        let file = self.file_mut(id)?;
        file.content = buffer::insert_at(&file.content, offset, text);
        self.persist();
        Ok(())
    }

    /// Tab key over a selection. Returns the new caret offset.
    pub fn indent(&mut self, id: &FileId, selection_start: usize, selection_end: usize) -> Result<usize, WorkspaceError> {
        let language = self.file(id).map(|file| file.language);
        let width = language.map_or(self.tab_width, |language| self.tab_width_for(language));

        let file = self.file_mut(id)?;
        let indented = buffer::indent_with_width(&file.content, selection_start, selection_end, width);
        file.content = indented.content;
        self.persist();
        Ok(indented.caret)
    }

    /// Replace a character range. Returns the offset after the inserted text.
    pub fn splice(&mut self, id: &FileId, start: usize, end: usize, text: &str) -> Result<usize, WorkspaceError> {
        let file = self.file_mut(id)?;
        file.content = buffer::splice(&file.content, start, end, text);
        self.persist();
        Ok(start + text.chars().count())
    }

    /// Replace the first match. Returns whether the content changed.
    pub fn replace_next(&mut self, id: &FileId, matcher: &Matcher, replacement: &str) -> Result<bool, WorkspaceError> {
        self.rewrite(id, |content| search::replace_next(content, matcher, replacement))
    }

    /// Replace every match. Returns whether the content changed.
    pub fn replace_all(&mut self, id: &FileId, matcher: &Matcher, replacement: &str) -> Result<bool, WorkspaceError> {
        self.rewrite(id, |content| search::replace_all(content, matcher, replacement))
    }

    /// Replace a file with an assistant's rewrite, unwrapping a fenced block
    pub fn apply_improvement(&mut self, id: &FileId, response: &str) -> Result<(), WorkspaceError> {
        let code = extract_code_block(response).to_string();
        self.set_content(id, code)
    }

    /// Restore the seed state and forget the snapshot. Returns whether the
    /// reset went ahead.
    pub fn reset(&mut self, confirm: &mut dyn Confirm) -> bool {
        if !confirm.confirm("Reset the workspace? All files will be lost.") {
            return false;
        }

        self.state = Workspace::seed();
        if let Err(e) = self.storage.clear() {
            tracing::warn!(error = %e, "failed to clear snapshot");
        }
        tracing::info!("workspace reset");
        true
    }

    /// `(name, content)` pairs sorted by name
    pub fn export_entries(&self) -> Vec<(String, String)> {
        let mut entries: Vec<_> = self
            .state
            .files
            .values()
            .map(|file| (file.name.clone(), file.content.clone()))
            .collect();
        entries.sort();
        entries
    }

    /// Single page for the browser preview: `index.html` followed by every
    /// stylesheet and script, in name order
    pub fn preview_document(&self) -> String {
        let mut files: Vec<&File> = self.state.files.values().collect();
        files.sort_by(|a, b| a.name.cmp(&b.name));

        let mut page = files
            .iter()
            .find(|file| file.name == "index.html")
            .map(|file| file.content.clone())
            .unwrap_or_default();
        for file in files.iter().filter(|file| file.name.ends_with(".css")) {
            page.push_str(&format!("<style>{}</style>\n", file.content));
        }
        for file in files.iter().filter(|file| file.name.ends_with(".js")) {
            page.push_str(&format!("<script>{}</script>\n", file.content));
        }
        page
    }

    fn rewrite(&mut self, id: &FileId, f: impl FnOnce(&str) -> String) -> Result<bool, WorkspaceError> {
        let file = self.file_mut(id)?;
        let updated = f(&file.content);
        if updated == file.content {
            return Ok(false);
        }
        file.content = updated;
        self.persist();
        Ok(true)
    }

    fn push_tab(&mut self, id: &FileId) {
        if !self.state.open_tabs.contains(id) {
            self.state.open_tabs.push(id.clone());
        }
    }

    fn ensure_exists(&self, id: &FileId) -> Result<(), WorkspaceError> {
        if self.state.files.contains_key(id) {
            Ok(())
        } else {
            Err(WorkspaceError::UnknownFile(id.clone()))
        }
    }

    fn file_mut(&mut self, id: &FileId) -> Result<&mut File, WorkspaceError> {
        self.state
            .files
            .get_mut(id)
            .ok_or_else(|| WorkspaceError::UnknownFile(id.clone()))
    }

    fn persist(&mut self) {
        if let Err(e) = self.storage.save(&self.state) {
            tracing::warn!(error = %e, "failed to save workspace snapshot");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (WorkspaceStore, MemoryStore) {
        let storage = MemoryStore::new();
        (WorkspaceStore::load(Box::new(storage.clone())), storage)
    }

    fn yes() -> impl FnMut(&str) -> bool {
        |_: &str| true
    }

    fn id(s: &str) -> FileId {
        FileId::from(s)
    }

    #[test]
    fn test_seed_state() {
        let (ws, _) = store();
        assert_eq!(ws.open_tabs(), &[id("main_py"), id("index_html")]);
        assert_eq!(ws.active_id(), Some(&id("main_py")));
        assert_eq!(ws.file(&id("index_html")).unwrap().language, Language::Markup);
        assert_eq!(ws.file(&id("main_py")).unwrap().language, Language::Python);
    }

    #[test]
    fn test_create_blank_name_is_noop() {
        let (mut ws, storage) = store();
        assert_eq!(ws.create_file(""), None);
        assert_eq!(ws.create_file("   "), None);
        assert_eq!(ws.files().count(), 2);
        assert_eq!(ws.active_id(), Some(&id("main_py")));
        assert_eq!(ws.open_tabs(), &[id("main_py"), id("index_html")]);
        assert!(storage.raw().is_none(), "nothing was persisted");
    }

    #[test]
    fn test_create_python_file() {
        let (mut ws, _) = store();
        let new_id = ws.create_file("x.py").unwrap();
        let file = ws.file(&new_id).unwrap();
        assert_eq!(file.language, Language::Python);
        assert!(file.content.contains("print(\"Hello World\")"));
        assert_eq!(ws.active_id(), Some(&new_id));
        assert_eq!(ws.open_tabs().last(), Some(&new_id));
    }

    #[test]
    fn test_create_uses_language_template() {
        let languages: LanguagesConfig =
            toml::from_str("[css]\ntemplate = \"body {}\"\n").unwrap();
        let (ws, _) = store();
        let mut ws = ws.with_languages(languages);
        let new_id = ws.create_file("site.css").unwrap();
        assert_eq!(ws.file(&new_id).unwrap().content, "body {}");
    }

    #[test]
    fn test_same_name_twice_gets_distinct_ids() {
        let (mut ws, _) = store();
        let a = ws.create_file("a.js").unwrap();
        let b = ws.create_file("a.js").unwrap();
        assert_ne!(a, b);
        assert_eq!(ws.files().count(), 4);
    }

    #[test]
    fn test_seed_scenario_with_new_script() {
        let (mut ws, _) = store();
        let util = ws.create_file("util.js").unwrap();
        assert_eq!(ws.open_tabs(), &[id("main_py"), id("index_html"), util.clone()]);
        assert_eq!(ws.active_id(), Some(&util));
        assert_eq!(ws.file(&util).unwrap().language, Language::Script);
        assert_eq!(ws.file(&util).unwrap().content, Language::Script.default_template());
        assert!(ws.file(&util).unwrap().content.contains("console.log"));

        ws.delete_file(&util, &mut yes()).unwrap();
        assert_eq!(ws.open_tabs(), &[id("main_py"), id("index_html")]);
        assert_eq!(ws.active_id(), Some(&id("main_py")));
    }

    #[test]
    fn test_delete_declined() {
        let (mut ws, _) = store();
        let mut asked = Vec::new();
        let mut no = |prompt: &str| {
            asked.push(prompt.to_string());
            false
        };
        assert_eq!(ws.delete_file(&id("main_py"), &mut no), Ok(false));
        assert_eq!(asked, vec!["Delete main.py?".to_string()]);
        assert!(ws.file(&id("main_py")).is_some());
    }

    #[test]
    fn test_delete_only_open_file() {
        let (mut ws, _) = store();
        ws.close_tab(&id("index_html"));
        assert_eq!(ws.open_tabs(), &[id("main_py")]);

        ws.delete_file(&id("main_py"), &mut yes()).unwrap();
        assert!(ws.open_tabs().is_empty());
        assert_eq!(ws.active_id(), None);
    }

    #[test]
    fn test_delete_unknown() {
        let (mut ws, _) = store();
        assert_eq!(
            ws.delete_file(&id("nope"), &mut yes()),
            Err(WorkspaceError::UnknownFile(id("nope")))
        );
    }

    #[test]
    fn test_delete_inactive_keeps_active() {
        let (mut ws, _) = store();
        ws.delete_file(&id("index_html"), &mut yes()).unwrap();
        assert_eq!(ws.active_id(), Some(&id("main_py")));
        assert_eq!(ws.open_tabs(), &[id("main_py")]);
    }

    #[test]
    fn test_close_tab_activates_neighbour() {
        let (mut ws, _) = store();
        let third = ws.create_file("c.css").unwrap();
        ws.activate(&id("index_html")).unwrap();

        // The tab that slides into the closed position becomes active
        ws.close_tab(&id("index_html"));
        assert_eq!(ws.active_id(), Some(&third));

        // Closing the last tab falls back to the previous one
        ws.close_tab(&third);
        assert_eq!(ws.active_id(), Some(&id("main_py")));

        ws.close_tab(&id("main_py"));
        assert_eq!(ws.active_id(), None);
        assert!(ws.file(&id("main_py")).is_some(), "closing keeps the file");
    }

    #[test]
    fn test_close_inactive_tab() {
        let (mut ws, _) = store();
        ws.close_tab(&id("index_html"));
        assert_eq!(ws.active_id(), Some(&id("main_py")));
        // Not open: nothing happens
        ws.close_tab(&id("index_html"));
        assert_eq!(ws.open_tabs(), &[id("main_py")]);
    }

    #[test]
    fn test_open_file_adds_tab_once() {
        let (mut ws, _) = store();
        ws.close_tab(&id("index_html"));
        ws.open_file(&id("index_html")).unwrap();
        ws.open_file(&id("index_html")).unwrap();
        assert_eq!(ws.open_tabs(), &[id("main_py"), id("index_html")]);
        assert_eq!(ws.active_id(), Some(&id("index_html")));
    }

    #[test]
    fn test_edits() {
        let (mut ws, _) = store();
        let main = id("main_py");
        ws.set_content(&main, "print()").unwrap();
        ws.insert_at(&main, 6, "1").unwrap();
        assert_eq!(ws.file(&main).unwrap().content, "print(1)");

        let caret = ws.indent(&main, 0, 0).unwrap();
        assert_eq!(caret, 4);
        assert_eq!(ws.file(&main).unwrap().content, "    print(1)");

        let caret = ws.splice(&main, 4, 9, "len").unwrap();
        assert_eq!(caret, 7);
        assert_eq!(ws.file(&main).unwrap().content, "    len(1)");

        assert_eq!(
            ws.set_content(&id("gone"), "x"),
            Err(WorkspaceError::UnknownFile(id("gone")))
        );
    }

    #[test]
    fn test_indent_width_per_language() {
        let languages: LanguagesConfig = toml::from_str("[html]\ntab_width = 2\n").unwrap();
        let (ws, _) = store();
        let mut ws = ws.with_languages(languages).with_tab_width(8);

        ws.set_content(&id("index_html"), "").unwrap();
        assert_eq!(ws.indent(&id("index_html"), 0, 0).unwrap(), 2);
        ws.set_content(&id("main_py"), "").unwrap();
        assert_eq!(ws.indent(&id("main_py"), 0, 0).unwrap(), 8);
    }

    #[test]
    fn test_replace_through_store() {
        let (mut ws, _) = store();
        let main = id("main_py");
        ws.set_content(&main, "a a a").unwrap();
        let matcher = Matcher::compile("a", false, false).unwrap();

        assert!(ws.replace_next(&main, &matcher, "b").unwrap());
        assert_eq!(ws.file(&main).unwrap().content, "b a a");
        assert!(ws.replace_all(&main, &matcher, "b").unwrap());
        assert_eq!(ws.file(&main).unwrap().content, "b b b");
        assert!(!ws.replace_all(&main, &matcher, "b").unwrap());
    }

    #[test]
    fn test_apply_improvement() {
        let (mut ws, _) = store();
        let main = id("main_py");
        ws.apply_improvement(&main, "Here you go:\n```python\nprint(2)\n```\nDone.")
            .unwrap();
        assert_eq!(ws.file(&main).unwrap().content, "print(2)\n");

        ws.apply_improvement(&main, "print(3)").unwrap();
        assert_eq!(ws.file(&main).unwrap().content, "print(3)");
    }

    #[test]
    fn test_persistence_round_trip() {
        let storage = MemoryStore::new();
        let mut ws = WorkspaceStore::load(Box::new(storage.clone()));
        let util = ws.create_file("util.js").unwrap();
        ws.set_content(&util, "let x = 1;").unwrap();
        ws.close_tab(&id("index_html"));

        let reloaded = WorkspaceStore::load(Box::new(storage.clone()));
        assert_eq!(reloaded.state(), ws.state());
        assert_eq!(reloaded.file(&util).unwrap().content, "let x = 1;");
    }

    #[test]
    fn test_snapshot_format() {
        let (mut ws, storage) = store();
        ws.activate(&id("main_py")).unwrap();
        let raw: serde_json::Value = serde_json::from_str(&storage.raw().unwrap()).unwrap();
        assert_eq!(raw["activeId"], "main_py");
        assert_eq!(raw["openTabs"][1], "index_html");
        assert_eq!(raw["files"]["main_py"]["language"], "python");
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workspace.json");
        let mut ws = WorkspaceStore::load(Box::new(JsonFileStore::new(&path)));
        ws.create_file("notes.html").unwrap();

        let reloaded = WorkspaceStore::load(Box::new(JsonFileStore::new(&path)));
        assert_eq!(reloaded.files().count(), 3);
    }

    #[test]
    fn test_corrupt_snapshot_falls_back_to_seed() {
        let storage = MemoryStore::with_raw("{\"files\": [");
        let ws = WorkspaceStore::load(Box::new(storage));
        assert_eq!(ws.state(), &Workspace::seed());
    }

    #[test]
    fn test_dangling_ids_repaired() {
        let storage = MemoryStore::with_raw(
            r#"{"files": {"a": {"id": "a", "name": "a.py", "language": "python", "content": ""}},
                "activeId": "ghost", "openTabs": ["a", "ghost", "a"]}"#,
        );
        let ws = WorkspaceStore::load(Box::new(storage));
        assert_eq!(ws.open_tabs(), &[id("a")]);
        assert_eq!(ws.active_id(), None);
    }

    #[test]
    fn test_reset() {
        let (mut ws, storage) = store();
        ws.create_file("util.js").unwrap();
        assert!(storage.raw().is_some());

        assert!(!ws.reset(&mut |_: &str| false));
        assert_eq!(ws.files().count(), 3);

        assert!(ws.reset(&mut yes()));
        assert_eq!(ws.state(), &Workspace::seed());
        assert!(storage.raw().is_none());
    }

    #[test]
    fn test_preview_document() {
        let (mut ws, _) = store();
        ws.set_content(&id("index_html"), "<p>hi</p>").unwrap();
        let css = ws.create_file("site.css").unwrap();
        ws.set_content(&css, "p {}").unwrap();
        let js = ws.create_file("app.js").unwrap();
        ws.set_content(&js, "go();").unwrap();

        assert_eq!(
            ws.preview_document(),
            "<p>hi</p><style>p {}</style>\n<script>go();</script>\n"
        );
    }

    #[test]
    fn test_export_entries_sorted() {
        let (mut ws, _) = store();
        ws.create_file("app.js").unwrap();
        let names: Vec<_> = ws.export_entries().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["app.js", "index.html", "main.py"]);
    }
}
