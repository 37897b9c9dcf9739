//! Command-driven front end over the workspace
//!
//! Holds the state a UI layer would own (search panel, caret, pending
//! assistant answers) and executes parsed commands against it.

use std::collections::HashSet;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::assist::{request_explanation, request_improvement, simulate_execution, Assistant};
use crate::commands::{Command, CommandResult, HELP};
use crate::config::Settings;
use crate::editor::layout::{FontMetrics, MonospaceLayout};
use crate::editor::{Buffer, CaretProjector, SurfaceGeometry};
use crate::search::{self, SearchQuery};
use crate::suggest::SuggestionSession;
use crate::workspace::{Confirm, FileId, Language, WorkspaceStore};

/// Text box geometry used when no real surface is attached
const DEFAULT_GEOMETRY: SurfaceGeometry = SurfaceGeometry {
    left: 0.0,
    top: 0.0,
    width: 640.0,
    padding: 16.0,
    scroll_left: 0.0,
    scroll_top: 0.0,
    viewport_width: 1280.0,
};

/// Answer from a background assistant request
#[derive(Debug)]
enum AssistOutcome {
    Improvement { file_id: FileId, answer: String },
    Explanation(String),
    Output(String),
}

pub struct App {
    store: WorkspaceStore,
    search: SearchQuery,
    suggestions: SuggestionSession,
    projector: CaretProjector,
    geometry: SurfaceGeometry,
    assistant: Arc<dyn Assistant>,
    confirm: Box<dyn Confirm>,
    /// Caret in the active file
    caret: usize,
    /// Latest improvement waiting for `apply`
    improvement: Option<(FileId, String)>,
    jobs_tx: Sender<AssistOutcome>,
    jobs_rx: Receiver<AssistOutcome>,
}

impl App {
    pub fn new(
        settings: &Settings,
        store: WorkspaceStore,
        assistant: Arc<dyn Assistant>,
        confirm: Box<dyn Confirm>,
    ) -> Self {
        let layout = MonospaceLayout::new(FontMetrics {
            advance_width: settings.editor.cell_width,
            line_height: settings.editor.line_height,
        });
        let projector = CaretProjector::new(Box::new(layout))
            .with_overlay(&settings.overlay)
            .with_wrap(settings.editor.wrap);
        let suggestions = SuggestionSession::new(Arc::clone(&assistant), settings.suggest.clone());
        let (jobs_tx, jobs_rx) = mpsc::channel();

        let mut app = Self {
            store,
            search: SearchQuery::default(),
            suggestions,
            projector,
            geometry: DEFAULT_GEOMETRY,
            assistant,
            confirm,
            caret: 0,
            improvement: None,
            jobs_tx,
            jobs_rx,
        };
        app.caret_to_end();
        app
    }

    pub fn with_geometry(mut self, geometry: SurfaceGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn store(&self) -> &WorkspaceStore {
        &self.store
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    /// When the event loop must wake up next
    pub fn next_deadline(&self) -> Option<Instant> {
        self.suggestions.next_deadline()
    }

    /// Advance timers and collect background results. Returns lines to print.
    pub fn tick(&mut self, now: Instant) -> Vec<String> {
        self.suggestions.tick(now, &self.projector, &self.geometry);

        let mut out = Vec::new();
        if self.suggestions.poll() {
            out.extend(self.describe_suggestions());
        }
        while let Ok(outcome) = self.jobs_rx.try_recv() {
            out.push(self.handle_outcome(outcome));
        }
        out
    }

    /// Block until a background assistant answer arrives
    pub fn wait_for_assistant(&mut self, timeout: Duration) -> Option<String> {
        match self.jobs_rx.recv_timeout(timeout) {
            Ok(outcome) => Some(self.handle_outcome(outcome)),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Block until the suggestion list changes
    pub fn wait_for_suggestions(&mut self, timeout: Duration) -> Option<String> {
        if self.suggestions.wait_for_response(timeout) {
            self.describe_suggestions()
        } else {
            None
        }
    }

    /// Execute a parsed command
    pub fn execute_command(&mut self, cmd: Command, now: Instant) -> CommandResult {
        match cmd {
            Command::Files => {
                let active = self.store.active_id().cloned();
                let mut files: Vec<_> = self.store.files().collect();
                files.sort_by(|a, b| a.name.cmp(&b.name));
                let lines: Vec<String> = files
                    .iter()
                    .map(|file| {
                        let marker = if Some(&file.id) == active.as_ref() { "*" } else { " " };
                        format!("{} {:<20} {:<10} {}", marker, file.name, file.language, file.id)
                    })
                    .collect();
                CommandResult::Message(lines.join("\n"))
            }

            Command::Tabs => {
                if self.store.open_tabs().is_empty() {
                    return CommandResult::Message("No open tabs".to_string());
                }
                let active = self.store.active_id();
                let tabs: Vec<String> = self
                    .store
                    .open_tabs()
                    .iter()
                    .filter_map(|id| self.store.file(id))
                    .map(|file| {
                        if Some(&file.id) == active {
                            format!("[{}]", file.name)
                        } else {
                            file.name.clone()
                        }
                    })
                    .collect();
                CommandResult::Message(tabs.join(" | "))
            }

            Command::New(name) => match self.store.create_file(&name) {
                Some(id) => {
                    self.after_switch();
                    CommandResult::Message(format!("Created {} ({})", name.trim(), id))
                }
                None => CommandResult::Error("File name cannot be empty".to_string()),
            },

            Command::Open(id) => match self.store.open_file(&id) {
                Ok(()) => {
                    self.after_switch();
                    self.describe_active()
                }
                Err(e) => CommandResult::Error(e.to_string()),
            },

            Command::Tab(id) => {
                if !self.store.open_tabs().contains(&id) {
                    return CommandResult::Error(format!("No open tab {}", id));
                }
                match self.store.activate(&id) {
                    Ok(()) => {
                        self.after_switch();
                        self.describe_active()
                    }
                    Err(e) => CommandResult::Error(e.to_string()),
                }
            }

            Command::Close(id) => {
                let Some(id) = id.or_else(|| self.store.active_id().cloned()) else {
                    return CommandResult::Error("No active file".to_string());
                };
                self.store.close_tab(&id);
                self.after_switch();
                CommandResult::Ok
            }

            Command::Delete(id) => {
                let Some(id) = id.or_else(|| self.store.active_id().cloned()) else {
                    return CommandResult::Error("No active file".to_string());
                };
                match self.store.delete_file(&id, self.confirm.as_mut()) {
                    Ok(true) => {
                        self.after_switch();
                        CommandResult::Message(format!("Deleted {}", id))
                    }
                    Ok(false) => CommandResult::Message("Cancelled".to_string()),
                    Err(e) => CommandResult::Error(e.to_string()),
                }
            }

            Command::Show => match self.store.active_file() {
                Some(file) => {
                    let (line, col) = Buffer::from_text(&file.content).line_col(self.caret);
                    CommandResult::Message(format!(
                        "-- {} ({}) caret {}:{} --\n{}",
                        file.name,
                        file.language,
                        line + 1,
                        col + 1,
                        file.content
                    ))
                }
                None => CommandResult::Error("No active file".to_string()),
            },

            Command::Insert(offset, text) => {
                let Some((id, len)) = self.active_len() else {
                    return CommandResult::Error("No active file".to_string());
                };
                if offset > len {
                    return CommandResult::Error(format!("Offset {} is past the end ({})", offset, len));
                }
                match self.store.insert_at(&id, offset, &text) {
                    Ok(()) => {
                        self.caret = offset + text.chars().count();
                        self.content_changed(now);
                        CommandResult::Ok
                    }
                    Err(e) => CommandResult::Error(e.to_string()),
                }
            }

            Command::Indent(start, end) => {
                let Some((id, len)) = self.active_len() else {
                    return CommandResult::Error("No active file".to_string());
                };
                if start.max(end) > len {
                    return CommandResult::Error(format!("Selection is past the end ({})", len));
                }
                match self.store.indent(&id, start, end) {
                    Ok(caret) => {
                        self.caret = caret;
                        self.content_changed(now);
                        CommandResult::Ok
                    }
                    Err(e) => CommandResult::Error(e.to_string()),
                }
            }

            Command::Find(query) => {
                if let Some(query) = query {
                    self.search.query = query;
                }
                self.find()
            }

            Command::Replace => self.replace(false, now),
            Command::ReplaceAll => self.replace(true, now),

            Command::Set(option, value) => self.set_option(&option, value),

            Command::Accept(n) => {
                let Some(accepted) = n.checked_sub(1).and_then(|i| self.suggestions.accept(i)) else {
                    return CommandResult::Error(format!("No suggestion {}", n));
                };
                if self.store.active_id() != Some(&accepted.file_id) {
                    return CommandResult::Error("Suggestion belongs to another file".to_string());
                }
                let len = self
                    .store
                    .file(&accepted.file_id)
                    .map(|file| file.content.chars().count());
                match len {
                    Some(len) if accepted.offset <= len => {}
                    _ => return CommandResult::Error("Suggestion no longer fits the file".to_string()),
                }
                match self
                    .store
                    .splice(&accepted.file_id, accepted.offset, accepted.offset, &accepted.text)
                {
                    Ok(caret) => {
                        self.caret = caret;
                        self.content_changed(now);
                        CommandResult::Ok
                    }
                    Err(e) => CommandResult::Error(e.to_string()),
                }
            }

            Command::Dismiss => {
                self.suggestions.dismiss();
                CommandResult::Ok
            }

            Command::Improve(instruction) => {
                let Some(file) = self.store.active_file() else {
                    return CommandResult::Error("No active file".to_string());
                };
                let assistant = Arc::clone(&self.assistant);
                let tx = self.jobs_tx.clone();
                let file_id = file.id.clone();
                let content = file.content.clone();
                let language = file.language;
                thread::spawn(move || {
                    let answer = request_improvement(assistant.as_ref(), &content, language, &instruction);
                    let _ = tx.send(AssistOutcome::Improvement { file_id, answer });
                });
                CommandResult::Message("Asking the assistant...".to_string())
            }

            Command::Apply => {
                let Some((file_id, answer)) = self.improvement.take() else {
                    return CommandResult::Error("No improvement to apply".to_string());
                };
                match self.store.apply_improvement(&file_id, &answer) {
                    Ok(()) => {
                        if self.store.active_id() == Some(&file_id) {
                            self.caret_to_end();
                            self.content_changed(now);
                        }
                        CommandResult::Message("Applied".to_string())
                    }
                    Err(e) => CommandResult::Error(e.to_string()),
                }
            }

            Command::Explain => {
                let Some(file) = self.store.active_file() else {
                    return CommandResult::Error("No active file".to_string());
                };
                self.spawn_job(file.content.clone(), file.language, |assistant, content, language| {
                    AssistOutcome::Explanation(request_explanation(assistant, content, language))
                });
                CommandResult::Message("Asking the assistant...".to_string())
            }

            Command::Run => {
                let Some(file) = self.store.active_file() else {
                    return CommandResult::Error("No active file".to_string());
                };
                if !file.language.is_runnable() {
                    return CommandResult::Message(self.store.preview_document());
                }
                self.spawn_job(file.content.clone(), file.language, |assistant, content, language| {
                    AssistOutcome::Output(simulate_execution(assistant, content, language))
                });
                CommandResult::Message("Running...".to_string())
            }

            Command::Export(dir) => match self.export(&dir) {
                Ok(count) => CommandResult::Message(format!("Exported {} files to {}", count, dir.display())),
                Err(e) => CommandResult::Error(format!("Export failed: {}", e)),
            },

            Command::Reset => {
                if self.store.reset(self.confirm.as_mut()) {
                    self.improvement = None;
                    self.after_switch();
                    CommandResult::Message("Workspace reset".to_string())
                } else {
                    CommandResult::Message("Cancelled".to_string())
                }
            }

            Command::Help => CommandResult::Message(HELP.to_string()),
            Command::Quit => CommandResult::Quit,

            Command::Unknown(cmd) => {
                if cmd.is_empty() {
                    CommandResult::Ok
                } else {
                    CommandResult::Error(format!("Not a command: {}", cmd))
                }
            }
        }
    }

    fn find(&mut self) -> CommandResult {
        let Some(file) = self.store.active_file() else {
            return CommandResult::Error("No active file".to_string());
        };
        let matcher = match self.search.compile() {
            Ok(matcher) => matcher,
            Err(e) => return CommandResult::Error(e.to_string()),
        };
        if matcher.is_empty() {
            return CommandResult::Message("Nothing to find".to_string());
        }

        match search::find_from(&file.content, &matcher, self.caret) {
            Some(found) => {
                let total = search::count_matches(&file.content, &matcher);
                let (line, col) = Buffer::from_text(&file.content).line_col(found.start);
                self.caret = if found.end > found.start {
                    found.end
                } else if found.end < file.content.chars().count() {
                    // Empty match: step over it or the next find lands here again
                    found.end + 1
                } else {
                    0
                };
                CommandResult::Message(format!(
                    "Match at {}:{} ({} total)",
                    line + 1,
                    col + 1,
                    total
                ))
            }
            None => CommandResult::Message("No matches".to_string()),
        }
    }

    fn replace(&mut self, all: bool, now: Instant) -> CommandResult {
        let Some(file) = self.store.active_file() else {
            return CommandResult::Error("No active file".to_string());
        };
        let matcher = match self.search.compile() {
            Ok(matcher) => matcher,
            Err(e) => return CommandResult::Error(e.to_string()),
        };
        if matcher.is_empty() {
            return CommandResult::Message("Nothing to replace".to_string());
        }

        let id = file.id.clone();
        let count = if all {
            search::count_matches(&file.content, &matcher)
        } else {
            1
        };
        let replaced = if all {
            self.store.replace_all(&id, &matcher, &self.search.replacement)
        } else {
            self.store.replace_next(&id, &matcher, &self.search.replacement)
        };

        match replaced {
            Ok(true) => {
                self.clamp_caret();
                self.content_changed(now);
                CommandResult::Message(format!("Replaced {} match{}", count, if count == 1 { "" } else { "es" }))
            }
            Ok(false) => CommandResult::Message("No matches".to_string()),
            Err(e) => CommandResult::Error(e.to_string()),
        }
    }

    fn set_option(&mut self, option: &str, value: Option<String>) -> CommandResult {
        let flag = |current: bool| match value.as_deref().map(str::trim) {
            None => Some(!current),
            Some("on" | "true" | "yes") => Some(true),
            Some("off" | "false" | "no") => Some(false),
            Some(_) => None,
        };

        match option {
            "case" => match flag(self.search.case_sensitive) {
                Some(on) => {
                    self.search.case_sensitive = on;
                    CommandResult::Message(format!("case sensitive: {}", on))
                }
                None => CommandResult::Error("Expected on or off".to_string()),
            },
            "regex" => match flag(self.search.regex_mode) {
                Some(on) => {
                    self.search.regex_mode = on;
                    CommandResult::Message(format!("regex: {}", on))
                }
                None => CommandResult::Error("Expected on or off".to_string()),
            },
            "query" => {
                self.search.query = value.unwrap_or_default();
                CommandResult::Ok
            }
            "replace" => {
                self.search.replacement = value.unwrap_or_default();
                CommandResult::Ok
            }
            _ => CommandResult::Error(format!("Unknown option: {}", option)),
        }
    }

    fn export(&self, dir: &Path) -> std::io::Result<usize> {
        std::fs::create_dir_all(dir)?;
        let mut written = HashSet::new();
        for (name, content) in self.store.export_entries() {
            // Display names are not trusted as paths
            let Some(file_name) = Path::new(&name).file_name().and_then(|n| n.to_str()) else {
                tracing::warn!(%name, "skipping export of unnamed file");
                continue;
            };
            let file_name = unique_file_name(file_name, &written);
            if file_name != name {
                tracing::warn!(%name, exported = %file_name, "exporting under another name");
            }
            std::fs::write(dir.join(&file_name), content)?;
            written.insert(file_name);
        }
        Ok(written.len())
    }

    fn spawn_job<F>(&self, content: String, language: Language, job: F)
    where
        F: FnOnce(&dyn Assistant, &str, Language) -> AssistOutcome + Send + 'static,
    {
        let assistant = Arc::clone(&self.assistant);
        let tx = self.jobs_tx.clone();
        thread::spawn(move || {
            let _ = tx.send(job(assistant.as_ref(), &content, language));
        });
    }

    fn handle_outcome(&mut self, outcome: AssistOutcome) -> String {
        match outcome {
            AssistOutcome::Improvement { file_id, answer } => {
                let text = format!("{}\n(type `apply` to use this code)", answer);
                self.improvement = Some((file_id, answer));
                text
            }
            AssistOutcome::Explanation(text) => text,
            AssistOutcome::Output(output) => output,
        }
    }

    fn describe_suggestions(&self) -> Option<String> {
        let set = self.suggestions.current()?;
        let items: Vec<String> = set
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| format!("  {}) {}", i + 1, item))
            .collect();
        Some(format!(
            "Suggestions at ({:.0}, {:.0}):\n{}",
            set.anchor.left,
            set.anchor.top,
            items.join("\n")
        ))
    }

    fn describe_active(&self) -> CommandResult {
        match self.store.active_file() {
            Some(file) => CommandResult::Message(format!("{} ({})", file.name, file.language)),
            None => CommandResult::Ok,
        }
    }

    fn active_len(&self) -> Option<(FileId, usize)> {
        self.store
            .active_file()
            .map(|file| (file.id.clone(), file.content.chars().count()))
    }

    fn caret_to_end(&mut self) {
        self.caret = self.active_len().map_or(0, |(_, len)| len);
    }

    fn clamp_caret(&mut self) {
        let len = self.active_len().map_or(0, |(_, len)| len);
        self.caret = self.caret.min(len);
    }

    /// Active file changed: caret to its end, suggestions hidden
    fn after_switch(&mut self) {
        self.caret_to_end();
        self.suggestions.dismiss();
    }

    fn content_changed(&mut self, now: Instant) {
        if let Some(file) = self.store.active_file() {
            self.suggestions
                .on_content_change(&file.id, &file.content, self.caret, file.language, now);
        }
    }
}

/// `name`, or `stem-N.ext` with the first N that is not taken yet
fn unique_file_name(name: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(name) {
        return name.to_string();
    }
    let path = Path::new(name);
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or(name);
    let extension = path.extension().and_then(|e| e.to_str());
    (2..)
        .map(|n| match extension {
            Some(ext) => format!("{}-{}.{}", stem, n, ext),
            None => format!("{}-{}", stem, n),
        })
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| name.to_string())
}
