//! Inline completion suggestions
//!
//! Typing schedules a request after a quiet period. When the period ends the
//! caret anchor is captured and one request goes to the assistant on a worker
//! thread. Only the latest request's response is shown.

mod debounce;

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::assist::{request_suggestions, Assistant};
use crate::config::SuggestSettings;
use crate::editor::{Anchor, CaretProjector, SurfaceGeometry};
use crate::workspace::{FileId, Language};

pub use debounce::{Debouncer, ScheduledTask};

/// Suggestions on screen, with the caret they were requested for
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionSet {
    pub items: Vec<String>,
    pub anchor: Anchor,
    pub caret: usize,
    pub file_id: FileId,
}

/// A suggestion the user picked, ready to splice into the file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedSuggestion {
    pub file_id: FileId,
    pub offset: usize,
    pub text: String,
}

/// Snapshot of the buffer taken when typing stops
#[derive(Debug, Clone)]
struct PendingRequest {
    file_id: FileId,
    content: String,
    caret: usize,
    language: Language,
}

/// Context captured when a request was sent
#[derive(Debug, Clone)]
struct RequestContext {
    file_id: FileId,
    caret: usize,
    anchor: Anchor,
}

#[derive(Debug)]
struct SuggestionResponse {
    request_id: u64,
    items: Vec<String>,
}

/// Debounced, last-request-wins completion cycle
pub struct SuggestionSession {
    assistant: Arc<dyn Assistant>,
    settings: SuggestSettings,
    debouncer: Debouncer<PendingRequest>,
    tx: Sender<SuggestionResponse>,
    rx: Receiver<SuggestionResponse>,
    next_request_id: u64,
    /// Latest request ID (used to ignore out-of-order responses)
    pending_request_id: Option<u64>,
    pending_context: Option<RequestContext>,
    current: Option<SuggestionSet>,
}

impl SuggestionSession {
    pub fn new(assistant: Arc<dyn Assistant>, settings: SuggestSettings) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            assistant,
            debouncer: Debouncer::new(Duration::from_millis(settings.debounce_ms)),
            settings,
            tx,
            rx,
            next_request_id: 1,
            pending_request_id: None,
            pending_context: None,
            current: None,
        }
    }

    /// Suggestions currently on screen
    pub fn current(&self) -> Option<&SuggestionSet> {
        self.current.as_ref()
    }

    /// When the next request is due, for sizing the event loop timeout
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Whether a sent request has not been answered yet
    pub fn is_waiting(&self) -> bool {
        self.pending_request_id.is_some()
    }

    /// Called after every edit of the active file
    pub fn on_content_change(&mut self, file_id: &FileId, content: &str, caret: usize, language: Language, now: Instant) {
        self.debouncer.cancel();

        if !self.settings.enabled || content.chars().count() <= self.settings.min_length {
            self.clear();
            return;
        }

        self.debouncer.schedule(
            PendingRequest {
                file_id: file_id.clone(),
                content: content.to_string(),
                caret,
                language,
            },
            now,
        );
    }

    /// Send the scheduled request if its quiet period is over. Returns
    /// whether a request was sent.
    pub fn tick(&mut self, now: Instant, projector: &CaretProjector, geometry: &SurfaceGeometry) -> bool {
        let Some(request) = self.debouncer.fire(now) else {
            return false;
        };

        let anchor = projector.project(&request.content, request.caret, geometry);
        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.pending_request_id = Some(request_id);
        self.pending_context = Some(RequestContext {
            file_id: request.file_id.clone(),
            caret: request.caret,
            anchor,
        });

        tracing::debug!(request_id, caret = request.caret, language = %request.language, "requesting suggestions");

        let assistant = Arc::clone(&self.assistant);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let items = request_suggestions(assistant.as_ref(), &request.content, request.language, request.caret);
            let _ = tx.send(SuggestionResponse { request_id, items });
        });

        true
    }

    /// Drain finished requests. Returns whether the suggestions changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(response) = self.rx.try_recv() {
            changed |= self.handle_response(response);
        }
        changed
    }

    /// Block until one response arrives or `timeout` passes. Returns whether
    /// the suggestions changed.
    pub fn wait_for_response(&mut self, timeout: Duration) -> bool {
        match self.rx.recv_timeout(timeout) {
            Ok(response) => self.handle_response(response),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    /// Take the suggestion at `index` and hide the list
    pub fn accept(&mut self, index: usize) -> Option<AcceptedSuggestion> {
        let text = self.current.as_ref()?.items.get(index)?.clone();
        let set = self.current.take()?;
        self.pending_request_id = None;
        self.pending_context = None;
        Some(AcceptedSuggestion {
            file_id: set.file_id,
            offset: set.caret,
            text,
        })
    }

    /// Hide the list and drop any scheduled or in-flight request
    pub fn dismiss(&mut self) {
        self.debouncer.cancel();
        self.clear();
    }

    fn clear(&mut self) {
        self.current = None;
        self.pending_request_id = None;
        self.pending_context = None;
    }

    fn handle_response(&mut self, response: SuggestionResponse) -> bool {
        if self.pending_request_id != Some(response.request_id) {
            tracing::debug!(
                request_id = response.request_id,
                latest = ?self.pending_request_id,
                "ignoring stale suggestions"
            );
            return false;
        }
        self.pending_request_id = None;

        let Some(context) = self.pending_context.take() else {
            return false;
        };

        tracing::debug!(request_id = response.request_id, count = response.items.len(), "suggestions received");

        let had_suggestions = self.current.is_some();
        self.current = if response.items.is_empty() {
            None
        } else {
            Some(SuggestionSet {
                items: response.items,
                anchor: context.anchor,
                caret: context.caret,
                file_id: context.file_id,
            })
        };
        had_suggestions || self.current.is_some()
    }
}
