//! Assistant backed by an external command
//!
//! Each request spawns the configured command, writes one JSON request to
//! its stdin and reads the answer from stdout.

use std::io::{Read, Write};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

use super::types::{AssistRequest, RequestKind};
use super::{completion_prefix, parse_suggestions, Assistant, CollaboratorError};
use crate::config::AssistSettings;
use crate::workspace::Language;

/// How often a running command is checked for exit
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Runs an external command per request
#[derive(Debug, Clone)]
pub struct CommandAssistant {
    command: String,
    args: Vec<String>,
    timeout: Duration,
    retries: u32,
}

impl CommandAssistant {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        let defaults = AssistSettings::default();
        Self {
            command: command.into(),
            args,
            timeout: Duration::from_secs(defaults.timeout_secs),
            retries: defaults.retries,
        }
    }

    /// Build from settings. `None` when no command is configured.
    pub fn from_settings(settings: &AssistSettings) -> Option<Self> {
        if settings.command.trim().is_empty() {
            return None;
        }
        Some(Self {
            command: settings.command.clone(),
            args: settings.args.clone(),
            timeout: Duration::from_secs(settings.timeout_secs.max(1)),
            retries: settings.retries,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Send a request, retrying failed attempts
    pub fn call(&self, request: &AssistRequest<'_>) -> Result<String, CollaboratorError> {
        let payload = serde_json::to_vec(request)?;

        let mut attempt = 0;
        loop {
            match self.call_once(&payload) {
                Ok(output) => return Ok(output),
                // Retrying a missing binary cannot help
                Err(e @ CollaboratorError::CommandNotFound(_)) => return Err(e),
                Err(e) if attempt < self.retries => {
                    attempt += 1;
                    tracing::debug!(kind = request.kind.as_str(), attempt, error = %e, "retrying assistant request");
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn call_once(&self, payload: &[u8]) -> Result<String, CollaboratorError> {
        let deadline = Instant::now() + self.timeout;
        let mut child = Command::new(&self.command)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    CollaboratorError::CommandNotFound(self.command.clone())
                } else {
                    CollaboratorError::Spawn(e)
                }
            })?;

        // Readers run before the write so a chatty command cannot fill a pipe and stall
        let stdout = spawn_reader(child.stdout.take());
        let stderr = spawn_reader(child.stderr.take());

        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(payload) {
                // A command that exits without reading its input closes the pipe
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    kill(&mut child);
                    return Err(CollaboratorError::StdinWrite(e));
                }
            }
        }

        let status = match wait_until(&mut child, deadline) {
            Ok(Some(status)) => status,
            Ok(None) => {
                kill(&mut child);
                return Err(CollaboratorError::Timeout(self.timeout));
            }
            Err(e) => {
                kill(&mut child);
                return Err(CollaboratorError::Spawn(e));
            }
        };

        // A background process left behind by the command can hold the pipes open
        let stdout = collect(&stdout, deadline).ok_or(CollaboratorError::Timeout(self.timeout))?;
        let stderr = collect(&stderr, deadline).unwrap_or_default();

        if status.success() {
            String::from_utf8(stdout).map_err(|_| CollaboratorError::InvalidUtf8)
        } else {
            Err(CollaboratorError::Failed {
                stderr: String::from_utf8_lossy(&stderr).to_string(),
                exit_code: status.code(),
            })
        }
    }
}

impl Assistant for CommandAssistant {
    fn complete(&self, content: &str, language: Language, caret: usize) -> Result<Vec<String>, CollaboratorError> {
        let mut request = AssistRequest::new(RequestKind::Complete, language.tag(), content);
        request.caret = Some(caret);
        request.prefix = Some(completion_prefix(content, caret));
        self.call(&request).map(|raw| parse_suggestions(&raw))
    }

    fn improve(&self, content: &str, language: Language, instruction: &str) -> Result<String, CollaboratorError> {
        let mut request = AssistRequest::new(RequestKind::Improve, language.tag(), content);
        request.instruction = Some(instruction);
        self.call(&request)
    }

    fn explain(&self, content: &str, language: Language) -> Result<String, CollaboratorError> {
        self.call(&AssistRequest::new(RequestKind::Explain, language.tag(), content))
    }

    fn simulate(&self, content: &str, language: Language) -> Result<String, CollaboratorError> {
        self.call(&AssistRequest::new(RequestKind::Simulate, language.tag(), content))
    }
}

fn spawn_reader<R>(pipe: Option<R>) -> Receiver<Vec<u8>>
where
    R: Read + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        let _ = tx.send(buf);
    });
    rx
}

/// Everything a reader drained, or `None` if the pipe is still open at `deadline`
fn collect(reader: &Receiver<Vec<u8>>, deadline: Instant) -> Option<Vec<u8>> {
    reader
        .recv_timeout(deadline.saturating_duration_since(Instant::now()))
        .ok()
}

/// Wait for the child to exit. `Ok(None)` once `deadline` passes.
fn wait_until(child: &mut Child, deadline: Instant) -> std::io::Result<Option<std::process::ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn kill(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
