use std::io::{self, BufRead, Write};
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use droidcode::commands::{parse_command, CommandResult};
use droidcode::{
    load_config, load_languages_config, App, Assistant, CommandAssistant, JsonFileStore,
    OfflineAssistant, WorkspaceStore,
};

mod logging;

fn main() -> anyhow::Result<()> {
    let _logging = logging::init();

    // Load configuration
    let settings = load_config();
    let languages = load_languages_config();

    let snapshot = settings.storage.snapshot_path();
    tracing::info!(snapshot = %snapshot.display(), "starting");
    let store = WorkspaceStore::load(Box::new(JsonFileStore::new(snapshot)))
        .with_languages(languages)
        .with_tab_width(settings.editor.tab_width);

    let assistant: Arc<dyn Assistant> = match CommandAssistant::from_settings(&settings.assist) {
        Some(assistant) => Arc::new(assistant),
        None => {
            tracing::info!("no assistant command configured");
            Arc::new(OfflineAssistant)
        }
    };

    // Commands and confirmations share one line reader
    let lines = Rc::new(spawn_stdin_reader());
    let confirm = {
        let lines = Rc::clone(&lines);
        move |question: &str| ask(&lines, question)
    };
    let mut app = App::new(&settings, store, assistant, Box::new(confirm));

    println!("droidcode - type `help` for commands");
    prompt()?;

    // Upper bound so background answers are picked up promptly
    let max_poll = Duration::from_millis(16);

    // Main event loop
    loop {
        let poll_timeout = app
            .next_deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()).min(max_poll))
            .unwrap_or(max_poll);
        match lines.recv_timeout(poll_timeout) {
            Ok(line) => {
                match app.execute_command(parse_command(&line), Instant::now()) {
                    CommandResult::Ok => {}
                    CommandResult::Message(msg) => println!("{}", msg),
                    CommandResult::Error(err) => println!("E: {}", err),
                    CommandResult::Quit => break,
                }
                prompt()?;
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        let output = app.tick(Instant::now());
        if !output.is_empty() {
            println!();
            for msg in output {
                println!("{}", msg);
            }
            prompt()?;
        }
    }

    tracing::info!("exiting");
    Ok(())
}

/// Read stdin lines on a background thread
fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

fn ask(lines: &Receiver<String>, question: &str) -> bool {
    print!("{} [y/N] ", question);
    let _ = io::stdout().flush();
    lines
        .recv()
        .map(|answer| matches!(answer.trim(), "y" | "Y" | "yes"))
        .unwrap_or(false)
}

fn prompt() -> io::Result<()> {
    print!("> ");
    io::stdout().flush()
}
