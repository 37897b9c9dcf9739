use std::path::PathBuf;

use crate::workspace::FileId;

/// Parsed command from the command line
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// files - List every file in the workspace
    Files,
    /// tabs - List open tabs, marking the active one
    Tabs,
    /// new <name> - Create a file
    New(String),
    /// open <id> - Open a file from the explorer
    Open(FileId),
    /// tab <id> - Switch to an open tab
    Tab(FileId),
    /// close [id] - Close a tab (default: active)
    Close(Option<FileId>),
    /// delete [id] - Delete a file (default: active)
    Delete(Option<FileId>),
    /// show - Print the active file
    Show,
    /// insert <offset> <text> - Type text at an offset
    Insert(usize, String),
    /// indent <start> <end> - Press Tab over a selection
    Indent(usize, usize),
    /// find [query] - Find the next match
    Find(Option<String>),
    /// replace - Replace the first match
    Replace,
    /// replace-all - Replace every match
    ReplaceAll,
    /// set option [value] - Set a search option
    Set(String, Option<String>),
    /// accept <n> - Accept the n-th suggestion (1-based)
    Accept(usize),
    /// dismiss - Hide suggestions
    Dismiss,
    /// improve [instruction] - Ask the assistant to rewrite the active file
    Improve(String),
    /// apply - Replace the file with the last improvement
    Apply,
    /// explain - Ask the assistant to explain the active file
    Explain,
    /// run - Simulate running the active file
    Run,
    /// export <dir> - Write every file into a directory
    Export(PathBuf),
    /// reset - Restore the starting workspace
    Reset,
    /// help - List commands
    Help,
    /// quit - Leave
    Quit,
    /// Unknown or malformed command
    Unknown(String),
}

/// Result of executing a command
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    /// Command executed successfully
    Ok,
    /// Command executed with a message to display
    Message(String),
    /// Command failed with an error
    Error(String),
    /// Quit the program
    Quit,
}

/// Expand `\n`, `\t` and `\\` in typed text
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Parse a command string into a Command
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();

    if input.is_empty() {
        return Command::Unknown(String::new());
    }

    // Split into command and arguments
    let mut parts = input.splitn(2, char::is_whitespace);
    let cmd = parts.next().unwrap_or("");
    let args = parts.next().map(|s| s.trim()).filter(|s| !s.is_empty());
    let id_arg = || args.map(FileId::from);

    match cmd {
        "files" | "ls" => Command::Files,
        "tabs" => Command::Tabs,
        "new" => match args {
            Some(name) => Command::New(name.to_string()),
            None => Command::Unknown("new: missing file name".to_string()),
        },
        "open" | "o" => match id_arg() {
            Some(id) => Command::Open(id),
            None => Command::Unknown("open: missing file id".to_string()),
        },
        "tab" => match id_arg() {
            Some(id) => Command::Tab(id),
            None => Command::Unknown("tab: missing file id".to_string()),
        },
        "close" => Command::Close(id_arg()),
        "delete" | "rm" => Command::Delete(id_arg()),
        "show" | "cat" => Command::Show,

        "insert" | "i" => {
            let Some(args) = args else {
                return Command::Unknown("insert: usage: insert <offset> <text>".to_string());
            };
            let mut parts = args.splitn(2, ' ');
            let offset = parts.next().and_then(|s| s.parse::<usize>().ok());
            let text = parts.next().map(unescape);
            match (offset, text) {
                (Some(offset), Some(text)) => Command::Insert(offset, text),
                _ => Command::Unknown("insert: usage: insert <offset> <text>".to_string()),
            }
        }
        "indent" => {
            let nums: Vec<usize> = args
                .unwrap_or("")
                .split_whitespace()
                .filter_map(|s| s.parse().ok())
                .collect();
            match nums.as_slice() {
                [start, end] => Command::Indent(*start, *end),
                [caret] => Command::Indent(*caret, *caret),
                _ => Command::Unknown("indent: usage: indent <start> <end>".to_string()),
            }
        }

        "find" | "f" => Command::Find(args.map(str::to_string)),
        "replace" | "r" => Command::Replace,
        "replace-all" | "ra" => Command::ReplaceAll,
        "set" => {
            if let Some(arg) = args {
                let mut parts = arg.splitn(2, char::is_whitespace);
                let option = parts.next().unwrap_or("").to_string();
                let value = parts.next().map(|s| s.to_string());
                Command::Set(option, value)
            } else {
                Command::Unknown("set: missing option".to_string())
            }
        }

        "accept" | "a" => match args.and_then(|s| s.parse::<usize>().ok()) {
            Some(n) if n > 0 => Command::Accept(n),
            _ => Command::Unknown("accept: usage: accept <n>".to_string()),
        },
        "dismiss" => Command::Dismiss,
        "improve" => Command::Improve(args.unwrap_or("").to_string()),
        "apply" => Command::Apply,
        "explain" => Command::Explain,
        "run" => Command::Run,
        "export" => match args {
            Some(dir) => Command::Export(PathBuf::from(dir)),
            None => Command::Unknown("export: missing directory".to_string()),
        },
        "reset" => Command::Reset,
        "help" | "?" => Command::Help,
        "q" | "quit" | "exit" => Command::Quit,

        _ => Command::Unknown(cmd.to_string()),
    }
}

/// One line per command, for `help`
pub const HELP: &str = "\
files                   list files
tabs                    list open tabs
new <name>              create a file
open <id>               open a file
tab <id>                switch tab
close [id]              close a tab
delete [id]             delete a file
show                    print the active file
insert <offset> <text>  type text (\\n and \\t expand)
indent <start> [end]    press Tab over a selection
find [query]            find the next match
replace | replace-all   replace the first | every match
set case|regex [on|off] toggle search options
set query|replace <s>   set search text
accept <n> | dismiss    take or hide a suggestion
improve [instruction]   let the assistant rewrite the file
apply                   use the last rewrite
explain                 let the assistant explain the file
run                     simulate a python file, or preview the page
export <dir>            write all files to a directory
reset                   restore the starting workspace
quit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse_command("files"), Command::Files);
        assert_eq!(parse_command("  tabs  "), Command::Tabs);
        assert_eq!(parse_command("replace-all"), Command::ReplaceAll);
        assert_eq!(parse_command("q"), Command::Quit);
        assert_eq!(parse_command(""), Command::Unknown(String::new()));
        assert_eq!(parse_command("bogus"), Command::Unknown("bogus".to_string()));
    }

    #[test]
    fn test_file_commands() {
        assert_eq!(parse_command("new util.js"), Command::New("util.js".to_string()));
        assert!(matches!(parse_command("new"), Command::Unknown(_)));
        assert_eq!(parse_command("open main_py"), Command::Open(FileId::from("main_py")));
        assert_eq!(parse_command("close"), Command::Close(None));
        assert_eq!(
            parse_command("delete index_html"),
            Command::Delete(Some(FileId::from("index_html")))
        );
    }

    #[test]
    fn test_insert_keeps_spaces() {
        assert_eq!(
            parse_command("insert 6 x = 1\\n"),
            Command::Insert(6, "x = 1\n".to_string())
        );
        assert_eq!(parse_command("insert 0  two"), Command::Insert(0, " two".to_string()));
        assert!(matches!(parse_command("insert x abc"), Command::Unknown(_)));
        assert!(matches!(parse_command("insert 3"), Command::Unknown(_)));
    }

    #[test]
    fn test_indent() {
        assert_eq!(parse_command("indent 2 5"), Command::Indent(2, 5));
        assert_eq!(parse_command("indent 2"), Command::Indent(2, 2));
        assert!(matches!(parse_command("indent"), Command::Unknown(_)));
    }

    #[test]
    fn test_search_commands() {
        assert_eq!(parse_command("find"), Command::Find(None));
        assert_eq!(parse_command("find def main"), Command::Find(Some("def main".to_string())));
        assert_eq!(
            parse_command("set query print("),
            Command::Set("query".to_string(), Some("print(".to_string()))
        );
        assert_eq!(parse_command("set case"), Command::Set("case".to_string(), None));
    }

    #[test]
    fn test_assistant_commands() {
        assert_eq!(parse_command("accept 2"), Command::Accept(2));
        assert!(matches!(parse_command("accept 0"), Command::Unknown(_)));
        assert_eq!(parse_command("improve"), Command::Improve(String::new()));
        assert_eq!(
            parse_command("improve add type hints"),
            Command::Improve("add type hints".to_string())
        );
        assert_eq!(parse_command("apply"), Command::Apply);
        assert_eq!(parse_command("export out"), Command::Export(PathBuf::from("out")));
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"a\nb\tc\\d\q"), "a\nb\tc\\d\\q");
        assert_eq!(unescape("trailing\\"), "trailing\\");
    }
}
