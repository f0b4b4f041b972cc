use std::io::BufRead;
use std::sync::mpsc;
use std::thread;

use okreads_core::Msg;

/// Everything the dispatch loop receives: user commands from stdin and
/// messages produced by the engine.
#[derive(Debug)]
pub enum Inbound {
    Command(Command),
    Msg(Msg),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A plain line: the search box now holds this text.
    Type(String),
    Search,
    Example,
    Clear,
    /// Add the Nth (1-based) search result to the reading list.
    Add(usize),
    Remove(String),
    Undo,
    List,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("unknown command /{0}; try /help")]
    Unknown(String),
    #[error("/{0} needs an argument")]
    MissingArgument(&'static str),
    #[error("{0:?} is not a result number")]
    BadIndex(String),
}

pub const HELP: &str = "\
Type to search (debounced). Commands:
  /search        search for the current text now
  /example       search for \"javascript\"
  /clear         clear the search
  /add N         add result N to the reading list
  /remove ID     remove a book from the reading list
  /undo          undo the last add or remove
  /list          show the reading list
  /quit          exit";

pub fn parse_line(line: &str) -> Result<Command, ParseError> {
    let line = line.trim_end_matches(['\r', '\n']);
    let Some(rest) = line.strip_prefix('/') else {
        return Ok(Command::Type(line.to_string()));
    };

    let mut parts = rest.trim().splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).filter(|arg| !arg.is_empty());

    match name {
        "search" => Ok(Command::Search),
        "example" => Ok(Command::Example),
        "clear" => Ok(Command::Clear),
        "add" => {
            let arg = arg.ok_or(ParseError::MissingArgument("add"))?;
            match arg.parse::<usize>() {
                Ok(index) if index > 0 => Ok(Command::Add(index)),
                _ => Err(ParseError::BadIndex(arg.to_string())),
            }
        }
        "remove" => arg
            .map(|id| Command::Remove(id.to_string()))
            .ok_or(ParseError::MissingArgument("remove")),
        "undo" => Ok(Command::Undo),
        "list" => Ok(Command::List),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(ParseError::Unknown(other.to_string())),
    }
}

/// Reads stdin on its own thread. End of input counts as `/quit`.
pub fn spawn_reader(tx: mpsc::Sender<Inbound>) {
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match parse_line(&line) {
                Ok(command) => {
                    if tx.send(Inbound::Command(command)).is_err() {
                        return;
                    }
                }
                Err(err) => println!("{err}"),
            }
        }
        let _ = tx.send(Inbound::Command(Command::Quit));
    });
}
