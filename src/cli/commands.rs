//! Commands typed during an exam.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Pick the option at this zero-based index (`a`, `b`, ...)
    Answer(usize),
    Next,
    Previous,
    /// Go to a question by one-based number
    Jump(usize),
    Switch(String),
    Progress,
    Submit,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command '{0}', type 'help'")]
    Unknown(String),
    #[error("Usage: {0}")]
    Usage(&'static str),
}

/// Parse one input line.
pub fn parse_command(line: &str) -> Result<SessionCommand, CommandError> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head.to_ascii_lowercase().as_str() {
        "" => Err(CommandError::Empty),
        "n" | "next" => Ok(SessionCommand::Next),
        "p" | "prev" | "previous" => Ok(SessionCommand::Previous),
        "g" | "go" => match rest.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(SessionCommand::Jump(n)),
            _ => Err(CommandError::Usage("g <question number>")),
        },
        "s" | "subject" if !rest.is_empty() => Ok(SessionCommand::Switch(rest.to_string())),
        "s" | "subject" => Err(CommandError::Usage("s <subject>")),
        "progress" | "?" => Ok(SessionCommand::Progress),
        "submit" => Ok(SessionCommand::Submit),
        "help" | "h" => Ok(SessionCommand::Help),
        "quit" | "q" | "exit" => Ok(SessionCommand::Quit),
        letter if letter.len() == 1 && rest.is_empty() => {
            let c = letter.as_bytes()[0];
            if c.is_ascii_lowercase() {
                Ok(SessionCommand::Answer(usize::from(c - b'a')))
            } else {
                Err(CommandError::Unknown(line.to_string()))
            }
        }
        _ => Err(CommandError::Unknown(line.to_string())),
    }
}

pub const HELP: &str = "\
  a, b, c, ...   choose an answer
  n / p          next / previous question
  g N            go to question N
  s NAME         switch subject
  progress       answered questions per subject
  submit         finish the attempt
  quit           leave without submitting";
