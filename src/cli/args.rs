//! Command-line argument parsing.

use thiserror::Error;

use crate::selection::{ExamCategory, ExamLimits, QuestionMode, SelectionState};

/// Question count used when `--subject` gives none.
pub const DEFAULT_QUESTION_COUNT: u32 = 10;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Forget the stored credential
    Logout,
    /// Start an exam with these options (default)
    Run(RunOptions),
}

/// Options for one exam run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunOptions {
    pub single: bool,
    pub subjects: Vec<(String, Option<u32>)>,
    pub minutes: Option<u32>,
    pub mode: Option<QuestionMode>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgsError {
    #[error("{0} requires a value")]
    MissingValue(&'static str),

    #[error("Invalid value for {flag}: '{value}'")]
    InvalidValue { flag: &'static str, value: String },

    #[error("Unknown argument: {0}")]
    Unknown(String),
}

impl RunOptions {
    /// Build the selection these options describe. The result is not yet
    /// validated against the limits.
    pub fn to_selection(&self, limits: ExamLimits) -> SelectionState {
        let mut selection = SelectionState::new(limits);
        if self.single {
            selection.set_category(ExamCategory::Single);
        }
        if let Some(mode) = self.mode {
            selection.set_mode(mode);
        }
        if let Some(minutes) = self.minutes {
            selection.set_duration_minutes(minutes);
        }
        for (subject, count) in &self.subjects {
            if selection.add_subject(subject.as_str()) {
                selection.set_count(subject, count.unwrap_or(DEFAULT_QUESTION_COUNT));
            } else {
                tracing::warn!(subject = %subject, "Subject not added (duplicate or over the cap)");
            }
        }
        selection
    }
}

/// Parse command-line arguments and return the appropriate command.
///
/// ```
/// use prepexam::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["prepexam".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), Ok(CliCommand::Version));
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut options = RunOptions::default();
    // Skip the program name
    let mut args = args.skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return Ok(CliCommand::Version),
            "--help" | "-h" => return Ok(CliCommand::Help),
            "logout" | "--logout" => return Ok(CliCommand::Logout),
            "--single" => options.single = true,
            "--subject" | "-s" => {
                let value = args.next().ok_or(ArgsError::MissingValue("--subject"))?;
                options.subjects.push(parse_subject(&value)?);
            }
            "--minutes" | "-m" => {
                let value = args.next().ok_or(ArgsError::MissingValue("--minutes"))?;
                let minutes = value.parse().map_err(|_| ArgsError::InvalidValue {
                    flag: "--minutes",
                    value: value.clone(),
                })?;
                options.minutes = Some(minutes);
            }
            "--mode" => {
                let value = args.next().ok_or(ArgsError::MissingValue("--mode"))?;
                let mode = value.parse().map_err(|_| ArgsError::InvalidValue {
                    flag: "--mode",
                    value: value.clone(),
                })?;
                options.mode = Some(mode);
            }
            _ => return Err(ArgsError::Unknown(arg)),
        }
    }

    Ok(CliCommand::Run(options))
}

/// `NAME` or `NAME:COUNT`.
fn parse_subject(value: &str) -> Result<(String, Option<u32>), ArgsError> {
    let invalid = || ArgsError::InvalidValue {
        flag: "--subject",
        value: value.to_string(),
    };
    let (name, count) = match value.rsplit_once(':') {
        Some((name, count)) => (name, Some(count.parse().map_err(|_| invalid())?)),
        None => (value, None),
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(invalid());
    }
    Ok((name.to_string(), count))
}
