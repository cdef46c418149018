//! Command-line interface.
//!
//! - [`args`] - process arguments into a [`CliCommand`]
//! - [`commands`] - lines typed during an exam into a [`SessionCommand`]
//! - [`version`] - version string

pub mod args;
pub mod commands;
pub mod version;

pub use args::{parse_args, ArgsError, CliCommand, RunOptions};
pub use commands::{parse_command, CommandError, SessionCommand};
pub use version::{version_line, VERSION};

pub const USAGE: &str = "\
Usage: prepexam [OPTIONS]
       prepexam logout

Options:
  --single                 single-subject exam (default: combined)
  -s, --subject NAME[:N]   add a subject with N questions (repeatable)
  -m, --minutes N          exam length in minutes
  --mode random|ordered    question order
  -V, --version            print version
  -h, --help               print this help

Environment:
  PREPEXAM_API_URL, PREPEXAM_HTTP_TIMEOUT_SECS,
  PREPEXAM_CREDENTIALS_PATH, PREPEXAM_TICK_MILLIS, RUST_LOG";
