//! Interactive and scriptable command-line front end.

pub mod commands;
pub mod help;
pub mod output;
pub mod registry;
pub mod shell;
pub mod shell_context;
pub mod table;

pub use shell::run;
pub use shell_context::{CliMode, ShellContext};

use crate::core::ServiceError;
use crate::errors::BookError;
use crate::schedule::ScheduleError;

pub type CommandResult = Result<(), CommandError>;

/// Errors surfaced to the user by individual commands.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("No book is open. Use `book new` or `book open` first.")]
    BookNotLoaded,
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Book(BookError),
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    /// Signal, not a failure: the user asked to leave the shell.
    #[error("exit")]
    ExitRequested,
}

impl From<BookError> for CommandError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::BookNotLoaded => CommandError::BookNotLoaded,
            other => CommandError::Book(other),
        }
    }
}

impl From<ServiceError> for CommandError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Book(err) => CommandError::from(err),
            ServiceError::Schedule(err) => CommandError::Schedule(err),
            ServiceError::Invalid(message) => CommandError::InvalidArguments(message),
        }
    }
}

/// Fatal shell-level failures that abort the read-eval loop.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Book(#[from] BookError),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
