//! CLI-level errors (wraps application errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    App(#[from] ApplicationError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::InvalidArgs(_) => crate::exitcode::USAGE,
            CliError::App(e) => match e {
                ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                ApplicationError::EmptyTree(_) | ApplicationError::NoNodeAt { .. } => {
                    crate::exitcode::DATAERR
                }
                ApplicationError::Domain(d) => match d {
                    DomainError::PathNotFound(_) => crate::exitcode::NOINPUT,
                    DomainError::Walk { .. } | DomainError::Csv { .. } => crate::exitcode::IOERR,
                    DomainError::InvalidRecord { .. } => crate::exitcode::DATAERR,
                    _ => crate::exitcode::SOFTWARE,
                },
            },
        }
    }
}

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        CliError::App(ApplicationError::Domain(e))
    }
}
