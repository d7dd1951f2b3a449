//! CLI-level errors (wraps infrastructure errors)

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;
use crate::infrastructure::InfraError;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Infra(#[from] InfraError),

    #[error("{0}")]
    Usage(String),

    /// Dispatched app finished with a non-zero status (already reported).
    #[error("exited with status {0}")]
    Exit(i32),
}

impl From<ApplicationError> for CliError {
    fn from(e: ApplicationError) -> Self {
        CliError::Infra(InfraError::Application(e))
    }
}

impl From<DomainError> for CliError {
    fn from(e: DomainError) -> Self {
        ApplicationError::Domain(e).into()
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Usage(_) => crate::exitcode::USAGE,
            CliError::Exit(code) => *code,
            CliError::Infra(e) => match e {
                InfraError::Read { .. } => crate::exitcode::NOINPUT,
                InfraError::WorkingDir(_) => crate::exitcode::IOERR,
                InfraError::Application(app) => match app {
                    ApplicationError::Config { .. } => crate::exitcode::CONFIG,
                    ApplicationError::OperationFailed { .. } => crate::exitcode::IOERR,
                    ApplicationError::Handler(_) => crate::exitcode::FAILURE,
                    ApplicationError::Domain(domain) => match domain {
                        DomainError::InvalidEnvFile { .. } | DomainError::InvalidSchema { .. } => {
                            crate::exitcode::DATAERR
                        }
                        DomainError::MissingRequired { .. }
                        | DomainError::TypeMismatch { .. }
                        | DomainError::UnsupportedType { .. }
                        | DomainError::MissingField(_) => crate::exitcode::CONFIG,
                        _ => crate::exitcode::FAILURE,
                    },
                },
            },
        }
    }
}
