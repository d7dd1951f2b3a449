//! Domain-level errors (no external dependencies)

use std::path::PathBuf;
use thiserror::Error;

/// Domain errors represent binding and dispatch rule violations.
/// These are independent of infrastructure concerns.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("var `{key}` is required")]
    MissingRequired { key: String, field: String },

    #[error("invalid {kind} for field {field}: {value:?}")]
    TypeMismatch {
        field: String,
        kind: String,
        value: String,
    },

    #[error("unsupported type: {kind} for field {field}")]
    UnsupportedType { field: String, kind: String },

    #[error("field not bound: {0}")]
    MissingField(String),

    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("unknown subcommand: {name}")]
    UnknownSubCommand { command: String, name: String },

    #[error("required flag {} not provided", flag_spelling(.long, .short.as_deref()))]
    MissingRequiredFlag { long: String, short: Option<String> },

    #[error("invalid schema: {message}")]
    InvalidSchema { message: String },

    #[error("invalid env file {}:{line}: {message}", .path.display())]
    InvalidEnvFile {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("operation cancelled")]
    Cancelled,
}

fn flag_spelling(long: &str, short: Option<&str>) -> String {
    match short {
        Some(short) => format!("--{long} or -{short}"),
        None => format!("--{long}"),
    }
}

impl DomainError {
    /// Dotted field path for binding errors, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            DomainError::MissingRequired { field, .. }
            | DomainError::TypeMismatch { field, .. }
            | DomainError::UnsupportedType { field, .. } => Some(field),
            DomainError::MissingField(field) => Some(field),
            _ => None,
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_flag_with_short_name_when_formatting_then_names_both_spellings() {
        let err = DomainError::MissingRequiredFlag {
            long: "output".into(),
            short: Some("o".into()),
        };
        assert_eq!(err.to_string(), "required flag --output or -o not provided");
    }

    #[test]
    fn given_flag_without_short_name_when_formatting_then_names_long_only() {
        let err = DomainError::MissingRequiredFlag {
            long: "output".into(),
            short: None,
        };
        assert_eq!(err.to_string(), "required flag --output not provided");
    }
}
