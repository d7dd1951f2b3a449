//! Infrastructure-level errors (wraps application errors)

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::application::ApplicationError;

/// Errors raised while talking to the host before any service runs.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("cannot read {what} {}", .path.display())]
    Read {
        what: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot determine working directory")]
    WorkingDir(#[source] io::Error),
}

impl InfraError {
    pub fn read(what: &'static str, path: &Path, source: io::Error) -> Self {
        Self::Read {
            what,
            path: path.to_path_buf(),
            source,
        }
    }
}
