//! `io::Result` to `ApplicationResult` conversion with context

use std::io;
use std::path::Path;

use crate::application::{ApplicationError, ApplicationResult};

pub trait IoResultExt<T> {
    /// Wrap an I/O error as `OperationFailed` naming what was being done.
    ///
    /// ```ignore
    /// writeln!(out, "Unknown command: {name}").with_context("write diagnostic")?;
    /// ```
    fn with_context(self, context: impl Into<String>) -> ApplicationResult<T>;

    /// Like [`with_context`](IoResultExt::with_context), context is `"<action>: <path>"`.
    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T>;
}

impl<T> IoResultExt<T> for io::Result<T> {
    fn with_context(self, context: impl Into<String>) -> ApplicationResult<T> {
        self.map_err(|e| ApplicationError::OperationFailed {
            context: context.into(),
            source: Box::new(e),
        })
    }

    fn with_path_context(self, action: &str, path: &Path) -> ApplicationResult<T> {
        self.with_context(format!("{action}: {}", path.display()))
    }
}
