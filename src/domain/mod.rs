//! Domain layer: schema descriptors and pure parsing logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod command;
pub mod context;
pub mod env_file;
pub mod error;
pub mod field;

pub use command::{
    AppSpec, CommandSpec, FlagMap, FlagSpec, Handler, HandlerError, HandlerResult, ParsedArgs,
    SubCommandSpec,
};
pub use context::{CancelHandle, ExecContext};
pub use env_file::{shell_quote, EnvFile};
pub use error::{DomainError, DomainResult};
pub use field::{BoundConfig, FieldKind, FieldSpec, FromBound, Value};
