//! Descriptor-driven environment configuration binding and a minimal
//! command dispatcher.
//!
//! * [`application::services::ConfigBinder`] resolves [`domain::FieldSpec`]
//!   descriptors against an [`infrastructure::traits::EnvSource`].
//! * [`application::services::Dispatcher`] routes an argument vector to the
//!   handler of a [`domain::CommandSpec`] or [`domain::SubCommandSpec`].

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
