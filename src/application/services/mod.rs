//! Application services

pub mod binder;
pub mod dispatcher;
pub mod loader;

pub use binder::{ConfigBinder, RequiredDefault};
pub use dispatcher::Dispatcher;
pub use loader::ConfigLoader;
