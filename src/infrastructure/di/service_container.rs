//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{ConfigBinder, ConfigLoader};
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        let settings = Arc::new(settings);

        Self { settings, fs }
    }

    /// Binder honouring the configured required/default policy.
    pub fn binder(&self) -> ConfigBinder {
        ConfigBinder::with_policy(self.settings.required_default())
    }

    /// Loader reading the configured env file.
    pub fn loader(&self) -> ConfigLoader {
        ConfigLoader::from_settings(Arc::clone(&self.fs), &self.settings)
    }
}
