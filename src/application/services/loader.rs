//! Config loading service
//!
//! Reads the optional `.env` file, layers it with the process environment
//! and binds a schema against the result.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::services::binder::ConfigBinder;
use crate::application::{ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{BoundConfig, EnvFile, FieldSpec, FromBound};
use crate::infrastructure::traits::{EnvSource, FileSystem, LayeredEnv, ProcessEnv};

/// Loads configuration from the process environment plus an env file.
pub struct ConfigLoader {
    fs: Arc<dyn FileSystem>,
    env_file: Option<PathBuf>,
    override_env: bool,
    binder: ConfigBinder,
}

impl ConfigLoader {
    /// Create a loader reading `env_file` (if given) through `fs`.
    pub fn new(fs: Arc<dyn FileSystem>, env_file: Option<PathBuf>) -> Self {
        Self {
            fs,
            env_file,
            override_env: false,
            binder: ConfigBinder::new(),
        }
    }

    /// Loader configured from [`Settings`].
    pub fn from_settings(fs: Arc<dyn FileSystem>, settings: &Settings) -> Self {
        let env_file = settings
            .load_env_file
            .then(|| settings.env_file.clone());
        Self::new(fs, env_file)
            .override_env(settings.override_env)
            .binder(ConfigBinder::with_policy(settings.required_default()))
    }

    /// Let env file values win over the process environment.
    pub fn override_env(mut self, override_env: bool) -> Self {
        self.override_env = override_env;
        self
    }

    pub fn binder(mut self, binder: ConfigBinder) -> Self {
        self.binder = binder;
        self
    }

    /// Parse the env file, or `None` when none is configured or it does not exist.
    ///
    /// Expansion inside the file falls back to `fallback`.
    pub fn read_env_file(&self, fallback: &dyn EnvSource) -> ApplicationResult<Option<EnvFile>> {
        let Some(path) = self.env_file.as_deref() else {
            return Ok(None);
        };
        if !self.fs.exists(path) {
            debug!("env file {} not found, skipping", path.display());
            return Ok(None);
        }
        read_env_file(self.fs.as_ref(), path, fallback).map(Some)
    }

    /// Lookup over the env file and `base` in configured precedence.
    pub fn source_over(
        &self,
        base: impl EnvSource + 'static,
    ) -> ApplicationResult<LayeredEnv> {
        let file_vars = self
            .read_env_file(&base)?
            .map(|f| f.variables)
            .unwrap_or_default();

        Ok(if self.override_env {
            LayeredEnv::new().with(file_vars).with(base)
        } else {
            LayeredEnv::new().with(base).with(file_vars)
        })
    }

    /// Lookup over the env file and the process environment.
    pub fn source(&self) -> ApplicationResult<LayeredEnv> {
        self.source_over(ProcessEnv)
    }

    /// Bind `schema` against the process environment and env file.
    #[instrument(level = "debug", skip_all)]
    pub fn load(&self, schema: &[FieldSpec]) -> ApplicationResult<BoundConfig> {
        let source = self.source()?;
        Ok(self.binder.bind(schema, &source)?)
    }

    /// Bind `T`'s schema and build it.
    pub fn load_into<T: FromBound>(&self) -> ApplicationResult<T> {
        let bound = self.load(&T::schema())?;
        Ok(T::from_bound(&bound)?)
    }

    /// Bind against an explicit source, skipping the process environment.
    pub fn load_from(
        &self,
        schema: &[FieldSpec],
        base: BTreeMap<String, String>,
    ) -> ApplicationResult<BoundConfig> {
        let source = self.source_over(base)?;
        Ok(self.binder.bind(schema, &source)?)
    }
}

/// Read and parse one env file.
pub fn read_env_file(
    fs: &dyn FileSystem,
    path: &Path,
    fallback: &dyn EnvSource,
) -> ApplicationResult<EnvFile> {
    let content = fs
        .read_to_string(path)
        .with_path_context("read env file", path)?;
    let file = EnvFile::parse(&content, path.to_path_buf(), |key| fallback.get(key))?;
    debug!(
        "read {} variables from {}",
        file.variables.len(),
        path.display()
    );
    Ok(file)
}
