//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/envcmd/envcmd.toml`
//! 3. Local config: `<project_dir>/.envcmd.toml`
//! 4. Environment variables: `ENVCMD_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::services::RequiredDefault;
use crate::application::ApplicationError;

/// Settings for env loading and binding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Key/value file layered under the process environment (default: .env)
    pub env_file: PathBuf,
    /// Read `env_file` at all
    pub load_env_file: bool,
    /// Let env file values win over the process environment
    pub override_env: bool,
    /// Required fields must come from the environment even if they have a default
    pub strict_required: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            env_file: PathBuf::from(".env"),
            load_env_file: true,
            override_env: false,
            strict_required: false,
        }
    }
}

/// Get the XDG config directory for envcmd.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "envcmd").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("envcmd.toml"))
}

/// Get the path to the local config file in a project directory.
pub fn local_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(".envcmd.toml")
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `project_dir` - Optional project directory for local config;
    ///   a relative `env_file` is resolved against it
    pub fn load(project_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref(), project_dir)
    }

    /// Like [`Settings::load`] with an explicit global config path.
    pub fn load_from(
        global_path: Option<&Path>,
        project_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        let defaults = Settings::default();
        let mut builder = Config::builder()
            .set_default("env_file", defaults.env_file.to_string_lossy().to_string())
            .map_err(config_err)?
            .set_default("load_env_file", defaults.load_env_file)
            .map_err(config_err)?
            .set_default("override_env", defaults.override_env)
            .map_err(config_err)?
            .set_default("strict_required", defaults.strict_required)
            .map_err(config_err)?;

        if let Some(global) = global_path {
            builder = builder.add_source(File::from(global).required(false));
        }
        if let Some(dir) = project_dir {
            builder = builder.add_source(File::from(local_config_path(dir)).required(false));
        }
        builder = builder.add_source(Environment::with_prefix("ENVCMD").try_parsing(true));

        let config = builder.build().map_err(config_err)?;
        let mut settings: Self = config.try_deserialize().map_err(config_err)?;

        settings.expand_paths(project_dir);
        Ok(settings)
    }

    /// Expand `~`/`$VAR` in `env_file` and anchor a relative path at `base`.
    fn expand_paths(&mut self, base: Option<&Path>) {
        let raw = self.env_file.to_string_lossy().to_string();
        let expanded = shellexpand::full(&raw)
            .map(|s| s.into_owned())
            .unwrap_or(raw);
        let path = PathBuf::from(expanded);
        self.env_file = match base {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path,
        };
    }

    /// Binder policy for required fields that carry a default.
    pub fn required_default(&self) -> RequiredDefault {
        if self.strict_required {
            RequiredDefault::Rejects
        } else {
            RequiredDefault::Satisfies
        }
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# envcmd configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/envcmd/envcmd.toml
#   Local:  <project_dir>/.envcmd.toml
#   Env:    ENVCMD_* environment variables

# Key/value file layered under the process environment
# env_file = ".env"

# Set to false to ignore env_file entirely
# load_env_file = true

# Let env_file values win over variables already set in the environment
# override_env = false

# Required fields must be set in the environment even if they have a default
# strict_required = false
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
