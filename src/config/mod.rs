// src/config/mod.rs
//! Run configuration.
//!
//! Layers, later wins: built-in defaults, a YAML file, environment variables
//! (a `.env` file in the working directory counts), then whatever the caller
//! sets on the returned value (CLI flags). The result is passed explicitly to
//! the runner; nothing here is global.

pub mod consts;
pub mod options;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use consts::*;
pub use options::{AppOptions, LogLevel, LogOptions, PathOptions};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid value for {var}: {message}")]
    Env { var: &'static str, message: String },
}

impl AppOptions {
    /// Load from `path`, or from [`DEFAULT_CONFIG_FILE`] if present, then apply
    /// environment overrides. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Ok(env_file) = dotenvy::dotenv() {
            debug!(path = %env_file.display(), "Loaded .env");
        }

        let mut opts = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let p = Path::new(DEFAULT_CONFIG_FILE);
                if p.is_file() { Self::from_file(p)? } else { Self::default() }
            }
        };
        opts.apply_env()?;
        Ok(opts)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_yaml(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    /// An empty document yields the defaults.
    pub fn from_yaml(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_vars(|k| std::env::var(k).ok())
    }

    /// Overrides from any variable source. Empty values are ignored.
    pub fn apply_vars<F>(&mut self, get: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |k: &str| get(k).filter(|v| !v.trim().is_empty());

        if let Some(v) = get(ENV_SOURCE_DIR) {
            self.paths.source_dir = PathBuf::from(v);
        }
        if let Some(v) = get(ENV_DEST_DIR) {
            self.paths.dest_dir = PathBuf::from(v);
        }
        if let Some(v) = get(ENV_LOG_LEVEL) {
            self.logging.level = v
                .parse()
                .map_err(|message| ConfigError::Env { var: ENV_LOG_LEVEL, message })?;
        }
        if let Some(v) = get(ENV_LOG_FILE) {
            self.logging.file = Some(PathBuf::from(v));
        }
        Ok(())
    }
}
