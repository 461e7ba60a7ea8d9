//! Locating and reading `config.yaml`.

pub mod dsn;
pub mod error;

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    Settings,
    constants::{CONFIG_DIR, CONFIG_EXTENSIONS, CONFIG_NAME},
};
use error::ConfigLoadError;

/// Locates and parses the YAML configuration file.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    dir: PathBuf,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(CONFIG_DIR),
        }
    }
}

impl ConfigLoader {
    /// Loader rooted at `./config`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader rooted at `dir` instead of `./config`.
    pub fn with_dir<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory searched for `config.yaml`.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Read and parse the configuration file.
    ///
    /// Single-shot: nothing is cached, each call re-reads the file.
    pub fn load(&self) -> Result<Settings, ConfigLoadError> {
        let path = self.resolve_path()?;
        debug!(path = %path.display(), "loading configuration");

        let contents = fs::read_to_string(&path).map_err(|source| {
            ConfigLoadError::Io {
                path: path.clone(),
                source,
            }
        })?;

        Settings::from_yaml_str(&contents)
            .map_err(|source| ConfigLoadError::Parse { path, source })
    }

    fn resolve_path(&self) -> Result<PathBuf, ConfigLoadError> {
        CONFIG_EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{CONFIG_NAME}.{ext}")))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| ConfigLoadError::MissingConfig {
                dir: self.dir.clone(),
            })
    }
}
