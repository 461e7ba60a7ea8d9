//! Key-path access to the parsed configuration.

use std::fmt;

use config::{Config as RawConfig, ConfigError, File, FileFormat};
use serde::de::DeserializeOwned;

use crate::ConfigLoadError;

/// Read-only configuration values addressed by dotted key-path.
///
/// Built once from a single YAML document and never mutated afterwards.
/// Values come back exactly as written in the source document.
#[derive(Clone)]
pub struct Settings {
    inner: RawConfig,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings").finish_non_exhaustive()
    }
}

impl Settings {
    /// Parse settings from an in-memory YAML document.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let inner = RawConfig::builder()
            .add_source(File::from_str(contents, FileFormat::Yaml))
            .build()?;
        Ok(Self { inner })
    }

    /// String value at `key`, e.g. `redis.addr`.
    pub fn get_string(&self, key: &str) -> Result<String, ConfigLoadError> {
        self.inner.get_string(key).map_err(|err| lookup_error(key, err))
    }

    /// Integer value at `key`, e.g. `redis.db`.
    pub fn get_int(&self, key: &str) -> Result<i64, ConfigLoadError> {
        self.inner.get_int(key).map_err(|err| lookup_error(key, err))
    }

    /// Deserialize the table at `key` into a typed section.
    pub fn section<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<T, ConfigLoadError> {
        self.inner.get::<T>(key).map_err(|err| lookup_error(key, err))
    }
}

fn lookup_error(key: &str, err: ConfigError) -> ConfigLoadError {
    match err {
        ConfigError::NotFound(_) => ConfigLoadError::MissingKey {
            key: key.to_owned(),
        },
        source => ConfigLoadError::InvalidValue {
            key: key.to_owned(),
            source,
        },
    }
}
