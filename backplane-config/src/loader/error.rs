//! Configuration error type.

use std::path::PathBuf;
use thiserror::Error;

/// Failures raised while locating, parsing, or reading the configuration.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    /// No `config.yaml` / `config.yml` exists in the configuration directory.
    #[error("configuration file missing: {dir}/config.yaml")]
    MissingConfig {
        /// Directory that was searched.
        dir: PathBuf,
    },
    /// The configuration file exists but could not be read.
    #[error("failed to read configuration {path}")]
    Io {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The configuration file is not valid YAML.
    #[error("failed to parse configuration {path}")]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
        /// Parser failure.
        #[source]
        source: config::ConfigError,
    },
    /// A required key-path is absent.
    #[error("configuration key '{key}' is missing")]
    MissingKey {
        /// Dotted key-path that was looked up.
        key: String,
    },
    /// A key-path is present but holds a value of the wrong shape.
    #[error("configuration key '{key}' has an invalid value")]
    InvalidValue {
        /// Dotted key-path that was looked up.
        key: String,
        /// Conversion failure.
        #[source]
        source: config::ConfigError,
    },
    /// The DSN could not be understood.
    #[error("invalid database DSN: {reason}")]
    InvalidDsn {
        /// Human readable cause.
        reason: String,
    },
    /// The DSN looked like a URL but failed to parse as one.
    #[error("invalid database URL")]
    InvalidDatabaseUrl {
        /// URL parser failure.
        #[source]
        source: url::ParseError,
    },
    /// The DSN user could not be encoded into a URL.
    #[error("invalid database username '{username}'")]
    InvalidDatabaseUsername {
        /// Offending user name.
        username: String,
    },
    /// The DSN password could not be encoded into a URL.
    #[error("failed to encode database password into URL")]
    InvalidDatabasePassword,
}

impl ConfigLoadError {
    pub(crate) fn invalid_dsn(reason: impl Into<String>) -> Self {
        Self::InvalidDsn {
            reason: reason.into(),
        }
    }
}
