//! Typed views over the configuration sections the bootstrap consumes.

use std::fmt;

use serde::Deserialize;

use crate::{ConfigLoadError, Settings, loader::dsn::normalize_dsn};

/// `database` section.
#[derive(Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Relational database connection string, URL or driver form.
    pub dsn: String,
}

impl DatabaseConfig {
    /// Read `database.dsn` from `settings`.
    pub fn from_settings(
        settings: &Settings,
    ) -> Result<Self, ConfigLoadError> {
        Ok(Self {
            dsn: settings.get_string("database.dsn")?,
        })
    }

    /// Connection URL for sqlx, see [`normalize_dsn`].
    pub fn connection_url(&self) -> Result<String, ConfigLoadError> {
        normalize_dsn(&self.dsn)
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("dsn", &"<redacted>")
            .finish()
    }
}

/// `redis` section.
#[derive(Clone, Deserialize)]
pub struct RedisConfig {
    /// `host:port` of the Redis server.
    pub addr: String,
    /// AUTH password; empty disables authentication.
    #[serde(default)]
    pub password: String,
    /// Logical database index.
    #[serde(default)]
    pub db: i64,
}

impl RedisConfig {
    /// Read `redis.addr`, `redis.password` and `redis.db` from `settings`.
    ///
    /// `password` and `db` fall back to empty and `0` when absent.
    pub fn from_settings(
        settings: &Settings,
    ) -> Result<Self, ConfigLoadError> {
        Ok(Self {
            addr: settings.get_string("redis.addr")?,
            password: optional(settings.get_string("redis.password"))?
                .unwrap_or_default(),
            db: optional(settings.get_int("redis.db"))?.unwrap_or_default(),
        })
    }
}

impl fmt::Debug for RedisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisConfig")
            .field("addr", &self.addr)
            .field("password_set", &!self.password.is_empty())
            .field("db", &self.db)
            .finish()
    }
}

/// `rabbitmq` section.
#[derive(Clone, Deserialize)]
pub struct RabbitMqConfig {
    /// AMQP connection URL.
    pub url: String,
}

impl RabbitMqConfig {
    /// Read `rabbitmq.url` from `settings`.
    pub fn from_settings(
        settings: &Settings,
    ) -> Result<Self, ConfigLoadError> {
        Ok(Self {
            url: settings.get_string("rabbitmq.url")?,
        })
    }
}

impl fmt::Debug for RabbitMqConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RabbitMqConfig")
            .field("url", &"<redacted>")
            .finish()
    }
}

fn optional<T>(
    value: Result<T, ConfigLoadError>,
) -> Result<Option<T>, ConfigLoadError> {
    match value {
        Ok(value) => Ok(Some(value)),
        Err(ConfigLoadError::MissingKey { .. }) => Ok(None),
        Err(err) => Err(err),
    }
}
