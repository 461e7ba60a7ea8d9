//! Configuration loading for the backplane bootstrap.
//!
//! The configuration is a single YAML document at `./config/config.yaml`.
//! [`ConfigLoader`] reads it into an immutable [`Settings`] value which the
//! bootstrap passes by reference to each connection stage. Typed sections
//! live in [`models`]; [`loader::dsn`] turns whatever DSN the file holds
//! into a URL sqlx can open.

pub mod constants;
pub mod loader;
pub mod models;
pub mod settings;

pub use loader::{ConfigLoader, dsn::normalize_dsn, error::ConfigLoadError};
pub use models::{DatabaseConfig, RabbitMqConfig, RedisConfig};
pub use settings::Settings;
