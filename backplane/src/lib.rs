//! # Backplane
//!
//! Startup routine that reads `./config/config.yaml`, connects to the
//! configured relational database, Redis and RabbitMQ, verifies each one,
//! and releases them again in reverse order.
//!
//! - [`startup`] sequences the stages and owns the handles
//! - [`connectors`] wraps sqlx, redis and lapin
//! - [`release`] holds acquired handles until shutdown

pub mod connectors;
pub mod errors;
pub mod logging;
pub mod release;
pub mod startup;

pub use errors::{BootstrapError, ConnectionError, ReleaseError, Stage};
pub use startup::{Bootstrap, Shutdown, boot};
