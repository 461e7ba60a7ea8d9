//! Outbound connections the bootstrap opens and probes.
//!
//! Each backend module exposes a free `connect` function returning a live
//! handle: the handle's liveness check has already succeeded when it is
//! returned. [`Connectors`] is the seam the sequencer talks through so the
//! ordering logic can run against fakes.

pub mod broker;
pub mod cache;
pub mod database;

use async_trait::async_trait;
use url::Url;

use crate::errors::{ConnectionError, ReleaseError, Stage};

pub use broker::BrokerHandle;
pub use cache::CacheHandle;
pub use database::DatabaseHandle;

/// An owned live connection that must be released exactly once.
#[async_trait]
pub trait Release: Send {
    fn stage(&self) -> Stage;

    async fn release(self: Box<Self>) -> Result<(), ReleaseError>;
}

#[async_trait]
pub trait Connectors: Send + Sync {
    async fn database(
        &self,
        dsn: &str,
    ) -> Result<Box<dyn Release>, ConnectionError>;

    async fn cache(
        &self,
        addr: &str,
        password: &str,
        index: i64,
    ) -> Result<Box<dyn Release>, ConnectionError>;

    async fn broker(
        &self,
        url: &str,
    ) -> Result<Box<dyn Release>, ConnectionError>;
}

/// Connectors backed by the real client libraries.
#[derive(Debug, Default, Clone, Copy)]
pub struct LiveConnectors;

#[async_trait]
impl Connectors for LiveConnectors {
    async fn database(
        &self,
        dsn: &str,
    ) -> Result<Box<dyn Release>, ConnectionError> {
        Ok(Box::new(database::connect(dsn).await?))
    }

    async fn cache(
        &self,
        addr: &str,
        password: &str,
        index: i64,
    ) -> Result<Box<dyn Release>, ConnectionError> {
        Ok(Box::new(cache::connect(addr, password, index).await?))
    }

    async fn broker(
        &self,
        url: &str,
    ) -> Result<Box<dyn Release>, ConnectionError> {
        Ok(Box::new(broker::connect(url).await?))
    }
}

/// `host[:port]` of a connection URL, for logs that must not leak secrets.
pub(crate) fn endpoint_host(raw: &str) -> Option<String> {
    let url = Url::parse(raw).ok()?;
    let host = url.host_str().filter(|host| !host.is_empty())?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_owned(),
    })
}
