use std::fmt;

use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use tracing::info;
use url::Url;

use super::Release;
use crate::errors::{ConnectionError, ReleaseError, Stage};

/// Live Redis handle.
pub struct CacheHandle {
    connection: ConnectionManager,
}

impl fmt::Debug for CacheHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheHandle")
            .field("connection", &"ConnectionManager")
            .finish()
    }
}

/// Build `redis://[:password@]addr/index`.
///
/// An empty password means the server is reached without AUTH.
pub fn endpoint_url(
    addr: &str,
    password: &str,
    index: i64,
) -> Result<Url, ConnectionError> {
    let addr = addr.trim();
    if addr.is_empty() {
        return Err(ConnectionError::invalid_endpoint(
            Stage::Cache,
            addr,
            "address is empty",
        ));
    }
    if index < 0 {
        return Err(ConnectionError::invalid_endpoint(
            Stage::Cache,
            addr,
            format!("database index {index} is negative"),
        ));
    }

    let mut url =
        Url::parse(&format!("redis://{addr}/{index}")).map_err(|err| {
            ConnectionError::invalid_endpoint(
                Stage::Cache,
                addr,
                err.to_string(),
            )
        })?;
    if url.host_str().is_none_or(str::is_empty)
        || url.path() != format!("/{index}")
    {
        return Err(ConnectionError::invalid_endpoint(
            Stage::Cache,
            addr,
            "expected host:port",
        ));
    }

    if !password.is_empty() {
        url.set_password(Some(password)).map_err(|_| {
            ConnectionError::invalid_endpoint(
                Stage::Cache,
                addr,
                "password cannot be encoded",
            )
        })?;
    }

    Ok(url)
}

/// Connect to Redis at `addr`, select `index`, and `PING`.
pub async fn connect(
    addr: &str,
    password: &str,
    index: i64,
) -> Result<CacheHandle, ConnectionError> {
    let url = endpoint_url(addr, password, index)?;

    let client = redis::Client::open(url.as_str())
        .map_err(|source| ConnectionError::open(Stage::Cache, source))?;
    // First connect is attempted once; a refusal fails the stage.
    let config = ConnectionManagerConfig::new().set_number_of_retries(0);
    let mut connection = ConnectionManager::new_with_config(client, config)
        .await
        .map_err(|source| ConnectionError::open(Stage::Cache, source))?;

    let reply: String = redis::cmd("PING")
        .query_async(&mut connection)
        .await
        .map_err(|source| ConnectionError::probe(Stage::Cache, source))?;
    if reply != "PONG" {
        return Err(ConnectionError::probe(
            Stage::Cache,
            format!("unexpected PING reply `{reply}`"),
        ));
    }

    info!(addr, db = index, "Successfully connected to Redis");

    Ok(CacheHandle { connection })
}

#[async_trait]
impl Release for CacheHandle {
    fn stage(&self) -> Stage {
        Stage::Cache
    }

    async fn release(self: Box<Self>) -> Result<(), ReleaseError> {
        // Dropping the manager closes the socket.
        drop(self.connection);
        Ok(())
    }
}
