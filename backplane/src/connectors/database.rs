use std::fmt;

use async_trait::async_trait;
use sqlx::{AnyConnection, Connection};
use tracing::info;

use super::{Release, endpoint_host};
use crate::errors::{ConnectionError, ReleaseError, Stage};

/// Live relational database handle; owns a single connection.
pub struct DatabaseHandle {
    connection: AnyConnection,
}

impl fmt::Debug for DatabaseHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseHandle")
            .field("backend", &self.connection.backend_name())
            .finish()
    }
}

/// Open a connection for `dsn` and run `SELECT 1` against it.
///
/// `dsn` must already be a URL (see `backplane_config::normalize_dsn`).
/// One attempt only; the driver's error is returned as the source.
pub async fn connect(dsn: &str) -> Result<DatabaseHandle, ConnectionError> {
    sqlx::any::install_default_drivers();

    let mut connection = AnyConnection::connect(dsn)
        .await
        .map_err(|source| ConnectionError::open(Stage::Database, source))?;

    if let Err(source) = sqlx::query("SELECT 1").execute(&mut connection).await
    {
        let _ = connection.close().await;
        return Err(ConnectionError::probe(Stage::Database, source));
    }

    info!(
        backend = connection.backend_name(),
        endpoint = endpoint_host(dsn).as_deref().unwrap_or("local"),
        "Successfully connected to database"
    );

    Ok(DatabaseHandle { connection })
}

#[async_trait]
impl Release for DatabaseHandle {
    fn stage(&self) -> Stage {
        Stage::Database
    }

    async fn release(self: Box<Self>) -> Result<(), ReleaseError> {
        self.connection
            .close()
            .await
            .map_err(|source| ReleaseError::new(Stage::Database, source))
    }
}
