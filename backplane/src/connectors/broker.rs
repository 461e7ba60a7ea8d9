use std::fmt;

use async_trait::async_trait;
use lapin::{Connection, ConnectionProperties};
use tracing::info;

use super::{Release, endpoint_host};
use crate::errors::{ConnectionError, ReleaseError, Stage};

/// AMQP reply code for a normal connection close.
const REPLY_SUCCESS: u16 = 200;

/// Live RabbitMQ connection.
pub struct BrokerHandle {
    connection: Connection,
}

impl fmt::Debug for BrokerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrokerHandle")
            .field("connected", &self.connection.status().connected())
            .finish()
    }
}

/// Dial the broker at `url`. The AMQP handshake is the only liveness check.
pub async fn connect(url: &str) -> Result<BrokerHandle, ConnectionError> {
    let connection = Connection::connect(url, ConnectionProperties::default())
        .await
        .map_err(|source| ConnectionError::open(Stage::Broker, source))?;

    info!(
        endpoint = endpoint_host(url).as_deref().unwrap_or("unknown"),
        "Successfully connected to RabbitMQ"
    );

    Ok(BrokerHandle { connection })
}

#[async_trait]
impl Release for BrokerHandle {
    fn stage(&self) -> Stage {
        Stage::Broker
    }

    async fn release(self: Box<Self>) -> Result<(), ReleaseError> {
        self.connection
            .close(REPLY_SUCCESS, "OK")
            .await
            .map_err(|source| ReleaseError::new(Stage::Broker, source))
    }
}
