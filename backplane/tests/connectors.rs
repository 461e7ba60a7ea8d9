//! Real connectors against a port nothing listens on.

use std::{
    fs,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use backplane::{
    BootstrapError, ConnectionError, ReleaseError, Stage, boot,
    connectors::{
        Connectors, LiveConnectors, Release, broker, cache, database,
    },
};
use backplane_config::ConfigLoader;
use tempfile::tempdir;
use tokio::time::timeout;

const CLOSED_ADDR: &str = "127.0.0.1:1";
const DEADLINE: Duration = Duration::from_secs(5);

fn config_with_closed_ports() -> String {
    format!(
        r#"
database:
  dsn: "root@tcp({CLOSED_ADDR})/app"
redis:
  addr: "{CLOSED_ADDR}"
rabbitmq:
  url: "amqp://guest:guest@{CLOSED_ADDR}/%2f"
"#
    )
}

#[tokio::test]
async fn database_refusal_fails_once_with_io_cause() {
    let err = timeout(
        DEADLINE,
        database::connect(&format!("mysql://root@{CLOSED_ADDR}/app")),
    )
    .await
    .expect("database connect must not retry")
    .unwrap_err();

    match err {
        ConnectionError::Open {
            stage: Stage::Database,
            source,
        } => {
            let source = source
                .downcast_ref::<sqlx::Error>()
                .expect("sqlx error source");
            assert!(matches!(source, sqlx::Error::Io(_)), "got {source:?}");
        }
        other => panic!("expected database open error, got {other:?}"),
    }
}

#[tokio::test]
async fn cache_refusal_fails_without_backoff() {
    let err = timeout(DEADLINE, cache::connect(CLOSED_ADDR, "", 0))
        .await
        .expect("cache connect must not back off")
        .unwrap_err();

    match err {
        ConnectionError::Open {
            stage: Stage::Cache,
            source,
        } => {
            let source = source
                .downcast_ref::<redis::RedisError>()
                .expect("redis error source");
            assert!(source.is_connection_refusal(), "got {source:?}");
        }
        other => panic!("expected cache open error, got {other:?}"),
    }
}

#[tokio::test]
async fn broker_refusal_fails_fast() {
    let err = timeout(
        DEADLINE,
        broker::connect(&format!("amqp://guest:guest@{CLOSED_ADDR}/%2f")),
    )
    .await
    .expect("broker connect must not retry")
    .unwrap_err();

    assert!(
        matches!(
            err,
            ConnectionError::Open {
                stage: Stage::Broker,
                ..
            }
        ),
        "got {err:?}"
    );
}

#[tokio::test]
async fn live_boot_stops_at_unreachable_database() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("config.yaml"), config_with_closed_ports())
        .expect("write config");

    let err = timeout(
        DEADLINE,
        boot(&ConfigLoader::with_dir(dir.path()), &LiveConnectors),
    )
    .await
    .expect("boot must fail within the deadline")
    .unwrap_err();

    assert_eq!(err.stage(), Some(Stage::Database), "got {err:?}");
}

/// Stands in for the database so the live cache connector is reached.
struct HeldDatabase {
    released: Arc<Mutex<bool>>,
}

#[async_trait]
impl Release for HeldDatabase {
    fn stage(&self) -> Stage {
        Stage::Database
    }

    async fn release(self: Box<Self>) -> Result<(), ReleaseError> {
        *self.released.lock().expect("release flag") = true;
        Ok(())
    }
}

#[derive(Default)]
struct LiveAfterDatabase {
    database_released: Arc<Mutex<bool>>,
    broker_dialed: Arc<Mutex<bool>>,
}

#[async_trait]
impl Connectors for LiveAfterDatabase {
    async fn database(
        &self,
        _dsn: &str,
    ) -> Result<Box<dyn Release>, ConnectionError> {
        Ok(Box::new(HeldDatabase {
            released: self.database_released.clone(),
        }))
    }

    async fn cache(
        &self,
        addr: &str,
        password: &str,
        index: i64,
    ) -> Result<Box<dyn Release>, ConnectionError> {
        LiveConnectors.cache(addr, password, index).await
    }

    async fn broker(
        &self,
        url: &str,
    ) -> Result<Box<dyn Release>, ConnectionError> {
        *self.broker_dialed.lock().expect("broker flag") = true;
        LiveConnectors.broker(url).await
    }
}

#[tokio::test]
async fn live_cache_refusal_skips_broker_and_releases_database() {
    let dir = tempdir().expect("tempdir");
    fs::write(dir.path().join("config.yaml"), config_with_closed_ports())
        .expect("write config");
    let connectors = LiveAfterDatabase::default();

    let err = timeout(
        DEADLINE,
        boot(&ConfigLoader::with_dir(dir.path()), &connectors),
    )
    .await
    .expect("boot must fail within the deadline")
    .unwrap_err();

    assert!(
        matches!(
            err,
            BootstrapError::Connection(ConnectionError::Open {
                stage: Stage::Cache,
                ..
            })
        ),
        "got {err:?}"
    );
    assert!(!*connectors.broker_dialed.lock().expect("broker flag"));
    assert!(*connectors.database_released.lock().expect("release flag"));
}
