use backplane_config::{
    ConfigLoader, DatabaseConfig, RabbitMqConfig, RedisConfig, Settings,
};
use tracing::{info, warn};

use crate::{
    connectors::Connectors,
    errors::{BootstrapError, Stage},
    release::ReleaseStack,
};

/// Outcome of a clean run: the stages released, in release order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shutdown {
    pub released: Vec<Stage>,
}

/// Connects database, cache and broker in that order, then releases them
/// in reverse.
#[derive(Debug)]
pub struct Bootstrap<'a> {
    settings: &'a Settings,
}

impl<'a> Bootstrap<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Run the full connect/release cycle.
    ///
    /// The first failing stage stops the sequence. Handles acquired before
    /// the failure are released, newest first, before the error is returned.
    pub async fn run<C>(
        &self,
        connectors: &C,
    ) -> Result<Shutdown, BootstrapError>
    where
        C: Connectors + ?Sized,
    {
        let mut stack = ReleaseStack::default();

        if let Err(err) = self.acquire(connectors, &mut stack).await {
            if !stack.is_empty() {
                info!(
                    held = stack.len(),
                    "releasing connections after failed bootstrap"
                );
            }
            if let Err(failures) = stack.release_all().await {
                for failure in &failures {
                    warn!(
                        stage = %failure.stage,
                        error = %failure.source,
                        "release failed while unwinding bootstrap"
                    );
                }
            }
            return Err(err);
        }

        info!(stages = ?stack.stages(), "all connections established");

        let released =
            stack.release_all().await.map_err(BootstrapError::Release)?;
        Ok(Shutdown { released })
    }

    async fn acquire<C>(
        &self,
        connectors: &C,
        stack: &mut ReleaseStack,
    ) -> Result<(), BootstrapError>
    where
        C: Connectors + ?Sized,
    {
        let database = DatabaseConfig::from_settings(self.settings)?;
        let dsn = database.connection_url()?;
        stack.push(connectors.database(&dsn).await?);

        let redis = RedisConfig::from_settings(self.settings)?;
        stack.push(
            connectors
                .cache(&redis.addr, &redis.password, redis.db)
                .await?,
        );

        let rabbitmq = RabbitMqConfig::from_settings(self.settings)?;
        stack.push(connectors.broker(&rabbitmq.url).await?);

        Ok(())
    }
}

/// Load the configuration through `loader`, then run the bootstrap.
///
/// A configuration failure returns before any connector is touched.
pub async fn boot<C>(
    loader: &ConfigLoader,
    connectors: &C,
) -> Result<Shutdown, BootstrapError>
where
    C: Connectors + ?Sized,
{
    let settings = loader.load()?;
    info!(dir = %loader.dir().display(), "configuration loaded");
    Bootstrap::new(&settings).run(connectors).await
}
