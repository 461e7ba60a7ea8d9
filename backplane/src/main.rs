use backplane::{boot, connectors::LiveConnectors, logging};
use backplane_config::ConfigLoader;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    logging::init();

    let shutdown = match boot(&ConfigLoader::new(), &LiveConnectors).await {
        Ok(shutdown) => shutdown,
        Err(err) => {
            match err.stage() {
                Some(stage) => error!(stage = %stage, "bootstrap failed"),
                None => error!("bootstrap failed"),
            }
            return Err(err.into());
        }
    };

    info!(released = ?shutdown.released, "all connections released");
    Ok(())
}
