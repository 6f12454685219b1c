//! Quadtree box simulation.

use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("quadsim v{}", env!("CARGO_PKG_VERSION"));

    let path = std::env::args().nth(1).unwrap_or_else(|| "config.toml".to_string());
    let config = sim::Config::load(&path)?;
    info!("Loaded configuration from {}", path);
    info!("  World: {}x{}", config.world.width, config.world.height);
    info!("  Bodies: {}", config.sim.bodies);
    info!("  Tick: {}ms", config.sim.tick_interval_ms);
    if config.sim.follow_focus {
        info!("  Following focus with a {}x{} index", config.sim.view_width, config.sim.view_height);
    }

    sim::run(config).await?;

    Ok(())
}
