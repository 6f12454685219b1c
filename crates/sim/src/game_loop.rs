//! Fixed-rate tick loop.

use crate::config::Config;
use crate::world::World;
use std::time::Duration;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Run the simulation until the configured tick count or Ctrl-C.
///
/// Returns the number of ticks processed.
pub async fn run(config: Config) -> anyhow::Result<u64> {
    let mut world = World::from_config(&config)?;
    info!(
        "World initialized: {} bodies in {:?}, tree max_objects={} max_levels={}",
        world.bodies.len(),
        world.border,
        config.tree.max_objects,
        config.tree.max_levels
    );

    let tick_interval_ms = config.sim.tick_interval_ms;
    let period = Duration::from_millis(tick_interval_ms);
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let report_every = config.sim.report_every.max(1);
    let tick_budget = tick_interval_ms as f64 * 0.9;
    let mut tick_count = 0u64;
    let mut update_time_avg = 0.0f64;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            result = &mut shutdown => {
                result?;
                info!("Received Ctrl-C, stopping after {} ticks", tick_count);
                break;
            }
        }

        tick_count += 1;
        let stats = world.tick();
        let tick_ms = stats.elapsed.as_secs_f64() * 1000.0;
        update_time_avg = update_time_avg * 0.5 + tick_ms * 0.5;

        debug!(
            "Tick #{}: {} contacts ({} overlap), {} blocked",
            tick_count, stats.contacts, stats.overlap_area, stats.blocked
        );

        if tick_ms > tick_budget {
            warn!(
                "Slow tick #{}: {:.3}ms (budget: {:.1}ms) - {} bodies, {} nodes",
                tick_count, tick_ms, tick_budget, stats.bodies, stats.nodes
            );
        }

        if tick_count % report_every == 0 {
            info!(
                "Tick #{}: {} bodies, {} contacts, {} nodes (depth {}), avg {:.3}ms",
                tick_count, stats.bodies, stats.contacts, stats.nodes, stats.depth, update_time_avg
            );
        }

        if config.sim.ticks != 0 && tick_count >= config.sim.ticks {
            info!("Finished {} ticks", tick_count);
            break;
        }
    }

    Ok(tick_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_stops_after_tick_count() {
        let mut config = Config::default();
        config.sim.bodies = 100;
        config.sim.ticks = 5;
        config.sim.seed = Some(3);

        assert_eq!(run(config).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_run_rejects_invalid_config() {
        let mut config = Config::default();
        config.world.width = 10;
        config.sim.ticks = 1;

        let err = run(config).await.unwrap_err();
        assert!(err.to_string().contains("sim.max_size"), "{err}");
    }
}
