//! Simulation configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use spatial::TreeConfig;
use std::path::Path;
use tracing::info;

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub tree: TreeConfig,
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub sim: SimConfig,
}

impl Config {
    /// Load configuration from `path`, writing the defaults there if the
    /// file doesn't exist yet.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let io_err = |source: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        let config = if path.exists() {
            let contents = std::fs::read_to_string(path).map_err(io_err)?;
            toml::from_str::<Config>(&contents)?
        } else {
            info!("No {} found, creating default config", path.display());
            let default_config = Self::default();
            std::fs::write(path, toml::to_string_pretty(&default_config)?).map_err(io_err)?;
            default_config
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation can't run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let world = &self.world;
        let sim = &self.sim;

        if world.width <= 0 || world.height <= 0 {
            return Err(invalid("world", format!("size must be positive, got {}x{}", world.width, world.height)));
        }
        if sim.min_size <= 0 || sim.min_size > sim.max_size {
            return Err(invalid(
                "sim.min_size",
                format!("need 0 < min_size <= max_size, got {} and {}", sim.min_size, sim.max_size),
            ));
        }
        if sim.max_size >= world.width.min(world.height) {
            return Err(invalid("sim.max_size", format!("{} does not fit inside the world", sim.max_size)));
        }
        if sim.max_speed < 0 {
            return Err(invalid("sim.max_speed", format!("must not be negative, got {}", sim.max_speed)));
        }
        if sim.tick_interval_ms == 0 {
            return Err(invalid("sim.tick_interval_ms", "must be at least 1".to_string()));
        }
        if sim.follow_focus && (sim.view_width <= 0 || sim.view_height <= 0) {
            return Err(invalid(
                "sim.view_width",
                format!("view must be positive when following, got {}x{}", sim.view_width, sim.view_height),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}

/// World border configuration. The world is centred on the origin.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WorldConfig {
    #[serde(default = "default_world_size")]
    pub width: i32,
    #[serde(default = "default_world_size")]
    pub height: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: default_world_size(),
            height: default_world_size(),
        }
    }
}

fn default_world_size() -> i32 {
    4096
}

/// Body population and tick loop settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SimConfig {
    /// Number of bodies to spawn.
    #[serde(default = "default_bodies")]
    pub bodies: usize,
    #[serde(default = "default_min_size")]
    pub min_size: i32,
    #[serde(default = "default_max_size")]
    pub max_size: i32,
    /// Largest velocity component, in units per tick.
    #[serde(default = "default_max_speed")]
    pub max_speed: i32,
    /// Tick interval in milliseconds.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    /// Ticks to run before exiting (0 = until Ctrl-C).
    #[serde(default)]
    pub ticks: u64,
    /// Recentre the index on the first body every tick.
    #[serde(default)]
    pub follow_focus: bool,
    /// Indexed region size while following.
    #[serde(default = "default_view_size")]
    pub view_width: i32,
    #[serde(default = "default_view_size")]
    pub view_height: i32,
    /// Ticks between summary log lines.
    #[serde(default = "default_report_every")]
    pub report_every: u64,
    /// Fixed RNG seed for reproducible runs.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            bodies: default_bodies(),
            min_size: default_min_size(),
            max_size: default_max_size(),
            max_speed: default_max_speed(),
            tick_interval_ms: default_tick_interval(),
            ticks: 0,
            follow_focus: false,
            view_width: default_view_size(),
            view_height: default_view_size(),
            report_every: default_report_every(),
            seed: None,
        }
    }
}

fn default_bodies() -> usize {
    2000
}
fn default_min_size() -> i32 {
    4
}
fn default_max_size() -> i32 {
    24
}
fn default_max_speed() -> i32 {
    6
}
fn default_tick_interval() -> u64 {
    40
}
fn default_view_size() -> i32 {
    2048
}
fn default_report_every() -> u64 {
    25
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.tree, TreeConfig::new(10, 10));
        assert_eq!(config.world.width, 4096);
        assert_eq!(config.sim.tick_interval_ms, 40);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [tree]
            max_objects = 4

            [sim]
            bodies = 50
            seed = 9
            "#,
        )
        .unwrap();

        assert_eq!(config.tree.max_objects, 4);
        assert_eq!(config.tree.max_levels, 10);
        assert_eq!(config.sim.bodies, 50);
        assert_eq!(config.sim.seed, Some(9));
        assert_eq!(config.world, WorldConfig::default());
    }

    #[test]
    fn test_serialize_round_trip() {
        let mut config = Config::default();
        config.sim.follow_focus = true;
        config.tree.max_levels = 6;

        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.world.width = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field: "world", .. })));

        let mut config = Config::default();
        config.sim.min_size = 30;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field: "sim.min_size", .. })));

        let mut config = Config::default();
        config.sim.tick_interval_ms = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "sim.tick_interval_ms", .. })
        ));
    }

    #[test]
    fn test_load_writes_default_file() {
        let path = std::env::temp_dir().join(format!("quadsim-config-{}.toml", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let created = Config::load(&path).unwrap();
        assert!(path.exists());
        let loaded = Config::load(&path).unwrap();
        assert_eq!(created, loaded);

        std::fs::write(&path, "[world]\nwidth = \"wide\"\n").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));

        let _ = std::fs::remove_file(&path);
    }
}
