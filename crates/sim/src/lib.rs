//! Box simulation driven by the `spatial` quadtree.

pub mod collision;
pub mod config;
pub mod error;
pub mod game_loop;
pub mod world;

// Re-export commonly used types
pub use config::Config;
pub use error::ConfigError;
pub use game_loop::run;
pub use world::{Body, TickStats, World};
