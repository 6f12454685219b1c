//! Quadtree tuning.

use serde::{Deserialize, Serialize};

/// Tunables copied into every node of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct TreeConfig {
    /// Members a node holds before it tries to push them into children.
    #[serde(default = "default_max_objects")]
    pub max_objects: usize,
    /// Deepest level that may exist. Nodes at this level never split.
    #[serde(default = "default_max_levels")]
    pub max_levels: u32,
}

impl TreeConfig {
    pub const fn new(max_objects: usize, max_levels: u32) -> Self {
        Self { max_objects, max_levels }
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_objects: default_max_objects(),
            max_levels: default_max_levels(),
        }
    }
}

const fn default_max_objects() -> usize {
    10
}
const fn default_max_levels() -> u32 {
    10
}
