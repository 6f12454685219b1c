//! Quadtree spatial index for broad-phase collision queries.
//!
//! This crate contains:
//! - `Rect`, the integer axis-aligned box everything is measured in
//! - The `Tracked`/`BoxSource` capabilities the tree reads boxes through
//! - `QuadTree`, the recursive index itself, and its `TreeConfig`

mod config;
mod quadtree;
mod rect;
mod tracked;

pub use config::TreeConfig;
pub use quadtree::{QuadTree, Quadrant};
pub use rect::Rect;
pub use tracked::{BoxSource, Tracked};
