//! World state management.
//!
//! Owns every body and the quadtree that indexes them. The tree is rebuilt
//! from scratch at the start of each tick.

use crate::collision::{check_box_collision, Contact};
use crate::config::Config;
use crate::error::ConfigError;
use fixedbitset::FixedBitSet;
use glam::IVec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spatial::{QuadTree, Rect, Tracked, TreeConfig};
use std::time::{Duration, Instant};

/// A moving box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    pub id: u32,
    /// Top-left corner in world coordinates.
    pub position: IVec2,
    pub size: IVec2,
    /// Displacement per tick.
    pub velocity: IVec2,
}

impl Tracked for Body {
    #[inline]
    fn collision_box(&self) -> Rect {
        Rect::new(self.position.x, self.position.y, self.size.x, self.size.y)
    }
}

/// Per-tick counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickStats {
    pub bodies: usize,
    pub contacts: usize,
    /// Total overlapping area over all contacts.
    pub overlap_area: i64,
    /// Bodies whose move was cancelled this tick.
    pub blocked: usize,
    pub nodes: usize,
    pub depth: u32,
    pub elapsed: Duration,
}

/// The simulated world.
#[derive(Debug)]
pub struct World {
    /// Bodies, indexed by handle.
    pub bodies: Vec<Body>,
    /// Bodies bounce off this rect.
    pub border: Rect,
    tree: QuadTree<usize>,
    /// Recentre the index on the first body before each rebuild.
    follow_focus: bool,
    next_id: u32,
    /// Reusable query buffer.
    scratch: Vec<usize>,
}

impl World {
    /// Create an empty world. `index_bounds` is the region the tree covers.
    pub fn new(border: Rect, index_bounds: Rect, tree: TreeConfig, follow_focus: bool) -> Self {
        Self {
            bodies: Vec::new(),
            border,
            tree: QuadTree::new(index_bounds, tree),
            follow_focus,
            next_id: 1,
            scratch: Vec::with_capacity(64),
        }
    }

    /// Build a world from configuration and spawn its bodies.
    ///
    /// Fails if `config` doesn't pass [`Config::validate`].
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let border = Rect::from_center(
            IVec2::ZERO,
            IVec2::new(config.world.width / 2, config.world.height / 2),
        );
        let sim = &config.sim;
        let index_bounds = if sim.follow_focus {
            Rect::from_center(IVec2::ZERO, IVec2::new(sim.view_width / 2, sim.view_height / 2))
        } else {
            border
        };

        let mut world = Self::new(border, index_bounds, config.tree, sim.follow_focus);
        let mut rng = match sim.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        world.spawn_bodies(&mut rng, sim.bodies, sim.min_size, sim.max_size, sim.max_speed);
        Ok(world)
    }

    /// The quadtree as of the last rebuild.
    #[inline]
    pub fn tree(&self) -> &QuadTree<usize> {
        &self.tree
    }

    /// Add a body and return its handle.
    pub fn add_body(&mut self, position: IVec2, size: IVec2, velocity: IVec2) -> usize {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        self.bodies.push(Body {
            id,
            position,
            size,
            velocity,
        });
        self.bodies.len() - 1
    }

    /// Spawn `count` bodies at random positions inside the border.
    pub fn spawn_bodies(&mut self, rng: &mut impl Rng, count: usize, min_size: i32, max_size: i32, max_speed: i32) {
        self.bodies.reserve(count);
        for _ in 0..count {
            let size = IVec2::new(
                rng.random_range(min_size..=max_size),
                rng.random_range(min_size..=max_size),
            );
            let position = IVec2::new(
                rng.random_range(self.border.left()..=self.border.right() - size.x),
                rng.random_range(self.border.top()..=self.border.bottom() - size.y),
            );
            let velocity = IVec2::new(
                rng.random_range(-max_speed..=max_speed),
                rng.random_range(-max_speed..=max_speed),
            );
            self.add_body(position, size, velocity);
        }
    }

    /// Center of the first body, which the index follows when enabled.
    pub fn focus(&self) -> Option<IVec2> {
        self.bodies.first().map(|body| body.collision_box().center())
    }

    /// Empty the index and reinsert every body at its current position.
    pub fn rebuild_index(&mut self) {
        match self.focus().filter(|_| self.follow_focus) {
            Some(center) => self.tree.clear_and_set_center(center),
            None => self.tree.clear(),
        }
        for handle in 0..self.bodies.len() {
            self.tree.insert(handle, &self.bodies);
        }
    }

    /// Every overlapping pair, each reported once.
    pub fn contacts(&mut self) -> Vec<Contact> {
        let mut processed = FixedBitSet::with_capacity(self.bodies.len());
        let mut contacts = Vec::new();

        for a in 0..self.bodies.len() {
            processed.insert(a);
            self.scratch.clear();
            self.tree.query_into(a, IVec2::ZERO, &self.bodies, &mut self.scratch);

            let a_box = self.bodies[a].collision_box();
            for &b in &self.scratch {
                if processed.contains(b) {
                    continue;
                }
                if let Some(contact) = check_box_collision(a, &a_box, b, &self.bodies[b].collision_box()) {
                    contacts.push(contact);
                }
            }
        }

        contacts
    }

    /// Advance every body by its velocity.
    ///
    /// A body whose next box would overlap another indexed body reverses
    /// instead of moving. Returns the number of reversed bodies.
    pub fn step(&mut self) -> usize {
        let mut blocked = FixedBitSet::with_capacity(self.bodies.len());
        for handle in 0..self.bodies.len() {
            let velocity = self.bodies[handle].velocity;
            if velocity == IVec2::ZERO {
                continue;
            }
            self.scratch.clear();
            self.tree.query_into(handle, velocity, &self.bodies, &mut self.scratch);
            if !self.scratch.is_empty() {
                blocked.insert(handle);
            }
        }

        let border = self.border;
        for (handle, body) in self.bodies.iter_mut().enumerate() {
            if blocked.contains(handle) {
                body.velocity = -body.velocity;
                continue;
            }
            body.position += body.velocity;
            bounce(body, &border);
        }

        blocked.count_ones(..)
    }

    /// Rebuild the index, gather contacts, then move.
    pub fn tick(&mut self) -> TickStats {
        let start = Instant::now();

        self.rebuild_index();
        let contacts = self.contacts();
        let blocked = self.step();

        TickStats {
            bodies: self.bodies.len(),
            contacts: contacts.len(),
            overlap_area: contacts.iter().map(Contact::area).sum(),
            blocked,
            nodes: self.tree.node_count(),
            depth: self.tree.depth(),
            elapsed: start.elapsed(),
        }
    }
}

/// Keep `body` inside `border`, reflecting velocity off any wall it crossed.
fn bounce(body: &mut Body, border: &Rect) {
    if body.position.x < border.left() {
        body.position.x = border.left();
        body.velocity.x = body.velocity.x.abs();
    } else if body.position.x + body.size.x > border.right() {
        body.position.x = border.right() - body.size.x;
        body.velocity.x = -body.velocity.x.abs();
    }

    if body.position.y < border.top() {
        body.position.y = border.top();
        body.velocity.y = body.velocity.y.abs();
    } else if body.position.y + body.size.y > border.bottom() {
        body.position.y = border.bottom() - body.size.y;
        body.velocity.y = -body.velocity.y.abs();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_world() -> World {
        let border = Rect::new(0, 0, 200, 200);
        World::new(border, border, TreeConfig::new(2, 4), false)
    }

    #[test]
    fn test_contacts_reported_once() {
        let mut world = small_world();
        world.add_body(IVec2::new(10, 10), IVec2::new(20, 20), IVec2::ZERO);
        world.add_body(IVec2::new(20, 20), IVec2::new(20, 20), IVec2::ZERO);
        world.add_body(IVec2::new(25, 15), IVec2::new(20, 20), IVec2::ZERO);
        world.add_body(IVec2::new(150, 150), IVec2::new(10, 10), IVec2::ZERO);

        world.rebuild_index();
        let mut pairs: Vec<(usize, usize)> = world.contacts().iter().map(|c| (c.a, c.b)).collect();
        pairs.sort_unstable();

        assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 2)]);
    }

    #[test]
    fn test_contacts_match_brute_force() {
        let mut world = small_world();
        let mut rng = StdRng::seed_from_u64(21);
        world.spawn_bodies(&mut rng, 150, 4, 20, 3);
        world.rebuild_index();

        let mut found: Vec<(usize, usize)> = world.contacts().iter().map(|c| (c.a, c.b)).collect();
        found.sort_unstable();

        let mut expected = Vec::new();
        for a in 0..world.bodies.len() {
            for b in a + 1..world.bodies.len() {
                if world.bodies[a].collision_box().intersects(&world.bodies[b].collision_box()) {
                    expected.push((a, b));
                }
            }
        }
        assert_eq!(found, expected);
    }

    #[test]
    fn test_step_blocks_speculative_hit() {
        let mut world = small_world();
        let mover = world.add_body(IVec2::new(10, 10), IVec2::new(10, 10), IVec2::new(8, 0));
        world.add_body(IVec2::new(25, 10), IVec2::new(10, 10), IVec2::ZERO);
        let free = world.add_body(IVec2::new(100, 100), IVec2::new(10, 10), IVec2::new(0, 5));

        world.rebuild_index();
        assert_eq!(world.step(), 1);

        assert_eq!(world.bodies[mover].position, IVec2::new(10, 10));
        assert_eq!(world.bodies[mover].velocity, IVec2::new(-8, 0));
        assert_eq!(world.bodies[free].position, IVec2::new(100, 105));
    }

    #[test]
    fn test_bounce_off_border() {
        let mut world = small_world();
        let body = world.add_body(IVec2::new(185, 2), IVec2::new(10, 10), IVec2::new(9, -5));

        world.rebuild_index();
        world.step();

        assert_eq!(world.bodies[body].position, IVec2::new(190, 0));
        assert_eq!(world.bodies[body].velocity, IVec2::new(-9, 5));
    }

    #[test]
    fn test_follow_focus_recentres_index() {
        let border = Rect::new(-500, -500, 1000, 1000);
        let view = Rect::from_center(IVec2::ZERO, IVec2::new(100, 100));
        let mut world = World::new(border, view, TreeConfig::new(2, 4), true);
        world.add_body(IVec2::new(295, -105), IVec2::new(10, 10), IVec2::ZERO);
        world.add_body(IVec2::new(-400, 400), IVec2::new(10, 10), IVec2::ZERO);

        world.rebuild_index();
        assert_eq!(world.tree().bounds().center(), IVec2::new(300, -100));
        assert_eq!(world.tree().len(), 2);
    }

    #[test]
    fn test_tick_from_config() {
        let mut config = Config::default();
        config.world.width = 800;
        config.world.height = 600;
        config.sim.bodies = 300;
        config.sim.seed = Some(5);

        let mut world = World::from_config(&config).unwrap();
        assert_eq!(world.bodies.len(), 300);
        assert!(world.bodies.iter().all(|b| world.border.contains_rect(&b.collision_box())));

        for _ in 0..20 {
            let stats = world.tick();
            assert_eq!(stats.bodies, 300);
            assert!(stats.nodes >= 1);
            assert!(stats.depth <= config.tree.max_levels);
        }
        assert!(world.bodies.iter().all(|b| world.border.contains_rect(&b.collision_box())));
    }

    #[test]
    fn test_seeded_worlds_match() {
        let mut config = Config::default();
        config.sim.bodies = 40;
        config.sim.seed = Some(77);

        let a = World::from_config(&config).unwrap();
        let b = World::from_config(&config).unwrap();
        assert_eq!(a.bodies, b.bodies);
    }

    #[test]
    fn test_from_config_rejects_invalid() {
        let mut config = Config::default();
        config.world.width = 10;
        assert!(config.validate().is_err());

        assert!(matches!(
            World::from_config(&config),
            Err(ConfigError::Invalid { field: "sim.max_size", .. })
        ));
    }
}
