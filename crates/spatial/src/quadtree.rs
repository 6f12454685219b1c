//! QuadTree for broad-phase collision queries.
//!
//! Every node is itself a `QuadTree`. A node holds a list of member handles
//! and, once split, exactly four children. Members only move into a child
//! when their box fits wholly inside that child's quadrant, so an object
//! that straddles a midline stays at the node where it straddles.

use crate::{BoxSource, Rect, TreeConfig};
use glam::IVec2;
use std::fmt;
use tracing::trace;

/// One of the four child slots of a split node.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    TopRight = 0,
    TopLeft = 1,
    BottomLeft = 2,
    BottomRight = 3,
}

impl Quadrant {
    /// All quadrants in child index order.
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopRight,
        Quadrant::TopLeft,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// A quadtree node over handles of type `H`.
pub struct QuadTree<H> {
    config: TreeConfig,
    level: u32,
    bounds: Rect,
    members: Vec<H>,
    /// Present iff the node is split.
    children: Option<Box<[QuadTree<H>; 4]>>,
}

impl<H: Copy + PartialEq> QuadTree<H> {
    /// Create a root node covering `bounds`.
    pub fn new(bounds: Rect, config: TreeConfig) -> Self {
        Self::with_level(0, bounds, config)
    }

    /// Create a node at an explicit depth.
    pub fn with_level(level: u32, bounds: Rect, config: TreeConfig) -> Self {
        Self {
            config,
            level,
            bounds,
            members: Vec::new(),
            children: None,
        }
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[inline]
    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    #[inline]
    pub fn config(&self) -> TreeConfig {
        self.config
    }

    /// Handles held directly at this node.
    #[inline]
    pub fn members(&self) -> &[H] {
        &self.members
    }

    #[inline]
    pub fn children(&self) -> Option<&[QuadTree<H>; 4]> {
        self.children.as_deref()
    }

    #[inline]
    pub fn is_split(&self) -> bool {
        self.children.is_some()
    }

    /// Remove every member from this node and all descendants.
    ///
    /// Children are kept: a split node stays split.
    pub fn clear(&mut self) {
        self.members.clear();
        if let Some(children) = self.children.as_deref_mut() {
            for child in children {
                child.clear();
            }
        }
    }

    /// Clear, then move the whole subtree so this node's center is `center`.
    pub fn clear_and_set_center(&mut self, center: IVec2) {
        let delta = center.saturating_sub(self.bounds.center());
        self.clear_and_offset(delta);
    }

    fn clear_and_offset(&mut self, delta: IVec2) {
        self.members.clear();
        self.bounds.translate(delta);
        if let Some(children) = self.children.as_deref_mut() {
            for child in children {
                child.clear_and_offset(delta);
            }
        }
    }

    /// Which child quadrant wholly contains `rect`, if any.
    ///
    /// A rect that touches or crosses either midline fits no quadrant.
    pub fn classify(&self, rect: &Rect) -> Option<Quadrant> {
        let mid = self.bounds.center();
        let (mid_x, mid_y) = (mid.x as i64, mid.y as i64);
        let (x, y) = (rect.x as i64, rect.y as i64);

        let top = y < mid_y && rect.bottom_wide() < mid_y;
        let bottom = y >= mid_y;
        let left = x < mid_x && rect.right_wide() < mid_x;
        let right = x >= mid_x;

        match (top, bottom, left, right) {
            (true, _, _, true) => Some(Quadrant::TopRight),
            (true, _, true, _) => Some(Quadrant::TopLeft),
            (_, true, true, _) => Some(Quadrant::BottomLeft),
            (_, true, _, true) => Some(Quadrant::BottomRight),
            _ => None,
        }
    }

    /// Create the four children. No-op if already split.
    fn split(&mut self) {
        if self.children.is_some() {
            return;
        }

        let level = self.level + 1;
        let config = self.config;
        let [tr, tl, bl, br] = self.bounds.quadrants();
        self.children = Some(Box::new([
            QuadTree::with_level(level, tr, config),
            QuadTree::with_level(level, tl, config),
            QuadTree::with_level(level, bl, config),
            QuadTree::with_level(level, br, config),
        ]));
    }

    /// Insert `handle` at the deepest node whose quadrant holds its box.
    ///
    /// A handle `source` can't resolve is kept like a straddling object.
    pub fn insert<S>(&mut self, handle: H, source: &S)
    where
        S: BoxSource<H> + ?Sized,
    {
        if let Some(rect) = source.collision_box(handle) {
            let quadrant = self.classify(&rect);
            if let (Some(children), Some(quadrant)) = (self.children.as_deref_mut(), quadrant) {
                children[quadrant.index()].insert(handle, source);
                return;
            }
        }

        self.members.push(handle);

        if self.members.len() > self.config.max_objects && self.level < self.config.max_levels {
            self.split();
            self.redistribute(source);
        }
    }

    /// Push every member that now fits a child quadrant down into it.
    fn redistribute<S>(&mut self, source: &S)
    where
        S: BoxSource<H> + ?Sized,
    {
        let mut moving = Vec::new();
        let members = std::mem::take(&mut self.members);
        for handle in members {
            let quadrant = source
                .collision_box(handle)
                .and_then(|rect| self.classify(&rect));
            match quadrant {
                Some(quadrant) => moving.push((quadrant, handle)),
                None => self.members.push(handle),
            }
        }

        if moving.is_empty() {
            return;
        }

        trace!(
            "Node at level {} {:?}: moving {} of {} members into children",
            self.level,
            self.bounds,
            moving.len(),
            moving.len() + self.members.len()
        );

        if let Some(children) = self.children.as_deref_mut() {
            for (quadrant, handle) in moving {
                children[quadrant.index()].insert(handle, source);
            }
        }
    }

    /// Find every indexed object whose box overlaps `subject`'s box moved
    /// by `offset`. `subject` itself is never returned.
    pub fn query<S>(&self, subject: H, offset: IVec2, source: &S) -> Vec<H>
    where
        S: BoxSource<H> + ?Sized,
    {
        let mut found = Vec::new();
        self.query_into(subject, offset, source, &mut found);
        found
    }

    /// Like [`query`](Self::query), appending results to `out`.
    pub fn query_into<S>(&self, subject: H, offset: IVec2, source: &S, out: &mut Vec<H>)
    where
        S: BoxSource<H> + ?Sized,
    {
        if let Some(rect) = source.collision_box(subject) {
            self.collect(&rect.translated(offset), Some(subject), source, out);
        }
    }

    /// Find every indexed object whose box overlaps `rect`.
    pub fn query_rect<S>(&self, rect: &Rect, source: &S) -> Vec<H>
    where
        S: BoxSource<H> + ?Sized,
    {
        let mut found = Vec::new();
        self.collect(rect, None, source, &mut found);
        found
    }

    fn collect<S>(&self, check: &Rect, exclude: Option<H>, source: &S, out: &mut Vec<H>)
    where
        S: BoxSource<H> + ?Sized,
    {
        if let Some(children) = self.children.as_deref() {
            match self.classify(check) {
                Some(quadrant) => children[quadrant.index()].collect(check, exclude, source, out),
                None => {
                    for child in children {
                        child.collect(check, exclude, source, out);
                    }
                }
            }
        }

        for &handle in &self.members {
            if exclude == Some(handle) {
                continue;
            }
            if source
                .collision_box(handle)
                .is_some_and(|rect| rect.intersects(check))
            {
                out.push(handle);
            }
        }
    }

    /// Number of handles stored in this subtree.
    pub fn len(&self) -> usize {
        self.members.len() + self.iter_children().map(QuadTree::len).sum::<usize>()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self.iter_children().map(QuadTree::node_count).sum::<usize>()
    }

    /// Deepest level reached below (or at) this node.
    pub fn depth(&self) -> u32 {
        self.iter_children()
            .map(QuadTree::depth)
            .max()
            .unwrap_or(self.level)
    }

    /// Every stored handle, depth-first with a node's own members first.
    pub fn handles(&self) -> Vec<H> {
        let mut out = Vec::with_capacity(self.len());
        self.collect_handles(&mut out);
        out
    }

    fn collect_handles(&self, out: &mut Vec<H>) {
        out.extend_from_slice(&self.members);
        for child in self.iter_children() {
            child.collect_handles(out);
        }
    }

    #[inline]
    fn iter_children(&self) -> impl Iterator<Item = &QuadTree<H>> {
        self.children.as_deref().into_iter().flatten()
    }
}

impl<H> fmt::Debug for QuadTree<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuadTree")
            .field("level", &self.level)
            .field("bounds", &self.bounds)
            .field("members", &self.members.len())
            .field("split", &self.children.is_some())
            .finish()
    }
}
