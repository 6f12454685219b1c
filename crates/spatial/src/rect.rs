//! Axis-aligned integer rectangles.

use glam::IVec2;

/// Axis-aligned rectangle in simulation units.
///
/// `x`/`y` is the top-left corner; y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Create a rect centred on `center`, extending `half_extent` each way.
    #[inline]
    pub fn from_center(center: IVec2, half_extent: IVec2) -> Self {
        Self {
            x: center.x.saturating_sub(half_extent.x),
            y: center.y.saturating_sub(half_extent.y),
            width: half_extent.x.saturating_mul(2),
            height: half_extent.y.saturating_mul(2),
        }
    }

    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }

    /// Right edge, clamped to the `i32` range.
    #[inline]
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Bottom edge, clamped to the `i32` range.
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Exact right edge.
    #[inline]
    pub(crate) fn right_wide(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Exact bottom edge.
    #[inline]
    pub(crate) fn bottom_wide(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    #[inline]
    pub fn origin(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> IVec2 {
        IVec2::new(self.width, self.height)
    }

    /// Midpoint, rounded toward the origin corner.
    ///
    /// This is the same point the quadtree splits on.
    #[inline]
    pub fn center(&self) -> IVec2 {
        IVec2::new(
            self.x.saturating_add(self.width / 2),
            self.y.saturating_add(self.height / 2),
        )
    }

    /// Check if two rects overlap with positive extent on both axes.
    ///
    /// Touching edges don't count, and a rect with zero or negative
    /// extent never intersects anything.
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        (self.x.max(other.x) as i64) < self.right_wide().min(other.right_wide())
            && (self.y.max(other.y) as i64) < self.bottom_wide().min(other.bottom_wide())
    }

    /// Check if `other` lies inside this rect (edges inclusive).
    #[inline]
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.right_wide() <= self.right_wide()
            && other.y >= self.y
            && other.bottom_wide() <= self.bottom_wide()
    }

    #[inline]
    pub fn translated(self, delta: IVec2) -> Rect {
        Rect {
            x: self.x.saturating_add(delta.x),
            y: self.y.saturating_add(delta.y),
            ..self
        }
    }

    #[inline]
    pub fn translate(&mut self, delta: IVec2) {
        self.x = self.x.saturating_add(delta.x);
        self.y = self.y.saturating_add(delta.y);
    }

    /// Split into the four quadrants, in quadrant index order
    /// (top-right, top-left, bottom-left, bottom-right).
    ///
    /// Right and bottom quadrants take the odd unit of an odd extent.
    pub(crate) fn quadrants(&self) -> [Rect; 4] {
        let hw = self.width / 2;
        let hh = self.height / 2;
        let mid = self.center();
        [
            Rect::new(mid.x, self.y, self.width - hw, hh),
            Rect::new(self.x, self.y, hw, hh),
            Rect::new(self.x, mid.y, hw, self.height - hh),
            Rect::new(mid.x, mid.y, self.width - hw, self.height - hh),
        ]
    }
}
