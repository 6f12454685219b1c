//! Narrow-phase checks for the pairs the quadtree hands back.

use glam::IVec2;
use spatial::Rect;

/// Two overlapping bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    /// First body handle (always the smaller one).
    pub a: usize,
    /// Second body handle.
    pub b: usize,
    /// Overlap extent along each axis, both components positive.
    pub overlap: IVec2,
}

impl Contact {
    /// Overlapping area.
    #[inline]
    pub fn area(&self) -> i64 {
        self.overlap.x as i64 * self.overlap.y as i64
    }

    /// Smallest translation that moves `b` out of `a`.
    pub fn push(&self, a_box: &Rect, b_box: &Rect) -> IVec2 {
        let a_center = a_box.center();
        let b_center = b_box.center();
        if self.overlap.x <= self.overlap.y {
            let dir = if b_center.x >= a_center.x { 1 } else { -1 };
            IVec2::new(dir * self.overlap.x, 0)
        } else {
            let dir = if b_center.y >= a_center.y { 1 } else { -1 };
            IVec2::new(0, dir * self.overlap.y)
        }
    }
}

/// Check two boxes for overlap.
/// Returns contact data only if they share positive area.
#[inline]
pub fn check_box_collision(a: usize, a_box: &Rect, b: usize, b_box: &Rect) -> Option<Contact> {
    if !a_box.intersects(b_box) {
        return None;
    }

    let overlap = IVec2::new(
        a_box.right().min(b_box.right()) - a_box.left().max(b_box.left()),
        a_box.bottom().min(b_box.bottom()) - a_box.top().max(b_box.top()),
    );
    let (a, b) = if a <= b { (a, b) } else { (b, a) };
    Some(Contact { a, b, overlap })
}
