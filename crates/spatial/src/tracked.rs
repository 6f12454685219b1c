//! How the tree sees the objects it indexes.
//!
//! The tree never stores boxes. It stores handles and asks a [`BoxSource`]
//! for the current box whenever it needs one.

use crate::Rect;
use std::collections::HashMap;
use std::hash::Hash;

/// An object with a current axis-aligned collision box.
pub trait Tracked {
    /// Current world-space bounds. Called on every insert and query.
    fn collision_box(&self) -> Rect;
}

impl<T: Tracked + ?Sized> Tracked for &T {
    #[inline]
    fn collision_box(&self) -> Rect {
        (**self).collision_box()
    }
}

/// Resolves a handle to the current box of the object behind it.
///
/// Returns `None` for handles the table no longer knows about.
pub trait BoxSource<H> {
    fn collision_box(&self, handle: H) -> Option<Rect>;
}

impl<T: Tracked> BoxSource<usize> for [T] {
    #[inline]
    fn collision_box(&self, handle: usize) -> Option<Rect> {
        self.get(handle).map(Tracked::collision_box)
    }
}

impl<T: Tracked> BoxSource<usize> for Vec<T> {
    #[inline]
    fn collision_box(&self, handle: usize) -> Option<Rect> {
        self.as_slice().collision_box(handle)
    }
}

impl<K, T> BoxSource<K> for HashMap<K, T>
where
    K: Copy + Eq + Hash,
    T: Tracked,
{
    #[inline]
    fn collision_box(&self, handle: K) -> Option<Rect> {
        self.get(&handle).map(Tracked::collision_box)
    }
}

impl<H, S: BoxSource<H> + ?Sized> BoxSource<H> for &S {
    #[inline]
    fn collision_box(&self, handle: H) -> Option<Rect> {
        (**self).collision_box(handle)
    }
}
