//! Axis-aligned rectangles and the overlap test
//!
//! Every body in the world, static or moving, is a `Rect`. `y` grows downward,
//! so `top` is the smaller y and `bottom` the larger.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box: top-left corner plus size
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        debug_assert!(w >= 0.0 && h >= 0.0, "negative size {w}x{h}");
        Self { x, y, w, h }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Same size, moved horizontally
    pub fn with_x(self, x: f32) -> Self {
        Self { x, ..self }
    }

    /// Same size, moved vertically
    pub fn with_y(self, y: f32) -> Self {
        Self { y, ..self }
    }
}

/// Strict AABB overlap. Rectangles that only share an edge do not collide.
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.bottom() > b.top() && a.top() < b.bottom() && a.right() > b.left() && a.left() < b.right()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlap_basic() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(overlaps(&a, &Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(overlaps(&a, &Rect::new(2.0, 2.0, 2.0, 2.0)));
        assert!(!overlaps(&a, &Rect::new(20.0, 0.0, 5.0, 5.0)));
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!overlaps(&a, &Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!overlaps(&a, &Rect::new(0.0, 10.0, 10.0, 10.0)));
        assert!(!overlaps(&a, &Rect::new(-10.0, 0.0, 10.0, 10.0)));
        assert!(!overlaps(&a, &Rect::new(0.0, -10.0, 10.0, 10.0)));
    }

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(4.0, 8.0, 16.0, 32.0);
        assert_eq!(r.right(), 20.0);
        assert_eq!(r.bottom(), 40.0);
        assert_eq!(r.center_x(), 12.0);
        assert_eq!(r.with_y(0.0).bottom(), 32.0);
    }

    fn rect() -> impl Strategy<Value = Rect> {
        (-500.0f32..500.0, -500.0f32..500.0, 0.0f32..100.0, 0.0f32..100.0)
            .prop_map(|(x, y, w, h)| Rect::new(x, y, w, h))
    }

    proptest! {
        #[test]
        fn overlap_is_symmetric(a in rect(), b in rect()) {
            prop_assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
        }

        #[test]
        fn side_by_side_never_collide(a in rect(), y in -500.0f32..500.0, w in 0.0f32..100.0, h in 0.0f32..100.0) {
            let b = Rect::new(a.right(), y, w, h);
            prop_assert!(!overlaps(&a, &b));
            prop_assert!(!overlaps(&b, &a));
        }

        #[test]
        fn solid_rect_overlaps_itself(x in -500.0f32..500.0, y in -500.0f32..500.0, w in 1.0f32..100.0, h in 1.0f32..100.0) {
            let a = Rect::new(x, y, w, h);
            prop_assert!(overlaps(&a, &a));
        }
    }
}
