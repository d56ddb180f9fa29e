//! Screen geometry.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    #[must_use]
    pub const fn new(x: i32, y: i32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Centre point, where pointer actions land.
    #[must_use]
    pub fn center(&self) -> (i32, i32) {
        let half_w = i32::try_from(self.w / 2).unwrap_or(i32::MAX);
        let half_h = i32::try_from(self.h / 2).unwrap_or(i32::MAX);
        (self.x.saturating_add(half_w), self.y.saturating_add(half_h))
    }

    /// Whether `other` lies entirely within `self`.
    #[must_use]
    pub fn contains(&self, other: &Rect) -> bool {
        let right = i64::from(self.x) + i64::from(self.w);
        let bottom = i64::from(self.y) + i64::from(self.h);
        let other_right = i64::from(other.x) + i64::from(other.w);
        let other_bottom = i64::from(other.y) + i64::from(other.h);
        other.x >= self.x && other.y >= self.y && other_right <= right && other_bottom <= bottom
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.w, self.h, self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_compute_center_of_rect() {
        let rect = Rect::new(10, 20, 100, 50);
        assert_eq!(rect.center(), (60, 45));
    }

    #[test]
    fn should_contain_itself() {
        let rect = Rect::new(0, 0, 10, 10);
        assert!(rect.contains(&rect));
    }

    #[test]
    fn should_contain_inner_rect() {
        let outer = Rect::new(0, 0, 100, 100);
        let inner = Rect::new(10, 10, 20, 20);
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
    }

    #[test]
    fn should_not_contain_overlapping_rect() {
        let a = Rect::new(0, 0, 50, 50);
        let b = Rect::new(40, 40, 20, 20);
        assert!(!a.contains(&b));
    }

    #[test]
    fn should_display_geometry_string() {
        assert_eq!(Rect::new(5, 6, 7, 8).to_string(), "7x8+5+6");
    }
}
