//! Axis-aligned boxes for platforms and entity bounds
//!
//! World space is y-up: `top > bottom`, `right > left`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Aabb {
    pub fn new(left: f32, bottom: f32, right: f32, top: f32) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    /// Box centered on `center` with the given half extents
    pub fn from_center(center: Vec2, half: Vec2) -> Self {
        Self {
            top: center.y + half.y,
            bottom: center.y - half.y,
            left: center.x - half.x,
            right: center.x + half.x,
        }
    }

    /// Square box around a circle (the circle approximation used for entities)
    #[inline]
    pub fn around(center: Vec2, radius: f32) -> Self {
        Self::from_center(center, Vec2::splat(radius))
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new((self.left + self.right) * 0.5, (self.bottom + self.top) * 0.5)
    }

    #[inline]
    pub fn half_size(&self) -> Vec2 {
        Vec2::new((self.right - self.left) * 0.5, (self.top - self.bottom) * 0.5)
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Touching or overlapping on the x axis
    #[inline]
    pub fn overlaps_x(&self, other: &Aabb) -> bool {
        self.right >= other.left && self.left <= other.right
    }

    /// Touching or overlapping on the y axis
    #[inline]
    pub fn overlaps_y(&self, other: &Aabb) -> bool {
        self.top >= other.bottom && self.bottom <= other.top
    }

    /// Touching or overlapping on both axes
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.overlaps_x(other) && self.overlaps_y(other)
    }

    /// Overlap depth on each axis (zero or negative means separated on that axis)
    pub fn penetration(&self, other: &Aabb) -> Vec2 {
        Vec2::new(
            self.right.min(other.right) - self.left.max(other.left),
            self.top.min(other.top) - self.bottom.max(other.bottom),
        )
    }

    /// Whether the boxes share interior area deeper than `epsilon` on both axes
    pub fn penetrates(&self, other: &Aabb, epsilon: f32) -> bool {
        let depth = self.penetration(other);
        depth.x > epsilon && depth.y > epsilon
    }

    #[inline]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.bottom && point.y <= self.top
    }

    /// Mirror across the vertical axis x = 0
    pub fn mirrored_x(&self) -> Self {
        Self {
            top: self.top,
            bottom: self.bottom,
            left: -self.right,
            right: -self.left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_center_and_back() {
        let b = Aabb::from_center(Vec2::new(2.0, 3.0), Vec2::new(1.0, 0.1));
        assert_eq!(b.left, 1.0);
        assert_eq!(b.right, 3.0);
        assert!((b.top - 3.1).abs() < 1e-6);
        assert!((b.center() - Vec2::new(2.0, 3.0)).length() < 1e-6);
        assert!((b.width() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_overlap_per_axis() {
        let a = Aabb::new(0.0, 0.0, 2.0, 2.0);
        let beside = Aabb::new(3.0, 0.5, 4.0, 1.5);
        assert!(!a.overlaps_x(&beside));
        assert!(a.overlaps_y(&beside));
        assert!(!a.overlaps(&beside));

        let touching = Aabb::new(2.0, 0.0, 3.0, 1.0);
        assert!(a.overlaps(&touching));
        assert!(!a.penetrates(&touching, 1e-4));
    }

    #[test]
    fn test_penetration_depth() {
        let a = Aabb::new(0.0, 0.0, 2.0, 2.0);
        let b = Aabb::new(1.5, 1.0, 3.0, 4.0);
        let depth = a.penetration(&b);
        assert!((depth.x - 0.5).abs() < 1e-6);
        assert!((depth.y - 1.0).abs() < 1e-6);
        assert!(a.penetrates(&b, 1e-4));
    }

    #[test]
    fn test_contains_point_and_mirror() {
        let a = Aabb::new(1.0, 1.0, 3.0, 2.0);
        assert!(a.contains_point(Vec2::new(2.0, 1.5)));
        assert!(!a.contains_point(Vec2::new(-2.0, 1.5)));
        assert!(a.mirrored_x().contains_point(Vec2::new(-2.0, 1.5)));
    }
}
