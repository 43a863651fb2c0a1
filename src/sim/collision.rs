//! Collision checks for kinematic entities
//!
//! Only circles and axis-aligned boxes. Entities move kinematically, so an
//! overlap is all a game needs to decide whether the run ends.

use glam::Vec2;

/// Axis-aligned box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min: min.min(max),
            max: min.max(max),
        }
    }

    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }

    /// Closest point on or inside the box
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }
}

/// Check if a circle touches a box
#[inline]
pub fn circle_aabb_overlap(center: Vec2, radius: f32, aabb: &Aabb) -> bool {
    aabb.contains(center) || center.distance_squared(aabb.closest_point(center)) < radius * radius
}

/// Check if two circles overlap
#[inline]
pub fn circle_circle_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    let reach = radius_a + radius_b;
    a.distance_squared(b) < reach * reach
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_aabb_side_hit() {
        let aabb = Aabb::from_center(Vec2::ZERO, Vec2::new(1.0, 1.0));
        assert!(circle_aabb_overlap(Vec2::new(1.3, 0.0), 0.5, &aabb));
        assert!(!circle_aabb_overlap(Vec2::new(1.6, 0.0), 0.5, &aabb));
    }

    #[test]
    fn test_circle_aabb_corner_miss() {
        let aabb = Aabb::from_center(Vec2::ZERO, Vec2::new(1.0, 1.0));
        // Diagonal distance to corner ~0.57 > radius 0.5
        assert!(!circle_aabb_overlap(Vec2::new(1.4, 1.4), 0.5, &aabb));
    }

    #[test]
    fn test_circle_center_inside_box() {
        let aabb = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(4.0, 2.0));
        assert!(circle_aabb_overlap(Vec2::new(1.0, 1.8), 0.3, &aabb));
    }

    #[test]
    fn test_aabb_new_orders_corners() {
        let aabb = Aabb::new(Vec2::new(3.0, -1.0), Vec2::new(1.0, 2.0));
        assert_eq!(aabb.min, Vec2::new(1.0, -1.0));
        assert_eq!(aabb.max, Vec2::new(3.0, 2.0));
        assert_eq!(aabb.center(), Vec2::new(2.0, 0.5));
    }

    #[test]
    fn test_circle_circle_overlap() {
        assert!(circle_circle_overlap(Vec2::ZERO, 1.0, Vec2::new(1.5, 0.0), 1.0));
        assert!(!circle_circle_overlap(Vec2::ZERO, 1.0, Vec2::new(2.5, 0.0), 1.0));
    }
}
