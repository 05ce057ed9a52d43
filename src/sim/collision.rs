//! Axis-aligned bounding boxes
//!
//! Every entity collides as a box centred on its position. Containment is
//! half-open (min inclusive, max exclusive) so neighbouring grid cells never
//! share a point.

use glam::Vec2;

/// Box centred on a point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half_extents: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    pub fn square(center: Vec2, half_extent: f32) -> Self {
        Self::new(center, Vec2::splat(half_extent))
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half_extents
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half_extents
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        let (min, max) = (self.min(), self.max());
        point.x >= min.x && point.x < max.x && point.y >= min.y && point.y < max.y
    }

    /// True if the interiors intersect (touching edges do not count)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x < b_max.x && b_min.x < a_max.x && a_min.y < b_max.y && b_min.y < a_max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_point_half_open() {
        let cell = Aabb::square(Vec2::new(96.0, 224.0), 32.0);
        assert!(cell.contains_point(Vec2::new(96.0, 224.0)));
        assert!(cell.contains_point(Vec2::new(64.0, 192.0)));
        assert!(!cell.contains_point(Vec2::new(128.0, 224.0)));
        // Neighbouring centroid is outside
        assert!(!cell.contains_point(Vec2::new(160.0, 224.0)));
    }

    #[test]
    fn test_overlaps() {
        let a = Aabb::new(Vec2::ZERO, Vec2::new(15.0, 20.0));
        let b = Aabb::square(Vec2::new(18.0, 0.0), 4.0);
        let c = Aabb::square(Vec2::new(19.0, 0.0), 4.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        // Edges touching exactly
        assert!(!a.overlaps(&c));
    }
}
