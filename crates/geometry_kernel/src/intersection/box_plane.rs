//! Box side classification against a plane

use crate::foundation::math::Vec3;
use crate::geometry::{Box3, Plane3, Side};
use crate::intersector::{IntersectionKind, Intersector, IntersectorCache, IntersectorResult};

fn classify(distance: f32, radius: f32) -> Side {
    if distance - radius >= 0.0 {
        Side::Positive
    } else if distance + radius <= 0.0 {
        Side::Negative
    } else {
        Side::Overlap
    }
}

/// Side of `plane` the box lies on
///
/// Compares the signed center distance with the box's projected radius
/// `sum(e_i * |n . a_i|)`.
pub fn box_which_side(b: &Box3, plane: &Plane3) -> Side {
    let radius = (0..3)
        .map(|i| b.extents[i] * plane.normal.dot(&b.axes[i]).abs())
        .sum::<f32>();
    classify(plane.distance_to(&b.center), radius)
}

/// Side of `plane` the world-aligned box `min..max` lies on
pub fn aligned_box_which_side(min: &Vec3, max: &Vec3, plane: &Plane3) -> Side {
    let center = (min + max) * 0.5;
    let extents = (max - min) * 0.5;
    let radius = extents.dot(&plane.normal.abs());
    classify(plane.distance_to(&center), radius)
}

/// Box-plane overlap query
#[derive(Debug)]
pub struct IntrBox3Plane3<'a> {
    b: &'a Box3,
    plane: &'a Plane3,
    kind: IntersectionKind,
}

impl<'a> IntrBox3Plane3<'a> {
    /// Query between a box and a plane
    pub fn new(b: &'a Box3, plane: &'a Plane3) -> Self {
        Self {
            b,
            plane,
            kind: IntersectionKind::Empty,
        }
    }
}

impl Intersector for IntrBox3Plane3<'_> {
    fn test(&mut self, cache: Option<IntersectorCache>) -> IntersectorResult {
        let hit = box_which_side(self.b, self.plane) == Side::Overlap;
        self.kind = if hit { IntersectionKind::Polygon } else { IntersectionKind::Empty };
        IntersectorResult::new(hit, cache)
    }

    fn kind(&self) -> IntersectionKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sides() {
        let plane = Plane3::new(Vec3::y(), 0.0);
        assert_eq!(box_which_side(&Box3::aligned(Vec3::new(0.0, 2.0, 0.0), Vec3::repeat(1.0)), &plane), Side::Positive);
        assert_eq!(box_which_side(&Box3::aligned(Vec3::new(0.0, -2.0, 0.0), Vec3::repeat(1.0)), &plane), Side::Negative);
        assert_eq!(box_which_side(&Box3::unit(), &plane), Side::Overlap);
    }

    #[test]
    fn test_rotated_box_reaches_further() {
        let plane = Plane3::new(Vec3::y(), 0.0);
        let s = std::f32::consts::FRAC_1_SQRT_2;
        let diamond = Box3::new(Vec3::new(0.0, 1.2, 0.0), [Vec3::new(s, s, 0.0), Vec3::new(-s, s, 0.0), Vec3::z()], Vec3::repeat(1.0));
        assert_eq!(box_which_side(&diamond, &plane), Side::Overlap);
        assert_eq!(box_which_side(&Box3::aligned(Vec3::new(0.0, 1.2, 0.0), Vec3::repeat(1.0)), &plane), Side::Positive);
    }

    #[test]
    fn test_aligned_variant_matches() {
        let plane = Plane3::from_point_normal(&Vec3::new(0.5, 0.0, 0.0), Vec3::new(1.0, 1.0, 0.0));
        let b = Box3::aligned(Vec3::new(-2.0, 0.5, 1.0), Vec3::new(0.5, 1.0, 2.0));
        let (min, max) = b.min_max();
        assert_eq!(aligned_box_which_side(&min, &max, &plane), box_which_side(&b, &plane));
    }

    #[test]
    fn test_intersector_reports_polygon() {
        let plane = Plane3::new(Vec3::x(), 0.5);
        let b = Box3::unit();
        let mut query = IntrBox3Plane3::new(&b, &plane);
        assert!(query.test(None).has_intersection);
        assert_eq!(query.kind(), IntersectionKind::Polygon);
    }
}
