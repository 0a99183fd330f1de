//! Box against sphere

use crate::geometry::{Box3, Sphere3};
use crate::intersector::{IntersectionKind, Intersector, IntersectorCache, IntersectorResult};

/// Whether the box and the sphere overlap
///
/// Measures the squared distance from the sphere center to the box in the
/// box frame.
pub fn test_box_sphere(b: &Box3, sphere: &Sphere3) -> bool {
    let local = b.local_coordinates(&sphere.center);
    let mut distance_sq = 0.0f32;
    for i in 0..3 {
        let outside = local[i].abs() - b.extents[i];
        if outside > sphere.radius {
            return false;
        }
        if outside > 0.0 {
            distance_sq += outside * outside;
        }
    }
    distance_sq <= sphere.radius * sphere.radius
}

/// Box-sphere overlap query
#[derive(Debug)]
pub struct IntrBox3Sphere3<'a> {
    b: &'a Box3,
    sphere: &'a Sphere3,
    kind: IntersectionKind,
}

impl<'a> IntrBox3Sphere3<'a> {
    /// Query between a box and a sphere
    pub fn new(b: &'a Box3, sphere: &'a Sphere3) -> Self {
        Self {
            b,
            sphere,
            kind: IntersectionKind::Empty,
        }
    }
}

impl Intersector for IntrBox3Sphere3<'_> {
    fn test(&mut self, cache: Option<IntersectorCache>) -> IntersectorResult {
        let hit = test_box_sphere(self.b, self.sphere);
        self.kind = if hit { IntersectionKind::Other } else { IntersectionKind::Empty };
        IntersectorResult::new(hit, cache)
    }

    fn kind(&self) -> IntersectionKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    #[test]
    fn test_face_and_corner_regions() {
        let b = Box3::unit();
        assert!(test_box_sphere(&b, &Sphere3::new(Vec3::new(1.9, 0.0, 0.0), 1.0)));
        assert!(!test_box_sphere(&b, &Sphere3::new(Vec3::new(2.1, 0.0, 0.0), 1.0)));
        // corner region: distance to (1,1,1) is sqrt(3) * 0.5
        let near_corner = Vec3::repeat(1.5);
        assert!(test_box_sphere(&b, &Sphere3::new(near_corner, 0.9)));
        assert!(!test_box_sphere(&b, &Sphere3::new(near_corner, 0.8)));
    }

    #[test]
    fn test_sphere_inside_box() {
        let b = Box3::aligned(Vec3::zeros(), Vec3::repeat(5.0));
        let sphere = Sphere3::unit();
        let mut query = IntrBox3Sphere3::new(&b, &sphere);
        assert!(query.test(None).has_intersection);
    }
}
