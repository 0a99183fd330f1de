//! Bounding volume against ray

use crate::bounding::BoundingVolume;
use crate::geometry::Ray3;
use crate::intersection::{find_ray_box, find_ray_sphere, test_ray_box, test_ray_sphere, LineContact};

use super::{IntersectionKind, Intersector, IntersectorCache, IntersectorResult};

/// Ray query against whichever shape the volume holds
///
/// An empty volume holds nothing and is never hit.
#[derive(Debug)]
pub struct IntrBvRay3<'a> {
    bv: &'a BoundingVolume,
    ray: &'a Ray3,
    contacts: Vec<LineContact>,
}

impl<'a> IntrBvRay3<'a> {
    /// Query between a bounding volume and a ray
    pub fn new(bv: &'a BoundingVolume, ray: &'a Ray3) -> Self {
        Self {
            bv,
            ray,
            contacts: Vec::new(),
        }
    }

    /// Contacts of the last `find`, ordered by `t`
    pub fn contacts(&self) -> &[LineContact] {
        &self.contacts
    }
}

impl Intersector for IntrBvRay3<'_> {
    fn test(&mut self, cache: Option<IntersectorCache>) -> IntersectorResult {
        let hit = match self.bv {
            BoundingVolume::Empty => false,
            BoundingVolume::Box(b) => test_ray_box(self.ray, b),
            BoundingVolume::Sphere(sphere) => test_ray_sphere(self.ray, sphere),
        };
        IntersectorResult::new(hit, cache)
    }

    fn find(&mut self, cache: Option<IntersectorCache>) -> IntersectorResult {
        self.contacts = match self.bv {
            BoundingVolume::Empty => Vec::new(),
            BoundingVolume::Box(b) => find_ray_box(self.ray, b),
            BoundingVolume::Sphere(sphere) => find_ray_sphere(self.ray, sphere),
        };
        IntersectorResult::new(!self.contacts.is_empty(), cache)
    }

    fn kind(&self) -> IntersectionKind {
        if self.contacts.is_empty() {
            IntersectionKind::Empty
        } else {
            IntersectionKind::Point
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::geometry::{Box3, Sphere3};
    use approx::assert_relative_eq;

    #[test]
    fn test_dispatch_by_kind() {
        let ray = Ray3::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::x());

        let b = BoundingVolume::from_box(Box3::unit());
        let mut query = IntrBvRay3::new(&b, &ray);
        assert!(query.find(None).has_intersection);
        assert_relative_eq!(query.contacts()[0].t, 4.0);

        let s = BoundingVolume::from_sphere(Sphere3::new(Vec3::zeros(), 2.0));
        let mut query = IntrBvRay3::new(&s, &ray);
        assert!(query.test(None).has_intersection);
        assert!(query.find(None).has_intersection);
        assert_relative_eq!(query.contacts()[0].t, 3.0);
        assert_eq!(query.kind(), IntersectionKind::Point);
    }

    #[test]
    fn test_empty_volume_is_never_hit() {
        let ray = Ray3::new(Vec3::zeros(), Vec3::x());
        let empty = BoundingVolume::Empty;
        let mut query = IntrBvRay3::new(&empty, &ray);
        assert!(!query.test(None).has_intersection);
        assert!(!query.find(None).has_intersection);
        assert_eq!(query.kind(), IntersectionKind::Empty);
    }
}
