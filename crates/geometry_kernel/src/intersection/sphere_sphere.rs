//! Sphere overlap

use crate::geometry::Sphere3;
use crate::intersector::{IntersectionKind, Intersector, IntersectorCache, IntersectorResult};

/// Sphere-sphere overlap query
#[derive(Debug)]
pub struct IntrSphere3Sphere3<'a> {
    sphere0: &'a Sphere3,
    sphere1: &'a Sphere3,
    kind: IntersectionKind,
}

impl<'a> IntrSphere3Sphere3<'a> {
    /// Query between two spheres
    pub fn new(sphere0: &'a Sphere3, sphere1: &'a Sphere3) -> Self {
        Self {
            sphere0,
            sphere1,
            kind: IntersectionKind::Empty,
        }
    }
}

impl Intersector for IntrSphere3Sphere3<'_> {
    fn test(&mut self, cache: Option<IntersectorCache>) -> IntersectorResult {
        let hit = self.sphere0.intersects(self.sphere1);
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
    use crate::intersector::GeometryCache;

    #[test]
    fn test_overlap_passes_cache_through() {
        let a = Sphere3::unit();
        let b = Sphere3::new(Vec3::new(1.5, 0.0, 0.0), 1.0);
        let cache = Some(IntersectorCache::Geometry(GeometryCache::new(3)));
        let result = IntrSphere3Sphere3::new(&a, &b).find(cache);
        assert!(result.has_intersection);
        assert_eq!(result.cache, cache);
    }

    #[test]
    fn test_apart() {
        let a = Sphere3::unit();
        let b = Sphere3::new(Vec3::new(0.0, 3.0, 0.0), 1.0);
        let mut query = IntrSphere3Sphere3::new(&a, &b);
        assert!(!query.test(None).has_intersection);
        assert_eq!(query.kind(), IntersectionKind::Empty);
    }
}
