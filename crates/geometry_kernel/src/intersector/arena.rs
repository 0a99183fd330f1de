//! Handle-based primitive storage
//!
//! Primitives live in a [`PrimitiveArena`] and are referred to by
//! generational [`PrimitiveHandle`]s; a handle to a removed primitive
//! simply stops resolving.

use slotmap::SlotMap;

use crate::geometry::Ray3;

use super::bv_ray::IntrBvRay3;
use super::finder::{FinderRegistry, IntrPrimitiveRay3};
use super::primitive::{Primitive, PrimitiveHit, PrimitiveKind};
use super::{GeometryCache, Intersector, IntersectorCache, ModelCache};

slotmap::new_key_type! {
    /// Handle to a primitive stored in a [`PrimitiveArena`]
    pub struct PrimitiveHandle;
}

/// Owner of every pickable primitive
#[derive(Default)]
pub struct PrimitiveArena {
    primitives: SlotMap<PrimitiveHandle, Box<dyn Primitive>>,
}

impl std::fmt::Debug for PrimitiveArena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrimitiveArena").field("len", &self.primitives.len()).finish()
    }
}

impl PrimitiveArena {
    /// Empty arena
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a primitive
    pub fn insert(&mut self, primitive: Box<dyn Primitive>) -> PrimitiveHandle {
        self.primitives.insert(primitive)
    }

    /// Primitive behind `handle`, if it is still alive
    pub fn get(&self, handle: PrimitiveHandle) -> Option<&dyn Primitive> {
        self.primitives.get(handle).map(|primitive| primitive.as_ref())
    }

    /// Remove and return a primitive
    pub fn remove(&mut self, handle: PrimitiveHandle) -> Option<Box<dyn Primitive>> {
        self.primitives.remove(handle)
    }

    /// Number of stored primitives
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    /// Whether the arena holds no primitives
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Iterate over handles and primitives
    pub fn iter(&self) -> impl Iterator<Item = (PrimitiveHandle, &dyn Primitive)> {
        self.primitives.iter().map(|(handle, primitive)| (handle, primitive.as_ref()))
    }

    /// Every hit of `ray` on the stored primitives, nearest first
    ///
    /// Primitives whose world bound the ray misses are skipped. Each
    /// primitive contributes at most `required_result_count` hits and the
    /// merged list is cut to the same length; 0 keeps everything.
    pub fn pick(
        &self,
        ray: &Ray3,
        registry: &FinderRegistry,
        required_result_count: usize,
    ) -> Vec<(PrimitiveHandle, PrimitiveHit)> {
        let mut picked = Vec::new();

        for (handle, primitive) in self.iter() {
            let bound = primitive.world_bound();
            if !bound.is_empty() && !IntrBvRay3::new(&bound, ray).test(None).has_intersection {
                continue;
            }

            let cache = match primitive.kind() {
                PrimitiveKind::Mesh => IntersectorCache::Geometry(GeometryCache::new(required_result_count)),
                PrimitiveKind::Model => IntersectorCache::Model(ModelCache::new(required_result_count)),
            };
            let mut query = IntrPrimitiveRay3::new(ray, primitive, registry);
            if query.find(Some(cache)).has_intersection {
                picked.extend(query.hits().iter().map(|hit| (handle, *hit)));
            }
        }

        picked.sort_by(|a, b| a.1.t.total_cmp(&b.1.t));
        if required_result_count > 0 {
            picked.truncate(required_result_count);
        }
        log::trace!("picked {} hits from {} primitives", picked.len(), self.len());
        picked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat4, Vec3};
    use crate::intersector::geometry::TriangleList;
    use crate::intersector::primitive::{MeshPrimitive, ModelPrimitive};

    fn quad() -> TriangleList {
        TriangleList::new(
            vec![Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 0.0), Vec3::new(-1.0, 1.0, 0.0)],
            Some(vec![0, 1, 2, 0, 2, 3]),
        )
    }

    fn mesh_at(z: f32) -> Box<dyn Primitive> {
        Box::new(MeshPrimitive::new(quad(), Mat4::new_translation(&Vec3::new(0.0, 0.0, z))))
    }

    #[test]
    fn test_insert_get_remove() {
        let mut arena = PrimitiveArena::new();
        let a = arena.insert(mesh_at(0.0));
        let b = arena.insert(mesh_at(1.0));
        assert_eq!(arena.len(), 2);
        assert!(arena.remove(a).is_some());
        assert!(arena.get(a).is_none());
        assert!(arena.remove(a).is_none());
        assert!(arena.get(b).is_some());
        assert_eq!(arena.iter().count(), 1);

        // a stale handle does not resolve to a new occupant of its slot
        let c = arena.insert(mesh_at(2.0));
        assert_ne!(a, c);
        assert!(arena.get(a).is_none());
    }

    #[test]
    fn test_pick_orders_by_distance() {
        let mut arena = PrimitiveArena::new();
        let low = arena.insert(mesh_at(-2.0));
        let high = arena.insert(mesh_at(3.0));
        let model = arena.insert(Box::new(ModelPrimitive::new(
            vec![MeshPrimitive::new(quad(), Mat4::identity())],
            Mat4::new_translation(&Vec3::new(0.0, 0.0, 1.0)),
        )));
        let aside = arena.insert(Box::new(MeshPrimitive::new(
            quad(),
            Mat4::new_translation(&Vec3::new(10.0, 0.0, 0.0)),
        )));

        let registry = FinderRegistry::with_defaults();
        // off the quads' shared diagonal, so each quad reports a single triangle
        let ray = Ray3::new(Vec3::new(0.3, -0.4, 10.0), -Vec3::z());
        let picked = arena.pick(&ray, &registry, 0);
        let handles: Vec<_> = picked.iter().map(|(handle, _)| *handle).collect();
        assert_eq!(handles, vec![high, model, low]);
        for handle in [high, model, low] {
            assert_eq!(handles.iter().filter(|h| **h == handle).count(), 1);
        }
        assert!((picked[1].1.point - Vec3::new(0.3, -0.4, 1.0)).norm() < 1e-4);
        assert!(!handles.contains(&aside));
        assert!((picked[0].1.t - 7.0).abs() < 1e-4);
        assert_eq!(picked[1].1.primitive.mesh_index, Some(0));

        let nearest = arena.pick(&ray, &registry, 1);
        assert_eq!(nearest.len(), 1);
        assert_eq!(nearest[0].0, high);
    }

    #[test]
    fn test_pick_on_empty_arena() {
        let arena = PrimitiveArena::new();
        let ray = Ray3::new(Vec3::zeros(), Vec3::x());
        assert!(arena.pick(&ray, &FinderRegistry::with_defaults(), 0).is_empty());
        assert!(arena.is_empty());
    }
}
