//! Per-kind ray finders
//!
//! A [`FinderRegistry`] maps each [`PrimitiveKind`] to the finder that knows
//! how to intersect a ray with that kind of primitive. New primitive kinds
//! plug in by registering a finder; [`IntrPrimitiveRay3`] looks the finder
//! up once when it is created.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::foundation::math::{constants, Mat4, Mat4Ext};
use crate::geometry::Ray3;

use super::primitive::{MeshPrimitive, ModelPrimitive, Primitive, PrimitiveHit, PrimitiveKind, PrimitiveRef};
use super::{
    GeometryCache, IntersectionKind, Intersector, IntersectorCache, IntersectorResult, IntrGeometryRay3, ModelCache,
};

/// Ray intersection for one kind of primitive
pub trait PrimitiveRay3Finder: Send + Sync {
    /// Whether the world-space ray hits the primitive
    fn test(&self, ray: &Ray3, primitive: &dyn Primitive, cache: Option<IntersectorCache>) -> IntersectorResult;

    /// Append the world-space hits to `hits`, ordered by `t`
    fn find(
        &self,
        ray: &Ray3,
        primitive: &dyn Primitive,
        cache: Option<IntersectorCache>,
        hits: &mut Vec<PrimitiveHit>,
    ) -> IntersectorResult;
}

/// Ray query against one mesh placed by `world`
///
/// The ray is taken into model space, where the triangle search runs; `t`
/// values are scaled back to world units on the way out.
fn query_mesh(
    ray: &Ray3,
    mesh: &MeshPrimitive,
    world: &Mat4,
    state: GeometryCache,
    primitive: PrimitiveRef,
    hits: Option<&mut Vec<PrimitiveHit>>,
) -> (bool, GeometryCache) {
    let Some(inverse) = world.try_inverse() else {
        log::warn!("mesh world transform is singular, skipping");
        return (false, state);
    };
    let (local_ray, length) = ray.transform(&inverse);
    if length <= constants::ZERO_TOLERANCE {
        return (false, state);
    }

    let mut intersector = IntrGeometryRay3::new(&local_ray, &mesh.geometry);
    let cache = Some(IntersectorCache::Geometry(state));
    let result = match hits {
        None => intersector.test(cache),
        Some(hits) => {
            let result = intersector.find(cache);
            hits.extend(intersector.hits().iter().map(|hit| PrimitiveHit {
                t: hit.t / length,
                point: world.transform_position(&hit.point),
                primitive,
            }));
            result
        }
    };
    let state = result.cache.and_then(IntersectorCache::geometry).unwrap_or(state);
    (result.has_intersection, state)
}

fn geometry_state(cache: Option<IntersectorCache>, required_result_count: usize) -> GeometryCache {
    cache
        .and_then(IntersectorCache::geometry)
        .unwrap_or_else(|| GeometryCache::new(required_result_count))
}

fn model_state(cache: Option<IntersectorCache>, required_result_count: usize) -> ModelCache {
    cache
        .and_then(IntersectorCache::model)
        .unwrap_or_else(|| ModelCache::new(required_result_count))
}

/// Finder for [`MeshPrimitive`]
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshRay3Finder {
    /// Hits to collect when no cache is supplied; 0 collects all
    pub required_result_count: usize,
}

impl PrimitiveRay3Finder for MeshRay3Finder {
    fn test(&self, ray: &Ray3, primitive: &dyn Primitive, cache: Option<IntersectorCache>) -> IntersectorResult {
        let Some(mesh) = primitive.as_any().downcast_ref::<MeshPrimitive>() else {
            log::warn!("mesh finder given a {:?} primitive", primitive.kind());
            return IntersectorResult::miss(cache);
        };
        let state = geometry_state(cache, self.required_result_count);
        let target = PrimitiveRef { kind: PrimitiveKind::Mesh, mesh_index: None };
        let (hit, state) = query_mesh(ray, mesh, &mesh.world, state, target, None);
        IntersectorResult::new(hit, Some(IntersectorCache::Geometry(state)))
    }

    fn find(
        &self,
        ray: &Ray3,
        primitive: &dyn Primitive,
        cache: Option<IntersectorCache>,
        hits: &mut Vec<PrimitiveHit>,
    ) -> IntersectorResult {
        let Some(mesh) = primitive.as_any().downcast_ref::<MeshPrimitive>() else {
            log::warn!("mesh finder given a {:?} primitive", primitive.kind());
            return IntersectorResult::miss(cache);
        };
        let state = geometry_state(cache, self.required_result_count);
        let target = PrimitiveRef { kind: PrimitiveKind::Mesh, mesh_index: None };
        let (hit, state) = query_mesh(ray, mesh, &mesh.world, state, target, Some(hits));
        IntersectorResult::new(hit, Some(IntersectorCache::Geometry(state)))
    }
}

/// Finder for [`ModelPrimitive`]
///
/// Tries the mesh that was hit last time first, then the rest in order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelRay3Finder {
    /// Hits to collect when no cache is supplied; 0 collects all
    pub required_result_count: usize,
}

impl ModelRay3Finder {
    fn mesh_order(cached: usize, count: usize) -> impl Iterator<Item = usize> {
        let cached = if cached < count { Some(cached) } else { None };
        cached.into_iter().chain((0..count).filter(move |&i| Some(i) != cached))
    }

    fn inner_state(state: &ModelCache, index: usize, required: usize) -> GeometryCache {
        let inner = if index == state.cached_mesh_index { state.inner } else { None };
        let mut inner = inner.unwrap_or_default();
        inner.required_result_count = required;
        inner
    }
}

impl PrimitiveRay3Finder for ModelRay3Finder {
    fn test(&self, ray: &Ray3, primitive: &dyn Primitive, cache: Option<IntersectorCache>) -> IntersectorResult {
        let Some(model) = primitive.as_any().downcast_ref::<ModelPrimitive>() else {
            log::warn!("model finder given a {:?} primitive", primitive.kind());
            return IntersectorResult::miss(cache);
        };
        let mut state = model_state(cache, self.required_result_count);

        for index in Self::mesh_order(state.cached_mesh_index, model.meshes().len()) {
            let mesh = &model.meshes()[index];
            let world = model.world_transform() * mesh.world;
            let inner = Self::inner_state(&state, index, state.required_result_count);
            let target = PrimitiveRef { kind: PrimitiveKind::Model, mesh_index: Some(index) };
            let (hit, inner) = query_mesh(ray, mesh, &world, inner, target, None);
            if hit {
                state.cached_mesh_index = index;
                state.inner = Some(inner);
                return IntersectorResult::new(true, Some(IntersectorCache::Model(state)));
            }
        }
        IntersectorResult::miss(Some(IntersectorCache::Model(state)))
    }

    fn find(
        &self,
        ray: &Ray3,
        primitive: &dyn Primitive,
        cache: Option<IntersectorCache>,
        hits: &mut Vec<PrimitiveHit>,
    ) -> IntersectorResult {
        let Some(model) = primitive.as_any().downcast_ref::<ModelPrimitive>() else {
            log::warn!("model finder given a {:?} primitive", primitive.kind());
            return IntersectorResult::miss(cache);
        };
        let mut state = model_state(cache, self.required_result_count);
        let required = state.required_result_count;
        let mut found = Vec::new();

        for index in Self::mesh_order(state.cached_mesh_index, model.meshes().len()) {
            let remaining = if required > 0 { required - found.len() } else { 0 };
            let mesh = &model.meshes()[index];
            let world = model.world_transform() * mesh.world;
            let inner = Self::inner_state(&state, index, remaining);
            let target = PrimitiveRef { kind: PrimitiveKind::Model, mesh_index: Some(index) };
            let (hit, inner) = query_mesh(ray, mesh, &world, inner, target, Some(&mut found));
            if hit {
                state.cached_mesh_index = index;
                state.inner = Some(inner);
                if required > 0 && found.len() >= required {
                    break;
                }
            }
        }

        found.sort_by(|a, b| a.t.total_cmp(&b.t));
        let has_intersection = !found.is_empty();
        hits.extend(found);
        IntersectorResult::new(has_intersection, Some(IntersectorCache::Model(state)))
    }
}

/// Finders keyed by primitive kind
#[derive(Clone, Default)]
pub struct FinderRegistry {
    finders: HashMap<PrimitiveKind, Arc<dyn PrimitiveRay3Finder>>,
}

impl fmt::Debug for FinderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FinderRegistry")
            .field("kinds", &self.finders.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl FinderRegistry {
    /// Registry with nothing registered
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the mesh and model finders
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(PrimitiveKind::Mesh, Arc::new(MeshRay3Finder::default()));
        registry.register(PrimitiveKind::Model, Arc::new(ModelRay3Finder::default()));
        registry
    }

    /// Register `finder` for `kind`, returning the finder it replaces
    pub fn register(
        &mut self,
        kind: PrimitiveKind,
        finder: Arc<dyn PrimitiveRay3Finder>,
    ) -> Option<Arc<dyn PrimitiveRay3Finder>> {
        self.finders.insert(kind, finder)
    }

    /// Finder for `kind`
    pub fn get(&self, kind: PrimitiveKind) -> Option<Arc<dyn PrimitiveRay3Finder>> {
        self.finders.get(&kind).cloned()
    }
}

/// World-space ray query against any registered primitive kind
pub struct IntrPrimitiveRay3<'a> {
    ray: &'a Ray3,
    primitive: &'a dyn Primitive,
    finder: Option<Arc<dyn PrimitiveRay3Finder>>,
    hits: Vec<PrimitiveHit>,
}

impl fmt::Debug for IntrPrimitiveRay3<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntrPrimitiveRay3")
            .field("ray", self.ray)
            .field("kind", &self.primitive.kind())
            .field("has_finder", &self.finder.is_some())
            .field("hits", &self.hits)
            .finish()
    }
}

impl<'a> IntrPrimitiveRay3<'a> {
    /// Query between a world-space ray and a primitive
    pub fn new(ray: &'a Ray3, primitive: &'a dyn Primitive, registry: &FinderRegistry) -> Self {
        let finder = registry.get(primitive.kind());
        if finder.is_none() {
            log::warn!("no ray finder registered for {:?}", primitive.kind());
        }
        Self {
            ray,
            primitive,
            finder,
            hits: Vec::new(),
        }
    }

    /// Hits of the last `find`, ordered by `t`
    pub fn hits(&self) -> &[PrimitiveHit] {
        &self.hits
    }
}

impl Intersector for IntrPrimitiveRay3<'_> {
    fn test(&mut self, cache: Option<IntersectorCache>) -> IntersectorResult {
        match &self.finder {
            Some(finder) => finder.test(self.ray, self.primitive, cache),
            None => IntersectorResult::miss(cache),
        }
    }

    fn find(&mut self, cache: Option<IntersectorCache>) -> IntersectorResult {
        self.hits.clear();
        match &self.finder {
            Some(finder) => finder.find(self.ray, self.primitive, cache, &mut self.hits),
            None => IntersectorResult::miss(cache),
        }
    }

    fn kind(&self) -> IntersectionKind {
        if self.hits.is_empty() {
            IntersectionKind::Empty
        } else {
            IntersectionKind::Point
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat3, Vec3};
    use crate::intersector::geometry::TriangleList;
    use approx::assert_relative_eq;

    fn quad() -> TriangleList {
        TriangleList::new(
            vec![Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 0.0), Vec3::new(-1.0, 1.0, 0.0)],
            Some(vec![0, 1, 2, 0, 2, 3]),
        )
    }

    fn down_at(x: f32, y: f32) -> Ray3 {
        Ray3::new(Vec3::new(x, y, 10.0), -Vec3::z())
    }

    #[test]
    fn test_scaled_mesh_reports_world_t() {
        let world = Mat4::from_srt(&Vec3::repeat(3.0), &Mat3::identity(), &Vec3::new(0.0, 0.0, 2.0));
        let mesh = MeshPrimitive::new(quad(), world);
        let registry = FinderRegistry::with_defaults();
        let ray = down_at(2.5, 0.0);
        let mut query = IntrPrimitiveRay3::new(&ray, &mesh, &registry);
        assert!(query.test(None).has_intersection);
        let result = query.find(None);
        assert!(result.has_intersection);
        assert!(matches!(result.cache, Some(IntersectorCache::Geometry(_))));
        let hit = query.hits()[0];
        assert_relative_eq!(hit.t, 8.0, epsilon = 1e-4);
        assert_relative_eq!(hit.point, Vec3::new(2.5, 0.0, 2.0), epsilon = 1e-4);
        assert_eq!(hit.primitive, PrimitiveRef { kind: PrimitiveKind::Mesh, mesh_index: None });
    }

    #[test]
    fn test_model_caches_hit_mesh() {
        let near = MeshPrimitive::new(quad(), Mat4::new_translation(&Vec3::new(0.0, 0.0, 1.0)));
        let side = MeshPrimitive::new(quad(), Mat4::new_translation(&Vec3::new(5.0, 0.0, 0.0)));
        let far = MeshPrimitive::new(quad(), Mat4::new_translation(&Vec3::new(0.0, 0.0, -1.0)));
        let model = ModelPrimitive::new(vec![side, far, near], Mat4::identity());
        let registry = FinderRegistry::with_defaults();

        let ray = down_at(0.2, 0.1);
        let mut query = IntrPrimitiveRay3::new(&ray, &model, &registry);
        let result = query.find(None);
        assert!(result.has_intersection);
        let hits = query.hits();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].primitive.mesh_index, Some(2));
        assert_relative_eq!(hits[0].t, 9.0, epsilon = 1e-4);
        assert_relative_eq!(hits[1].t, 11.0, epsilon = 1e-4);

        // test stops at the first mesh hit and remembers it
        let tested = query.test(None);
        let state = tested.cache.and_then(IntersectorCache::model).expect("model cache");
        assert_eq!(state.cached_mesh_index, 1);
        assert!(state.inner.is_some());
        let again = query.test(tested.cache);
        assert_eq!(again.cache.and_then(IntersectorCache::model).map(|c| c.cached_mesh_index), Some(1));
    }

    #[test]
    fn test_model_required_count() {
        let meshes = (0..4)
            .map(|i| MeshPrimitive::new(quad(), Mat4::new_translation(&Vec3::new(0.0, 0.0, i as f32))))
            .collect();
        let model = ModelPrimitive::new(meshes, Mat4::identity());
        let registry = FinderRegistry::with_defaults();
        let ray = down_at(0.3, 0.3);
        let mut query = IntrPrimitiveRay3::new(&ray, &model, &registry);
        assert!(query.find(Some(IntersectorCache::Model(ModelCache::new(2)))).has_intersection);
        assert_eq!(query.hits().len(), 2);
    }

    #[test]
    fn test_unknown_kind_reports_no_intersection() {
        let mesh = MeshPrimitive::new(quad(), Mat4::identity());
        let registry = FinderRegistry::new();
        let ray = down_at(0.0, 0.0);
        let mut query = IntrPrimitiveRay3::new(&ray, &mesh, &registry);
        assert!(!query.test(None).has_intersection);
        assert!(!query.find(None).has_intersection);
        assert_eq!(query.kind(), IntersectionKind::Empty);
    }

    #[test]
    fn test_registered_finder_replaces_default() {
        struct AlwaysHit;
        impl PrimitiveRay3Finder for AlwaysHit {
            fn test(&self, _: &Ray3, _: &dyn Primitive, cache: Option<IntersectorCache>) -> IntersectorResult {
                IntersectorResult::new(true, cache)
            }
            fn find(
                &self,
                _: &Ray3,
                _: &dyn Primitive,
                cache: Option<IntersectorCache>,
                _: &mut Vec<PrimitiveHit>,
            ) -> IntersectorResult {
                IntersectorResult::new(true, cache)
            }
        }

        let mut registry = FinderRegistry::with_defaults();
        assert!(registry.register(PrimitiveKind::Mesh, Arc::new(AlwaysHit)).is_some());
        let mesh = MeshPrimitive::new(quad(), Mat4::identity());
        let ray = down_at(50.0, 0.0);
        assert!(IntrPrimitiveRay3::new(&ray, &mesh, &registry).test(None).has_intersection);
    }
}
