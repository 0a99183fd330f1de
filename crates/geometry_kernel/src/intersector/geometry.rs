//! Triangle list geometry and its coherent ray search
//!
//! Picking a mesh every frame with a ray that barely moves tends to hit the
//! same triangle again. The search therefore starts at the triangle cached
//! by the previous query and fans out from it, `s, s+1, s-1, s+2, s-2, ...`,
//! so a repeated hit is found after one triangle test instead of a linear
//! scan.

use serde::{Deserialize, Serialize};

use crate::bounding::BoundingVolume;
use crate::containment::{compute_aligned_box, PositionData};
use crate::foundation::math::Vec3;
use crate::geometry::{Ray3, Triangle3};
use crate::intersection::find_ray_triangle;

use super::{GeometryCache, IntersectionKind, Intersector, IntersectorCache, IntersectorResult, IntrBvRay3};

/// Indexed or flat triangle list in model space
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleList {
    positions: Vec<Vec3>,
    indices: Option<Vec<u32>>,
    bound: BoundingVolume,
}

impl TriangleList {
    /// Triangle list with an aligned box bound fitted to the positions
    ///
    /// Without indices, every three consecutive positions form a triangle.
    pub fn new(positions: Vec<Vec3>, indices: Option<Vec<u32>>) -> Self {
        let bound = if positions.is_empty() {
            BoundingVolume::Empty
        } else {
            BoundingVolume::Box(compute_aligned_box(&PositionData::from(&positions[..])))
        };
        Self { positions, indices, bound }
    }

    /// Replace the model-space bound
    #[must_use]
    pub fn with_bound(mut self, bound: BoundingVolume) -> Self {
        self.bound = bound;
        self
    }

    /// Model-space bound
    pub fn bound(&self) -> &BoundingVolume {
        &self.bound
    }

    /// Vertex positions
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices
            .as_ref()
            .map_or(self.positions.len(), Vec::len)
            / 3
    }

    /// Triangle `index`; `None` when out of range or indexing past the
    /// positions
    pub fn triangle(&self, index: usize) -> Option<Triangle3> {
        if index >= self.triangle_count() {
            return None;
        }
        let corner = |k: usize| -> Option<Vec3> {
            let slot = index * 3 + k;
            let vertex = match &self.indices {
                Some(indices) => *indices.get(slot)? as usize,
                None => slot,
            };
            self.positions.get(vertex).copied()
        };
        Some(Triangle3::new(corner(0)?, corner(1)?, corner(2)?))
    }
}

/// Triangle hit by a geometry ray query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometryHit {
    /// Ray parameter
    pub t: f32,
    /// Hit position
    pub point: Vec3,
    /// Index of the triangle hit
    pub triangle_index: usize,
}

/// Triangle indices fanning out from `start`: `s, s+1, s-1, s+2, s-2, ...`
pub(crate) fn coherent_order(start: usize, count: usize) -> impl Iterator<Item = usize> {
    let start = if start < count { start } else { 0 };
    (count > 0).then_some(start).into_iter().chain((1..count).flat_map(move |offset| {
        let above = Some(start + offset).filter(|&i| i < count);
        let below = start.checked_sub(offset);
        above.into_iter().chain(below)
    }))
}

/// Ray query against a triangle list
#[derive(Debug)]
pub struct IntrGeometryRay3<'a> {
    ray: &'a Ray3,
    geometry: &'a TriangleList,
    hits: Vec<GeometryHit>,
}

impl<'a> IntrGeometryRay3<'a> {
    /// Query between a model-space ray and a triangle list
    pub fn new(ray: &'a Ray3, geometry: &'a TriangleList) -> Self {
        Self {
            ray,
            geometry,
            hits: Vec::new(),
        }
    }

    /// Hits of the last `find`, ordered by `t`
    pub fn hits(&self) -> &[GeometryHit] {
        &self.hits
    }

    fn misses_bound(&self) -> bool {
        let bound = self.geometry.bound();
        if matches!(bound, BoundingVolume::Empty) {
            return false;
        }
        !IntrBvRay3::new(bound, self.ray).test(None).has_intersection
    }

    fn hit_at(&self, index: usize) -> Option<GeometryHit> {
        let triangle = self.geometry.triangle(index)?;
        find_ray_triangle(self.ray, &triangle).map(|hit| GeometryHit {
            t: hit.t,
            point: hit.point,
            triangle_index: index,
        })
    }
}

fn geometry_state(cache: Option<IntersectorCache>) -> GeometryCache {
    match cache {
        Some(IntersectorCache::Geometry(state)) => state,
        Some(IntersectorCache::Model(_)) => {
            log::warn!("model cache passed to a geometry query, starting fresh");
            GeometryCache::default()
        }
        None => GeometryCache::default(),
    }
}

impl Intersector for IntrGeometryRay3<'_> {
    fn test(&mut self, cache: Option<IntersectorCache>) -> IntersectorResult {
        let mut state = geometry_state(cache);
        if self.misses_bound() {
            return IntersectorResult::miss(Some(IntersectorCache::Geometry(state)));
        }

        let count = self.geometry.triangle_count();
        let found = coherent_order(state.element_cached_index, count).find(|&index| self.hit_at(index).is_some());
        if let Some(index) = found {
            log::trace!("geometry ray hit triangle {index} (cached {})", state.element_cached_index);
            state.element_cached_index = index;
        }
        IntersectorResult::new(found.is_some(), Some(IntersectorCache::Geometry(state)))
    }

    fn find(&mut self, cache: Option<IntersectorCache>) -> IntersectorResult {
        let mut state = geometry_state(cache);
        self.hits.clear();
        if self.misses_bound() {
            return IntersectorResult::miss(Some(IntersectorCache::Geometry(state)));
        }

        let count = self.geometry.triangle_count();
        let required = state.required_result_count;
        for index in coherent_order(state.element_cached_index, count) {
            if let Some(hit) = self.hit_at(index) {
                self.hits.push(hit);
                state.element_cached_index = index;
                if required > 0 && self.hits.len() >= required {
                    break;
                }
            }
        }
        self.hits.sort_by(|a, b| a.t.total_cmp(&b.t));

        IntersectorResult::new(!self.hits.is_empty(), Some(IntersectorCache::Geometry(state)))
    }

    fn kind(&self) -> IntersectionKind {
        if self.hits.is_empty() {
            IntersectionKind::Empty
        } else {
            IntersectionKind::Point
        }
    }
}
