//! Intersector protocol
//!
//! An intersector pairs two objects and answers two questions: [`test`]
//! reports whether they intersect, [`find`] additionally computes where.
//! Intersectors that walk many elements (triangle lists, models made of
//! meshes) accept an optional [`IntersectorCache`] and hand back an updated
//! one, so a caller repeating a query with a slowly moving ray starts its
//! search where the last hit was found.
//!
//! # Module Organization
//!
//! - [`bv_ray`] - bounding volume against ray
//! - [`geometry`] - triangle list geometry and its coherent ray search
//! - [`primitive`] - meshes and models placed in the world
//! - [`finder`] - per-kind ray finders and their registry
//! - [`arena`] - handle-based primitive storage with picking
//!
//! [`test`]: Intersector::test
//! [`find`]: Intersector::find

use serde::{Deserialize, Serialize};

pub mod bv_ray;
pub mod geometry;
pub mod primitive;
pub mod finder;
pub mod arena;

pub use arena::{PrimitiveArena, PrimitiveHandle};
pub use bv_ray::IntrBvRay3;
pub use finder::{FinderRegistry, IntrPrimitiveRay3, MeshRay3Finder, ModelRay3Finder, PrimitiveRay3Finder};
pub use geometry::{GeometryHit, IntrGeometryRay3, TriangleList};
pub use primitive::{MeshPrimitive, ModelPrimitive, Primitive, PrimitiveHit, PrimitiveKind, PrimitiveRef};

/// Shape of the intersection set found by the last query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntersectionKind {
    /// No intersection
    #[default]
    Empty,
    /// Isolated points
    Point,
    /// A segment
    Segment,
    /// A ray
    Ray,
    /// A line
    Line,
    /// A polygon
    Polygon,
    /// A plane
    Plane,
    /// A solid
    Polyhedron,
    /// Anything else, including volume overlap
    Other,
}

/// Search state for triangle list queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeometryCache {
    /// Triangle where the next search starts
    pub element_cached_index: usize,
    /// Hits to collect before `find` stops; 0 collects all
    pub required_result_count: usize,
}

impl GeometryCache {
    /// Cache collecting up to `required_result_count` hits
    pub fn new(required_result_count: usize) -> Self {
        Self {
            element_cached_index: 0,
            required_result_count,
        }
    }
}

/// Search state for model queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCache {
    /// Mesh tried first
    pub cached_mesh_index: usize,
    /// Triangle cache of the cached mesh
    pub inner: Option<GeometryCache>,
    /// Hits to collect before `find` stops; 0 collects all
    pub required_result_count: usize,
}

impl ModelCache {
    /// Cache collecting up to `required_result_count` hits
    pub fn new(required_result_count: usize) -> Self {
        Self {
            required_result_count,
            ..Self::default()
        }
    }
}

/// Coherence cache handed between a caller and an intersector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntersectorCache {
    /// Triangle list search state
    Geometry(GeometryCache),
    /// Model search state
    Model(ModelCache),
}

impl IntersectorCache {
    /// Geometry state, if this is a geometry cache
    pub fn geometry(self) -> Option<GeometryCache> {
        match self {
            Self::Geometry(cache) => Some(cache),
            Self::Model(_) => None,
        }
    }

    /// Model state, if this is a model cache
    pub fn model(self) -> Option<ModelCache> {
        match self {
            Self::Model(cache) => Some(cache),
            Self::Geometry(_) => None,
        }
    }
}

/// Outcome of an intersector query
///
/// The cache given to the query comes back here, possibly updated or newly
/// created; the caller owns it again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[must_use]
pub struct IntersectorResult {
    /// Whether the objects intersect
    pub has_intersection: bool,
    /// Cache to pass to the next query
    pub cache: Option<IntersectorCache>,
}

impl IntersectorResult {
    /// Result carrying `cache` back unchanged
    pub fn new(has_intersection: bool, cache: Option<IntersectorCache>) -> Self {
        Self { has_intersection, cache }
    }

    /// No intersection
    pub fn miss(cache: Option<IntersectorCache>) -> Self {
        Self::new(false, cache)
    }
}

/// Intersection query between two objects
pub trait Intersector {
    /// Whether the objects intersect
    fn test(&mut self, cache: Option<IntersectorCache>) -> IntersectorResult;

    /// Compute the intersection set
    ///
    /// Intersectors without a find query answer with [`Self::test`] and keep
    /// their result set empty.
    fn find(&mut self, cache: Option<IntersectorCache>) -> IntersectorResult {
        self.test(cache)
    }

    /// Shape of the intersection set after the last query
    fn kind(&self) -> IntersectionKind;
}
