//! # Geometry Kernel
//!
//! Bounding volumes, intersection queries and shadow-camera fitting for a
//! 3D engine.
//!
//! ## Features
//!
//! - **Value types**: planes, rays, triangles, oriented boxes and spheres
//!   built on nalgebra
//! - **Containment**: box and sphere merges, point-cloud fits
//! - **Intersection**: separating-axis and parametric tests with a shared
//!   intersector protocol and coherence caches for repeated picking
//! - **Bounding volumes**: one enum over empty, box and sphere volumes with
//!   a generic key/value encoding
//! - **Shadows**: triangle/plane clipping and cascaded sun-light cameras
//!
//! ## Quick Start
//!
//! ```rust
//! use geometry_kernel::prelude::*;
//!
//! let points = [Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 2.0, 0.5), Vec3::new(0.0, 1.0, -0.5)];
//! let mut bound = BoundingVolume::from_box(Box3::default());
//! bound.compute_from_data(&PositionData::from(&points[..]), true);
//!
//! let ray = Ray3::new(Vec3::new(0.0, 1.0, -10.0), Vec3::z());
//! let mut query = IntrBvRay3::new(&bound, &ray);
//! assert!(query.find(None).has_intersection);
//! assert_eq!(query.contacts().len(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod error;

pub mod geometry;
pub mod containment;
pub mod intersection;
pub mod bounding;
pub mod intersector;
pub mod shadow;

pub use error::{KernelError, KernelResult};

/// Common imports for kernel users
pub mod prelude {
    pub use crate::{
        bounding::{AxisFlags, BoundingVolume},
        config::{CascadeConfig, Config, KernelConfig},
        containment::PositionData,
        error::{KernelError, KernelResult},
        foundation::{
            math::{Mat3, Mat3Ext, Mat4, Mat4Ext, Quat, Vec2, Vec3, Vec4},
            quaternion::QuatExt,
            random::RandomContext,
            tolerance::Tolerance,
        },
        geometry::{Box2, Box3, Line3, Plane3, Ray3, Side, Sphere2, Sphere3, Triangle2, Triangle3},
        intersection::LineContact,
        intersector::{
            FinderRegistry, IntersectionKind, Intersector, IntersectorCache, IntersectorResult,
            IntrBvRay3, IntrGeometryRay3, IntrPrimitiveRay3, MeshPrimitive, ModelPrimitive,
            Primitive, PrimitiveArena, PrimitiveHandle, TriangleList,
        },
        shadow::{Camera, CsmSunLightCamera, Frustum, TrianglePlaneClipper},
    };
}
