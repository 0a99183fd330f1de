//! Pairwise intersection tests
//!
//! Each pair is available both as plain functions (`test_*`, `find_*`) and
//! as an [`Intersector`](crate::intersector::Intersector) that borrows the
//! two objects and keeps the result of its last query.
//!
//! Lines, rays and their directions are assumed unit length; box axes are
//! assumed orthonormal.
//!
//! # Module Organization
//!
//! - [`box_box`] - separating axis test between oriented boxes
//! - [`box_sphere`] - box against sphere
//! - [`box_plane`] - box side classification
//! - [`line_box`] - lines and rays against boxes
//! - [`line_sphere`] - lines and rays against spheres
//! - [`ray_plane`] - ray against plane
//! - [`ray_triangle`] - ray against triangle
//! - [`sphere_sphere`] - sphere overlap

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vec3;

pub mod box_box;
pub mod box_sphere;
pub mod box_plane;
pub mod line_box;
pub mod line_sphere;
pub mod ray_plane;
pub mod ray_triangle;
pub mod sphere_sphere;

pub use box_box::{test_box_box, IntrBox3Box3};
pub use box_plane::{aligned_box_which_side, box_which_side, IntrBox3Plane3};
pub use box_sphere::{test_box_sphere, IntrBox3Sphere3};
pub use line_box::{find_line_box, find_ray_box, test_line_box, test_ray_box, IntrLine3Box3, IntrRay3Box3};
pub use line_sphere::{
    find_line_sphere, find_ray_sphere, test_line_sphere, test_ray_sphere, IntrLine3Sphere3, IntrRay3Sphere3,
};
pub use ray_plane::{find_ray_plane, IntrRay3Plane3};
pub use ray_triangle::{find_ray_triangle, IntrRay3Triangle3, TriangleHit};
pub use sphere_sphere::IntrSphere3Sphere3;

/// A point where a line or ray meets a surface
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineContact {
    /// Line parameter
    pub t: f32,
    /// Position, `origin + t * direction`
    pub point: Vec3,
}

impl LineContact {
    /// Contact at parameter `t` along `origin + t * direction`
    pub fn new(origin: &Vec3, direction: &Vec3, t: f32) -> Self {
        Self {
            t,
            point: origin + direction * t,
        }
    }
}
