//! Viewer frustum planes
//!
//! Six world-space planes with inward normals. The side planes and the near
//! plane pass through the eye; the far plane sits at the far distance.

use crate::bounding::BoundingVolume;
use crate::foundation::math::Vec3;
use crate::geometry::{Plane3, Side};

use super::camera::Camera;

/// Index of a plane within a [`Frustum`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrustumPlane {
    /// Left side
    Left = 0,
    /// Right side
    Right,
    /// Top side
    Top,
    /// Bottom side
    Bottom,
    /// Far plane
    Far,
    /// Near plane, through the eye
    Near,
}

/// Culling planes of a perspective camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    planes: [Plane3; 6],
}

impl Frustum {
    /// Planes of `camera` in world space
    pub fn from_camera(camera: &Camera) -> Self {
        let half_fovy = camera.fov * 0.5;
        let half_fovx = (half_fovy.tan() * camera.aspect).atan();
        let (x_sin, x_cos) = half_fovx.sin_cos();
        let (y_sin, y_cos) = half_fovy.sin_cos();

        let right = camera.right_vector();
        let up = camera.up_vector();
        let forward = camera.eye_to_lookat();
        let to_world = |v: Vec3| right * v.x + up * v.y + forward * v.z;
        let eye = camera.position;

        let through_eye = |normal: Vec3| Plane3::from_point_normal(&eye, to_world(normal));
        Self {
            planes: [
                through_eye(Vec3::new(x_cos, 0.0, x_sin)),
                through_eye(Vec3::new(-x_cos, 0.0, x_sin)),
                through_eye(Vec3::new(0.0, -y_cos, y_sin)),
                through_eye(Vec3::new(0.0, y_cos, y_sin)),
                Plane3::from_point_normal(&(eye + forward * camera.far), -forward),
                through_eye(Vec3::z()),
            ],
        }
    }

    /// The six planes in [`FrustumPlane`] order
    pub fn planes(&self) -> &[Plane3; 6] {
        &self.planes
    }

    /// One plane
    pub fn plane(&self, which: FrustumPlane) -> &Plane3 {
        &self.planes[which as usize]
    }

    /// Whether `bound` may be visible
    ///
    /// Rejects as soon as one plane has the whole volume on its negative
    /// side; planes are tried last to first. An empty volume is never
    /// rejected.
    pub fn is_visible(&self, bound: &BoundingVolume) -> bool {
        self.planes.iter().rev().all(|plane| bound.which_side(plane) != Side::Negative)
    }

    /// Whether `point` lies inside or on the frustum
    pub fn contains_point(&self, point: &Vec3) -> bool {
        self.planes.iter().all(|plane| plane.which_side(point) != Side::Negative)
    }
}
