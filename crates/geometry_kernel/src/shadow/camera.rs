//! # Viewer Camera
//!
//! Perspective camera in a left-handed view space, the frame the shadow
//! fitting code works in.
//!
//! ## Coordinate System
//! - X+ = Right
//! - Y+ = Up
//! - Z+ = Forward (into the screen)
//!
//! Projected depth runs from 0 at the near plane to 1 at the far plane.

use crate::foundation::math::{constants, utils, Mat4, Mat4Ext, Vec3};
use crate::geometry::Ray3;

/// Perspective camera looking from `position` toward `target`
///
/// The orthonormal frame is derived on demand from `position`, `target` and
/// `up`; `up` only needs to be roughly upward.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye position in world space
    pub position: Vec3,
    /// Point the camera looks at
    pub target: Vec3,
    /// Approximate up direction
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
    /// Distance to the near plane
    pub near: f32,
    /// Distance to the far plane
    pub far: f32,
}

impl Camera {
    /// Camera at `position` looking at the origin with +Y up
    ///
    /// # Arguments
    /// * `fov_degrees` - Vertical field of view in degrees
    /// * `aspect` - Width / height of the viewport
    /// * `near`, `far` - Clip distances, `0 < near < far`
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::y(),
            fov: utils::deg_to_rad(fov_degrees),
            aspect,
            near,
            far,
        }
    }

    /// Camera from a full look-at description; `fov` is in radians
    pub fn from_look_at(position: Vec3, target: Vec3, up: Vec3, fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target,
            up,
            fov,
            aspect,
            near,
            far,
        }
    }

    /// Move the eye, keeping the target
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        log::trace!("Camera position updated to: {:?}", position);
    }

    /// Point the camera at `target` with the given up direction
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        self.target = target;
        self.up = up;
        log::trace!("Camera look_at updated - target: {:?}, up: {:?}", target, up);
    }

    /// Update the aspect ratio after a viewport change
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if (self.aspect - aspect).abs() > 0.01 {
            log::debug!("Camera aspect ratio changed: {:.3} -> {:.3}", self.aspect, aspect);
        }
        self.aspect = aspect;
    }

    /// Orthonormal `[right, up, forward]` frame
    fn frame(&self) -> [Vec3; 3] {
        let forward = (self.target - self.position)
            .try_normalize(constants::ZERO_TOLERANCE)
            .unwrap_or_else(Vec3::z);
        let right = self
            .up
            .cross(&forward)
            .try_normalize(constants::ZERO_TOLERANCE)
            .or_else(|| {
                log::debug!("camera up is parallel to the view direction, using a fallback up");
                let fallback = if forward.y.abs() < 0.9 { Vec3::y() } else { Vec3::x() };
                fallback.cross(&forward).try_normalize(constants::ZERO_TOLERANCE)
            })
            .unwrap_or_else(Vec3::x);
        let up = forward.cross(&right);
        [right, up, forward]
    }

    /// Unit view direction
    pub fn eye_to_lookat(&self) -> Vec3 {
        self.frame()[2]
    }

    /// Unit right vector of the view frame
    pub fn right_vector(&self) -> Vec3 {
        self.frame()[0]
    }

    /// Unit up vector of the view frame, orthogonal to the view direction
    pub fn up_vector(&self) -> Vec3 {
        self.frame()[1]
    }

    /// World-to-view transform
    pub fn view_matrix(&self) -> Mat4 {
        let [_, up, forward] = self.frame();
        Mat4::view_look_at_lh(&self.position, &(self.position + forward), &up)
    }

    /// Perspective projection
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_fov_lh(self.fov, self.aspect, self.near, self.far)
    }

    /// `projection * view`
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space ray through a point in normalized device coordinates
    ///
    /// `screen_x` and `screen_y` run from -1 to 1, left to right and bottom
    /// to top. Returns `None` when the camera matrices are singular.
    pub fn screen_to_world_ray(&self, screen_x: f32, screen_y: f32) -> Option<Ray3> {
        let inverse = self.view_projection_matrix().try_inverse()?;
        let near = inverse.transform_position(&Vec3::new(screen_x, screen_y, 0.0));
        let far = inverse.transform_position(&Vec3::new(screen_x, screen_y, 1.0));
        Some(Ray3::new(self.position, far - near))
    }
}

impl Default for Camera {
    /// Camera at (0, 3, -3) looking at the origin, 45 degree field of view
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 3.0, -3.0),
            target: Vec3::zeros(),
            up: Vec3::y(),
            fov: constants::QUARTER_PI,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}
