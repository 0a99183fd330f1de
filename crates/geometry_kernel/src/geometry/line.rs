//! Lines and rays
//!
//! Both carry an origin and a direction; a [`Line3`] is valid for every
//! parameter `t`, a [`Ray3`] only for `t >= 0`. Intersection code relies on
//! unit directions, which the constructors provide.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{constants, Mat4, Mat4Ext, Vec3};

fn unit_or_zero(direction: &Vec3) -> Vec3 {
    direction
        .try_normalize(constants::ZERO_TOLERANCE)
        .unwrap_or_else(Vec3::zeros)
}

/// A ray for ray casting and picking
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray3 {
    /// The origin point of the ray
    pub origin: Vec3,
    /// The direction of the ray (unit length, or zero when degenerate)
    pub direction: Vec3,
}

impl_approx_eq!(Ray3 { origin, direction } []);

impl Ray3 {
    /// Creates a new ray; the direction is normalized
    ///
    /// A zero-length direction stays zero and the ray hits nothing.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: unit_or_zero(&direction),
        }
    }

    /// Ray starting at `from` and heading through `to`
    pub fn from_points(from: Vec3, to: Vec3) -> Self {
        Self::new(from, to - from)
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Whether the direction is usable
    pub fn is_degenerate(&self) -> bool {
        self.direction.norm_squared() < constants::ZERO_TOLERANCE
    }

    /// Ray expressed in another space
    ///
    /// Returns the transformed ray (unit direction) together with the length
    /// of the transformed direction. A parameter `t` along the returned ray
    /// corresponds to `t / length` along `self`.
    pub fn transform(&self, matrix: &Mat4) -> (Self, f32) {
        let origin = matrix.transform_position(&self.origin);
        let direction = matrix.transform_direction(&self.direction);
        let length = direction.norm();
        (Self::new(origin, direction), length)
    }
}

/// Infinite line through `origin` along `direction`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line3 {
    /// A point on the line
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
}

impl_approx_eq!(Line3 { origin, direction } []);

impl Line3 {
    /// Creates a new line; the direction is normalized
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: unit_or_zero(&direction),
        }
    }

    /// Line through two points
    pub fn from_points(p0: Vec3, p1: Vec3) -> Self {
        Self::new(p0, p1 - p0)
    }

    /// Point at parameter `t`
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Closest point on the line and its parameter
    pub fn closest_point(&self, point: &Vec3) -> (Vec3, f32) {
        let t = (point - self.origin).dot(&self.direction);
        (self.point_at(t), t)
    }
}

impl From<Ray3> for Line3 {
    fn from(ray: Ray3) -> Self {
        Self {
            origin: ray.origin,
            direction: ray.direction,
        }
    }
}
