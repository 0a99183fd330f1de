//! Spheres and discs

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Mat4, Mat4Ext, Vec2, Vec3};

/// A sphere in space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere3 {
    /// The center position of the sphere
    pub center: Vec3,
    /// The radius of the sphere
    pub radius: f32,
}

impl_approx_eq!(Sphere3 { center, radius } []);

impl Default for Sphere3 {
    fn default() -> Self {
        Self {
            center: Vec3::zeros(),
            radius: 0.0,
        }
    }
}

impl Sphere3 {
    /// Creates a new sphere with the given center and radius
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Unit sphere around the origin
    pub fn unit() -> Self {
        Self::new(Vec3::zeros(), 1.0)
    }

    /// Whether the radius is non-positive
    pub fn is_empty(&self) -> bool {
        self.radius <= 0.0
    }

    /// Whether `point` lies inside or on the sphere
    pub fn contains_point(&self, point: &Vec3) -> bool {
        (point - self.center).norm_squared() <= self.radius * self.radius
    }

    /// Check if this sphere intersects with another
    pub fn intersects(&self, other: &Self) -> bool {
        let distance_squared = (self.center - other.center).norm_squared();
        let radius_sum = self.radius + other.radius;
        distance_squared <= radius_sum * radius_sum
    }

    /// Sphere transformed by an affine matrix
    ///
    /// The radius grows by the matrix' largest axis scale so the result
    /// still encloses the transformed sphere under non-uniform scaling.
    pub fn transform(&self, matrix: &Mat4) -> Self {
        Self {
            center: matrix.transform_position(&self.center),
            radius: self.radius * matrix.max_scale(),
        }
    }
}

/// A disc in the plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere2 {
    /// Center of the disc
    pub center: Vec2,
    /// Radius of the disc
    pub radius: f32,
}

impl_approx_eq!(Sphere2 { center, radius } []);

impl Sphere2 {
    /// Creates a new disc
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Whether `point` lies inside or on the disc
    pub fn contains_point(&self, point: &Vec2) -> bool {
        (point - self.center).norm_squared() <= self.radius * self.radius
    }
}
