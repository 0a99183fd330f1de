//! Planes and point/plane classification

use serde::{Deserialize, Serialize};

use crate::foundation::math::{constants, Mat4, Mat4Ext, Vec3};

/// Which side of a plane something lies on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Entirely in the half-space the normal points into
    Positive,
    /// Entirely in the opposite half-space
    Negative,
    /// Straddles the plane, or lies within the epsilon band around it
    Overlap,
}

/// Plane `normal · p = constant`
///
/// The normal is assumed unit length; constructors normalize, direct field
/// writes are the caller's responsibility.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plane3 {
    /// Unit normal
    pub normal: Vec3,
    /// Signed distance of the plane from the origin along the normal
    pub constant: f32,
}

impl_approx_eq!(Plane3 { normal, constant } []);

impl Default for Plane3 {
    fn default() -> Self {
        Self {
            normal: Vec3::y(),
            constant: 0.0,
        }
    }
}

impl Plane3 {
    /// Plane from a normal and constant
    pub fn new(normal: Vec3, constant: f32) -> Self {
        Self { normal, constant }
    }

    /// Plane through `point` with the given unit normal
    pub fn from_point_normal(point: &Vec3, normal: Vec3) -> Self {
        Self {
            normal,
            constant: normal.dot(point),
        }
    }

    /// Plane through three points, normal following the winding
    /// `(p1 - p0) x (p2 - p0)`
    ///
    /// Collinear points give a zero normal.
    pub fn from_points(p0: &Vec3, p1: &Vec3, p2: &Vec3) -> Self {
        let normal = (p1 - p0)
            .cross(&(p2 - p0))
            .try_normalize(constants::ZERO_TOLERANCE)
            .unwrap_or_else(Vec3::zeros);
        Self::from_point_normal(p0, normal)
    }

    /// Signed distance of `point` from the plane
    pub fn distance_to(&self, point: &Vec3) -> f32 {
        self.normal.dot(point) - self.constant
    }

    /// Classify a point; distances within machine epsilon count as overlap
    pub fn which_side(&self, point: &Vec3) -> Side {
        let distance = self.distance_to(point);
        if distance < -constants::EPSILON {
            Side::Negative
        } else if distance > constants::EPSILON {
            Side::Positive
        } else {
            Side::Overlap
        }
    }

    /// Orthogonal projection of `point` onto the plane
    pub fn project(&self, point: &Vec3) -> Vec3 {
        point - self.normal * self.distance_to(point)
    }

    /// Plane with the opposite orientation
    #[must_use]
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            constant: -self.constant,
        }
    }

    /// Plane transformed by an affine matrix
    ///
    /// Returns `None` when the matrix is singular.
    pub fn transform(&self, matrix: &Mat4) -> Option<Self> {
        let normal_matrix = matrix.upper_3x3().try_inverse()?.transpose();
        let normal = (normal_matrix * self.normal).try_normalize(constants::ZERO_TOLERANCE)?;
        let point = matrix.transform_position(&(self.normal * self.constant));
        Some(Self::from_point_normal(&point, normal))
    }
}
