//! Triangles with closest-point queries
//!
//! The closest point is found by minimizing the squared distance
//! `Q(s, t)` over the parametric domain `s >= 0, t >= 0, s + t <= 1`, where
//! the triangle is `v0 + s * (v1 - v0) + t * (v2 - v0)`. The unconstrained
//! minimum falls into one of seven regions around the domain; each region
//! clamps to the matching vertex or edge.

use nalgebra::SVector;
use serde::{Deserialize, Serialize};

use super::plane::Plane3;
use crate::foundation::math::{constants, Vec2, Vec3};

/// Minimizer `(s, t)` of `Q(s,t) = a00 s^2 + 2 a01 s t + a11 t^2 + 2 b0 s + 2 b1 t + c`
/// over the triangle domain.
fn closest_parameters(a00: f32, a01: f32, a11: f32, b0: f32, b1: f32) -> (f32, f32) {
    let det = a00.mul_add(a11, -(a01 * a01)).abs();
    let mut s = a01.mul_add(b1, -(a11 * b0));
    let mut t = a01.mul_add(b0, -(a00 * b1));

    // clamp helpers along the edges t = 0 and s = 0
    let along_edge0 = |b0: f32| if b0 >= 0.0 { 0.0 } else if -b0 >= a00 { 1.0 } else { -b0 / a00 };
    let along_edge1 = |b1: f32| if b1 >= 0.0 { 0.0 } else if -b1 >= a11 { 1.0 } else { -b1 / a11 };
    let edge_denom = 2.0f32.mul_add(-a01, a00) + a11;

    if s + t <= det {
        if s < 0.0 {
            if t < 0.0 {
                // region 4
                if b0 < 0.0 {
                    (along_edge0(b0), 0.0)
                } else {
                    (0.0, along_edge1(b1))
                }
            } else {
                // region 3
                (0.0, along_edge1(b1))
            }
        } else if t < 0.0 {
            // region 5
            (along_edge0(b0), 0.0)
        } else {
            // region 0
            let inv_det = 1.0 / det;
            s *= inv_det;
            t *= inv_det;
            (s, t)
        }
    } else if s < 0.0 {
        // region 2
        let tmp0 = a01 + b0;
        let tmp1 = a11 + b1;
        if tmp1 > tmp0 {
            let numer = tmp1 - tmp0;
            if numer >= edge_denom {
                (1.0, 0.0)
            } else {
                let s = numer / edge_denom;
                (s, 1.0 - s)
            }
        } else if tmp1 <= 0.0 {
            (0.0, 1.0)
        } else {
            (0.0, along_edge1(b1))
        }
    } else if t < 0.0 {
        // region 6
        let tmp0 = a01 + b1;
        let tmp1 = a00 + b0;
        if tmp1 > tmp0 {
            let numer = tmp1 - tmp0;
            if numer >= edge_denom {
                (0.0, 1.0)
            } else {
                let t = numer / edge_denom;
                (1.0 - t, t)
            }
        } else if tmp1 <= 0.0 {
            (1.0, 0.0)
        } else {
            (along_edge0(b0), 0.0)
        }
    } else {
        // region 1
        let numer = a11 + b1 - a01 - b0;
        if numer <= 0.0 {
            (0.0, 1.0)
        } else if numer >= edge_denom {
            (1.0, 0.0)
        } else {
            let s = numer / edge_denom;
            (s, 1.0 - s)
        }
    }
}

fn closest_on_segment<const D: usize>(a: &SVector<f32, D>, b: &SVector<f32, D>, point: &SVector<f32, D>) -> SVector<f32, D> {
    let edge = b - a;
    let length_sq = edge.norm_squared();
    if length_sq <= constants::ZERO_TOLERANCE {
        return *a;
    }
    let t = ((point - a).dot(&edge) / length_sq).clamp(0.0, 1.0);
    a + edge * t
}

fn closest_point_on_triangle<const D: usize>(vertices: &[SVector<f32, D>; 3], point: &SVector<f32, D>) -> SVector<f32, D> {
    let diff = vertices[0] - point;
    let edge0 = vertices[1] - vertices[0];
    let edge1 = vertices[2] - vertices[0];
    let a00 = edge0.norm_squared();
    let a01 = edge0.dot(&edge1);
    let a11 = edge1.norm_squared();

    let det = a00.mul_add(a11, -(a01 * a01)).abs();
    if det <= constants::ZERO_TOLERANCE * a00 * a11 || a00 <= constants::ZERO_TOLERANCE || a11 <= constants::ZERO_TOLERANCE {
        // Degenerate (collinear or collapsed): closest over the three edges
        let candidates = [
            closest_on_segment(&vertices[0], &vertices[1], point),
            closest_on_segment(&vertices[1], &vertices[2], point),
            closest_on_segment(&vertices[2], &vertices[0], point),
        ];
        return candidates
            .into_iter()
            .min_by(|a, b| (a - point).norm_squared().total_cmp(&(b - point).norm_squared()))
            .unwrap_or(vertices[0]);
    }

    let (s, t) = closest_parameters(a00, a01, a11, diff.dot(&edge0), diff.dot(&edge1));
    vertices[0] + edge0 * s + edge1 * t
}

/// A triangle in the plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle2 {
    /// Vertices in winding order
    pub vertices: [Vec2; 3],
}

impl_approx_eq!(Triangle2 {} [vertices]);

impl Triangle2 {
    /// Creates a new triangle
    pub fn new(v0: Vec2, v1: Vec2, v2: Vec2) -> Self {
        Self { vertices: [v0, v1, v2] }
    }

    /// Closest point of the triangle to `point`
    pub fn closest_point(&self, point: &Vec2) -> Vec2 {
        closest_point_on_triangle(&self.vertices, point)
    }

    /// Distance from `point` to the triangle (0 inside)
    pub fn distance_to(&self, point: &Vec2) -> f32 {
        (self.closest_point(point) - point).norm()
    }
}

/// A triangle in space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle3 {
    /// Vertices in winding order
    pub vertices: [Vec3; 3],
}

impl_approx_eq!(Triangle3 {} [vertices]);

impl Triangle3 {
    /// Creates a new triangle
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self { vertices: [v0, v1, v2] }
    }

    /// Unit normal (right-hand rule); zero for degenerate triangles
    pub fn normal(&self) -> Vec3 {
        (self.vertices[1] - self.vertices[0])
            .cross(&(self.vertices[2] - self.vertices[0]))
            .try_normalize(constants::ZERO_TOLERANCE)
            .unwrap_or_else(Vec3::zeros)
    }

    /// Calculates the centroid (center point) of the triangle
    pub fn centroid(&self) -> Vec3 {
        (self.vertices[0] + self.vertices[1] + self.vertices[2]) / 3.0
    }

    /// Area of the triangle
    pub fn area(&self) -> f32 {
        0.5 * (self.vertices[1] - self.vertices[0])
            .cross(&(self.vertices[2] - self.vertices[0]))
            .norm()
    }

    /// Supporting plane
    pub fn plane(&self) -> Plane3 {
        Plane3::from_points(&self.vertices[0], &self.vertices[1], &self.vertices[2])
    }

    /// Closest point of the triangle to `point`
    pub fn closest_point(&self, point: &Vec3) -> Vec3 {
        closest_point_on_triangle(&self.vertices, point)
    }

    /// Distance from `point` to the triangle
    pub fn distance_to(&self, point: &Vec3) -> f32 {
        (self.closest_point(point) - point).norm()
    }
}
