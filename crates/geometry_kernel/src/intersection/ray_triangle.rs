//! Ray against triangle
//!
//! Möller-Trumbore: solves `origin + t * direction = v0 + u * e1 + v * e2`
//! directly with Cramer's rule, without first intersecting the supporting
//! plane. See "Fast, Minimum Storage Ray/Triangle Intersection".

use serde::{Deserialize, Serialize};

use crate::foundation::math::{constants, Vec3};
use crate::geometry::{Ray3, Triangle3};
use crate::intersector::{IntersectionKind, Intersector, IntersectorCache, IntersectorResult};

/// Ray-triangle hit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriangleHit {
    /// Ray parameter
    pub t: f32,
    /// Hit position
    pub point: Vec3,
    /// Barycentric weights of the three vertices
    pub barycentric: Vec3,
}

/// Where the ray hits the triangle, from either side
pub fn find_ray_triangle(ray: &Ray3, triangle: &Triangle3) -> Option<TriangleHit> {
    let [v0, v1, v2] = triangle.vertices;
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction.cross(&edge2);
    let det = edge1.dot(&h);
    // parallel or degenerate
    if det.abs() < constants::ZERO_TOLERANCE {
        return None;
    }

    let inv_det = 1.0 / det;
    let s = ray.origin - v0;
    let u = inv_det * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&edge1);
    let v = inv_det * ray.direction.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = inv_det * edge2.dot(&q);
    (t >= 0.0).then(|| TriangleHit {
        t,
        point: ray.point_at(t),
        barycentric: Vec3::new(1.0 - u - v, u, v),
    })
}

/// Ray-triangle query
#[derive(Debug)]
pub struct IntrRay3Triangle3<'a> {
    ray: &'a Ray3,
    triangle: &'a Triangle3,
    hit: Option<TriangleHit>,
}

impl<'a> IntrRay3Triangle3<'a> {
    /// Query between a ray and a triangle
    pub fn new(ray: &'a Ray3, triangle: &'a Triangle3) -> Self {
        Self { ray, triangle, hit: None }
    }

    /// Hit of the last `find`
    pub fn hit(&self) -> Option<&TriangleHit> {
        self.hit.as_ref()
    }
}

impl Intersector for IntrRay3Triangle3<'_> {
    fn test(&mut self, cache: Option<IntersectorCache>) -> IntersectorResult {
        IntersectorResult::new(find_ray_triangle(self.ray, self.triangle).is_some(), cache)
    }

    fn find(&mut self, cache: Option<IntersectorCache>) -> IntersectorResult {
        self.hit = find_ray_triangle(self.ray, self.triangle);
        IntersectorResult::new(self.hit.is_some(), cache)
    }

    fn kind(&self) -> IntersectionKind {
        if self.hit.is_some() {
            IntersectionKind::Point
        } else {
            IntersectionKind::Empty
        }
    }
}
