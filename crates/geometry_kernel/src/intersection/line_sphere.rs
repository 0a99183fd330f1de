//! Lines and rays against spheres
//!
//! Substituting `origin + t * direction` into `|X - C|^2 = r^2` with a unit
//! direction gives `t^2 + 2 a1 t + a0 = 0`, where `a0 = |origin - C|^2 - r^2`
//! and `a1 = direction . (origin - C)`.

use super::LineContact;
use crate::foundation::math::{constants, Vec3};
use crate::geometry::{Line3, Ray3, Sphere3};
use crate::intersector::{IntersectionKind, Intersector, IntersectorCache, IntersectorResult};

fn coefficients(origin: &Vec3, direction: &Vec3, sphere: &Sphere3) -> (f32, f32) {
    let diff = origin - sphere.center;
    (diff.norm_squared() - sphere.radius * sphere.radius, direction.dot(&diff))
}

/// Whether the line meets the sphere
pub fn test_line_sphere(line: &Line3, sphere: &Sphere3) -> bool {
    let (a0, a1) = coefficients(&line.origin, &line.direction, sphere);
    a1 * a1 - a0 >= 0.0
}

/// Whether the ray meets the sphere
pub fn test_ray_sphere(ray: &Ray3, sphere: &Sphere3) -> bool {
    let (a0, a1) = coefficients(&ray.origin, &ray.direction, sphere);
    if a0 <= 0.0 {
        return true;
    }
    if a1 >= 0.0 {
        return false;
    }
    a1 * a1 >= a0
}

/// Points where the line meets the sphere: none, one (tangent) or two
pub fn find_line_sphere(line: &Line3, sphere: &Sphere3) -> Vec<LineContact> {
    let (a0, a1) = coefficients(&line.origin, &line.direction, sphere);
    let discriminant = a1 * a1 - a0;
    let at = |t| LineContact::new(&line.origin, &line.direction, t);
    if discriminant < 0.0 {
        Vec::new()
    } else if discriminant >= constants::ZERO_TOLERANCE {
        let root = discriminant.sqrt();
        vec![at(-a1 - root), at(-a1 + root)]
    } else {
        vec![at(-a1)]
    }
}

/// Points where the ray meets the sphere
///
/// A ray starting inside has exactly one point, where it leaves.
pub fn find_ray_sphere(ray: &Ray3, sphere: &Sphere3) -> Vec<LineContact> {
    let (a0, a1) = coefficients(&ray.origin, &ray.direction, sphere);
    let at = |t| LineContact::new(&ray.origin, &ray.direction, t);
    if a0 <= 0.0 {
        let root = (a1 * a1 - a0).sqrt();
        return vec![at(-a1 + root)];
    }
    if a1 >= 0.0 {
        return Vec::new();
    }
    let discriminant = a1 * a1 - a0;
    if discriminant < 0.0 {
        Vec::new()
    } else if discriminant >= constants::ZERO_TOLERANCE {
        let root = discriminant.sqrt();
        vec![at(-a1 - root), at(-a1 + root)]
    } else {
        vec![at(-a1)]
    }
}

fn contact_kind(contacts: &[LineContact]) -> IntersectionKind {
    if contacts.is_empty() {
        IntersectionKind::Empty
    } else {
        IntersectionKind::Point
    }
}

/// Line-sphere query
#[derive(Debug)]
pub struct IntrLine3Sphere3<'a> {
    line: &'a Line3,
    sphere: &'a Sphere3,
    contacts: Vec<LineContact>,
    kind: IntersectionKind,
}

impl<'a> IntrLine3Sphere3<'a> {
    /// Query between a line and a sphere
    pub fn new(line: &'a Line3, sphere: &'a Sphere3) -> Self {
        Self {
            line,
            sphere,
            contacts: Vec::new(),
            kind: IntersectionKind::Empty,
        }
    }

    /// Contacts of the last `find`, ordered by `t`
    pub fn contacts(&self) -> &[LineContact] {
        &self.contacts
    }
}

impl Intersector for IntrLine3Sphere3<'_> {
    fn test(&mut self, cache: Option<IntersectorCache>) -> IntersectorResult {
        IntersectorResult::new(test_line_sphere(self.line, self.sphere), cache)
    }

    fn find(&mut self, cache: Option<IntersectorCache>) -> IntersectorResult {
        self.contacts = find_line_sphere(self.line, self.sphere);
        self.kind = contact_kind(&self.contacts);
        IntersectorResult::new(!self.contacts.is_empty(), cache)
    }

    fn kind(&self) -> IntersectionKind {
        self.kind
    }
}

/// Ray-sphere query
#[derive(Debug)]
pub struct IntrRay3Sphere3<'a> {
    ray: &'a Ray3,
    sphere: &'a Sphere3,
    contacts: Vec<LineContact>,
    kind: IntersectionKind,
}

impl<'a> IntrRay3Sphere3<'a> {
    /// Query between a ray and a sphere
    pub fn new(ray: &'a Ray3, sphere: &'a Sphere3) -> Self {
        Self {
            ray,
            sphere,
            contacts: Vec::new(),
            kind: IntersectionKind::Empty,
        }
    }

    /// Contacts of the last `find`, ordered by `t`
    pub fn contacts(&self) -> &[LineContact] {
        &self.contacts
    }
}

impl Intersector for IntrRay3Sphere3<'_> {
    fn test(&mut self, cache: Option<IntersectorCache>) -> IntersectorResult {
        IntersectorResult::new(test_ray_sphere(self.ray, self.sphere), cache)
    }

    fn find(&mut self, cache: Option<IntersectorCache>) -> IntersectorResult {
        self.contacts = find_ray_sphere(self.ray, self.sphere);
        self.kind = contact_kind(&self.contacts);
        IntersectorResult::new(!self.contacts.is_empty(), cache)
    }

    fn kind(&self) -> IntersectionKind {
        self.kind
    }
}
