//! Ray against plane

use super::LineContact;
use crate::foundation::math::constants;
use crate::geometry::{Plane3, Ray3};
use crate::intersector::{IntersectionKind, Intersector, IntersectorCache, IntersectorResult};

/// Where the ray crosses the plane
///
/// A ray parallel to the plane misses, unless it lies in the plane; then
/// the contact is its origin.
pub fn find_ray_plane(ray: &Ray3, plane: &Plane3) -> Option<LineContact> {
    let along = plane.normal.dot(&ray.direction);
    let distance = plane.distance_to(&ray.origin);

    if along.abs() > constants::ZERO_TOLERANCE {
        let t = -distance / along;
        (t >= 0.0).then(|| LineContact::new(&ray.origin, &ray.direction, t))
    } else if distance.abs() <= constants::ZERO_TOLERANCE {
        Some(LineContact::new(&ray.origin, &ray.direction, 0.0))
    } else {
        None
    }
}

/// Ray-plane query
#[derive(Debug)]
pub struct IntrRay3Plane3<'a> {
    ray: &'a Ray3,
    plane: &'a Plane3,
    contact: Option<LineContact>,
    kind: IntersectionKind,
}

impl<'a> IntrRay3Plane3<'a> {
    /// Query between a ray and a plane
    pub fn new(ray: &'a Ray3, plane: &'a Plane3) -> Self {
        Self {
            ray,
            plane,
            contact: None,
            kind: IntersectionKind::Empty,
        }
    }

    /// Contact of the last `find`
    pub fn contact(&self) -> Option<&LineContact> {
        self.contact.as_ref()
    }
}

impl Intersector for IntrRay3Plane3<'_> {
    fn test(&mut self, cache: Option<IntersectorCache>) -> IntersectorResult {
        IntersectorResult::new(find_ray_plane(self.ray, self.plane).is_some(), cache)
    }

    fn find(&mut self, cache: Option<IntersectorCache>) -> IntersectorResult {
        self.contact = find_ray_plane(self.ray, self.plane);
        let in_plane = self.plane.normal.dot(&self.ray.direction).abs() <= constants::ZERO_TOLERANCE;
        self.kind = match self.contact {
            None => IntersectionKind::Empty,
            Some(_) if in_plane => IntersectionKind::Ray,
            Some(_) => IntersectionKind::Point,
        };
        IntersectorResult::new(self.contact.is_some(), cache)
    }

    fn kind(&self) -> IntersectionKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;

    #[test]
    fn test_crossing() {
        let plane = Plane3::new(Vec3::y(), 2.0);
        let ray = Ray3::new(Vec3::zeros(), Vec3::new(0.0, 1.0, 1.0));
        let contact = find_ray_plane(&ray, &plane).expect("ray crosses the plane");
        assert_relative_eq!(contact.point, Vec3::new(0.0, 2.0, 2.0), epsilon = 1e-5);
        assert_relative_eq!(contact.t, 8.0f32.sqrt(), epsilon = 1e-5);
    }

    #[test]
    fn test_behind_and_parallel() {
        let plane = Plane3::new(Vec3::y(), 2.0);
        assert!(find_ray_plane(&Ray3::new(Vec3::zeros(), -Vec3::y()), &plane).is_none());
        assert!(find_ray_plane(&Ray3::new(Vec3::zeros(), Vec3::x()), &plane).is_none());
    }

    #[test]
    fn test_ray_in_plane() {
        let plane = Plane3::new(Vec3::y(), 2.0);
        let ray = Ray3::new(Vec3::new(1.0, 2.0, 0.0), Vec3::x());
        let mut query = IntrRay3Plane3::new(&ray, &plane);
        assert!(query.find(None).has_intersection);
        assert_eq!(query.kind(), IntersectionKind::Ray);
        assert_relative_eq!(query.contact().map_or(-1.0, |c| c.t), 0.0);
    }
}
