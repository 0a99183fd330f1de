//! Envelopment tests
//!
//! Each test answers whether the first volume fully contains the second.
//! Touching boundaries count as contained.

use crate::geometry::{Box2, Box3, Sphere2, Sphere3};

/// Whether `outer` contains every corner of `inner`
pub fn box_envelops_box(outer: &Box3, inner: &Box3) -> bool {
    inner
        .compute_vertices()
        .iter()
        .all(|corner| outer.contains_point(corner, 0.0))
}

/// Whether `outer` contains the whole sphere
pub fn box_envelops_sphere(outer: &Box3, sphere: &Sphere3) -> bool {
    let local = outer.local_coordinates(&sphere.center);
    (0..3).all(|i| local[i].abs() + sphere.radius <= outer.extents[i])
}

/// Whether `outer` contains the whole of `inner`
pub fn sphere_envelops_sphere(outer: &Sphere3, inner: &Sphere3) -> bool {
    (inner.center - outer.center).norm() + inner.radius <= outer.radius
}

/// Whether `outer` contains every corner of `inner`
pub fn box2_envelops_box2(outer: &Box2, inner: &Box2) -> bool {
    inner
        .compute_vertices()
        .iter()
        .all(|corner| outer.contains_point(corner, 0.0))
}

/// Whether `outer` contains the whole disc
pub fn box2_envelops_sphere2(outer: &Box2, disc: &Sphere2) -> bool {
    let diff = disc.center - outer.center;
    (0..2).all(|i| diff.dot(&outer.axes[i]).abs() + disc.radius <= outer.extents[i])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Vec2, Vec3};

    #[test]
    fn test_box_envelops_box() {
        let outer = Box3::aligned(Vec3::zeros(), Vec3::repeat(2.0));
        let inner = Box3::aligned(Vec3::new(0.5, 0.0, 0.0), Vec3::repeat(1.0));
        let poking = Box3::aligned(Vec3::new(1.5, 0.0, 0.0), Vec3::repeat(1.0));
        assert!(box_envelops_box(&outer, &inner));
        assert!(!box_envelops_box(&outer, &poking));
        assert!(!box_envelops_box(&inner, &outer));
    }

    #[test]
    fn test_box_envelops_sphere() {
        let outer = Box3::aligned(Vec3::zeros(), Vec3::new(2.0, 1.0, 1.0));
        assert!(box_envelops_sphere(&outer, &Sphere3::new(Vec3::new(1.0, 0.0, 0.0), 1.0)));
        assert!(!box_envelops_sphere(&outer, &Sphere3::new(Vec3::zeros(), 1.5)));
    }

    #[test]
    fn test_sphere_envelops_sphere() {
        let outer = Sphere3::new(Vec3::zeros(), 3.0);
        assert!(sphere_envelops_sphere(&outer, &Sphere3::new(Vec3::new(1.0, 0.0, 0.0), 2.0)));
        assert!(!sphere_envelops_sphere(&outer, &Sphere3::new(Vec3::new(1.5, 0.0, 0.0), 2.0)));
    }

    #[test]
    fn test_planar_envelopment() {
        let outer = Box2::new(Vec2::zeros(), [Vec2::x(), Vec2::y()], Vec2::new(3.0, 2.0));
        let inner = Box2::new(Vec2::new(1.0, 0.0), [Vec2::x(), Vec2::y()], Vec2::new(1.0, 1.0));
        assert!(box2_envelops_box2(&outer, &inner));
        assert!(!box2_envelops_box2(&inner, &outer));
        assert!(box2_envelops_sphere2(&outer, &Sphere2::new(Vec2::zeros(), 2.0)));
        assert!(!box2_envelops_sphere2(&outer, &Sphere2::new(Vec2::new(2.5, 0.0), 1.0)));
    }
}
