//! Sphere merge and fit

use super::positions::PositionData;
use crate::foundation::math::{constants, Vec2, Vec3};
use crate::geometry::{Sphere2, Sphere3};

/// Smallest sphere containing both `a` and `b`
///
/// If one sphere already contains the other it is returned unchanged.
/// Otherwise the result touches both on the line through their centers.
pub fn merge_spheres(a: &Sphere3, b: &Sphere3) -> Sphere3 {
    let diff = b.center - a.center;
    let length_sq = diff.norm_squared();
    let radius_diff = b.radius - a.radius;

    if radius_diff * radius_diff >= length_sq {
        return if radius_diff >= 0.0 { *b } else { *a };
    }

    let length = length_sq.sqrt();
    let center = if length > constants::ZERO_TOLERANCE {
        a.center + diff * ((length + radius_diff) / (2.0 * length))
    } else {
        a.center
    };
    Sphere3::new(center, 0.5 * (length + a.radius + b.radius))
}

/// Smallest disc containing both `a` and `b`
pub fn merge_spheres2(a: &Sphere2, b: &Sphere2) -> Sphere2 {
    let diff: Vec2 = b.center - a.center;
    let length_sq = diff.norm_squared();
    let radius_diff = b.radius - a.radius;

    if radius_diff * radius_diff >= length_sq {
        return if radius_diff >= 0.0 { *b } else { *a };
    }

    let length = length_sq.sqrt();
    let center = if length > constants::ZERO_TOLERANCE {
        a.center + diff * ((length + radius_diff) / (2.0 * length))
    } else {
        a.center
    };
    Sphere2::new(center, 0.5 * (length + a.radius + b.radius))
}

/// Sphere centered on the mean of the points, reaching the farthest one
///
/// Not the minimal sphere, but cheap and always containing. An empty input
/// gives the empty default sphere.
pub fn compute_average_sphere(points: &PositionData<'_>) -> Sphere3 {
    let count = points.len();
    if count == 0 {
        log::warn!("average sphere requested for an empty point set");
        return Sphere3::default();
    }

    let center = points.iter().fold(Vec3::zeros(), |sum, p| sum + p) / count as f32;
    let radius_sq = points
        .iter()
        .map(|p| (p - center).norm_squared())
        .fold(0.0f32, f32::max);
    Sphere3::new(center, radius_sq.sqrt())
}
