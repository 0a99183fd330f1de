//! Oriented box merge and fit
//!
//! # Merging
//!
//! Two oriented boxes are merged by averaging their orientations as
//! quaternions and then growing a box in the averaged frame until it
//! contains all sixteen corners. Both inputs are first normalized with
//! [`Box3::swap_to_major_axis`] so that equivalent frames produce nearby
//! quaternions.
//!
//! # Fitting
//!
//! [`compute_oriented_box`] aligns the box with the principal axes of the
//! point covariance; [`compute_aligned_box`] uses the world axes.

use super::positions::PositionData;
use crate::foundation::math::{constants, Mat3, Mat3Ext, Quat, Quaternion, Unit, Vec3};
use crate::foundation::quaternion::QuatExt;
use crate::geometry::Box3;

/// Raise near-zero extents so fitted boxes are never empty
fn floor_extents(extents: &mut Vec3) {
    for extent in extents.iter_mut() {
        if *extent <= constants::EPSILON {
            *extent = constants::DEGENERATE_EXTENT;
        }
    }
}

/// Average of two box orientations
///
/// Falls back to `q0` when the quaternions cancel out.
fn average_orientation(q0: &Quat, q1: &Quat) -> Quat {
    let c0 = q0.coords;
    let mut c1 = q1.coords;
    if c0.dot(&c1) < 0.0 {
        c1 = -c1;
    }
    let sum = c0 + c1;
    let length = sum.norm();
    if length < constants::ZERO_TOLERANCE {
        log::debug!("box orientations cancel out, keeping the first frame");
        return *q0;
    }
    Unit::new_unchecked(Quaternion::from_vector(sum / length))
}

/// Box in the frame `axes` around `origin` that contains every corner
fn fit_corners(origin: Vec3, axes: [Vec3; 3], corners: impl Iterator<Item = Vec3>) -> Box3 {
    let mut min = Vec3::zeros();
    let mut max = Vec3::zeros();
    for corner in corners {
        let diff = corner - origin;
        for j in 0..3 {
            let dot = diff.dot(&axes[j]);
            min[j] = min[j].min(dot);
            max[j] = max[j].max(dot);
        }
    }

    let mut center = origin;
    for j in 0..3 {
        center += axes[j] * (0.5 * (min[j] + max[j]));
    }
    Box3::new(center, axes, (max - min) * 0.5)
}

/// Box containing both `a` and `b`
///
/// The result is conservative: it contains both inputs but is not the
/// minimal enclosing box.
pub fn merge_boxes(a: &Box3, b: &Box3) -> Box3 {
    let a = a.major_axis_aligned();
    let b = b.major_axis_aligned();

    let q0 = Quat::from_rotation_matrix3(&a.rotation());
    let q1 = Quat::from_rotation_matrix3(&b.rotation());
    let rotation = average_orientation(&q0, &q1).to_rotation_matrix3();
    let axes = [
        rotation.column(0).into_owned(),
        rotation.column(1).into_owned(),
        rotation.column(2).into_owned(),
    ];

    let origin = (a.center + b.center) * 0.5;
    let corners = a.compute_vertices().into_iter().chain(b.compute_vertices());
    fit_corners(origin, axes, corners)
}

/// World-aligned box containing two world-aligned boxes
pub fn merge_aligned_boxes(a: &Box3, b: &Box3) -> Box3 {
    let min = (a.center - a.extents).inf(&(b.center - b.extents));
    let max = (a.center + a.extents).sup(&(b.center + b.extents));
    Box3::from_min_max(&min, &max)
}

/// World-aligned box containing every point
///
/// An empty input gives the default (empty) box.
pub fn compute_aligned_box(points: &PositionData<'_>) -> Box3 {
    let mut iter = points.iter();
    let Some(first) = iter.next() else {
        log::warn!("aligned box requested for an empty point set");
        return Box3::default();
    };

    let (min, max) = iter.fold((first, first), |(min, max), p| (min.inf(&p), max.sup(&p)));
    let mut result = Box3::from_min_max(&min, &max);
    floor_extents(&mut result.extents);
    result
}

/// Box aligned with the principal axes of the points
///
/// The frame comes from the eigenvectors of the covariance matrix; the box
/// is then grown to contain every point and re-framed toward the world
/// axes. An empty input gives the default (empty) box.
pub fn compute_oriented_box(points: &PositionData<'_>) -> Box3 {
    let count = points.len();
    if count == 0 {
        log::warn!("oriented box requested for an empty point set");
        return Box3::default();
    }
    let inv_count = 1.0 / count as f32;

    let mean = points.iter().fold(Vec3::zeros(), |sum, p| sum + p) * inv_count;
    let covariance = points.iter().fold(Mat3::zeros(), |sum, p| {
        let diff = p - mean;
        sum + diff * diff.transpose()
    }) * inv_count;

    let eigen = covariance.eigen_decomposition();
    let axes = [
        eigen.rotation.column(0).into_owned(),
        eigen.rotation.column(1).into_owned(),
        eigen.rotation.column(2).into_owned(),
    ];

    let mut iter = points.iter().map(|p| {
        let diff = p - mean;
        Vec3::new(diff.dot(&axes[0]), diff.dot(&axes[1]), diff.dot(&axes[2]))
    });
    let first = iter.next().unwrap_or_else(Vec3::zeros);
    let (min, max) = iter.fold((first, first), |(min, max), p| (min.inf(&p), max.sup(&p)));

    let mut center = mean;
    for j in 0..3 {
        center += axes[j] * (0.5 * (min[j] + max[j]));
    }
    let mut extents = (max - min) * 0.5;
    floor_extents(&mut extents);

    Box3::new(center, axes, extents).major_axis_aligned()
}
