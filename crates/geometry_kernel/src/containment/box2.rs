//! Planar box merge

use crate::foundation::math::{constants, Vec2};
use crate::geometry::Box2;

/// Box containing both `a` and `b`
///
/// The first axis is the sign-aligned average of the input first axes; the
/// second is its counter-clockwise perpendicular.
pub fn merge_boxes2(a: &Box2, b: &Box2) -> Box2 {
    let origin = (a.center + b.center) * 0.5;

    let sum = if a.axes[0].dot(&b.axes[0]) >= 0.0 {
        a.axes[0] + b.axes[0]
    } else {
        a.axes[0] - b.axes[0]
    };
    let axis0 = sum
        .try_normalize(constants::ZERO_TOLERANCE)
        .unwrap_or(a.axes[0]);
    let axes = [axis0, Vec2::new(-axis0.y, axis0.x)];

    let mut min = Vec2::zeros();
    let mut max = Vec2::zeros();
    for corner in a.compute_vertices().into_iter().chain(b.compute_vertices()) {
        let diff = corner - origin;
        for j in 0..2 {
            let dot = diff.dot(&axes[j]);
            min[j] = min[j].min(dot);
            max[j] = max[j].max(dot);
        }
    }

    let center = origin + axes[0] * (0.5 * (min[0] + max[0])) + axes[1] * (0.5 * (min[1] + max[1]));
    Box2::new(center, axes, (max - min) * 0.5)
}
