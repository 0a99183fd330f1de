//! Oriented boxes
//!
//! A box is a center, an orthonormal axis frame and one non-negative
//! half-extent per axis. Any extent `<= 0` makes the box empty; the default
//! box is empty with the world axes as its frame.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Mat3, Mat3Ext, Mat4, Mat4Ext, Vec2, Vec3};

/// Oriented box in space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Box3 {
    /// Box center
    pub center: Vec3,
    /// Orthonormal axes
    pub axes: [Vec3; 3],
    /// Half-extent along each axis
    pub extents: Vec3,
}

impl_approx_eq!(Box3 { center, extents } [axes]);

impl Default for Box3 {
    fn default() -> Self {
        Self {
            center: Vec3::zeros(),
            axes: [Vec3::x(), Vec3::y(), Vec3::z()],
            extents: Vec3::zeros(),
        }
    }
}

impl Box3 {
    /// Box from its center, axes and extents
    pub fn new(center: Vec3, axes: [Vec3; 3], extents: Vec3) -> Self {
        Self { center, axes, extents }
    }

    /// World-aligned box of half-size 1 around the origin
    pub fn unit() -> Self {
        Self {
            extents: Vec3::repeat(1.0),
            ..Self::default()
        }
    }

    /// World-aligned box around `center`
    pub fn aligned(center: Vec3, extents: Vec3) -> Self {
        Self {
            center,
            extents,
            ..Self::default()
        }
    }

    /// World-aligned box spanning `min..max`
    pub fn from_min_max(min: &Vec3, max: &Vec3) -> Self {
        Self::aligned((min + max) * 0.5, (max - min) * 0.5)
    }

    /// Whether any extent is non-positive
    pub fn is_empty(&self) -> bool {
        self.extents.iter().any(|&extent| extent <= 0.0)
    }

    /// Matrix whose columns are the box axes
    pub fn rotation(&self) -> Mat3 {
        Mat3::from_column_vectors(&self.axes)
    }

    /// The eight corners
    ///
    /// Corners 0..4 lie on the `-axes[2]` face and 4..8 on the `+axes[2]`
    /// face, each walking `(-,-) (+,-) (+,+) (-,+)` over axes 0 and 1.
    pub fn compute_vertices(&self) -> [Vec3; 8] {
        let a0 = self.axes[0] * self.extents.x;
        let a1 = self.axes[1] * self.extents.y;
        let a2 = self.axes[2] * self.extents.z;
        let c = self.center;
        [
            c - a0 - a1 - a2,
            c + a0 - a1 - a2,
            c + a0 + a1 - a2,
            c - a0 + a1 - a2,
            c - a0 - a1 + a2,
            c + a0 - a1 + a2,
            c + a0 + a1 + a2,
            c - a0 + a1 + a2,
        ]
    }

    /// Coordinates of `point` in the box frame, relative to the center
    pub fn local_coordinates(&self, point: &Vec3) -> Vec3 {
        let diff = point - self.center;
        Vec3::new(diff.dot(&self.axes[0]), diff.dot(&self.axes[1]), diff.dot(&self.axes[2]))
    }

    /// Whether `point` is inside, allowing `slack` beyond each face
    pub fn contains_point(&self, point: &Vec3, slack: f32) -> bool {
        let local = self.local_coordinates(point);
        (0..3).all(|i| local[i].abs() <= self.extents[i] + slack)
    }

    /// World-aligned bounds of the box as `(min, max)`
    pub fn min_max(&self) -> (Vec3, Vec3) {
        let reach = Vec3::from_fn(|row, _| {
            (0..3).map(|i| self.axes[i][row].abs() * self.extents[i]).sum::<f32>()
        });
        (self.center - reach, self.center + reach)
    }

    /// Reorder and re-sign the axes so axis 0, 1, 2 line up as closely as
    /// possible with world X, Y, Z and form a right-handed frame
    ///
    /// Extents follow their axes. Two boxes describing similar volumes end
    /// up with similar frames, which keeps orientation averaging tight.
    pub fn swap_to_major_axis(&mut self) {
        if self.axes[1].x * self.axes[1].x > self.axes[0].x * self.axes[0].x {
            self.swap_axes(0, 1);
        }
        if self.axes[2].x * self.axes[2].x > self.axes[0].x * self.axes[0].x {
            self.swap_axes(0, 2);
        }
        if self.axes[2].y * self.axes[2].y > self.axes[1].y * self.axes[1].y {
            self.swap_axes(1, 2);
        }

        if self.axes[0].x < 0.0 {
            self.axes[0] = -self.axes[0];
        }
        if self.axes[1].y < 0.0 {
            self.axes[1] = -self.axes[1];
        }
        if self.axes[2].z < 0.0 {
            self.axes[2] = -self.axes[2];
        }
        if self.axes[0].cross(&self.axes[1]).dot(&self.axes[2]) < 0.0 {
            self.axes[0] = -self.axes[0];
        }
    }

    /// Copy of the box with its axes aligned by [`Self::swap_to_major_axis`]
    #[must_use]
    pub fn major_axis_aligned(mut self) -> Self {
        self.swap_to_major_axis();
        self
    }

    fn swap_axes(&mut self, a: usize, b: usize) {
        self.axes.swap(a, b);
        self.extents.swap_rows(a, b);
    }

    /// Box transformed by an affine matrix
    ///
    /// Axes are re-normalized and the extents absorb each axis' scale. A
    /// shear does not keep the axes orthogonal; the result is then only
    /// approximate.
    pub fn transform(&self, matrix: &Mat4) -> Self {
        let mut result = Self {
            center: matrix.transform_position(&self.center),
            ..Self::default()
        };
        for i in 0..3 {
            let axis = matrix.transform_direction(&self.axes[i]);
            let length = axis.norm();
            if length > 0.0 {
                result.axes[i] = axis / length;
            }
            result.extents[i] = self.extents[i] * length;
        }
        result
    }
}

/// Oriented box in the plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Box2 {
    /// Box center
    pub center: Vec2,
    /// Orthonormal axes
    pub axes: [Vec2; 2],
    /// Half-extent along each axis
    pub extents: Vec2,
}

impl_approx_eq!(Box2 { center, extents } [axes]);

impl Default for Box2 {
    fn default() -> Self {
        Self {
            center: Vec2::zeros(),
            axes: [Vec2::x(), Vec2::y()],
            extents: Vec2::zeros(),
        }
    }
}

impl Box2 {
    /// Box from its center, axes and extents
    pub fn new(center: Vec2, axes: [Vec2; 2], extents: Vec2) -> Self {
        Self { center, axes, extents }
    }

    /// Whether any extent is non-positive
    pub fn is_empty(&self) -> bool {
        self.extents.iter().any(|&extent| extent <= 0.0)
    }

    /// The four corners, counter-clockwise starting at `(-,-)`
    pub fn compute_vertices(&self) -> [Vec2; 4] {
        let a0 = self.axes[0] * self.extents.x;
        let a1 = self.axes[1] * self.extents.y;
        let c = self.center;
        [c - a0 - a1, c + a0 - a1, c + a0 + a1, c - a0 + a1]
    }

    /// Whether `point` is inside, allowing `slack` beyond each edge
    pub fn contains_point(&self, point: &Vec2, slack: f32) -> bool {
        let diff = point - self.center;
        (0..2).all(|i| diff.dot(&self.axes[i]).abs() <= self.extents[i] + slack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Quat;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_box_is_empty() {
        assert!(Box3::default().is_empty());
        assert!(!Box3::unit().is_empty());
        assert!(Box3::aligned(Vec3::zeros(), Vec3::new(1.0, 0.0, 1.0)).is_empty());
    }

    #[test]
    fn test_vertex_order() {
        let vertices = Box3::unit().compute_vertices();
        assert_relative_eq!(vertices[0], Vec3::new(-1.0, -1.0, -1.0));
        assert_relative_eq!(vertices[2], Vec3::new(1.0, 1.0, -1.0));
        assert_relative_eq!(vertices[5], Vec3::new(1.0, -1.0, 1.0));
        assert_relative_eq!(vertices[7], Vec3::new(-1.0, 1.0, 1.0));
    }

    #[test]
    fn test_swap_to_major_axis_restores_world_frame() {
        let mut permuted = Box3::new(
            Vec3::zeros(),
            [Vec3::z(), -Vec3::x(), Vec3::y()],
            Vec3::new(3.0, 1.0, 2.0),
        );
        permuted.swap_to_major_axis();
        assert_relative_eq!(permuted.axes[0], Vec3::x());
        assert_relative_eq!(permuted.axes[1], Vec3::y());
        assert_relative_eq!(permuted.axes[2], Vec3::z());
        assert_relative_eq!(permuted.extents, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_swap_to_major_axis_keeps_right_handed() {
        let rotation = Quat::from_axis_angle(&Vec3::y_axis(), 2.5);
        let mut b = Box3::new(
            Vec3::zeros(),
            [rotation * Vec3::x(), rotation * Vec3::y(), rotation * Vec3::z()],
            Vec3::new(1.0, 2.0, 3.0),
        );
        let corners_before = b.compute_vertices();
        b.swap_to_major_axis();
        assert!(b.axes[0].cross(&b.axes[1]).dot(&b.axes[2]) > 0.0);
        // the same volume: every old corner is still a corner
        for corner in corners_before {
            assert!(b.contains_point(&corner, 1e-4));
        }
    }

    #[test]
    fn test_transform_scales_extents() {
        let matrix = Mat4::from_srt(&Vec3::new(2.0, 1.0, 3.0), &Mat3::identity(), &Vec3::new(1.0, 0.0, 0.0));
        let moved = Box3::unit().transform(&matrix);
        assert_relative_eq!(moved.center, Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(moved.extents, Vec3::new(2.0, 1.0, 3.0));
        assert_relative_eq!(moved.axes[2], Vec3::z());
    }

    #[test]
    fn test_min_max_of_rotated_box() {
        let rotation = Quat::from_axis_angle(&Vec3::z_axis(), std::f32::consts::FRAC_PI_4);
        let b = Box3::new(
            Vec3::zeros(),
            [rotation * Vec3::x(), rotation * Vec3::y(), Vec3::z()],
            Vec3::new(1.0, 1.0, 1.0),
        );
        let (min, max) = b.min_max();
        let reach = std::f32::consts::SQRT_2;
        assert_relative_eq!(max, Vec3::new(reach, reach, 1.0), epsilon = 1e-5);
        assert_relative_eq!(min, -max, epsilon = 1e-5);
    }

    #[test]
    fn test_box2_contains() {
        let b = Box2::new(Vec2::zeros(), [Vec2::x(), Vec2::y()], Vec2::new(2.0, 1.0));
        assert!(b.contains_point(&Vec2::new(1.9, -0.9), 0.0));
        assert!(!b.contains_point(&Vec2::new(0.0, 1.5), 0.0));
        assert_eq!(b.compute_vertices()[2], Vec2::new(2.0, 1.0));
    }
}
