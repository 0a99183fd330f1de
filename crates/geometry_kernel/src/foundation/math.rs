//! Math utilities and types
//!
//! Provides the fundamental linear algebra types used by the geometry kernel,
//! plus the kernel-specific matrix algorithms that nalgebra does not offer in
//! the exact form the containment and shadow code relies on:
//! symmetric eigen-decomposition, scale/rotation/translation factoring and
//! left/right-handed projection builders.

pub use nalgebra::{
    Matrix2, Matrix3, Matrix4,
    Quaternion,
    Unit,
    Vector2, Vector3, Vector4,
};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 2x2 matrix type
pub type Mat2 = Matrix2<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 2D point type
pub type Point2 = nalgebra::Point2<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Pi / 4
    pub const QUARTER_PI: f32 = PI * 0.25;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;

    /// Machine epsilon used by the kernel's classification bands
    pub const EPSILON: f32 = f32::EPSILON;

    /// Threshold under which a length or determinant is treated as zero
    pub const ZERO_TOLERANCE: f32 = 1e-6;

    /// Largest representable parameter, used as an unbounded interval end
    pub const MAX_REAL: f32 = f32::MAX;

    /// Floor applied to fitted box extents so a fit is never exactly empty
    pub const DEGENERATE_EXTENT: f32 = 10.0 * EPSILON;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }
}

/// Result of a symmetric 3x3 eigen-decomposition
///
/// `matrix == rotation * diag(eigenvalues) * rotation^T`. Columns of
/// `rotation` are the unit eigenvectors, sorted by ascending eigenvalue, and
/// always form a right-handed frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EigenDecomposition {
    /// Eigenvector frame (proper rotation)
    pub rotation: Mat3,
    /// Eigenvalues in increasing order
    pub eigenvalues: Vec3,
}

impl EigenDecomposition {
    /// Diagonal matrix of the eigenvalues
    pub fn diagonal(&self) -> Mat3 {
        Mat3::from_diagonal(&self.eigenvalues)
    }
}

/// Scale, rotation and translation recovered from an affine matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SrtFactors {
    /// Per-axis scale, one component negative for mirrored matrices
    pub scale: Vec3,
    /// Orthonormal rotation part
    pub rotation: Mat3,
    /// Translation part
    pub translation: Vec3,
}

const QL_MAX_ITERATIONS: usize = 32;

/// Extension trait for Mat3 with kernel algorithms
pub trait Mat3Ext {
    /// Build a matrix whose columns are the given vectors
    fn from_column_vectors(columns: &[Vec3; 3]) -> Mat3;

    /// Build a matrix whose rows are the given vectors
    fn from_row_vectors(rows: &[Vec3; 3]) -> Mat3;

    /// Rotation `Ry(yaw) * Rx(pitch) * Rz(roll)`
    fn rotation_yaw_pitch_roll(yaw: f32, pitch: f32, roll: f32) -> Mat3;

    /// Eigen-decomposition of a symmetric matrix
    ///
    /// Householder tridiagonalization followed by the implicit-shift QL
    /// algorithm. Only the upper triangle is read; a non-symmetric input
    /// gives undefined results.
    fn eigen_decomposition(&self) -> EigenDecomposition;
}

impl Mat3Ext for Mat3 {
    fn from_column_vectors(columns: &[Vec3; 3]) -> Mat3 {
        Mat3::from_columns(columns)
    }

    fn from_row_vectors(rows: &[Vec3; 3]) -> Mat3 {
        Mat3::from_rows(&[rows[0].transpose(), rows[1].transpose(), rows[2].transpose()])
    }

    fn rotation_yaw_pitch_roll(yaw: f32, pitch: f32, roll: f32) -> Mat3 {
        let ry = nalgebra::Rotation3::from_axis_angle(&Vec3::y_axis(), yaw);
        let rx = nalgebra::Rotation3::from_axis_angle(&Vec3::x_axis(), pitch);
        let rz = nalgebra::Rotation3::from_axis_angle(&Vec3::z_axis(), roll);
        (ry * rx * rz).into_inner()
    }

    fn eigen_decomposition(&self) -> EigenDecomposition {
        let (mut rotation, mut diagonal, mut subdiagonal, mut is_reflection) = tridiagonalize(self);
        if !ql_algorithm(&mut rotation, &mut diagonal, &mut subdiagonal) {
            log::warn!("QL iteration did not converge after {QL_MAX_ITERATIONS} sweeps");
        }

        // insertion sort, d0 <= d1 <= d2
        for pair in [0, 1, 0] {
            if diagonal[pair + 1] < diagonal[pair] {
                diagonal.swap(pair, pair + 1);
                rotation.swap_columns(pair, pair + 1);
                is_reflection = !is_reflection;
            }
        }

        if is_reflection {
            let flipped = -rotation.column(2);
            rotation.set_column(2, &flipped);
        }

        EigenDecomposition {
            rotation,
            eigenvalues: Vec3::new(diagonal[0], diagonal[1], diagonal[2]),
        }
    }
}

/// Householder reduction `T = Q^T M Q`; returns Q, diag(T), subdiag(T) and
/// whether Q is a reflection.
fn tridiagonalize(m: &Mat3) -> (Mat3, [f32; 3], [f32; 2], bool) {
    let m00 = m[(0, 0)];
    let mut m01 = m[(0, 1)];
    let mut m02 = m[(0, 2)];
    let m11 = m[(1, 1)];
    let m12 = m[(1, 2)];
    let m22 = m[(2, 2)];

    if m02.abs() >= constants::ZERO_TOLERANCE {
        let length = m01.hypot(m02);
        let inv_length = 1.0 / length;
        m01 *= inv_length;
        m02 *= inv_length;
        let tmp = 2.0 * m01 * m12 + m02 * (m22 - m11);
        let diagonal = [m00, m11 + m02 * tmp, m22 - m02 * tmp];
        let subdiagonal = [length, m12 - m01 * tmp];
        let q = Mat3::new(
            1.0, 0.0, 0.0,
            0.0, m01, m02,
            0.0, m02, -m01,
        );
        (q, diagonal, subdiagonal, true)
    } else {
        (Mat3::identity(), [m00, m11, m22], [m01, m12], false)
    }
}

/// Post-multiply columns `a` and `b` of `q` by a Givens rotation.
fn apply_givens(q: &mut Mat3, a: usize, b: usize, cos_value: f32, sin_value: f32) {
    for row in 0..3 {
        let tmp = q[(row, b)];
        q[(row, b)] = sin_value * q[(row, a)] + cos_value * tmp;
        q[(row, a)] = cos_value * q[(row, a)] - sin_value * tmp;
    }
}

/// Reduce the 2x2 block `[d_a s; s d_b]` directly. Returns the new pair of
/// eigenvalues.
fn solve_block(q: &mut Mat3, a: usize, d_a: f32, d_b: f32, s: f32) -> (f32, f32) {
    let sum = d_a + d_b;
    let diff = d_a - d_b;
    let discr = diff.mul_add(diff, 4.0 * s * s).sqrt();
    let eig0 = 0.5 * (sum - discr);
    let eig1 = 0.5 * (sum + discr);

    let (mut cos_value, mut sin_value) = if diff >= 0.0 { (s, d_a - eig0) } else { (d_b - eig0, s) };
    let inv = 1.0 / cos_value.hypot(sin_value);
    cos_value *= inv;
    sin_value *= inv;
    apply_givens(q, a, a + 1, cos_value, sin_value);
    (eig0, eig1)
}

/// Round-off test used to decide that a subdiagonal term vanished.
fn negligible(sub: f32, d0: f32, d1: f32) -> bool {
    let sum = d0.abs() + d1.abs();
    sub.abs() + sum == sum
}

#[allow(clippy::many_single_char_names)]
fn ql_algorithm(q: &mut Mat3, d: &mut [f32; 3], s: &mut [f32; 2]) -> bool {
    for _ in 0..QL_MAX_ITERATIONS {
        if negligible(s[0], d[0], d[1]) {
            if negligible(s[1], d[1], d[2]) {
                return true;
            }
            let (e0, e1) = solve_block(q, 1, d[1], d[2], s[1]);
            d[1] = e0;
            d[2] = e1;
            *s = [0.0, 0.0];
            return true;
        }

        if negligible(s[1], d[1], d[2]) {
            if negligible(s[0], d[0], d[1]) {
                return true;
            }
            let (e0, e1) = solve_block(q, 0, d[0], d[1], s[0]);
            d[0] = e0;
            d[1] = e1;
            *s = [0.0, 0.0];
            return true;
        }

        // Wilkinson shift for the first pass
        let mut ratio = (d[1] - d[0]) / (2.0 * s[0]);
        let mut root = ratio.mul_add(ratio, 1.0).sqrt();
        let mut b = s[1];
        let mut a = d[2] - d[0];
        if ratio >= 0.0 {
            a += s[0] / (ratio + root);
        } else {
            a += s[0] / (ratio - root);
        }

        let (mut cos_value, mut sin_value);
        if b.abs() >= a.abs() {
            ratio = a / b;
            sin_value = 1.0 / ratio.mul_add(ratio, 1.0).sqrt();
            cos_value = ratio * sin_value;
        } else {
            ratio = b / a;
            cos_value = 1.0 / ratio.mul_add(ratio, 1.0).sqrt();
            sin_value = ratio * cos_value;
        }
        apply_givens(q, 1, 2, cos_value, sin_value);

        // second pass
        let mut tmp0 = (d[1] - d[2]) * sin_value + 2.0 * s[1] * cos_value;
        let tmp1 = cos_value * s[0];
        b = sin_value * s[0];
        a = cos_value * tmp0 - s[1];
        tmp0 *= sin_value;

        if b.abs() >= a.abs() {
            ratio = a / b;
            root = ratio.mul_add(ratio, 1.0).sqrt();
            s[1] = b * root;
            sin_value = 1.0 / root;
            cos_value = ratio * sin_value;
        } else {
            ratio = b / a;
            root = ratio.mul_add(ratio, 1.0).sqrt();
            s[1] = a * root;
            cos_value = 1.0 / root;
            sin_value = ratio * cos_value;
        }
        apply_givens(q, 0, 1, cos_value, sin_value);

        let tmp2 = d[1] - tmp0;
        d[2] += tmp0;
        tmp0 = (d[0] - tmp2) * sin_value + 2.0 * tmp1 * cos_value;
        s[0] = cos_value * tmp0 - tmp1;
        tmp0 *= sin_value;
        d[1] = tmp2 + tmp0;
        d[0] -= tmp0;
    }
    false
}

/// Extension trait for Mat4 with additional convenience methods
///
/// The projection builders produce clip-space depth in `[0, 1]`. `_lh`
/// variants look down +Z in view space, `_rh` variants down -Z.
pub trait Mat4Ext {
    /// Compose `T * R * S`
    fn from_srt(scale: &Vec3, rotation: &Mat3, translation: &Vec3) -> Mat4;

    /// Factor an affine matrix into scale, rotation and translation
    ///
    /// A mirrored matrix (negative determinant) has its mirror attributed to
    /// the axis that lines up best with the mirror plane's normal; that axis
    /// gets a negative scale so the rotation stays proper.
    fn factor_srt(&self) -> SrtFactors;

    /// Largest absolute axis scale
    fn max_scale(&self) -> f32;

    /// Upper-left 3x3 block
    fn upper_3x3(&self) -> Mat3;

    /// Transform a position, with homogeneous divide
    fn transform_position(&self, position: &Vec3) -> Vec3;

    /// Transform a direction (translation ignored)
    fn transform_direction(&self, direction: &Vec3) -> Vec3;

    /// Left-handed perspective projection
    fn perspective_fov_lh(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Right-handed perspective projection
    fn perspective_fov_rh(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4;

    /// Left-handed orthographic projection of a `width` x `height` view volume
    fn ortho_lh(width: f32, height: f32, near: f32, far: f32) -> Mat4;

    /// Right-handed orthographic projection
    fn ortho_rh(width: f32, height: f32, near: f32, far: f32) -> Mat4;

    /// Left-handed look-at view matrix
    fn view_look_at_lh(eye: &Vec3, at: &Vec3, up: &Vec3) -> Mat4;

    /// Right-handed look-at view matrix
    fn view_look_at_rh(eye: &Vec3, at: &Vec3, up: &Vec3) -> Mat4;
}

impl Mat4Ext for Mat4 {
    fn from_srt(scale: &Vec3, rotation: &Mat3, translation: &Vec3) -> Mat4 {
        let mut result = rotation.to_homogeneous() * Mat4::new_nonuniform_scaling(scale);
        result[(0, 3)] = translation.x;
        result[(1, 3)] = translation.y;
        result[(2, 3)] = translation.z;
        result
    }

    fn factor_srt(&self) -> SrtFactors {
        let translation = Vec3::new(self[(0, 3)], self[(1, 3)], self[(2, 3)]);
        let upper = self.upper_3x3();
        let columns = [upper.column(0).into_owned(), upper.column(1).into_owned(), upper.column(2).into_owned()];
        let mut scale = Vec3::new(columns[0].norm(), columns[1].norm(), columns[2].norm());

        if columns[0].cross(&columns[1]).dot(&columns[2]) < 0.0 {
            // The -1 eigenvector of the normalized frame is the mirror normal;
            // it is also the lowest eigenvector of the frame's symmetric part.
            let normalized = Mat3::from_fn(|r, c| if scale[c] > 0.0 { upper[(r, c)] / scale[c] } else { 0.0 });
            let symmetric = (normalized + normalized.transpose()) * 0.5;
            let mirror = symmetric.eigen_decomposition().rotation.column(0).abs();
            let axis = if mirror.x > mirror.y && mirror.x > mirror.z {
                0
            } else if mirror.y > mirror.x && mirror.y > mirror.z {
                1
            } else {
                2
            };
            scale[axis] = -scale[axis];
        }

        let mut rotation = Mat3::identity();
        for (c, column) in columns.iter().enumerate() {
            if scale[c].abs() > constants::ZERO_TOLERANCE {
                rotation.set_column(c, &(column / scale[c]));
            }
        }

        SrtFactors { scale, rotation, translation }
    }

    fn max_scale(&self) -> f32 {
        let upper = self.upper_3x3();
        upper.column(0).norm().max(upper.column(1).norm()).max(upper.column(2).norm())
    }

    fn upper_3x3(&self) -> Mat3 {
        self.fixed_view::<3, 3>(0, 0).into_owned()
    }

    fn transform_position(&self, position: &Vec3) -> Vec3 {
        self.transform_point(&Point3::from(*position)).coords
    }

    fn transform_direction(&self, direction: &Vec3) -> Vec3 {
        self.transform_vector(direction)
    }

    fn perspective_fov_lh(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let y_scale = 1.0 / (fov_y * 0.5).tan();
        let x_scale = y_scale / aspect;
        let depth = far / (far - near);
        Mat4::new(
            x_scale, 0.0, 0.0, 0.0,
            0.0, y_scale, 0.0, 0.0,
            0.0, 0.0, depth, -near * depth,
            0.0, 0.0, 1.0, 0.0,
        )
    }

    fn perspective_fov_rh(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
        let y_scale = 1.0 / (fov_y * 0.5).tan();
        let x_scale = y_scale / aspect;
        let depth = far / (near - far);
        Mat4::new(
            x_scale, 0.0, 0.0, 0.0,
            0.0, y_scale, 0.0, 0.0,
            0.0, 0.0, depth, near * depth,
            0.0, 0.0, -1.0, 0.0,
        )
    }

    fn ortho_lh(width: f32, height: f32, near: f32, far: f32) -> Mat4 {
        Mat4::new(
            2.0 / width, 0.0, 0.0, 0.0,
            0.0, 2.0 / height, 0.0, 0.0,
            0.0, 0.0, 1.0 / (far - near), near / (near - far),
            0.0, 0.0, 0.0, 1.0,
        )
    }

    fn ortho_rh(width: f32, height: f32, near: f32, far: f32) -> Mat4 {
        Mat4::new(
            2.0 / width, 0.0, 0.0, 0.0,
            0.0, 2.0 / height, 0.0, 0.0,
            0.0, 0.0, 1.0 / (near - far), near / (near - far),
            0.0, 0.0, 0.0, 1.0,
        )
    }

    fn view_look_at_lh(eye: &Vec3, at: &Vec3, up: &Vec3) -> Mat4 {
        let z_axis = (at - eye).normalize();
        view_from_frame(eye, up, &z_axis)
    }

    fn view_look_at_rh(eye: &Vec3, at: &Vec3, up: &Vec3) -> Mat4 {
        let z_axis = (eye - at).normalize();
        view_from_frame(eye, up, &z_axis)
    }
}

fn view_from_frame(eye: &Vec3, up: &Vec3, z_axis: &Vec3) -> Mat4 {
    let x_axis = up.cross(z_axis).normalize();
    let y_axis = z_axis.cross(&x_axis);
    Mat4::new(
        x_axis.x, x_axis.y, x_axis.z, -x_axis.dot(eye),
        y_axis.x, y_axis.y, y_axis.z, -y_axis.dot(eye),
        z_axis.x, z_axis.y, z_axis.z, -z_axis.dot(eye),
        0.0, 0.0, 0.0, 1.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::random::RandomContext;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-4;

    fn random_symmetric(random: &mut RandomContext) -> Mat3 {
        let a = Mat3::from_fn(|_, _| random.uniform(-5.0, 5.0));
        a + a.transpose()
    }

    #[test]
    fn test_eigen_decomposition_reconstructs_matrix() {
        let mut random = RandomContext::seeded(7);
        for _ in 0..50 {
            let m = random_symmetric(&mut random);
            let eigen = m.eigen_decomposition();
            let rebuilt = eigen.rotation * eigen.diagonal() * eigen.rotation.transpose();
            assert_relative_eq!(rebuilt, m, epsilon = 1e-3);
            assert_relative_eq!(eigen.rotation.determinant(), 1.0, epsilon = EPSILON);
            assert!(eigen.eigenvalues.x <= eigen.eigenvalues.y);
            assert!(eigen.eigenvalues.y <= eigen.eigenvalues.z);
        }
    }

    #[test]
    fn test_eigen_decomposition_of_diagonal() {
        let m = Mat3::from_diagonal(&Vec3::new(3.0, 1.0, 2.0));
        let eigen = m.eigen_decomposition();
        assert_relative_eq!(eigen.eigenvalues, Vec3::new(1.0, 2.0, 3.0), epsilon = EPSILON);
        assert_relative_eq!(eigen.rotation.determinant(), 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_factor_srt_round_trip() {
        let mut random = RandomContext::seeded(11);
        for _ in 0..20 {
            let rotation = random.rotation().to_rotation_matrix().into_inner();
            let scale = Vec3::new(random.uniform(0.5, 3.0), random.uniform(0.5, 3.0), random.uniform(0.5, 3.0));
            let translation = random.point_in_cube(10.0);
            let m = Mat4::from_srt(&scale, &rotation, &translation);
            let factors = m.factor_srt();
            assert_relative_eq!(factors.scale, scale, epsilon = EPSILON);
            assert_relative_eq!(factors.rotation, rotation, epsilon = EPSILON);
            assert_relative_eq!(factors.translation, translation, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_factor_srt_mirrored() {
        let scale = Vec3::new(2.0, -3.0, 1.5);
        let m = Mat4::from_srt(&scale, &Mat3::identity(), &Vec3::new(1.0, 2.0, 3.0));
        let factors = m.factor_srt();
        assert_relative_eq!(factors.scale, scale, epsilon = EPSILON);
        assert_relative_eq!(factors.rotation, Mat3::identity(), epsilon = EPSILON);
        let rebuilt = Mat4::from_srt(&factors.scale, &factors.rotation, &factors.translation);
        assert_relative_eq!(rebuilt, m, epsilon = EPSILON);
    }

    #[test]
    fn test_max_scale() {
        let m = Mat4::from_srt(&Vec3::new(1.0, -4.0, 2.0), &Mat3::identity(), &Vec3::zeros());
        assert_relative_eq!(m.max_scale(), 4.0, epsilon = EPSILON);
    }

    #[test]
    fn test_view_look_at_lh_maps_target_to_positive_z() {
        let eye = Vec3::new(0.0, 0.0, -5.0);
        let view = Mat4::view_look_at_lh(&eye, &Vec3::zeros(), &Vec3::y());
        let p = view.transform_position(&Vec3::zeros());
        assert_relative_eq!(p, Vec3::new(0.0, 0.0, 5.0), epsilon = EPSILON);
        let right = view.transform_direction(&Vec3::x());
        assert_relative_eq!(right, Vec3::x(), epsilon = EPSILON);
    }

    #[test]
    fn test_view_look_at_rh_maps_target_to_negative_z() {
        let eye = Vec3::new(0.0, 0.0, 5.0);
        let view = Mat4::view_look_at_rh(&eye, &Vec3::zeros(), &Vec3::y());
        assert_relative_eq!(view.transform_position(&Vec3::zeros()), Vec3::new(0.0, 0.0, -5.0), epsilon = EPSILON);
        assert_relative_eq!(view.transform_direction(&Vec3::x()), Vec3::x(), epsilon = EPSILON);
    }

    #[test]
    fn test_ortho_lh_depth_range() {
        let proj = Mat4::ortho_lh(4.0, 2.0, 1.0, 11.0);
        assert_relative_eq!(proj.transform_position(&Vec3::new(2.0, 1.0, 1.0)), Vec3::new(1.0, 1.0, 0.0), epsilon = EPSILON);
        assert_relative_eq!(proj.transform_position(&Vec3::new(-2.0, -1.0, 11.0)).z, 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_perspective_lh_depth_range() {
        let proj = Mat4::perspective_fov_lh(constants::HALF_PI, 1.0, 1.0, 100.0);
        assert_relative_eq!(proj.transform_position(&Vec3::new(0.0, 0.0, 1.0)).z, 0.0, epsilon = EPSILON);
        assert_relative_eq!(proj.transform_position(&Vec3::new(0.0, 0.0, 100.0)).z, 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_yaw_pitch_roll_is_rotation() {
        let m = Mat3::rotation_yaw_pitch_roll(0.3, -0.7, 1.1);
        assert_relative_eq!(m * m.transpose(), Mat3::identity(), epsilon = EPSILON);
        assert_relative_eq!(m.determinant(), 1.0, epsilon = EPSILON);
    }
}
