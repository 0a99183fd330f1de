//! Quaternion helpers on top of nalgebra's unit quaternion
//!
//! Adds the orientation operations the kernel needs beyond nalgebra's API:
//! axis-angle with a fixed fallback axis, shortest-arc alignment of two
//! directions, swing/twist decomposition and slerp with explicit path
//! control.

use super::math::{constants, Mat3, Quat, Quaternion, Unit, Vec3};

/// Extension trait for [`Quat`]
pub trait QuatExt: Sized {
    /// Rotation of `angle` radians about the unit `axis`
    fn from_axis_angle_raw(axis: &Vec3, angle: f32) -> Self;

    /// Axis and angle of this rotation
    ///
    /// A (near) zero rotation reports the X axis and angle 0.
    fn to_axis_angle(&self) -> (Vec3, f32);

    /// Rotation from an orthonormal rotation matrix
    fn from_rotation_matrix3(rotation: &Mat3) -> Self;

    /// Rotation matrix of this quaternion
    fn to_rotation_matrix3(&self) -> Mat3;

    /// Shortest-arc rotation taking unit `from` onto unit `to`
    ///
    /// Antiparallel inputs rotate half a turn about an axis perpendicular
    /// to `from`.
    fn align(from: &Vec3, to: &Vec3) -> Self;

    /// Factor into `swing * twist`, with the twist about `axis`
    fn decompose_swing_times_twist(&self, axis: &Vec3) -> (Self, Self);

    /// Factor into `twist * swing`, with the twist about `axis`
    fn decompose_twist_times_swing(&self, axis: &Vec3) -> (Self, Self);

    /// Spherical interpolation from `p` (t = 0) to `q` (t = 1)
    ///
    /// With `shortest_path` the interpolation takes the shorter arc when
    /// the quaternions lie in opposite hemispheres.
    fn slerp_path(t: f32, p: &Self, q: &Self, shortest_path: bool) -> Self;

    /// Spherical interpolation adding `extra_spins` full turns along the way
    fn slerp_extra_spins(t: f32, p: &Self, q: &Self, extra_spins: i32) -> Self;
}

impl QuatExt for Quat {
    fn from_axis_angle_raw(axis: &Vec3, angle: f32) -> Self {
        let half = 0.5 * angle;
        let sn = half.sin();
        Unit::new_unchecked(Quaternion::new(half.cos(), sn * axis.x, sn * axis.y, sn * axis.z))
    }

    fn to_axis_angle(&self) -> (Vec3, f32) {
        let q = self.quaternion();
        let sqr_length = q.imag().norm_squared();
        if sqr_length > constants::ZERO_TOLERANCE {
            let angle = 2.0 * q.w.clamp(-1.0, 1.0).acos();
            (q.imag() / sqr_length.sqrt(), angle)
        } else {
            (Vec3::x(), 0.0)
        }
    }

    fn from_rotation_matrix3(rotation: &Mat3) -> Self {
        let rotation = nalgebra::Rotation3::from_matrix_unchecked(*rotation);
        Self::from_rotation_matrix(&rotation)
    }

    fn to_rotation_matrix3(&self) -> Mat3 {
        self.to_rotation_matrix().into_inner()
    }

    fn align(from: &Vec3, to: &Vec3) -> Self {
        let sum = from + to;
        let bisector = if sum.norm() > constants::ZERO_TOLERANCE { sum.normalize() } else { Vec3::zeros() };
        let cos_half_angle = from.dot(&bisector);

        if cos_half_angle == 0.0 {
            let perp = if from.x.abs() >= from.y.abs() {
                let inv_length = 1.0 / from.x.hypot(from.z);
                Vec3::new(-from.z * inv_length, 0.0, from.x * inv_length)
            } else {
                let inv_length = 1.0 / from.y.hypot(from.z);
                Vec3::new(0.0, from.z * inv_length, -from.y * inv_length)
            };
            Unit::new_unchecked(Quaternion::new(0.0, perp.x, perp.y, perp.z))
        } else {
            let cross = from.cross(&bisector);
            Unit::new_normalize(Quaternion::new(cos_half_angle, cross.x, cross.y, cross.z))
        }
    }

    fn decompose_swing_times_twist(&self, axis: &Vec3) -> (Self, Self) {
        let rotated = self * axis;
        let swing = Self::align(axis, &rotated);
        let twist = swing.conjugate() * self;
        (swing, twist)
    }

    fn decompose_twist_times_swing(&self, axis: &Vec3) -> (Self, Self) {
        let rotated = self * axis;
        let swing = Self::align(axis, &rotated);
        let twist = self * swing.conjugate();
        (swing, twist)
    }

    fn slerp_path(t: f32, p: &Self, q: &Self, shortest_path: bool) -> Self {
        let cs = p.quaternion().dot(q.quaternion()).clamp(-1.0, 1.0);
        let angle = cs.acos();
        if angle.abs() < constants::ZERO_TOLERANCE {
            return *p;
        }

        let inv_sin = 1.0 / angle.sin();
        let mut coeff0 = ((1.0 - t) * angle).sin() * inv_sin;
        let coeff1 = (t * angle).sin() * inv_sin;
        if cs < 0.0 && shortest_path {
            coeff0 = -coeff0;
        }
        Unit::new_normalize(p.quaternion() * coeff0 + q.quaternion() * coeff1)
    }

    #[allow(clippy::cast_precision_loss)]
    fn slerp_extra_spins(t: f32, p: &Self, q: &Self, extra_spins: i32) -> Self {
        let cs = p.quaternion().dot(q.quaternion()).clamp(-1.0, 1.0);
        let angle = cs.acos();
        if angle.abs() < constants::ZERO_TOLERANCE {
            return *p;
        }

        let phase = constants::PI * extra_spins as f32 * t;
        let inv_sin = 1.0 / angle.sin();
        let coeff0 = ((1.0 - t) * angle - phase).sin() * inv_sin;
        let coeff1 = (t * angle + phase).sin() * inv_sin;
        Unit::new_normalize(p.quaternion() * coeff0 + q.quaternion() * coeff1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Mat3Ext;
    use crate::foundation::random::RandomContext;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_axis_angle_round_trip() {
        let mut random = RandomContext::seeded(3);
        for _ in 0..20 {
            let axis = random.unit_vector();
            let angle = random.uniform(0.1, constants::PI - 0.1);
            let q = Quat::from_axis_angle_raw(&axis, angle);
            let (axis2, angle2) = q.to_axis_angle();
            assert_relative_eq!(axis2, axis, epsilon = EPSILON);
            assert_relative_eq!(angle2, angle, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_identity_axis_angle() {
        let (axis, angle) = Quat::identity().to_axis_angle();
        assert_eq!(axis, Vec3::x());
        assert_eq!(angle, 0.0);
    }

    #[test]
    fn test_rotation_matrix_agrees_with_quaternion() {
        let m = Mat3::rotation_yaw_pitch_roll(0.4, -0.2, 0.9);
        let q = Quat::from_rotation_matrix3(&m);
        let p = Vec3::new(1.0, -2.0, 0.5);
        assert_relative_eq!(q * p, m * p, epsilon = EPSILON);
        assert_relative_eq!(q.to_rotation_matrix3(), m, epsilon = EPSILON);
    }

    #[test]
    fn test_align_maps_from_onto_to() {
        let from = Vec3::new(1.0, 2.0, -1.0).normalize();
        let to = Vec3::new(-0.5, 0.3, 2.0).normalize();
        let q = Quat::align(&from, &to);
        assert_relative_eq!(q * from, to, epsilon = EPSILON);
    }

    #[test]
    fn test_align_antiparallel() {
        let q = Quat::align(&Vec3::x(), &-Vec3::x());
        assert_relative_eq!(q * Vec3::x(), -Vec3::x(), epsilon = EPSILON);
    }

    #[test]
    fn test_swing_twist_recompose() {
        let mut random = RandomContext::seeded(5);
        for _ in 0..10 {
            let q = random.rotation();
            let axis = random.unit_vector();
            let (swing, twist) = q.decompose_swing_times_twist(&axis);
            assert_relative_eq!(swing * twist, q, epsilon = EPSILON);
            // twist leaves its own axis in place
            assert_relative_eq!(twist * axis, axis, epsilon = 1e-3);

            let (swing, twist) = q.decompose_twist_times_swing(&axis);
            assert_relative_eq!(twist * swing, q, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_slerp_endpoints_and_midpoint() {
        let p = Quat::identity();
        let q = Quat::from_axis_angle(&Vec3::z_axis(), 1.0);
        assert_relative_eq!(Quat::slerp_path(0.0, &p, &q, true), p, epsilon = EPSILON);
        assert_relative_eq!(Quat::slerp_path(1.0, &p, &q, true), q, epsilon = EPSILON);
        let mid = Quat::slerp_path(0.5, &p, &q, true);
        assert_relative_eq!(mid.angle(), 0.5, epsilon = EPSILON);
    }

    #[test]
    fn test_slerp_without_spins_matches_slerp() {
        let p = Quat::from_axis_angle(&Vec3::x_axis(), 0.2);
        let q = Quat::from_axis_angle(&Vec3::y_axis(), 1.2);
        let a = Quat::slerp_extra_spins(0.3, &p, &q, 0);
        let b = Quat::slerp_path(0.3, &p, &q, false);
        assert_relative_eq!(a, b, epsilon = EPSILON);
    }
}
