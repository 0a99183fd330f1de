//! Tolerance-based float comparison
//!
//! Every kernel value type compares through a [`Tolerance`] rather than
//! bitwise. The tolerance is an explicit value (usually taken from
//! [`crate::config::KernelConfig`]) instead of process-wide state, so two
//! callers can use different precisions side by side.

use approx::RelativeEq;
use serde::{Deserialize, Serialize};

/// Comparison tolerance: machine epsilon scaled by a ULP multiplier
///
/// Two values are equal when their difference is within the scaled epsilon
/// either absolutely (near zero) or relative to the larger magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tolerance {
    /// Base epsilon
    pub epsilon: f32,
    /// Multiplier applied to the base epsilon
    pub ulp_multiplier: f32,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            epsilon: f32::EPSILON,
            ulp_multiplier: 1.0,
        }
    }
}

impl Tolerance {
    /// Tolerance with the given ULP multiplier on machine epsilon
    pub fn loose(ulp_multiplier: f32) -> Self {
        Self {
            ulp_multiplier,
            ..Self::default()
        }
    }

    /// Set the base epsilon
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Effective epsilon (`epsilon * ulp_multiplier`)
    pub fn scaled_epsilon(&self) -> f32 {
        self.epsilon * self.ulp_multiplier
    }

    /// Compare two scalars
    pub fn eq_f32(&self, a: f32, b: f32) -> bool {
        self.eq(&a, &b)
    }

    /// Compare any value that supports relative comparison
    ///
    /// Works for nalgebra vectors, matrices and quaternions as well as the
    /// kernel's geometric types.
    pub fn eq<T>(&self, a: &T, b: &T) -> bool
    where
        T: RelativeEq<Epsilon = f32> + ?Sized,
    {
        let eps = self.scaled_epsilon();
        a.relative_eq(b, eps, eps)
    }

    /// Whether `value` is within the absolute band around zero
    pub fn is_zero(&self, value: f32) -> bool {
        value.abs() <= self.scaled_epsilon()
    }

    /// Check the tolerance is usable
    pub fn validate(&self) -> Result<(), String> {
        if !(self.epsilon > 0.0 && self.epsilon.is_finite()) {
            return Err(format!("epsilon must be positive and finite, got {}", self.epsilon));
        }
        if !(self.ulp_multiplier >= 1.0 && self.ulp_multiplier.is_finite()) {
            return Err(format!("ulp_multiplier must be >= 1, got {}", self.ulp_multiplier));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    #[test]
    fn test_relative_comparison_for_large_values() {
        let tolerance = Tolerance::loose(10.0);
        let a = 1000.0_f32;
        let b = a + a * f32::EPSILON * 4.0;
        assert!(tolerance.eq_f32(a, b));
        assert!(!tolerance.eq_f32(a, a + 1.0));
    }

    #[test]
    fn test_absolute_fallback_near_zero() {
        let tolerance = Tolerance::default();
        assert!(tolerance.eq_f32(0.0, f32::EPSILON * 0.5));
        assert!(!tolerance.eq_f32(0.0, 1e-3));
        assert!(tolerance.is_zero(-f32::EPSILON));
    }

    #[test]
    fn test_vector_comparison() {
        let tolerance = Tolerance::loose(10.0);
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = a + Vec3::repeat(f32::EPSILON);
        assert!(tolerance.eq(&a, &b));
        assert!(!tolerance.eq(&a, &Vec3::new(1.0, 2.0, 3.1)));
    }

    #[test]
    fn test_validate() {
        assert!(Tolerance::default().validate().is_ok());
        assert!(Tolerance::loose(0.5).validate().is_err());
        assert!(Tolerance::default().with_epsilon(-1.0).validate().is_err());
    }
}
