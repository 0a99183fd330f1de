//! Geometric primitives
//!
//! Plain value types the rest of the kernel is built on. Every type is
//! `Copy`, serde-serializable and compares through [`approx`] so a
//! [`crate::foundation::tolerance::Tolerance`] can decide equality.
//!
//! # Module Organization
//!
//! - [`plane`] - [`Plane3`] and point/plane classification
//! - [`line`] - [`Line3`] (unbounded) and [`Ray3`] (t >= 0)
//! - [`triangle`] - [`Triangle2`], [`Triangle3`] with closest-point queries
//! - [`oriented_box`] - [`Box2`], [`Box3`] oriented boxes
//! - [`sphere`] - [`Sphere2`], [`Sphere3`]

/// Implements `approx::AbsDiffEq` and `approx::RelativeEq` field by field.
///
/// Plain fields must themselves support relative comparison with an `f32`
/// epsilon; array fields are compared element-wise.
macro_rules! impl_approx_eq {
    ($ty:ty { $($field:ident),* } [ $($array:ident),* ]) => {
        impl approx::AbsDiffEq for $ty {
            type Epsilon = f32;

            fn default_epsilon() -> f32 {
                <f32 as approx::AbsDiffEq>::default_epsilon()
            }

            fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
                true
                    $(&& approx::AbsDiffEq::abs_diff_eq(&self.$field, &other.$field, epsilon))*
                    $(&& self.$array.iter().zip(other.$array.iter()).all(|(a, b)| approx::AbsDiffEq::abs_diff_eq(a, b, epsilon)))*
            }
        }

        impl approx::RelativeEq for $ty {
            fn default_max_relative() -> f32 {
                <f32 as approx::RelativeEq>::default_max_relative()
            }

            fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
                true
                    $(&& approx::RelativeEq::relative_eq(&self.$field, &other.$field, epsilon, max_relative))*
                    $(&& self.$array.iter().zip(other.$array.iter()).all(|(a, b)| approx::RelativeEq::relative_eq(a, b, epsilon, max_relative)))*
            }
        }
    };
}

pub mod plane;
pub mod line;
pub mod triangle;
pub mod oriented_box;
pub mod sphere;

pub use plane::{Plane3, Side};
pub use line::{Line3, Ray3};
pub use triangle::{Triangle2, Triangle3};
pub use oriented_box::{Box2, Box3};
pub use sphere::{Sphere2, Sphere3};
