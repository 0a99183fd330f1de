//! Directional-light shadow fitting
//!
//! Turns a viewer camera and the world bound of the visible scene into one
//! orthographic light camera per cascade.
//!
//! # Module Organization
//!
//! - [`clipper`] - sequential triangle/plane clipping
//! - [`camera`] - left-handed viewer camera
//! - [`frustum`] - world-space culling planes of a viewer camera
//! - [`csm`] - cascaded sun-light camera fitting

pub mod camera;
pub mod clipper;
pub mod csm;
pub mod frustum;

pub use camera::Camera;
pub use clipper::{clip_triangles, TrianglePlaneClipper};
pub use csm::CsmSunLightCamera;
pub use frustum::{Frustum, FrustumPlane};
