//! Containment and merge algorithms
//!
//! Builds enclosing volumes: merging two boxes or two spheres into one that
//! contains both, fitting boxes and spheres to point clouds, and testing
//! whether one volume envelops another.
//!
//! # Architecture
//!
//! Merges are conservative rather than minimal: the result always contains
//! both inputs, but may be larger than the tightest possible volume.
//! Fits never return a mathematically empty box; near-zero extents are
//! raised to [`crate::foundation::math::constants::DEGENERATE_EXTENT`].
//!
//! # Module Organization
//!
//! - [`positions`] - [`PositionData`], the point-cloud input boundary
//! - [`sphere`] - sphere merge, average sphere fit
//! - [`box3`] - oriented and aligned box merge and fit
//! - [`box2`] - planar box merge
//! - [`envelop`] - envelopment tests

pub mod positions;
pub mod sphere;
pub mod box3;
pub mod box2;
pub mod envelop;

pub use positions::PositionData;
pub use sphere::{compute_average_sphere, merge_spheres, merge_spheres2};
pub use box3::{compute_aligned_box, compute_oriented_box, merge_aligned_boxes, merge_boxes};
pub use box2::merge_boxes2;
pub use envelop::{
    box2_envelops_box2, box2_envelops_sphere2, box_envelops_box, box_envelops_sphere,
    sphere_envelops_sphere,
};
