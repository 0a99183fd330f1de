//! Bounding volumes
//!
//! [`BoundingVolume`] is the single bounding type scene code stores per
//! node: either an oriented box, a sphere, or nothing yet. Every operation
//! dispatches on the variant; combining two volumes of different kinds
//! converts the incoming one to the kind of the receiving one, so a node's
//! volume never changes kind through merging.
//!
//! # Module Organization
//!
//! - [`generic`] - conversion to and from shape-tagged generic values

use serde::{Deserialize, Serialize};

use crate::containment::{
    compute_aligned_box, compute_average_sphere, compute_oriented_box, merge_boxes, merge_spheres, PositionData,
};
use crate::foundation::math::{constants, Mat4, Vec3};
use crate::geometry::{Box3, Plane3, Side, Sphere3};
use crate::intersection::box_which_side;

pub mod generic;

pub use generic::{FieldValue, GenericValue};

bitflags::bitflags! {
    /// Axes along which a point lies within a bounding volume
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AxisFlags: u8 {
        /// Within the first axis' range
        const X = 1 << 0;
        /// Within the second axis' range
        const Y = 1 << 1;
        /// Within the third axis' range
        const Z = 1 << 2;
        /// X and Y
        const XY = Self::X.bits() | Self::Y.bits();
        /// X and Z
        const XZ = Self::X.bits() | Self::Z.bits();
        /// Y and Z
        const YZ = Self::Y.bits() | Self::Z.bits();
        /// All three axes
        const XYZ = Self::X.bits() | Self::Y.bits() | Self::Z.bits();
    }
}

/// Bounding volume of a scene object, in whatever space its owner uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum BoundingVolume {
    /// No volume yet; bounds nothing but is never culled
    #[default]
    Empty,
    /// Oriented box
    Box(Box3),
    /// Sphere
    Sphere(Sphere3),
}

impl From<Box3> for BoundingVolume {
    fn from(b: Box3) -> Self {
        Self::Box(b)
    }
}

impl From<Sphere3> for BoundingVolume {
    fn from(sphere: Sphere3) -> Self {
        Self::Sphere(sphere)
    }
}

impl BoundingVolume {
    /// Box volume
    pub fn from_box(b: Box3) -> Self {
        Self::Box(b)
    }

    /// Sphere volume
    pub fn from_sphere(sphere: Sphere3) -> Self {
        Self::Sphere(sphere)
    }

    /// The box, if this is a box volume
    pub fn bounding_box(&self) -> Option<&Box3> {
        match self {
            Self::Box(b) => Some(b),
            _ => None,
        }
    }

    /// The sphere, if this is a sphere volume
    pub fn bounding_sphere(&self) -> Option<&Sphere3> {
        match self {
            Self::Sphere(sphere) => Some(sphere),
            _ => None,
        }
    }

    /// Whether the volume bounds nothing
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Box(b) => b.is_empty(),
            Self::Sphere(sphere) => sphere.is_empty(),
        }
    }

    /// Center of the volume; the origin when empty
    pub fn center(&self) -> Vec3 {
        match self {
            Self::Empty => Vec3::zeros(),
            Self::Box(b) => b.center,
            Self::Sphere(sphere) => sphere.center,
        }
    }

    /// Box containing the volume
    pub fn enclosing_box(&self) -> Box3 {
        match self {
            Self::Empty => Box3::default(),
            Self::Box(b) => *b,
            Self::Sphere(sphere) => Box3::aligned(sphere.center, Vec3::repeat(sphere.radius)),
        }
    }

    /// Sphere containing the volume
    pub fn enclosing_sphere(&self) -> Sphere3 {
        match self {
            Self::Empty => Sphere3::default(),
            Self::Box(b) => Sphere3::new(b.center, b.extents.norm()),
            Self::Sphere(sphere) => *sphere,
        }
    }

    /// Same kind of volume transformed by `matrix`
    #[must_use]
    pub fn create_from_transform(&self, matrix: &Mat4) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Box(b) => Self::Box(b.transform(matrix)),
            Self::Sphere(sphere) => Self::Sphere(sphere.transform(matrix)),
        }
    }

    /// Collapse to a zero-size volume at the origin, keeping the kind
    ///
    /// A box keeps its axes.
    pub fn zero_reset(&mut self) {
        match self {
            Self::Empty => {}
            Self::Box(b) => {
                b.center = Vec3::zeros();
                b.extents = Vec3::zeros();
            }
            Self::Sphere(sphere) => *sphere = Sphere3::default(),
        }
    }

    /// Grow to also contain `source` transformed by `matrix`
    ///
    /// The result keeps this volume's kind. An empty source leaves the
    /// volume unchanged; an empty volume becomes the transformed source.
    pub fn merge(&mut self, matrix: &Mat4, source: &Self) {
        if source.is_empty() {
            return;
        }
        let incoming = source.create_from_transform(matrix);

        *self = match *self {
            Self::Empty => incoming,
            Self::Box(b) => {
                let other = incoming.enclosing_box();
                if b.is_empty() {
                    Self::Box(other)
                } else {
                    Self::Box(merge_boxes(&b, &other))
                }
            }
            Self::Sphere(sphere) => {
                let other = incoming.enclosing_sphere();
                if sphere.is_empty() {
                    Self::Sphere(other)
                } else {
                    Self::Sphere(merge_spheres(&sphere, &other))
                }
            }
        };
    }

    /// Side of `plane` the volume lies on
    ///
    /// An empty volume reports [`Side::Overlap`] so it is never culled.
    pub fn which_side(&self, plane: &Plane3) -> Side {
        match self {
            Self::Empty => Side::Overlap,
            Self::Box(b) => box_which_side(b, plane),
            Self::Sphere(sphere) => {
                let distance = plane.distance_to(&sphere.center);
                if distance <= -sphere.radius {
                    Side::Negative
                } else if distance >= sphere.radius {
                    Side::Positive
                } else {
                    Side::Overlap
                }
            }
        }
    }

    /// Refit the volume to a point cloud, keeping the kind
    ///
    /// Boxes use the world-aligned fit when `axis_aligned`, the principal
    /// axis fit otherwise. Spheres use the average sphere.
    pub fn compute_from_data(&mut self, points: &PositionData<'_>, axis_aligned: bool) {
        match self {
            Self::Empty => log::debug!("empty bounding volume has no kind to fit"),
            Self::Box(b) => {
                *b = if axis_aligned {
                    compute_aligned_box(points)
                } else {
                    compute_oriented_box(points)
                };
            }
            Self::Sphere(sphere) => *sphere = compute_average_sphere(points),
        }
    }

    /// Whether `point` lies inside the volume
    ///
    /// Boxes allow [`constants::EPSILON`] beyond each face.
    pub fn point_inside(&self, point: &Vec3) -> bool {
        match self {
            Self::Empty => false,
            Self::Box(b) => b.contains_point(point, constants::EPSILON),
            Self::Sphere(sphere) => (point - sphere.center).norm() <= sphere.radius,
        }
    }

    /// Axes along which `point` is within the volume
    ///
    /// For a box, one flag per box axis whose slab holds the point. For a
    /// sphere, [`AxisFlags::XYZ`] when inside; otherwise the first
    /// coordinate plane (XY, XZ, YZ) whose projected disc holds the point.
    pub fn point_inside_flags(&self, point: &Vec3) -> AxisFlags {
        match self {
            Self::Empty => AxisFlags::empty(),
            Self::Box(b) => {
                let local = b.local_coordinates(point);
                let mut flags = AxisFlags::empty();
                for (i, flag) in [AxisFlags::X, AxisFlags::Y, AxisFlags::Z].into_iter().enumerate() {
                    if local[i].abs() <= b.extents[i] + constants::EPSILON {
                        flags |= flag;
                    }
                }
                flags
            }
            Self::Sphere(sphere) => {
                if self.point_inside(point) {
                    return AxisFlags::XYZ;
                }
                let diff = point - sphere.center;
                let radius_sq = sphere.radius * sphere.radius;
                if diff.x * diff.x + diff.y * diff.y <= radius_sq {
                    AxisFlags::XY
                } else if diff.x * diff.x + diff.z * diff.z <= radius_sq {
                    AxisFlags::XZ
                } else if diff.y * diff.y + diff.z * diff.z <= radius_sq {
                    AxisFlags::YZ
                } else {
                    AxisFlags::empty()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat3, Mat4Ext};
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_transform_keeps_volume() {
        let b = BoundingVolume::from_box(Box3::aligned(Vec3::new(1.0, 2.0, 3.0), Vec3::new(1.0, 0.5, 2.0)));
        let moved = b.create_from_transform(&Mat4::identity());
        assert_relative_eq!(*moved.bounding_box().expect("box kind kept"), *b.bounding_box().expect("box"), epsilon = 1e-6);

        let s = BoundingVolume::from_sphere(Sphere3::new(Vec3::new(1.0, 0.0, 0.0), 2.0));
        assert_eq!(s.create_from_transform(&Mat4::identity()), s);
    }

    #[test]
    fn test_transform_keeps_kind() {
        let matrix = Mat4::from_srt(&Vec3::repeat(2.0), &Mat3::identity(), &Vec3::new(0.0, 0.0, 5.0));
        let sphere = BoundingVolume::from_sphere(Sphere3::unit()).create_from_transform(&matrix);
        assert_relative_eq!(sphere.bounding_sphere().map_or(0.0, |s| s.radius), 2.0);
        assert_relative_eq!(sphere.center(), Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(BoundingVolume::Empty.create_from_transform(&matrix), BoundingVolume::Empty);
    }

    #[test]
    fn test_merge_rules() {
        let unit_box = BoundingVolume::from_box(Box3::unit());
        let far_sphere = BoundingVolume::from_sphere(Sphere3::new(Vec3::new(5.0, 0.0, 0.0), 1.0));

        let mut merged = unit_box;
        merged.merge(&Mat4::identity(), &far_sphere);
        let b = merged.bounding_box().copied().expect("box kind kept");
        assert!(b.contains_point(&Vec3::new(6.0, 0.0, 0.0), 1e-4));
        assert!(b.contains_point(&Vec3::new(-1.0, -1.0, -1.0), 1e-4));

        let mut sphere = far_sphere;
        sphere.merge(&Mat4::identity(), &unit_box);
        let s = sphere.bounding_sphere().copied().expect("sphere kind kept");
        assert!(s.contains_point(&Vec3::new(-1.0, -1.0, -1.0)));

        // empty source is a no-op, empty target takes the source
        let mut unchanged = unit_box;
        unchanged.merge(&Mat4::identity(), &BoundingVolume::Empty);
        assert_eq!(unchanged, unit_box);
        let mut empty = BoundingVolume::Empty;
        empty.merge(&Mat4::identity(), &far_sphere);
        assert_eq!(empty, far_sphere);
    }

    #[test]
    fn test_zero_reset_then_merge() {
        let mut volume = BoundingVolume::from_sphere(Sphere3::new(Vec3::new(9.0, 9.0, 9.0), 4.0));
        volume.zero_reset();
        assert!(volume.is_empty());
        volume.merge(&Mat4::new_translation(&Vec3::new(1.0, 0.0, 0.0)), &BoundingVolume::from_sphere(Sphere3::unit()));
        assert_relative_eq!(volume.center(), Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(volume.enclosing_sphere().radius, 1.0);
    }

    #[test]
    fn test_which_side() {
        let plane = Plane3::new(Vec3::x(), 0.0);
        let sphere = BoundingVolume::from_sphere(Sphere3::new(Vec3::new(3.0, 0.0, 0.0), 1.0));
        let b = BoundingVolume::from_box(Box3::aligned(Vec3::new(-3.0, 0.0, 0.0), Vec3::repeat(1.0)));
        assert_eq!(sphere.which_side(&plane), Side::Positive);
        assert_eq!(b.which_side(&plane), Side::Negative);
        assert_eq!(BoundingVolume::Empty.which_side(&plane), Side::Overlap);
    }

    #[test]
    fn test_point_inside() {
        let b = BoundingVolume::from_box(Box3::unit());
        assert!(b.point_inside(&Vec3::new(1.0, 1.0, 1.0)));
        assert!(!b.point_inside(&Vec3::new(1.1, 0.0, 0.0)));
        assert!(!BoundingVolume::Empty.point_inside(&Vec3::zeros()));
    }

    #[test]
    fn test_point_inside_flags() {
        let b = BoundingVolume::from_box(Box3::unit());
        assert_eq!(b.point_inside_flags(&Vec3::zeros()), AxisFlags::XYZ);
        assert_eq!(b.point_inside_flags(&Vec3::new(0.0, 5.0, 0.0)), AxisFlags::XZ);
        assert_eq!(b.point_inside_flags(&Vec3::new(5.0, 5.0, 0.0)), AxisFlags::Z);

        let s = BoundingVolume::from_sphere(Sphere3::unit());
        assert_eq!(s.point_inside_flags(&Vec3::new(0.0, 0.0, 0.5)), AxisFlags::XYZ);
        assert_eq!(s.point_inside_flags(&Vec3::new(0.2, 0.2, 5.0)), AxisFlags::XY);
        assert_eq!(s.point_inside_flags(&Vec3::new(0.2, 5.0, 0.2)), AxisFlags::XZ);
        assert_eq!(s.point_inside_flags(&Vec3::new(5.0, 0.2, 0.2)), AxisFlags::YZ);
        assert_eq!(s.point_inside_flags(&Vec3::new(5.0, 5.0, 5.0)), AxisFlags::empty());
    }

    #[test]
    fn test_point_on_boundary_is_flagged() {
        let b = BoundingVolume::from_box(Box3::unit());
        let on_face = Vec3::new(1.0, 0.0, 0.0);
        assert!(b.point_inside(&on_face));
        assert_eq!(b.point_inside_flags(&on_face), AxisFlags::XYZ);
        assert_eq!(b.point_inside_flags(&Vec3::new(1.0, 5.0, 0.0)), AxisFlags::XZ);

        let s = BoundingVolume::from_sphere(Sphere3::unit());
        let on_surface = Vec3::new(0.0, 1.0, 0.0);
        assert!(s.point_inside(&on_surface));
        assert_eq!(s.point_inside_flags(&on_surface), AxisFlags::XYZ);
        // on the rim of the XY disc
        assert_eq!(s.point_inside_flags(&Vec3::new(0.0, 1.0, 5.0)), AxisFlags::XY);
    }

    #[test]
    fn test_compute_from_data_keeps_kind() {
        let points = [Vec3::new(-1.0, 0.0, 0.0), Vec3::new(1.0, 2.0, 0.0), Vec3::new(0.0, 1.0, 1.0)];
        let data = PositionData::from(&points[..]);

        let mut b = BoundingVolume::from_box(Box3::default());
        b.compute_from_data(&data, true);
        assert!(points.iter().all(|p| b.point_inside(p)));
        assert!(b.bounding_box().is_some());

        let mut s = BoundingVolume::from_sphere(Sphere3::default());
        s.compute_from_data(&data, false);
        assert!(points.iter().all(|p| s.point_inside(&(p * 0.999 + s.center() * 0.001))));

        let mut empty = BoundingVolume::Empty;
        empty.compute_from_data(&data, true);
        assert!(empty.is_empty());
    }
}
