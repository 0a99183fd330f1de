//! Triangle/plane clipping
//!
//! Triangles are clipped against each plane in turn; only the part on the
//! non-negative side of every plane survives. Against one plane a triangle
//! with
//!
//! - no vertex outside passes unchanged,
//! - one vertex outside becomes the remaining quad, split in two triangles,
//! - two vertices outside shrinks to the corner that is still inside,
//! - three vertices outside is dropped.
//!
//! Output triangles keep the winding of their source.

use crate::foundation::math::{constants, Vec3};
use crate::geometry::{Plane3, Side, Triangle3};

/// Point where the edge `from -> to` meets `plane`
///
/// `None` when the edge runs parallel to the plane.
fn edge_crossing(plane: &Plane3, from: &Vec3, to: &Vec3) -> Option<Vec3> {
    let edge = to - from;
    let denom = plane.normal.dot(&edge);
    if denom.abs() < constants::EPSILON {
        return None;
    }
    let t = (plane.constant - plane.normal.dot(from)) / denom;
    Some(from + edge * t)
}

/// Clip one triangle against one plane, appending the survivors to `out`
fn clip_against(plane: &Plane3, triangle: &Triangle3, out: &mut Vec<Triangle3>) {
    let v = &triangle.vertices;
    let outside = triangle.vertices.map(|vertex| plane.which_side(&vertex) == Side::Negative);

    match outside.iter().filter(|&&o| o).count() {
        0 => out.push(*triangle),
        1 => {
            let Some(a) = outside.iter().position(|&o| o) else { return };
            let (b, c) = ((a + 1) % 3, (a + 2) % 3);
            let (Some(ab), Some(ac)) = (edge_crossing(plane, &v[a], &v[b]), edge_crossing(plane, &v[a], &v[c])) else {
                log::debug!("clip edge parallel to plane, dropping triangle");
                return;
            };
            let mut first = *triangle;
            first.vertices[a] = ab;
            let mut second = *triangle;
            second.vertices[a] = ac;
            second.vertices[b] = ab;
            out.push(first);
            out.push(second);
        }
        2 => {
            let Some(a) = outside.iter().position(|&o| !o) else { return };
            let (b, c) = ((a + 1) % 3, (a + 2) % 3);
            let (Some(ab), Some(ac)) = (edge_crossing(plane, &v[a], &v[b]), edge_crossing(plane, &v[a], &v[c])) else {
                log::debug!("clip edge parallel to plane, dropping triangle");
                return;
            };
            let mut kept = *triangle;
            kept.vertices[b] = ab;
            kept.vertices[c] = ac;
            out.push(kept);
        }
        _ => {}
    }
}

/// Part of `triangles` on the non-negative side of every plane
pub fn clip_triangles(planes: &[Plane3], triangles: &[Triangle3]) -> Vec<Triangle3> {
    if planes.is_empty() || triangles.is_empty() {
        return Vec::new();
    }

    let mut current = triangles.to_vec();
    let mut next = Vec::with_capacity(current.len() * 2);
    for plane in planes {
        next.clear();
        for triangle in &current {
            clip_against(plane, triangle, &mut next);
        }
        std::mem::swap(&mut current, &mut next);
        if current.is_empty() {
            break;
        }
    }
    log::trace!("clipped {} triangles to {}", triangles.len(), current.len());
    current
}

/// Reusable clipper holding its planes, input and result
#[derive(Debug, Clone, Default)]
pub struct TrianglePlaneClipper {
    planes: Vec<Plane3>,
    triangles: Vec<Triangle3>,
    result: Vec<Triangle3>,
}

impl TrianglePlaneClipper {
    /// Clipper with no planes and no triangles
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the clip planes
    pub fn set_planes(&mut self, planes: Vec<Plane3>) {
        self.planes = planes;
    }

    /// Replace the triangles to clip
    pub fn set_triangles(&mut self, triangles: Vec<Triangle3>) {
        self.triangles = triangles;
    }

    /// Run the clip; an empty plane or triangle set gives an empty result
    pub fn clip(&mut self) {
        self.result = clip_triangles(&self.planes, &self.triangles);
    }

    /// Triangles produced by the last [`Self::clip`]
    pub fn result(&self) -> &[Triangle3] {
        &self.result
    }
}
