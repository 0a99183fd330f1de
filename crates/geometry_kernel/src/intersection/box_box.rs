//! Separating axis test between oriented boxes
//!
//! Two convex solids are disjoint iff some axis separates their projections.
//! For boxes the candidates are the three face normals of each box and the
//! nine cross products of one box's axes with the other's. When an axis of
//! one box is parallel to an axis of the other, the cross products
//! degenerate and the face tests alone are conclusive.

use crate::foundation::math::{constants, Mat3};
use crate::geometry::Box3;
use crate::intersector::{IntersectionKind, Intersector, IntersectorCache, IntersectorResult};

/// Whether two oriented boxes overlap
pub fn test_box_box(box0: &Box3, box1: &Box3) -> bool {
    let cutoff = 1.0 - constants::ZERO_TOLERANCE;
    let a = &box0.axes;
    let b = &box1.axes;
    let ea = &box0.extents;
    let eb = &box1.extents;
    let diff = box1.center - box0.center;

    let mut c = Mat3::zeros();
    let mut abs_c = Mat3::zeros();
    let mut ad = [0.0f32; 3];
    let mut parallel_pair = false;

    // face axes of box0
    for i in 0..3 {
        for j in 0..3 {
            c[(i, j)] = a[i].dot(&b[j]);
            abs_c[(i, j)] = c[(i, j)].abs();
            if abs_c[(i, j)] > cutoff {
                parallel_pair = true;
            }
        }
        ad[i] = a[i].dot(&diff);
        let r1 = eb[0] * abs_c[(i, 0)] + eb[1] * abs_c[(i, 1)] + eb[2] * abs_c[(i, 2)];
        if ad[i].abs() > ea[i] + r1 {
            return false;
        }
    }

    // face axes of box1
    for j in 0..3 {
        let r = b[j].dot(&diff).abs();
        let r0 = ea[0] * abs_c[(0, j)] + ea[1] * abs_c[(1, j)] + ea[2] * abs_c[(2, j)];
        if r > r0 + eb[j] {
            return false;
        }
    }

    if parallel_pair {
        return true;
    }

    // a[i] x b[j]
    for i in 0..3 {
        let (i1, i2) = ((i + 1) % 3, (i + 2) % 3);
        for j in 0..3 {
            let (j1, j2) = ((j + 1) % 3, (j + 2) % 3);
            let r = (ad[i2] * c[(i1, j)] - ad[i1] * c[(i2, j)]).abs();
            let r0 = ea[i1] * abs_c[(i2, j)] + ea[i2] * abs_c[(i1, j)];
            let r1 = eb[j1] * abs_c[(i, j2)] + eb[j2] * abs_c[(i, j1)];
            if r > r0 + r1 {
                return false;
            }
        }
    }

    true
}

/// Box-box overlap query
#[derive(Debug)]
pub struct IntrBox3Box3<'a> {
    box0: &'a Box3,
    box1: &'a Box3,
    kind: IntersectionKind,
}

impl<'a> IntrBox3Box3<'a> {
    /// Query between two boxes
    pub fn new(box0: &'a Box3, box1: &'a Box3) -> Self {
        Self {
            box0,
            box1,
            kind: IntersectionKind::Empty,
        }
    }
}

impl Intersector for IntrBox3Box3<'_> {
    fn test(&mut self, cache: Option<IntersectorCache>) -> IntersectorResult {
        let hit = test_box_box(self.box0, self.box1);
        self.kind = if hit { IntersectionKind::Other } else { IntersectionKind::Empty };
        IntersectorResult::new(hit, cache)
    }

    fn kind(&self) -> IntersectionKind {
        self.kind
    }
}
