//! Meshes and models placed in the world

use std::any::Any;

use serde::{Deserialize, Serialize};

use crate::bounding::BoundingVolume;
use crate::foundation::math::{Mat4, Vec3};

use super::geometry::TriangleList;

/// Kind of primitive, used to look up its ray finder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveKind {
    /// A single triangle mesh
    Mesh,
    /// A group of meshes
    Model,
}

/// Something that can be placed in the world and picked by rays
pub trait Primitive: Send + Sync {
    /// Kind used to select the ray finder
    fn kind(&self) -> PrimitiveKind;

    /// Model-to-world transform
    fn world_transform(&self) -> &Mat4;

    /// Bound in model space
    fn model_bound(&self) -> &BoundingVolume;

    /// Bound in world space
    fn world_bound(&self) -> BoundingVolume {
        self.model_bound().create_from_transform(self.world_transform())
    }

    /// Downcast to Any for type-specific access
    fn as_any(&self) -> &dyn Any;
}

/// Triangle mesh with its placement
#[derive(Debug, Clone, PartialEq)]
pub struct MeshPrimitive {
    /// Model-space triangles
    pub geometry: TriangleList,
    /// Model-to-world transform
    pub world: Mat4,
}

impl MeshPrimitive {
    /// Mesh placed by `world`
    pub fn new(geometry: TriangleList, world: Mat4) -> Self {
        Self { geometry, world }
    }
}

impl Primitive for MeshPrimitive {
    fn kind(&self) -> PrimitiveKind {
        PrimitiveKind::Mesh
    }

    fn world_transform(&self) -> &Mat4 {
        &self.world
    }

    fn model_bound(&self) -> &BoundingVolume {
        self.geometry.bound()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Group of meshes sharing one placement
///
/// Each mesh's `world` is relative to the model; the mesh ends up in the
/// world at `model.world * mesh.world`.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelPrimitive {
    meshes: Vec<MeshPrimitive>,
    world: Mat4,
    bound: BoundingVolume,
}

impl ModelPrimitive {
    /// Model placed by `world`; its bound is merged from the mesh bounds
    pub fn new(meshes: Vec<MeshPrimitive>, world: Mat4) -> Self {
        let mut bound = BoundingVolume::Empty;
        for mesh in &meshes {
            bound.merge(&mesh.world, mesh.model_bound());
        }
        Self { meshes, world, bound }
    }

    /// Meshes of the model
    pub fn meshes(&self) -> &[MeshPrimitive] {
        &self.meshes
    }

    /// World transform of mesh `index`
    pub fn mesh_world(&self, index: usize) -> Option<Mat4> {
        self.meshes.get(index).map(|mesh| self.world * mesh.world)
    }
}

impl Primitive for ModelPrimitive {
    fn kind(&self) -> PrimitiveKind {
        PrimitiveKind::Model
    }

    fn world_transform(&self) -> &Mat4 {
        &self.world
    }

    fn model_bound(&self) -> &BoundingVolume {
        &self.bound
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Which primitive, and which of its meshes, a hit landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PrimitiveRef {
    /// Kind of the primitive hit
    pub kind: PrimitiveKind,
    /// Mesh within a model
    pub mesh_index: Option<usize>,
}

/// Ray hit on a primitive, in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveHit {
    /// World-space ray parameter
    pub t: f32,
    /// World-space hit position
    pub point: Vec3,
    /// What was hit
    pub primitive: PrimitiveRef,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Mat3, Mat4Ext};

    fn quad() -> TriangleList {
        TriangleList::new(
            vec![Vec3::new(-1.0, -1.0, 0.0), Vec3::new(1.0, -1.0, 0.0), Vec3::new(1.0, 1.0, 0.0), Vec3::new(-1.0, 1.0, 0.0)],
            Some(vec![0, 1, 2, 0, 2, 3]),
        )
    }

    #[test]
    fn test_model_bound_covers_meshes() {
        let left = MeshPrimitive::new(quad(), Mat4::new_translation(&Vec3::new(-3.0, 0.0, 0.0)));
        let right = MeshPrimitive::new(quad(), Mat4::new_translation(&Vec3::new(3.0, 0.0, 0.0)));
        let model = ModelPrimitive::new(vec![left, right], Mat4::identity());
        let bound = model.model_bound();
        assert!(bound.point_inside(&Vec3::new(-3.9, 0.0, 0.0)));
        assert!(bound.point_inside(&Vec3::new(3.9, 0.0, 0.0)));
        assert_eq!(model.kind(), PrimitiveKind::Model);
    }

    #[test]
    fn test_downcast_and_world_bound() {
        let world = Mat4::from_srt(&Vec3::repeat(2.0), &Mat3::identity(), &Vec3::new(0.0, 0.0, 4.0));
        let mesh = MeshPrimitive::new(quad(), world);
        let primitive: &dyn Primitive = &mesh;
        assert!(primitive.as_any().downcast_ref::<MeshPrimitive>().is_some());
        assert!(primitive.as_any().downcast_ref::<ModelPrimitive>().is_none());
        assert!(primitive.world_bound().point_inside(&Vec3::new(1.9, 1.9, 4.0)));
    }
}
