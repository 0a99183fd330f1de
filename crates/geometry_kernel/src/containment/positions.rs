//! Point-cloud input boundary
//!
//! Mesh code owns vertex memory in several layouts; [`PositionData`] lets
//! the fitting algorithms read positions out of any of them without
//! copying.

use crate::error::KernelError;
use crate::foundation::math::{Vec3, Vec4};

/// Borrowed positions in one of the supported layouts
#[derive(Debug, Clone, Copy)]
pub enum PositionData<'a> {
    /// Tightly packed 3-component positions
    Vec3(&'a [Vec3]),
    /// 4-component positions; `w` is ignored
    Vec4(&'a [Vec4]),
    /// Interleaved vertex buffer: position `i` is the three floats starting
    /// at `data[i * pitch]`
    Flat {
        /// Raw vertex floats
        data: &'a [f32],
        /// Floats per vertex; values below 3 are read as 3
        pitch: usize,
    },
}

impl<'a> PositionData<'a> {
    /// Interleaved buffer with `pitch` floats per vertex
    ///
    /// A pitch below 3 cannot hold a position and is raised to 3.
    pub fn flat(data: &'a [f32], pitch: usize) -> Self {
        if pitch < 3 {
            log::warn!("vertex pitch {pitch} is smaller than a position, using 3");
        }
        Self::Flat {
            data,
            pitch: pitch.max(3),
        }
    }

    /// View a slice of plain-old-data vertices whose first three `f32`
    /// fields are the position
    pub fn from_vertices<T: bytemuck::Pod>(vertices: &'a [T]) -> Result<Self, KernelError> {
        let data: &[f32] = bytemuck::try_cast_slice(vertices)
            .map_err(|e| KernelError::VertexLayout(e.to_string()))?;
        let pitch = std::mem::size_of::<T>() / std::mem::size_of::<f32>();
        if pitch < 3 {
            return Err(KernelError::VertexLayout(format!(
                "vertex of {} bytes cannot hold a position",
                std::mem::size_of::<T>()
            )));
        }
        Ok(Self::Flat { data, pitch })
    }

    /// Number of positions
    pub fn len(&self) -> usize {
        match self {
            Self::Vec3(points) => points.len(),
            Self::Vec4(points) => points.len(),
            Self::Flat { data, pitch } => {
                if data.len() < 3 {
                    0
                } else {
                    (data.len() - 3) / (*pitch).max(3) + 1
                }
            }
        }
    }

    /// Whether there are no positions
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Position `index`; callers stay below [`Self::len`]
    fn position(&self, index: usize) -> Vec3 {
        match self {
            Self::Vec3(points) => points[index],
            Self::Vec4(points) => points[index].xyz(),
            Self::Flat { data, pitch } => {
                let base = index * (*pitch).max(3);
                Vec3::new(data[base], data[base + 1], data[base + 2])
            }
        }
    }

    /// Iterate over the positions
    pub fn iter(&self) -> impl Iterator<Item = Vec3> + '_ {
        (0..self.len()).map(move |index| self.position(index))
    }
}

impl<'a> From<&'a [Vec3]> for PositionData<'a> {
    fn from(points: &'a [Vec3]) -> Self {
        Self::Vec3(points)
    }
}

impl<'a> From<&'a [Vec4]> for PositionData<'a> {
    fn from(points: &'a [Vec4]) -> Self {
        Self::Vec4(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[repr(C)]
    #[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
    struct Vertex {
        position: [f32; 3],
        normal: [f32; 3],
        uv: [f32; 2],
    }

    #[test]
    fn test_flat_layout_with_pitch() {
        let data = [1.0, 2.0, 3.0, 9.0, 4.0, 5.0, 6.0, 9.0];
        let positions = PositionData::flat(&data, 4);
        assert_eq!(positions.len(), 2);
        let collected: Vec<Vec3> = positions.iter().collect();
        assert_eq!(collected, vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)]);
    }

    #[test]
    fn test_flat_layout_ignores_trailing_partial_vertex() {
        let data = [1.0, 2.0, 3.0, 0.0, 0.0, 4.0, 5.0, 6.0];
        assert_eq!(PositionData::flat(&data, 5).len(), 2);
        assert_eq!(PositionData::flat(&data[..2], 5).len(), 0);
    }

    #[test]
    fn test_literal_flat_pitch_is_clamped() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let positions = PositionData::Flat { data: &data, pitch: 0 };
        assert_eq!(positions.len(), 2);
        let collected: Vec<Vec3> = positions.iter().collect();
        assert_eq!(collected, vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)]);
        assert_eq!(PositionData::Flat { data: &data, pitch: 1 }.len(), 2);
    }

    #[test]
    fn test_vec4_drops_w() {
        let points = [Vec4::new(1.0, 2.0, 3.0, 1.0)];
        let positions = PositionData::from(&points[..]);
        assert_eq!(positions.iter().next(), Some(Vec3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_from_pod_vertices() {
        let vertices = [
            Vertex { position: [1.0, 0.0, 0.0], normal: [0.0, 1.0, 0.0], uv: [0.0, 0.0] },
            Vertex { position: [0.0, 2.0, 0.0], normal: [0.0, 1.0, 0.0], uv: [1.0, 1.0] },
        ];
        let positions = PositionData::from_vertices(&vertices).expect("f32 vertex layout");
        assert_eq!(positions.len(), 2);
        assert_eq!(positions.iter().last(), Some(Vec3::new(0.0, 2.0, 0.0)));
    }

    #[test]
    fn test_small_vertex_rejected() {
        let vertices = [[1.0f32, 2.0]];
        assert!(PositionData::from_vertices(&vertices).is_err());
    }
}
