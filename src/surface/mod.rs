pub mod extract;
pub mod remesh;
pub mod smooth;

use baby_shark::io::{Builder, IndexedBuilder};
use baby_shark::mesh::corner_table::CornerTableF;
use nalgebra::Vector3;
use std::collections::HashMap;

pub use extract::extract_label;
pub use remesh::remesh_uniform;
pub use smooth::{smooth_constrained, SmoothingParams};

/// Indexed triangle mesh used between extraction and remeshing.
#[derive(Debug, Clone, Default)]
pub struct SurfaceMesh {
    pub positions: Vec<Vector3<f32>>,
    pub indices: Vec<u32>,
}

impl SurfaceMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Build a corner table for remeshing and writing.
    pub fn to_corner_table(&self) -> Result<CornerTableF, Box<dyn std::error::Error>> {
        let mut builder = CornerTableF::builder_indexed();

        builder.set_num_vertices(self.positions.len());
        for pos in &self.positions {
            builder
                .add_vertex([pos.x, pos.y, pos.z])
                .map_err(|e| format!("Failed to add vertex: {:?}", e))?;
        }

        builder.set_num_faces(self.triangle_count());
        for tri in self.indices.chunks(3) {
            builder
                .add_face(tri[0] as usize, tri[1] as usize, tri[2] as usize)
                .map_err(|e| format!("Failed to add face: {:?}", e))?;
        }

        builder
            .finish()
            .map_err(|e| format!("Failed to build mesh: {:?}", e).into())
    }

    /// Read positions and faces back out of a corner table.
    pub fn from_corner_table(mesh: &CornerTableF) -> Self {
        let mut positions = Vec::with_capacity(mesh.count_vertices());
        let mut vertex_id_to_idx = HashMap::new();
        for (idx, vertex_id) in mesh.vertices().enumerate() {
            let pos = mesh.vertex_position(vertex_id);
            positions.push(Vector3::new(pos.x, pos.y, pos.z));
            vertex_id_to_idx.insert(vertex_id, idx);
        }

        let mut indices = Vec::with_capacity(mesh.count_faces() * 3);
        for face_id in mesh.faces() {
            let (v0, v1, v2) = mesh.face_vertices(face_id);
            indices.push(vertex_id_to_idx[&v0] as u32);
            indices.push(vertex_id_to_idx[&v1] as u32);
            indices.push(vertex_id_to_idx[&v2] as u32);
        }

        SurfaceMesh { positions, indices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Octahedron centered at the origin.
    pub(crate) fn octahedron() -> SurfaceMesh {
        let positions = vec![
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(-1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, -1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(0.0, 0.0, -1.0),
        ];
        let indices = vec![
            0, 2, 4, 2, 1, 4, 1, 3, 4, 3, 0, 4, 2, 0, 5, 1, 2, 5, 3, 1, 5, 0, 3, 5,
        ];
        SurfaceMesh { positions, indices }
    }

    #[test]
    fn test_corner_table_round_trip() {
        let mesh = octahedron();
        let table = mesh.to_corner_table().unwrap();
        assert_eq!(table.count_vertices(), 6);
        assert_eq!(table.count_faces(), 8);

        let back = SurfaceMesh::from_corner_table(&table);
        assert_eq!(back.positions.len(), 6);
        assert_eq!(back.triangle_count(), 8);
    }
}
