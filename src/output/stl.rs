use nalgebra::Vector3;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::surface::SurfaceMesh;

/// Write a triangle mesh as binary STL with per-face normals computed from
/// the winding order.
pub fn write_stl(mesh: &SurfaceMesh, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let triangles = mesh.indices.chunks(3).map(|tri| {
        let v0 = mesh.positions[tri[0] as usize];
        let v1 = mesh.positions[tri[1] as usize];
        let v2 = mesh.positions[tri[2] as usize];

        let normal = (v1 - v0).cross(&(v2 - v0));
        let normal = if normal.norm() > 0.0 {
            normal.normalize()
        } else {
            Vector3::new(0.0, 0.0, 1.0)
        };

        stl_io::Triangle {
            normal: stl_io::Normal::new([normal.x, normal.y, normal.z]),
            vertices: [
                stl_io::Vertex::new([v0.x, v0.y, v0.z]),
                stl_io::Vertex::new([v1.x, v1.y, v1.z]),
                stl_io::Vertex::new([v2.x, v2.y, v2.z]),
            ],
        }
    });

    let mut file = BufWriter::new(
        File::create(path).map_err(|e| format!("Failed to create {:?}: {}", path, e))?,
    );
    stl_io::write_stl(&mut file, triangles)
        .map_err(|e| format!("Failed to write STL data to {:?}: {}", path, e))?;
    Ok(())
}
