pub mod stl;
pub mod vtp;

use baby_shark::mesh::corner_table::CornerTableF;
use std::path::Path;

use crate::config::OutputFormat;
use crate::surface::SurfaceMesh;

/// Write a mesh in the requested format.
pub fn write_mesh(
    mesh: &CornerTableF,
    path: &Path,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let surface = SurfaceMesh::from_corner_table(mesh);
    match format {
        OutputFormat::Stl => stl::write_stl(&surface, path),
        OutputFormat::Vtp => vtp::write_vtp(&surface, path),
    }
}
