use fast_surface_nets::ndshape::RuntimeShape;
use fast_surface_nets::{surface_nets, SurfaceNetsBuffer};
use nalgebra::Vector3;

use super::SurfaceMesh;
use crate::volume::CompositeVolume;

/// Extract the boundary surface of one label from the combined volume.
///
/// The label's voxels become the negative side of an indicator field and the
/// zero crossing is meshed with surface nets. Requires the one-voxel
/// background pad so surfaces close at the volume boundary. Positions come
/// out in world coordinates.
pub fn extract_label(
    volume: &CompositeVolume,
    label: u8,
) -> Result<SurfaceMesh, Box<dyn std::error::Error>> {
    let (nx, ny, nz) = volume.data.dim();

    // flat field with x as the fastest axis, matching the shape below
    let mut field = vec![1.0f32; nx * ny * nz];
    for z in 0..nz {
        for y in 0..ny {
            for x in 0..nx {
                if volume.data[[x, y, z]] == label {
                    field[x + y * nx + z * nx * ny] = -1.0;
                }
            }
        }
    }

    let shape = RuntimeShape::<u32, 3>::new([nx as u32, ny as u32, nz as u32]);
    let mut buffer = SurfaceNetsBuffer::default();
    surface_nets(
        &field,
        &shape,
        [0, 0, 0],
        [nx as u32 - 1, ny as u32 - 1, nz as u32 - 1],
        &mut buffer,
    );

    if buffer.positions.is_empty() {
        return Err(format!("No surface extracted for label {}", label).into());
    }

    let positions = buffer
        .positions
        .iter()
        .map(|p| volume.origin + Vector3::new(p[0], p[1], p[2]) * volume.spacing)
        .collect();

    Ok(SurfaceMesh {
        positions,
        indices: buffer.indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    fn block_volume() -> CompositeVolume {
        // 2x2x2 block of label 1, one voxel of background on every side
        let mut data = Array3::<u8>::zeros((6, 6, 6));
        for z in 2..4 {
            for y in 2..4 {
                for x in 2..4 {
                    data[[x, y, z]] = 1;
                }
            }
        }
        CompositeVolume {
            data,
            spacing: 0.5,
            origin: Vector3::new(-1.0, -1.0, -1.0),
        }
    }

    #[test]
    fn test_extract_block_surface() {
        let volume = block_volume();
        let mesh = extract_label(&volume, 1).unwrap();

        assert!(!mesh.positions.is_empty());
        assert!(mesh.triangle_count() > 0);
        assert_eq!(mesh.indices.len() % 3, 0);
        for &index in &mesh.indices {
            assert!((index as usize) < mesh.positions.len());
        }
    }

    #[test]
    fn test_extracted_positions_in_world_bounds() {
        let volume = block_volume();
        let mesh = extract_label(&volume, 1).unwrap();

        let low = volume.origin;
        let high = volume.origin + Vector3::new(6.0, 6.0, 6.0) * volume.spacing;
        for p in &mesh.positions {
            assert!(p.x.is_finite() && p.y.is_finite() && p.z.is_finite());
            assert!(p.x >= low.x && p.x <= high.x);
            assert!(p.y >= low.y && p.y <= high.y);
            assert!(p.z >= low.z && p.z <= high.z);
        }
    }

    #[test]
    fn test_absent_label_errors() {
        let volume = block_volume();
        assert!(extract_label(&volume, 2).is_err());
    }
}
