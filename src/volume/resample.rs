use nalgebra::Vector3;
use ndarray::Array3;

use super::loader::LabelVolume;

/// Isotropic output grid shared by every resampled volume. Derived from one
/// reference input so all meshes land in a single world coordinate frame.
#[derive(Debug, Clone)]
pub struct ReferenceGrid {
    pub dim: (usize, usize, usize),
    pub spacing: f32,
    pub origin: Vector3<f32>,
}

impl ReferenceGrid {
    /// Grid covering the reference volume's physical extent with isotropic
    /// voxels of the given edge length.
    pub fn isotropic(
        reference: &LabelVolume,
        voxel_length: f32,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        if voxel_length <= 0.0 || !voxel_length.is_finite() {
            return Err(format!("Invalid voxel resample length: {}", voxel_length).into());
        }
        let (nx, ny, nz) = reference.dim();
        let dim = (
            scaled_dim(nx, reference.spacing.x, voxel_length),
            scaled_dim(ny, reference.spacing.y, voxel_length),
            scaled_dim(nz, reference.spacing.z, voxel_length),
        );
        Ok(ReferenceGrid {
            dim,
            spacing: voxel_length,
            origin: reference.origin,
        })
    }
}

fn scaled_dim(size: usize, spacing: f32, voxel_length: f32) -> usize {
    (size as f32 * spacing / voxel_length + 0.5) as usize
}

/// Nearest-neighbor resampling onto the reference grid. Each output voxel
/// center is mapped through world space into the source volume; points
/// outside the source stay background.
pub fn resample_nearest(volume: &LabelVolume, grid: &ReferenceGrid) -> LabelVolume {
    let (nx, ny, nz) = grid.dim;
    let (sx, sy, sz) = volume.dim();
    let mut data = Array3::<u8>::zeros((nx, ny, nz));

    for z in 0..nz {
        for y in 0..ny {
            for x in 0..nx {
                let world =
                    grid.origin + Vector3::new(x as f32, y as f32, z as f32) * grid.spacing;
                let local = (world - volume.origin).component_div(&volume.spacing);
                let ix = local.x.round() as isize;
                let iy = local.y.round() as isize;
                let iz = local.z.round() as isize;
                if ix >= 0
                    && iy >= 0
                    && iz >= 0
                    && (ix as usize) < sx
                    && (iy as usize) < sy
                    && (iz as usize) < sz
                {
                    data[[x, y, z]] = volume.data[[ix as usize, iy as usize, iz as usize]];
                }
            }
        }
    }

    LabelVolume {
        name: volume.name.clone(),
        data,
        spacing: Vector3::new(grid.spacing, grid.spacing, grid.spacing),
        origin: grid.origin,
    }
}
