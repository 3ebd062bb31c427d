use nalgebra::Vector3;
use ndarray::{s, Array3, Zip};

use super::loader::LabelVolume;
use super::resample::ReferenceGrid;

/// Combined label volume in the reference grid's coordinate frame. Voxel
/// values are label indices, 0 is background.
#[derive(Debug, Clone)]
pub struct CompositeVolume {
    pub data: Array3<u8>,
    pub spacing: f32,
    pub origin: Vector3<f32>,
}

/// Merge per-structure masks into one label volume. Mask `i` gets label
/// `i + 1`; where masks overlap the last one in input order wins.
pub fn combine(
    masks: &[LabelVolume],
    grid: &ReferenceGrid,
) -> Result<CompositeVolume, Box<dyn std::error::Error>> {
    if masks.is_empty() {
        return Err("No masks to combine".into());
    }
    if masks.len() > u8::MAX as usize {
        return Err(format!(
            "Too many input volumes ({}); labels must fit in 8 bits",
            masks.len()
        )
        .into());
    }

    let mut data = Array3::<u8>::zeros(grid.dim);
    for (i, mask) in masks.iter().enumerate() {
        if mask.data.dim() != grid.dim {
            return Err(format!(
                "Mask {} has dimensions {:?}, expected the reference grid {:?}",
                mask.name,
                mask.data.dim(),
                grid.dim
            )
            .into());
        }
        let label = (i + 1) as u8;
        Zip::from(&mut data).and(&mask.data).for_each(|d, &m| {
            if m != 0 {
                *d = label;
            }
        });
    }

    Ok(CompositeVolume {
        data,
        spacing: grid.spacing,
        origin: grid.origin,
    })
}

/// Surround the volume with one background voxel per side so every label
/// surface closes inside the grid. The origin moves back by one voxel.
pub fn pad(volume: &CompositeVolume) -> CompositeVolume {
    let (nx, ny, nz) = volume.data.dim();
    let mut data = Array3::<u8>::zeros((nx + 2, ny + 2, nz + 2));
    data.slice_mut(s![1..=nx, 1..=ny, 1..=nz])
        .assign(&volume.data);

    CompositeVolume {
        data,
        spacing: volume.spacing,
        origin: volume.origin - Vector3::new(volume.spacing, volume.spacing, volume.spacing),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(dim: (usize, usize, usize), voxels: &[(usize, usize, usize)]) -> LabelVolume {
        let mut data = Array3::zeros(dim);
        for &(x, y, z) in voxels {
            data[[x, y, z]] = 1;
        }
        LabelVolume {
            name: "mask".to_string(),
            data,
            spacing: Vector3::new(1.0, 1.0, 1.0),
            origin: Vector3::zeros(),
        }
    }

    fn grid(dim: (usize, usize, usize)) -> ReferenceGrid {
        ReferenceGrid {
            dim,
            spacing: 1.0,
            origin: Vector3::zeros(),
        }
    }

    #[test]
    fn test_combine_assigns_labels_in_order() {
        let a = mask((3, 3, 3), &[(0, 0, 0), (1, 1, 1)]);
        let b = mask((3, 3, 3), &[(1, 1, 1), (2, 2, 2)]);

        let combined = combine(&[a, b], &grid((3, 3, 3))).unwrap();
        assert_eq!(combined.data[[0, 0, 0]], 1);
        // overlap resolves to the later input
        assert_eq!(combined.data[[1, 1, 1]], 2);
        assert_eq!(combined.data[[2, 2, 2]], 2);
        assert_eq!(combined.data[[0, 1, 2]], 0);
    }

    #[test]
    fn test_combine_rejects_mismatched_dims() {
        let a = mask((3, 3, 3), &[]);
        assert!(combine(&[a], &grid((4, 4, 4))).is_err());
    }

    #[test]
    fn test_combine_rejects_empty_input() {
        assert!(combine(&[], &grid((2, 2, 2))).is_err());
    }

    #[test]
    fn test_pad_adds_background_border() {
        let a = mask((2, 2, 2), &[(0, 0, 0), (1, 1, 1)]);
        let combined = combine(&[a], &grid((2, 2, 2))).unwrap();
        let padded = pad(&combined);

        assert_eq!(padded.data.dim(), (4, 4, 4));
        assert_eq!(padded.origin, Vector3::new(-1.0, -1.0, -1.0));
        assert_eq!(padded.data[[1, 1, 1]], 1);
        assert_eq!(padded.data[[2, 2, 2]], 1);
        // border stays background
        assert_eq!(padded.data[[0, 0, 0]], 0);
        assert_eq!(padded.data[[3, 3, 3]], 0);
        assert_eq!(padded.data[[0, 1, 1]], 0);
    }
}
