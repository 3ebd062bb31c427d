use nalgebra::Vector3;
use ndarray::{Array3, Ix3};
use nifti::{IntoNdArray, NiftiObject, ReaderOptions};
use std::path::{Path, PathBuf};

/// A binarized segmentation mask together with its voxel geometry.
///
/// `data[[x, y, z]]` is 1 where the structure is present. World position of a
/// voxel center is `origin + spacing.component_mul(index)`.
#[derive(Debug, Clone)]
pub struct LabelVolume {
    pub name: String,
    pub data: Array3<u8>,
    pub spacing: Vector3<f32>,
    pub origin: Vector3<f32>,
}

impl LabelVolume {
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    pub fn voxel_count(&self) -> usize {
        self.data.len()
    }

    pub fn foreground_count(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }
}

/// List the NIfTI files under a directory, sorted by path so label numbering
/// is deterministic.
pub fn discover_inputs(dir: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| format!("Failed to read input directory {:?}: {}", dir, e))?;

    let mut inputs = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let name = match path.file_name().and_then(|s| s.to_str()) {
            Some(name) => name.to_lowercase(),
            None => continue,
        };
        if name.ends_with(".nii") || name.ends_with(".nii.gz") {
            inputs.push(path);
        }
    }
    inputs.sort();

    if inputs.is_empty() {
        return Err(format!("No .nii or .nii.gz files found in {:?}", dir).into());
    }
    Ok(inputs)
}

/// File name with the `.nii` / `.nii.gz` suffix stripped. Used for output
/// naming.
pub fn volume_stem(path: &Path) -> String {
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    let name = name.strip_suffix(".gz").unwrap_or(name);
    let name = name.strip_suffix(".nii").unwrap_or(name);
    name.to_string()
}

/// Read a NIfTI file into a binary mask. Any nonzero voxel counts as
/// foreground; spacing and origin come from the header (sform translation
/// when present, qform offset otherwise).
pub fn read_volume(path: &Path) -> Result<LabelVolume, Box<dyn std::error::Error>> {
    let object = ReaderOptions::new()
        .read_file(path)
        .map_err(|e| format!("Failed to read NIfTI file {:?}: {}", path, e))?;

    let header = object.header().clone();
    let spacing = Vector3::new(header.pixdim[1], header.pixdim[2], header.pixdim[3]);
    if spacing.iter().any(|&s| s <= 0.0 || !s.is_finite()) {
        return Err(format!("{:?} has invalid voxel spacing {:?}", path, header.pixdim).into());
    }

    let origin = if header.sform_code > 0 {
        Vector3::new(header.srow_x[3], header.srow_y[3], header.srow_z[3])
    } else {
        Vector3::new(header.quatern_x, header.quatern_y, header.quatern_z)
    };

    let data = object
        .into_volume()
        .into_ndarray::<f32>()
        .map_err(|e| format!("Failed to decode voxel data of {:?}: {}", path, e))?;
    let data = data
        .into_dimensionality::<Ix3>()
        .map_err(|_| format!("{:?} is not a 3D volume", path))?;
    let data = data.mapv(|v| u8::from(v != 0.0));

    Ok(LabelVolume {
        name: volume_stem(path),
        data,
        spacing,
        origin,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn test_volume_stem() {
        assert_eq!(volume_stem(Path::new("scans/liver.nii")), "liver");
        assert_eq!(volume_stem(Path::new("scans/spleen.nii.gz")), "spleen");
        assert_eq!(volume_stem(Path::new("aorta")), "aorta");
    }

    #[test]
    fn test_discover_inputs_sorted_and_filtered() {
        let dir = std::env::temp_dir().join("niimesh_test_discover");
        std::fs::create_dir_all(&dir).unwrap();
        for name in ["b.nii", "a.nii.gz", "notes.txt"] {
            File::create(dir.join(name)).unwrap();
        }

        let inputs = discover_inputs(&dir).unwrap();
        let names: Vec<String> = inputs
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, ["a.nii.gz", "b.nii"]);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_discover_inputs_empty_dir_errors() {
        let dir = std::env::temp_dir().join("niimesh_test_discover_empty");
        std::fs::create_dir_all(&dir).unwrap();
        assert!(discover_inputs(&dir).is_err());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_foreground_count() {
        let mut data = Array3::<u8>::zeros((2, 2, 2));
        data[[0, 0, 0]] = 1;
        data[[1, 1, 1]] = 1;
        let volume = LabelVolume {
            name: "test".to_string(),
            data,
            spacing: Vector3::new(1.0, 1.0, 1.0),
            origin: Vector3::zeros(),
        };
        assert_eq!(volume.voxel_count(), 8);
        assert_eq!(volume.foreground_count(), 2);
    }
}
