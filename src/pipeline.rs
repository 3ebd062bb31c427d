use nalgebra::Vector3;
use std::fs;
use std::path::Path;

use crate::config::Config;
use crate::output::write_mesh;
use crate::surface::{extract_label, remesh_uniform, smooth_constrained, SmoothingParams};
use crate::volume::{
    close, combine, discover_inputs, pad, read_volume, resample_nearest, LabelVolume,
    ReferenceGrid,
};

/// Run the full conversion: discover inputs, resample and close each mask,
/// combine them, then extract, smooth, remesh and write one surface per
/// label.
pub fn convert(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let inputs = discover_inputs(&config.input_dir)?;
    println!(
        "Found {} NIfTI file(s) in {:?}",
        inputs.len(),
        config.input_dir
    );

    let mut volumes = Vec::new();
    for path in &inputs {
        println!("Loading volume from {:?}...", path);
        volumes.push(read_volume(path)?);
    }

    // the largest input defines the shared isotropic grid
    let reference = volumes
        .iter()
        .max_by_key(|v| v.voxel_count())
        .ok_or("No input volumes")?;
    let grid = ReferenceGrid::isotropic(reference, config.voxel_resample_length)?;
    println!(
        "Reference grid from {}: {} x {} x {} voxels at {} spacing",
        reference.name, grid.dim.0, grid.dim.1, grid.dim.2, grid.spacing
    );

    let mut masks = Vec::new();
    for volume in &volumes {
        let resampled = resample_nearest(volume, &grid);
        let closed = close(&resampled.data, config.closing_radius);
        masks.push(LabelVolume {
            data: closed,
            ..resampled
        });
        println!("Added resampled {} to composite", volume.name);
    }

    let combined = pad(&combine(&masks, &grid)?);

    fs::create_dir_all(&config.output_dir).map_err(|e| {
        format!(
            "Failed to create output directory {:?}: {}",
            config.output_dir, e
        )
    })?;
    // record the parameters before any mesh work so partial runs keep them
    config.write_sidecar(&config.output_dir)?;

    let smoothing = SmoothingParams {
        iterations: config.smoothing_iterations,
        relaxation_factor: config.smoothing_relaxation_factor,
        constraint_distance: config.smoothing_distance,
    };

    for (i, mask) in masks.iter().enumerate() {
        let label = (i + 1) as u8;
        let mut surface = extract_label(&combined, label)
            .map_err(|e| format!("Surface extraction failed for {}: {}", mask.name, e))?;
        println!(
            "Extracted surface for {}: {} vertices, {} triangles",
            mask.name,
            surface.positions.len(),
            surface.triangle_count()
        );

        smooth_constrained(&mut surface, &smoothing);

        let mut mesh = surface.to_corner_table()?;
        let face_count_before = mesh.count_faces();
        remesh_uniform(&mut mesh, config.remesh_iterations, config.remesh_edge_length);
        println!(
            "Remeshed {} to edge length {}: {} -> {} faces",
            mask.name,
            config.remesh_edge_length,
            face_count_before,
            mesh.count_faces()
        );

        let out_path = config.output_dir.join(format!(
            "{}.{}",
            mask.name,
            config.output_format.extension()
        ));
        write_mesh(&mesh, &out_path, config.output_format)?;
        println!("Wrote {:?}", out_path);
    }

    println!("Done!");
    Ok(())
}

/// Print statistics for a single NIfTI volume.
pub fn info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    println!("Loading volume from {:?}...", input);
    let volume = read_volume(input)?;

    let (nx, ny, nz) = volume.dim();
    println!("\n=== Volume Statistics ===");
    println!("Dimensions: {} x {} x {}", nx, ny, nz);
    println!(
        "Spacing:    ({:.3}, {:.3}, {:.3})",
        volume.spacing.x, volume.spacing.y, volume.spacing.z
    );
    println!(
        "Origin:     ({:.3}, {:.3}, {:.3})",
        volume.origin.x, volume.origin.y, volume.origin.z
    );
    println!(
        "Voxels:     {} total, {} foreground",
        volume.voxel_count(),
        volume.foreground_count()
    );

    // world-space bounding box of the foreground
    let mut first = true;
    let mut min = [0.0f32, 0.0, 0.0];
    let mut max = [0.0f32, 0.0, 0.0];

    for ((x, y, z), &value) in volume.data.indexed_iter() {
        if value == 0 {
            continue;
        }
        let world = volume.origin
            + Vector3::new(
                x as f32 * volume.spacing.x,
                y as f32 * volume.spacing.y,
                z as f32 * volume.spacing.z,
            );
        let point = [world.x, world.y, world.z];

        if first {
            min = point;
            max = point;
            first = false;
        } else {
            for axis in 0..3 {
                min[axis] = min[axis].min(point[axis]);
                max[axis] = max[axis].max(point[axis]);
            }
        }
    }

    if !first {
        let size = [max[0] - min[0], max[1] - min[1], max[2] - min[2]];
        println!("\n=== Foreground Bounding Box ===");
        println!("Min: ({:.3}, {:.3}, {:.3})", min[0], min[1], min[2]);
        println!("Max: ({:.3}, {:.3}, {:.3})", max[0], max[1], max[2]);
        println!("Size: ({:.3}, {:.3}, {:.3})", size[0], size[1], size[2]);
    }

    Ok(())
}
