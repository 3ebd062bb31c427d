use nalgebra::Vector3;

use super::SurfaceMesh;

/// Parameters for constrained Laplacian smoothing.
#[derive(Debug, Clone, Copy)]
pub struct SmoothingParams {
    pub iterations: u32,
    pub relaxation_factor: f32,
    pub constraint_distance: f32,
}

/// Iteratively relax each vertex toward the centroid of its neighbors.
///
/// Every step moves a vertex by `relaxation_factor * (centroid - vertex)` and
/// then clamps it to a sphere of `constraint_distance` around the position
/// extraction gave it, which bounds how far smoothing can pull the surface
/// off the voxel data.
pub fn smooth_constrained(mesh: &mut SurfaceMesh, params: &SmoothingParams) {
    if params.iterations == 0 || params.relaxation_factor <= 0.0 || mesh.positions.is_empty() {
        return;
    }

    let neighbors = vertex_neighbors(mesh);
    let anchors = mesh.positions.clone();
    let max_distance = params.constraint_distance.max(0.0);

    for _ in 0..params.iterations {
        let current = mesh.positions.clone();
        for (i, position) in mesh.positions.iter_mut().enumerate() {
            let adjacent = &neighbors[i];
            if adjacent.is_empty() {
                continue;
            }

            let sum: Vector3<f32> = adjacent.iter().map(|&n| current[n as usize]).sum();
            let centroid = sum / adjacent.len() as f32;
            let mut moved = *position + (centroid - *position) * params.relaxation_factor;

            let offset = moved - anchors[i];
            if offset.norm() > max_distance {
                moved = if max_distance == 0.0 {
                    anchors[i]
                } else {
                    anchors[i] + offset.normalize() * max_distance
                };
            }
            *position = moved;
        }
    }
}

/// Unique vertex adjacency built from the triangle list.
fn vertex_neighbors(mesh: &SurfaceMesh) -> Vec<Vec<u32>> {
    let mut neighbors = vec![Vec::new(); mesh.positions.len()];
    for tri in mesh.indices.chunks(3) {
        for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            push_unique(&mut neighbors[a as usize], b);
            push_unique(&mut neighbors[b as usize], a);
        }
    }
    neighbors
}

fn push_unique(list: &mut Vec<u32>, value: u32) {
    if !list.contains(&value) {
        list.push(value);
    }
}
