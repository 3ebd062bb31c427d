use baby_shark::mesh::corner_table::CornerTableF;
use baby_shark::remeshing::incremental::IncrementalRemesher;

/// Uniformly remesh toward the target edge length with all incremental
/// passes enabled (split, collapse, flip, shift, project).
pub fn remesh_uniform(mesh: &mut CornerTableF, iterations: u32, target_edge_length: f32) {
    let iterations = iterations.min(u16::MAX as u32) as u16;

    let remesher = IncrementalRemesher::new()
        .with_iterations_count(iterations)
        .with_split_edges(true)
        .with_collapse_edges(true)
        .with_flip_edges(true)
        .with_shift_vertices(true)
        .with_project_vertices(true);

    remesher.remesh(mesh, target_edge_length);
}
