//! Vertex welding: collapses corners that share position, texture coordinate
//! and normal into a single indexed vertex.
//!
//! Identity is the exact bit pattern (see [`PackedVertex`]). Corners that
//! differ by a rounding error are kept apart.

use std::collections::HashMap;

use ve_format::mesh::{MeshModel, PackedVertex};

use crate::progress::{percent, Progress};

/// Rebuilds the vertex sequences of `model` from its index list so that
/// every distinct packed vertex is stored once.
///
/// Walks the indices rather than the vertices, so welding an already welded
/// model changes nothing.
pub fn weld(model: &mut MeshModel) {
    let textured = model.has_texture_coordinates();
    let mut seen: HashMap<PackedVertex, u32> = HashMap::with_capacity(model.vertices.len());

    let mut vertices = Vec::new();
    let mut normals = Vec::new();
    let mut texture_coordinates = Vec::new();
    let mut indices = Vec::with_capacity(model.indices.len());

    for &index in model.indices.iter() {
        let packed = model.packed_vertex(index as usize);
        let next = vertices.len() as u32;
        let welded = *seen.entry(packed).or_insert_with(|| {
            vertices.push(packed.position);
            normals.push(packed.normal);
            if textured {
                texture_coordinates.push(packed.uv);
            }
            next
        });
        indices.push(welded);
    }

    log::debug!(
        "Welded `{}`: {} -> {} vertices",
        model.title,
        model.vertices.len(),
        vertices.len()
    );

    model.vertices = vertices;
    model.normals = normals;
    model.texture_coordinates = texture_coordinates;
    model.indices = indices;
    model.update_counts();
}

/// Welds every model, reporting progress once per model.
pub fn weld_all(models: &mut [MeshModel], progress: &mut dyn Progress) {
    let total = models.len();
    for (done, model) in models.iter_mut().enumerate() {
        weld(model);
        progress.report(percent(done + 1, total));
    }
}
