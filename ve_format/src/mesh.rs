use crate::{
    error::{FormatError, Result},
    material::MeshModelMaterial,
};
use crystal::prelude::*;
use serde::{Deserialize, Serialize};
use std::{
    hash::{Hash, Hasher},
    path::{Path, PathBuf},
};

/// One `o` group of an `.obj` file as an indexed triangle list.
///
/// `normals` always matches `vertices` in length; `texture_coordinates` is
/// either empty or matches as well. The `count_*` fields mirror the sequence
/// lengths for the upload code and are refreshed by [`MeshModel::update_counts`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshModel {
    pub id: u32,
    pub title: String,
    pub file_path: PathBuf,

    pub vertices: Vec<Vec3<f32>>,
    pub normals: Vec<Vec3<f32>>,
    pub texture_coordinates: Vec<Vec2<f32>>,
    pub indices: Vec<u32>,

    pub count_vertices: u32,
    pub count_normals: u32,
    pub count_texture_coordinates: u32,
    pub count_indices: u32,

    pub material: MeshModelMaterial,
}

impl MeshModel {
    pub fn new(id: u32, title: impl Into<String>, file_path: impl Into<PathBuf>) -> Self {
        Self {
            id,
            title: title.into(),
            file_path: file_path.into(),
            ..Self::default()
        }
    }

    pub fn update_counts(&mut self) {
        self.count_vertices = self.vertices.len() as u32;
        self.count_normals = self.normals.len() as u32;
        self.count_texture_coordinates = self.texture_coordinates.len() as u32;
        self.count_indices = self.indices.len() as u32;
    }

    pub fn has_texture_coordinates(&self) -> bool {
        !self.texture_coordinates.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// The packed vertex at position `index` of the vertex sequence.
    pub fn packed_vertex(&self, index: usize) -> PackedVertex {
        PackedVertex {
            position: self.vertices[index],
            uv: self
                .texture_coordinates
                .get(index)
                .copied()
                .unwrap_or_else(Vec2::zero),
            normal: self.normals[index],
        }
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| FormatError::InvalidModel {
            title: self.title.clone(),
            reason,
        };

        if self.normals.len() != self.vertices.len() {
            return Err(invalid(format!(
                "{} normals for {} vertices",
                self.normals.len(),
                self.vertices.len()
            )));
        }
        if self.has_texture_coordinates() && self.texture_coordinates.len() != self.vertices.len()
        {
            return Err(invalid(format!(
                "{} texture coordinates for {} vertices",
                self.texture_coordinates.len(),
                self.vertices.len()
            )));
        }
        if self.indices.len() % 3 != 0 {
            return Err(invalid(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            )));
        }
        if let Some(index) = self
            .indices
            .iter()
            .find(|&&index| index as usize >= self.vertices.len())
        {
            return Err(invalid(format!(
                "index {} out of range for {} vertices",
                index,
                self.vertices.len()
            )));
        }
        if self.count_vertices as usize != self.vertices.len()
            || self.count_normals as usize != self.normals.len()
            || self.count_texture_coordinates as usize != self.texture_coordinates.len()
            || self.count_indices as usize != self.indices.len()
        {
            return Err(invalid("counts out of sync".into()));
        }

        Ok(())
    }
}

/// Identity of a vertex while welding: position, texture coordinate (zero
/// when absent) and normal.
///
/// Equality and hashing use the exact bit patterns of the components, so
/// values differing only by rounding stay distinct.
#[derive(Debug, Clone, Copy)]
pub struct PackedVertex {
    pub position: Vec3<f32>,
    pub uv: Vec2<f32>,
    pub normal: Vec3<f32>,
}

impl PackedVertex {
    fn key(&self) -> [u32; 8] {
        let [px, py, pz] = self.position.to_bits();
        let [u, v] = self.uv.to_bits();
        let [nx, ny, nz] = self.normal.to_bits();
        [px, py, pz, u, v, nx, ny, nz]
    }
}

impl PartialEq for PackedVertex {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for PackedVertex {}

impl Hash for PackedVertex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// Binary container for a set of imported models.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshFile {
    pub models: Vec<MeshModel>,
}

impl MeshFile {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize::<MeshFile>(bytes)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        MeshFile::from_bytes(&data)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }
}
