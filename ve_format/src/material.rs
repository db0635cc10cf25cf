use std::{collections::HashMap, path::PathBuf};

use crystal::prelude::*;
use serde::{Deserialize, Serialize};

/// Materials of one `.mtl` file, keyed by their `newmtl` name.
pub type MaterialLibrary = HashMap<String, MeshModelMaterial>;

/// The texture maps a material can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Ambient,
    Diffuse,
    Specular,
    SpecularExponent,
    Dissolve,
    Bump,
    Displacement,
}

impl TextureSlot {
    pub const ALL: [Self; 7] = [
        Self::Ambient,
        Self::Diffuse,
        Self::Specular,
        Self::SpecularExponent,
        Self::Dissolve,
        Self::Bump,
        Self::Displacement,
    ];

    /// The `.mtl` statement for this slot, as written on export.
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Ambient => "map_Ka",
            Self::Diffuse => "map_Kd",
            Self::Specular => "map_Ks",
            Self::SpecularExponent => "map_Ns",
            Self::Dissolve => "map_d",
            Self::Bump => "map_Bump",
            Self::Displacement => "disp",
        }
    }

    /// Accepts the export keyword plus the common bump map spellings.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "map_Ka" => Some(Self::Ambient),
            "map_Kd" => Some(Self::Diffuse),
            "map_Ks" => Some(Self::Specular),
            "map_Ns" => Some(Self::SpecularExponent),
            "map_d" => Some(Self::Dissolve),
            "map_Bump" | "map_bump" | "bump" => Some(Self::Bump),
            "disp" => Some(Self::Displacement),
            _ => None,
        }
    }
}

/// A texture image referenced by a material.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialTexture {
    /// Where the image is expected on disk.
    pub path: PathBuf,
    /// The bare file name, for display.
    pub filename: String,
    /// Filled in by whoever decodes the image.
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub use_texture: bool,
    /// Tokens in front of the file name (`-s 1 1 1`, `-bm 0.5`, ...), kept uninterpreted.
    pub options: Vec<String>,
}

/// One `newmtl` block.
///
/// `Default` is the all-zero material a model carries when no `usemtl`
/// applies; [`MeshModelMaterial::named`] gives the values a fresh
/// `newmtl` starts out with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshModelMaterial {
    pub name: String,
    pub specular_exponent: f32,
    pub transparency: f32,
    /// Negative when the file does not set `Ni`.
    pub optical_density: f32,
    pub illumination_mode: i32,

    pub ambient_color: Vec3<f32>,
    pub diffuse_color: Vec3<f32>,
    pub specular_color: Vec3<f32>,
    pub emission_color: Vec3<f32>,

    pub texture_ambient: Option<MaterialTexture>,
    pub texture_diffuse: Option<MaterialTexture>,
    pub texture_specular: Option<MaterialTexture>,
    pub texture_specular_exponent: Option<MaterialTexture>,
    pub texture_dissolve: Option<MaterialTexture>,
    pub texture_bump: Option<MaterialTexture>,
    pub texture_displacement: Option<MaterialTexture>,
}

impl MeshModelMaterial {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            specular_exponent: 1.0,
            transparency: 1.0,
            optical_density: -1.0,
            illumination_mode: 2,
            ..Self::default()
        }
    }

    pub fn texture(&self, slot: TextureSlot) -> Option<&MaterialTexture> {
        match slot {
            TextureSlot::Ambient => self.texture_ambient.as_ref(),
            TextureSlot::Diffuse => self.texture_diffuse.as_ref(),
            TextureSlot::Specular => self.texture_specular.as_ref(),
            TextureSlot::SpecularExponent => self.texture_specular_exponent.as_ref(),
            TextureSlot::Dissolve => self.texture_dissolve.as_ref(),
            TextureSlot::Bump => self.texture_bump.as_ref(),
            TextureSlot::Displacement => self.texture_displacement.as_ref(),
        }
    }

    pub fn set_texture(&mut self, slot: TextureSlot, texture: MaterialTexture) {
        let target = match slot {
            TextureSlot::Ambient => &mut self.texture_ambient,
            TextureSlot::Diffuse => &mut self.texture_diffuse,
            TextureSlot::Specular => &mut self.texture_specular,
            TextureSlot::SpecularExponent => &mut self.texture_specular_exponent,
            TextureSlot::Dissolve => &mut self.texture_dissolve,
            TextureSlot::Bump => &mut self.texture_bump,
            TextureSlot::Displacement => &mut self.texture_displacement,
        };
        *target = Some(texture);
    }

    /// Iterates the slots that carry a texture, in [`TextureSlot::ALL`] order.
    pub fn textures(&self) -> impl Iterator<Item = (TextureSlot, &MaterialTexture)> {
        TextureSlot::ALL
            .into_iter()
            .filter_map(move |slot| self.texture(slot).map(|texture| (slot, texture)))
    }
}
