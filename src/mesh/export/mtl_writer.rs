use std::collections::HashSet;
use std::fmt::{self, Write};

use ve_format::material::{MaterialTexture, MeshModelMaterial};

/// Collects the materials of the exported meshes into one `.mtl` text.
/// A name is written once; later materials with the same name are skipped.
#[derive(Debug, Default)]
pub(crate) struct MtlWriter {
    out: String,
    written: HashSet<String>,
}

impl MtlWriter {
    pub(crate) fn new(header: &str) -> Result<Self, fmt::Error> {
        let mut writer = Self::default();
        for line in header.lines() {
            writeln!(writer.out, "# {}", line)?;
        }
        Ok(writer)
    }

    pub(crate) fn write_material(&mut self, material: &MeshModelMaterial) -> fmt::Result {
        if material.name.is_empty() || !self.written.insert(material.name.clone()) {
            return Ok(());
        }

        let out = &mut self.out;
        writeln!(out)?;
        writeln!(out, "newmtl {}", material.name)?;
        writeln!(out, "Ns {}", material.specular_exponent)?;
        for (token, color) in [
            ("Ka", material.ambient_color),
            ("Kd", material.diffuse_color),
            ("Ks", material.specular_color),
            ("Ke", material.emission_color),
        ] {
            writeln!(out, "{} {} {} {}", token, color.x, color.y, color.z)?;
        }
        if material.optical_density >= 0.0 {
            writeln!(out, "Ni {}", material.optical_density)?;
        }
        writeln!(out, "d {}", material.transparency)?;
        writeln!(out, "illum {}", material.illumination_mode)?;

        for (slot, texture) in material.textures() {
            writeln!(out, "{} {}", slot.keyword(), texture_reference(texture))?;
        }

        Ok(())
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }
}

// options as read, then the path; falls back to the bare file name
fn texture_reference(texture: &MaterialTexture) -> String {
    let file = if texture.path.as_os_str().is_empty() {
        texture.filename.clone()
    } else {
        texture.path.display().to_string()
    };

    texture
        .options
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(file.as_str()))
        .collect::<Vec<_>>()
        .join(" ")
}
