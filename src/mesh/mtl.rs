//! Parses `.mtl` material libraries.

use std::path::Path;

use log::{debug, warn};
use ve_format::material::{MaterialLibrary, MaterialTexture, MeshModelMaterial, TextureSlot};

use super::obj::parser::{parse_numbers, read_lines, ParserError};

/// Parses the library at `path`; texture file names are resolved against `base_dir`.
///
/// A line that fails to parse is skipped with a warning. Only failing to open
/// the file is an error; a read failure part way keeps what was read so far.
pub fn parse(path: &Path, base_dir: &Path) -> Result<MaterialLibrary, ParserError> {
    let lines = read_lines(path)?;
    log::info!("Loading materials: {}", path.display());

    let mut library = MaterialLibrary::new();
    let mut current: Option<MeshModelMaterial> = None;

    for (idx, line) in lines.enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                warn!("{}:{}: stopped reading: {}", path.display(), idx + 1, err);
                break;
            }
        };
        let line = line.trim();
        let (token, value) = match line.split_once(char::is_whitespace) {
            Some((token, value)) => (token, value.trim()),
            None => (line, ""),
        };

        if token == "newmtl" {
            finish(&mut library, current.take());
            current = Some(MeshModelMaterial::named(value));
            continue;
        }

        let material = match current.as_mut() {
            Some(material) => material,
            None => {
                if !token.is_empty() && !token.starts_with('#') {
                    debug!("Ignoring `{}` outside of a material", token);
                }
                continue;
            }
        };

        if let Err(err) = parse_statement(material, token, value, base_dir) {
            warn!("{}:{}: skipping `{}`: {}", path.display(), idx + 1, line, err);
        }
    }
    finish(&mut library, current);

    Ok(library)
}

/// Like [`parse`], but a library that cannot be read is logged and treated as empty.
pub fn load(path: &Path, base_dir: &Path) -> MaterialLibrary {
    match parse(path, base_dir) {
        Ok(library) => library,
        Err(err) => {
            warn!("Could not load material library {}: {}", path.display(), err);
            MaterialLibrary::new()
        }
    }
}

fn finish(library: &mut MaterialLibrary, material: Option<MeshModelMaterial>) {
    if let Some(material) = material {
        if library.contains_key(&material.name) {
            warn!("Material `{}` defined twice, keeping the first", material.name);
        } else {
            library.insert(material.name.clone(), material);
        }
    }
}

fn parse_statement(
    material: &mut MeshModelMaterial,
    token: &str,
    value: &str,
    base_dir: &Path,
) -> Result<(), ParserError> {
    match token {
        "Ka" => material.ambient_color = parse_numbers::<3>(value, "Ka")?.into(),
        "Kd" => material.diffuse_color = parse_numbers::<3>(value, "Kd")?.into(),
        "Ks" => material.specular_color = parse_numbers::<3>(value, "Ks")?.into(),
        "Ke" => material.emission_color = parse_numbers::<3>(value, "Ke")?.into(),
        "Ns" => material.specular_exponent = parse_numbers::<1>(value, "Ns")?[0],
        // both are read as the dissolve factor
        "d" | "Tr" => material.transparency = parse_numbers::<1>(value, "d")?[0],
        "Ni" => material.optical_density = parse_numbers::<1>(value, "Ni")?[0],
        "illum" => {
            material.illumination_mode = value
                .split_whitespace()
                .next()
                .ok_or(ParserError::MissingValue("illum"))?
                .parse()?
        }
        token => match TextureSlot::from_keyword(token) {
            Some(slot) => {
                let texture =
                    parse_texture(value, base_dir).ok_or(ParserError::MissingValue("map"))?;
                material.set_texture(slot, texture);
            }
            None => debug!("Ignoring unsupported material statement `{}`", token),
        },
    }

    Ok(())
}

/// Reads `[-option args...] file`. The last token is the file; everything in
/// front of it is kept as option tokens.
pub(crate) fn parse_texture(value: &str, base_dir: &Path) -> Option<MaterialTexture> {
    let mut tokens: Vec<&str> = value.split_whitespace().collect();
    let file = tokens.pop()?;

    let literal = Path::new(file);
    let path = if literal.exists() {
        literal.to_path_buf()
    } else {
        base_dir.join(literal)
    };
    let use_texture = path.exists();
    if !use_texture {
        warn!("Texture not found: {}", path.display());
    }

    Some(MaterialTexture {
        filename: literal
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.to_owned()),
        path,
        width: None,
        height: None,
        use_texture,
        options: tokens.into_iter().map(String::from).collect(),
    })
}
