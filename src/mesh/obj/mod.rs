mod builder;
mod meta;
pub(crate) mod parser;

use anyhow::{Context, Result};
use log::info;
use std::path::Path;
use ve_format::{
    material::MaterialLibrary,
    mesh::{MeshFile, MeshModel},
};

use crate::{
    mesh::weld,
    progress::{NoProgress, Progress},
    utils,
};

use self::meta::ObjMeta;
pub use self::meta::ParseOptions;
pub use self::parser::{ParserError, Truncation};

/// How far an import got.
#[derive(Debug)]
pub enum ImportStatus {
    /// Every line was understood.
    Complete,
    /// Every line was understood, but the file declared no geometry.
    Empty,
    /// Reading stopped at a line; models built before it are kept.
    Truncated(Truncation),
}

/// The result of reading an `.obj` file.
#[derive(Debug)]
pub struct ObjImport {
    pub models: Vec<MeshModel>,
    /// Every material loaded through `mtllib`, used or not.
    pub materials: MaterialLibrary,
    pub status: ImportStatus,
}

impl ObjImport {
    pub fn is_complete(&self) -> bool {
        matches!(self.status, ImportStatus::Complete)
    }
}

/// Reads the `.obj` file at `path` and its material libraries.
///
/// Fails only when the file itself cannot be opened. A malformed line ends
/// the scan early; what was read until then is still resolved, welded and
/// returned, with the reason in [`ObjImport::status`].
///
/// `progress` is called once per face corner while resolving and once per
/// model while welding.
pub fn import(
    path: &Path,
    options: &ParseOptions,
    progress: &mut dyn Progress,
) -> Result<ObjImport, ParserError> {
    let (builder, truncation) = parser::parse(path, *options)?;
    let (mut models, materials) = builder.build_models(progress);

    if options.weld {
        weld::weld_all(&mut models, progress);
    }

    let status = match truncation {
        Some(truncation) => ImportStatus::Truncated(truncation),
        None if models.is_empty() => ImportStatus::Empty,
        None => ImportStatus::Complete,
    };

    Ok(ObjImport {
        models,
        materials,
        status,
    })
}

/// Reads the side-car settings: `<name>.toml` next to the file, else a folder wide `obj.toml`, else defaults.
pub fn parse_meta(path: &Path) -> Result<ParseOptions> {
    let dir = path
        .parent()
        .with_context(|| format!("Path terminates in root or prefix: {}", path.display()))?;
    let meta_file = utils::file_name(path)?;

    for candidate in [
        utils::combine_path(dir, meta_file, "toml"),
        utils::combine_path(dir, "obj", "toml"),
    ] {
        if candidate.is_file() {
            return Ok(ObjMeta::parse(&candidate)
                .with_context(|| format!("Invalid meta file: {}", candidate.display()))?
                .options);
        }
    }

    Ok(ParseOptions::default())
}

/// Imports `path` with its side-car settings and stores the models as a
/// binary `.vem` file in `output_dir`.
pub fn process(path: &Path, output_dir: &Path) -> Result<()> {
    info!("Processing Wavefront `.obj`-file: `{}`", path.display());
    let options = parse_meta(path)?;

    let import = import(path, &options, &mut NoProgress)
        .with_context(|| format!("Could not read {}", path.display()))?;
    if let ImportStatus::Truncated(truncation) = &import.status {
        log::warn!(
            "{} is only partially converted, stopped at line {}",
            path.display(),
            truncation.line
        );
    }

    let data = MeshFile {
        models: import.models,
    }
    .to_bytes()
    .context("Could not serialize MeshFile")?;

    let target = utils::combine_path(output_dir, utils::file_name(path)?, "vem");
    utils::write_file(target, data)?;
    Ok(())
}
