//! Writes mesh instances back out as a Wavefront `.obj`/`.mtl` pair.

mod mtl_writer;
mod obj_writer;

use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use crystal::prelude::*;
use log::{debug, info};
use ve_format::{error::FormatError, mesh::MeshModel};

use self::{mtl_writer::MtlWriter, obj_writer::ObjWriter};
use crate::{progress::Progress, utils};

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("Failed to write file: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to format output: {0}")]
    Format(#[from] fmt::Error),
    #[error("Nothing to export")]
    NoMeshes,
    #[error("Export target has no usable file name: {0}")]
    InvalidTarget(PathBuf),
    #[error("Cannot export mesh: {0}")]
    InvalidModel(#[from] FormatError),
}

/// A mesh placed in the world.
///
/// Only `translation` is applied on export, `rotation` (euler angles in
/// degrees) and `scale` are carried along unused.
#[derive(Debug, Clone, Copy)]
pub struct MeshInstance<'a> {
    pub mesh: &'a MeshModel,
    pub translation: Vec3<f32>,
    pub rotation: Vec3<f32>,
    pub scale: Vec3<f32>,
}

impl<'a> MeshInstance<'a> {
    pub fn new(mesh: &'a MeshModel) -> Self {
        Self {
            mesh,
            translation: Vec3::zero(),
            rotation: Vec3::zero(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }

    pub fn at(mesh: &'a MeshModel, translation: Vec3<f32>) -> Self {
        Self {
            translation,
            ..Self::new(mesh)
        }
    }

    pub fn is_translation_only(&self) -> bool {
        self.rotation == Vec3::zero() && self.scale == Vec3::new(1.0, 1.0, 1.0)
    }

    // an untranslated vertex keeps its exact bits, `-0.0 + 0.0` would not
    pub(crate) fn place(&self, position: Vec3<f32>) -> Vec3<f32> {
        if self.translation == Vec3::zero() {
            position
        } else {
            position + self.translation
        }
    }
}

/// Where to write: `<directory>/<title>.obj` and `<directory>/<title>.mtl`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTarget {
    pub directory: PathBuf,
    pub title: String,
}

impl ExportTarget {
    pub fn new(directory: impl Into<PathBuf>, title: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            title: title.into(),
        }
    }

    /// Splits a chosen file path such as `out/scene.obj` into directory and title.
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let title = utils::file_name(path).map_err(|_| ExportError::InvalidTarget(path.into()))?;
        let directory = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(Self::new(directory, title))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Appends `_<unix seconds>` to the file names.
    pub timestamp_suffix: bool,
    /// Free-form options, accepted but not interpreted.
    pub extra: Vec<String>,
}

/// The files written by [`export`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub obj: PathBuf,
    pub mtl: PathBuf,
}

/// The rendered contents of an `.obj`/`.mtl` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedText {
    pub obj: String,
    pub mtl: String,
}

/// Renders `instances` without touching the file system. The `.obj` text
/// references its library as `mtl_file_name`.
///
/// Every mesh is validated first; one that breaks the model invariants fails
/// the whole render with [`ExportError::InvalidModel`].
pub fn render(
    instances: &[MeshInstance<'_>],
    mtl_file_name: &str,
    progress: &mut dyn Progress,
) -> Result<ExportedText, ExportError> {
    if instances.is_empty() {
        return Err(ExportError::NoMeshes);
    }
    for instance in instances {
        instance.mesh.validate()?;
    }

    let header = format!(
        "{} {}\nWavefront export, {} object(s)",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        instances.len()
    );
    let mut obj = ObjWriter::new(&header, mtl_file_name)?;
    let mut mtl = MtlWriter::new(&header)?;

    for instance in instances {
        obj.write_instance(instance, progress)?;
        mtl.write_material(&instance.mesh.material)?;
    }

    Ok(ExportedText {
        obj: obj.finish(),
        mtl: mtl.finish(),
    })
}

/// Writes `instances` into one `.obj` file with a `.mtl` file next to it.
///
/// Existing files are overwritten unless `options.timestamp_suffix` is set.
pub fn export(
    instances: &[MeshInstance<'_>],
    target: &ExportTarget,
    options: &ExportOptions,
    progress: &mut dyn Progress,
) -> Result<ExportedFiles, ExportError> {
    if !options.extra.is_empty() {
        debug!("Ignoring export options: {:?}", options.extra);
    }

    let base = if options.timestamp_suffix {
        format!("{}_{}", target.title, utils::unix_timestamp())
    } else {
        target.title.clone()
    };
    let files = ExportedFiles {
        obj: utils::combine_path(&target.directory, &base, "obj"),
        mtl: utils::combine_path(&target.directory, &base, "mtl"),
    };
    info!("Exporting {} mesh(es) to {}", instances.len(), files.obj.display());

    let text = render(instances, &format!("{}.mtl", base), progress)?;
    fs::write(&files.obj, text.obj)?;
    fs::write(&files.mtl, text.mtl)?;

    Ok(files)
}
