//! Wavefront `.obj`/`.mtl` import and export for `ve_format` mesh models.

pub mod mesh;
pub mod progress;
pub(crate) mod utils;

pub use mesh::export::{export, render, ExportError, ExportOptions, ExportTarget, MeshInstance};
pub use mesh::obj::{import, ImportStatus, ObjImport, ParseOptions, ParserError, Truncation};
pub use progress::{LogProgress, NoProgress, Progress};
pub use ve_format;
