use anyhow::Result;
use crystal::prelude::*;
use serde::Deserialize;
use std::path::Path;

/// How an `.obj` file is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub forward_axis: ForwardAxis,
    pub up_axis: UpAxis,
    /// Collapse identical vertices into shared indices.
    pub weld: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            forward_axis: ForwardAxis::default(),
            up_axis: UpAxis::default(),
            weld: true,
        }
    }
}

impl ParseOptions {
    /// Leaves the geometry in the orientation found in the file.
    pub fn identity() -> Self {
        Self {
            forward_axis: ForwardAxis::PosY,
            up_axis: UpAxis::PosZ,
            ..Self::default()
        }
    }

    /// Reads `[forward axis index, up axis index]` as handed over by the import
    /// dialog. Missing or malformed entries keep their default.
    pub fn from_settings<S: AsRef<str>>(settings: &[S]) -> Self {
        let index = |position: usize| {
            settings
                .get(position)
                .and_then(|setting| setting.as_ref().trim().parse::<usize>().ok())
        };

        let mut options = Self::default();
        match index(0).map(ForwardAxis::from_index) {
            Some(Some(axis)) => options.forward_axis = axis,
            Some(None) => log::warn!("Forward axis index out of range, using {}", options.forward_axis),
            None => {}
        }
        match index(1).map(UpAxis::from_index) {
            Some(Some(axis)) => options.up_axis = axis,
            Some(None) => log::warn!("Up axis index out of range, using {}", options.up_axis),
            None => {}
        }
        options
    }
}

/// Side-car settings for an `.obj` file, stored as toml.
#[derive(Debug, Default, Clone, Copy, Deserialize)]
pub(crate) struct ObjMeta {
    #[serde(flatten)]
    pub(crate) options: ParseOptions,
}

impl ObjMeta {
    pub(crate) fn parse(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let meta: Self = toml::from_slice(&data)?;
        Ok(meta)
    }
}
