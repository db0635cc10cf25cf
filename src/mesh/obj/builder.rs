use std::path::{Path, PathBuf};

use crystal::prelude::*;
use log::{debug, warn};
use ve_format::{
    material::{MaterialLibrary, MeshModelMaterial},
    mesh::MeshModel,
};

use super::{
    meta::ParseOptions,
    parser::{ObjFace, ObjFaceIndex, ObjLine, ParserError},
};
use crate::{
    mesh::mtl,
    progress::{percent, Progress},
};

/// A face corner with every index resolved into the raw pools.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FaceRef {
    pub(crate) model: usize,
    pub(crate) vertex: usize,
    pub(crate) uv: Option<usize>,
    pub(crate) normal: usize,
}

/// Collects the raw pools and face references of one `.obj` scan.
#[derive(Debug)]
pub(crate) struct ObjMeshBuilder {
    pub(crate) file_path: PathBuf,
    pub(crate) base_dir: PathBuf,
    pub(crate) options: ParseOptions,

    pub(crate) positions: Vec<Vec3<f32>>,
    pub(crate) uvs: Vec<Vec2<f32>>,
    pub(crate) normals: Vec<Vec3<f32>>,
    pub(crate) refs: Vec<FaceRef>,

    pub(crate) models: Vec<MeshModel>,
    pub(crate) materials: MaterialLibrary,
}

impl ObjMeshBuilder {
    pub(crate) fn new(file_path: &Path, options: ParseOptions) -> Self {
        Self {
            file_path: file_path.to_path_buf(),
            base_dir: file_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
            options,
            positions: Vec::new(),
            uvs: Vec::new(),
            normals: Vec::new(),
            refs: Vec::new(),
            models: Vec::new(),
            materials: MaterialLibrary::new(),
        }
    }

    pub(crate) fn apply(&mut self, line: ObjLine<'_>) -> Result<(), ParserError> {
        match line {
            ObjLine::MaterialLibrary(name) => self.load_materials(name),
            ObjLine::Object(title) => self.set_object(title),
            ObjLine::Position(position) => self.positions.push(position.into()),
            ObjLine::TextureCoordinate(uv) => self.uvs.push(uv.into()),
            ObjLine::Normal(normal) => self.normals.push(normal.into()),
            ObjLine::UseMaterial(name) => self.use_material(name),
            ObjLine::Face(face) => self.push_face(&face)?,
            ObjLine::Comment(comment) => debug!("Comment: {:?}", comment),
            ObjLine::Empty => {}
            ObjLine::Unsupported(token) => debug!("Ignoring unsupported statement `{}`", token),
        }

        Ok(())
    }

    pub(crate) fn set_object(&mut self, title: &str) {
        let id = self.models.len() as u32;
        self.models
            .push(MeshModel::new(id, title, self.file_path.clone()));
    }

    // faces or materials before the first `o` go to a model named after the file
    fn current_model(&mut self) -> usize {
        if self.models.is_empty() {
            let title = self
                .file_path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default();
            debug!("No object declared yet, creating `{}`", title);
            self.set_object(&title);
        }
        self.models.len() - 1
    }

    fn load_materials(&mut self, name: &str) {
        let library = mtl::load(&self.base_dir.join(name), &self.base_dir);
        for (name, material) in library {
            self.materials.entry(name).or_insert(material);
        }
    }

    fn use_material(&mut self, name: &str) {
        let material = match self.materials.get(name) {
            Some(material) => material.clone(),
            None => {
                warn!("Material `{}` is not defined, using defaults", name);
                MeshModelMaterial::named(name)
            }
        };

        let model = self.current_model();
        self.models[model].material = material;
    }

    // quads are split along the 0-2 diagonal, no check for convexity
    pub(crate) fn push_face(&mut self, face: &ObjFace) -> Result<(), ParserError> {
        let model = self.current_model();
        let corners = face
            .face_i
            .iter()
            .map(|index| self.resolve(model, index))
            .collect::<Result<Vec<_>, _>>()?;

        match corners.as_slice() {
            [a, b, c] => self.refs.extend_from_slice(&[*a, *b, *c]),
            [a, b, c, d] => self.refs.extend_from_slice(&[*a, *b, *c, *c, *d, *a]),
            _ => return Err(ParserError::ParseFace(format!("{:?}", face.face_i))),
        }

        Ok(())
    }

    fn resolve(&self, model: usize, index: &ObjFaceIndex) -> Result<FaceRef, ParserError> {
        Ok(FaceRef {
            model,
            vertex: resolve_index(index.vert_i, self.positions.len(), "vertices")?,
            uv: index
                .uv_i
                .map(|uv_i| resolve_index(uv_i, self.uvs.len(), "texture coordinates"))
                .transpose()?,
            normal: resolve_index(index.normal_i, self.normals.len(), "normals")?,
        })
    }

    /// Expands every face reference into per-corner geometry, with the axis
    /// correction applied. The result is unwelded: each corner gets its own vertex.
    pub(crate) fn build_models(self, progress: &mut dyn Progress) -> (Vec<MeshModel>, MaterialLibrary) {
        let Self {
            options,
            positions,
            uvs,
            normals,
            refs,
            mut models,
            materials,
            ..
        } = self;

        let mut textured = vec![false; models.len()];
        for face_ref in refs.iter().filter(|face_ref| face_ref.uv.is_some()) {
            textured[face_ref.model] = true;
        }

        let (forward, up) = (options.forward_axis, options.up_axis);
        for (done, face_ref) in refs.iter().enumerate() {
            let model = &mut models[face_ref.model];

            model
                .vertices
                .push(fix_axis(positions[face_ref.vertex], forward, up));
            model
                .normals
                .push(fix_axis(normals[face_ref.normal], forward, up));
            if textured[face_ref.model] {
                model
                    .texture_coordinates
                    .push(face_ref.uv.map(|uv| uvs[uv]).unwrap_or_else(Vec2::zero));
            }
            model.indices.push((model.vertices.len() - 1) as u32);

            progress.report(percent(done + 1, refs.len()));
        }

        for model in models.iter_mut() {
            model.update_counts();
        }

        (models, materials)
    }
}

// 1-based from the start, or negative counting back from the end of the pool
fn resolve_index(index: i64, len: usize, kind: &'static str) -> Result<usize, ParserError> {
    let resolved = if index > 0 {
        index - 1
    } else {
        len as i64 + index
    };

    if index == 0 || resolved < 0 || resolved as usize >= len {
        Err(ParserError::IndexOutOfRange { kind, index, len })
    } else {
        Ok(resolved as usize)
    }
}

#[cfg(test)]
mod test {
    use super::super::parser::parse_line;
    use super::*;
    use crate::progress::NoProgress;

    fn builder(lines: &[&str]) -> Result<ObjMeshBuilder, ParserError> {
        let mut builder = ObjMeshBuilder::new(Path::new("models/test.obj"), ParseOptions::identity());
        for line in lines {
            builder.apply(parse_line(line)?)?;
        }
        Ok(builder)
    }

    #[test]
    fn test_apply() -> Result<(), ParserError> {
        let builder = builder(&["o foo bar", "v 1 2 3", "v 4 5 6", "vt 0 1", "vn 0 0 1", "s 1"])?;

        assert_eq!(builder.models.len(), 1);
        assert_eq!(builder.models[0].title, "foo bar");
        assert_eq!(builder.models[0].file_path, Path::new("models/test.obj"));
        assert_eq!(
            builder.positions,
            vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)]
        );
        assert_eq!(builder.uvs, vec![Vec2::new(0.0, 1.0)]);
        assert_eq!(builder.normals, vec![Vec3::unit_z()]);
        assert_eq!(builder.base_dir, Path::new("models"));

        Ok(())
    }

    #[test]
    fn test_quad_split() -> Result<(), ParserError> {
        let builder = builder(&[
            "o Quad", "v 0 0 0", "v 1 0 0", "v 1 1 0", "v 0 1 0", "vn 0 0 1",
            "f 1//1 2//1 3//1 4//1",
        ])?;

        let vertices: Vec<_> = builder.refs.iter().map(|face_ref| face_ref.vertex).collect();
        assert_eq!(vertices, vec![0, 1, 2, 2, 3, 0]);

        Ok(())
    }

    #[test]
    fn test_relative_indices() -> Result<(), ParserError> {
        let builder = builder(&[
            "v 0 0 0", "v 1 0 0", "v 0 1 0", "vt 0 0", "vn 0 0 1",
            "f -3/-1/-1 -2/1/1 -1/-1/-1",
        ])?;

        let vertices: Vec<_> = builder.refs.iter().map(|face_ref| face_ref.vertex).collect();
        assert_eq!(vertices, vec![0, 1, 2]);
        assert!(builder.refs.iter().all(|face_ref| face_ref.uv == Some(0)));
        // implicit model named after the file
        assert_eq!(builder.models[0].title, "test");

        Ok(())
    }

    #[test]
    fn test_out_of_range() {
        for face in &["f 4//1 1//1 2//1", "f 0//1 1//1 2//1", "f 1//2 2//1 3//1", "f -4//1 1//1 2//1"] {
            assert!(matches!(
                builder(&["v 0 0 0", "v 1 0 0", "v 0 1 0", "vn 0 0 1", face]),
                Err(ParserError::IndexOutOfRange { .. })
            ));
        }
    }

    #[test]
    fn test_unknown_material_gets_defaults() -> Result<(), ParserError> {
        let builder = builder(&["o A", "usemtl Missing"])?;

        assert_eq!(builder.models[0].material, MeshModelMaterial::named("Missing"));

        Ok(())
    }

    #[test]
    fn test_build_models() -> Result<(), ParserError> {
        let builder = builder(&[
            "o A", "v 0 0 0", "v 1 0 0", "v 0 1 0", "vt 0.5 0.5", "vn 0 0 1",
            "f 1/1/1 2/1/1 3/1/1",
            "o B",
            "f 1//1 2//1 3//1",
        ])?;
        let (models, _) = builder.build_models(&mut NoProgress);

        assert_eq!(models.len(), 2);
        assert_eq!(models[0].indices, vec![0, 1, 2]);
        assert_eq!(models[0].texture_coordinates, vec![Vec2::new(0.5, 0.5); 3]);
        assert_eq!(models[1].vertices[1], Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(models[1].count_texture_coordinates, 0);
        assert_eq!(models[1].count_indices, 3);

        Ok(())
    }

    #[test]
    fn test_build_applies_axis() -> Result<(), ParserError> {
        let mut builder = builder(&["o A", "v 0 1 0", "vn 0 1 0", "f 1//1 1//1 1//1"])?;
        builder.options = ParseOptions {
            forward_axis: ForwardAxis::NegZ,
            up_axis: UpAxis::PosZ,
            weld: true,
        };
        let (models, _) = builder.build_models(&mut NoProgress);

        let expected = rotate_x(Vec3::unit_y(), 90.0f32.deg());
        assert_eq!(models[0].vertices[0], expected);
        assert_eq!(models[0].normals[0], expected);

        Ok(())
    }
}
