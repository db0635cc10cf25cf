use std::collections::HashMap;
use std::fmt::{self, Write};

use log::{debug, warn};

use super::MeshInstance;
use crate::progress::{percent, Progress};

/// Writes the geometry of one or more mesh instances into a single `.obj` text.
///
/// Positions, texture coordinates and normals are shared between all
/// instances: a value is written once and later references reuse its index.
#[derive(Debug, Default)]
pub(crate) struct ObjWriter {
    out: String,
    positions: HashMap<[u32; 3], usize>,
    uvs: HashMap<[u32; 2], usize>,
    normals: HashMap<[u32; 3], usize>,
}

// `v/vt/vn` indices of one face corner, 1-based
#[derive(Debug, Clone, Copy)]
struct Corner {
    position: usize,
    uv: Option<usize>,
    normal: usize,
}

impl ObjWriter {
    pub(crate) fn new(header: &str, mtl_file_name: &str) -> Result<Self, fmt::Error> {
        let mut writer = Self::default();
        for line in header.lines() {
            writeln!(writer.out, "# {}", line)?;
        }
        writeln!(writer.out, "mtllib {}", mtl_file_name)?;
        Ok(writer)
    }

    /// Appends the object block for `instance`. `progress` runs from 0 to 100
    /// twice: once while collecting new values, once while writing faces.
    pub(crate) fn write_instance(
        &mut self,
        instance: &MeshInstance<'_>,
        progress: &mut dyn Progress,
    ) -> fmt::Result {
        let mesh = instance.mesh;
        if !instance.is_translation_only() {
            debug!(
                "Only the translation of `{}` is exported, rotation and scale are ignored",
                mesh.title
            );
        }

        let textured = mesh.has_texture_coordinates();
        let total = mesh.indices.len();

        let mut new_positions = Vec::new();
        let mut new_uvs = Vec::new();
        let mut new_normals = Vec::new();
        let mut corners = Vec::with_capacity(total);

        for (done, &index) in mesh.indices.iter().enumerate() {
            let packed = mesh.packed_vertex(index as usize);
            let position = instance.place(packed.position);

            corners.push(Corner {
                position: intern(&mut self.positions, position.to_bits(), || {
                    new_positions.push(position)
                }),
                uv: if textured {
                    Some(intern(&mut self.uvs, packed.uv.to_bits(), || {
                        new_uvs.push(packed.uv)
                    }))
                } else {
                    None
                },
                normal: intern(&mut self.normals, packed.normal.to_bits(), || {
                    new_normals.push(packed.normal)
                }),
            });

            progress.report(percent(done + 1, total));
        }
        if total == 0 {
            progress.report(100.0);
        }

        writeln!(self.out, "o {}", mesh.title)?;
        if !mesh.material.name.is_empty() {
            writeln!(self.out, "usemtl {}", mesh.material.name)?;
        }
        for position in new_positions {
            writeln!(self.out, "v {} {} {}", position.x, position.y, position.z)?;
        }
        for uv in new_uvs {
            writeln!(self.out, "vt {} {}", uv.x, uv.y)?;
        }
        for normal in new_normals {
            writeln!(self.out, "vn {} {} {}", normal.x, normal.y, normal.z)?;
        }

        if total % 3 != 0 {
            warn!(
                "`{}` has {} indices, the trailing {} are dropped",
                mesh.title,
                total,
                total % 3
            );
        }
        for (face, triangle) in corners.chunks_exact(3).enumerate() {
            self.out.push('f');
            for corner in triangle {
                match corner.uv {
                    Some(uv) => write!(self.out, " {}/{}/{}", corner.position, uv, corner.normal)?,
                    None => write!(self.out, " {}//{}", corner.position, corner.normal)?,
                }
            }
            self.out.push('\n');

            progress.report(percent((face + 1) * 3, total));
        }
        if total < 3 {
            progress.report(100.0);
        }

        Ok(())
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }
}

// 1-based index of `key`, calling `fresh` the first time it shows up
fn intern<K>(seen: &mut HashMap<K, usize>, key: K, fresh: impl FnOnce()) -> usize
where
    K: std::hash::Hash + Eq,
{
    let next = seen.len() + 1;
    *seen.entry(key).or_insert_with(|| {
        fresh();
        next
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crystal::prelude::*;
    use ve_format::mesh::MeshModel;

    fn triangle(title: &str, textured: bool) -> MeshModel {
        let mut mesh = MeshModel::new(0, title, "test.obj");
        mesh.vertices = vec![Vec3::zero(), Vec3::unit_x(), Vec3::unit_y()];
        mesh.normals = vec![Vec3::unit_z(); 3];
        if textured {
            mesh.texture_coordinates = vec![Vec2::zero(), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)];
        }
        mesh.indices = vec![0, 1, 2];
        mesh.update_counts();
        mesh
    }

    fn lines(text: &str, prefix: &str) -> Vec<String> {
        text.lines()
            .filter(|line| line.starts_with(prefix))
            .map(String::from)
            .collect()
    }

    #[test]
    fn shares_values_between_instances() -> fmt::Result {
        let mesh = triangle("Tri", true);
        let mut writer = ObjWriter::new("test", "out.mtl")?;
        writer.write_instance(&MeshInstance::new(&mesh), &mut |_: f32| {})?;
        writer.write_instance(&MeshInstance::at(&mesh, Vec3::unit_x()), &mut |_: f32| {})?;
        let text = writer.finish();

        assert!(text.starts_with("# test\nmtllib out.mtl\n"));
        // (1,0,0) is shared, (2,0,0) and (1,1,0) are new
        assert_eq!(lines(&text, "v "), vec!["v 0 0 0", "v 1 0 0", "v 0 1 0", "v 2 0 0", "v 1 1 0"]);
        assert_eq!(lines(&text, "vt ").len(), 3);
        assert_eq!(lines(&text, "vn "), vec!["vn 0 0 1"]);
        assert_eq!(lines(&text, "f "), vec!["f 1/1/1 2/2/1 3/3/1", "f 2/1/1 4/2/1 5/3/1"]);
        assert_eq!(lines(&text, "o "), vec!["o Tri", "o Tri"]);
        assert!(lines(&text, "usemtl").is_empty());

        Ok(())
    }

    #[test]
    fn untextured_faces_and_progress() -> fmt::Result {
        let mut mesh = triangle("Plain", false);
        mesh.material.name = "Red".into();
        let mut reports = Vec::new();

        let mut writer = ObjWriter::new("", "out.mtl")?;
        writer.write_instance(&MeshInstance::new(&mesh), &mut |p: f32| reports.push(p))?;
        let text = writer.finish();

        assert_eq!(lines(&text, "f "), vec!["f 1//1 2//1 3//1"]);
        assert_eq!(lines(&text, "usemtl"), vec!["usemtl Red"]);
        assert!(lines(&text, "vt ").is_empty());
        assert_eq!(reports.len(), 4);
        assert_eq!(reports[2], 100.0);
        assert_eq!(reports[3], 100.0);

        Ok(())
    }

    #[test]
    fn exact_bits_are_kept_apart() -> fmt::Result {
        let mut mesh = triangle("Zero", false);
        mesh.vertices[1] = Vec3::new(-0.0, 0.0, 0.0);
        mesh.vertices[2] = Vec3::zero();

        let mut writer = ObjWriter::new("", "out.mtl")?;
        writer.write_instance(&MeshInstance::new(&mesh), &mut |_: f32| {})?;
        let text = writer.finish();

        assert_eq!(lines(&text, "v "), vec!["v 0 0 0", "v -0 0 0"]);
        assert_eq!(lines(&text, "f "), vec!["f 1//1 2//1 1//1"]);

        Ok(())
    }
}
