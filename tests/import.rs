use std::path::PathBuf;

use crystal::prelude::*;
use ve_wavefront::{
    import,
    ve_format::material::TextureSlot,
    ImportStatus, NoProgress, ParseOptions, ParserError,
};

fn data(name: &str) -> PathBuf {
    let root = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(format!("{root}/tests/data/{name}"))
}

fn close(a: Vec3<f32>, b: Vec3<f32>) -> bool {
    (a - b).norm() < 1e-6
}

#[test]
pub fn test_triangle() {
    let mut reports = Vec::new();
    let import = import(
        &data("tri.obj"),
        &ParseOptions::identity(),
        &mut |p: f32| reports.push(p),
    )
    .expect("Failed to import triangle");

    assert!(import.is_complete());
    assert_eq!(import.models.len(), 1);

    let tri = &import.models[0];
    assert_eq!(tri.id, 0);
    assert_eq!(tri.title, "Tri");
    assert_eq!(
        tri.vertices,
        vec![Vec3::zero(), Vec3::unit_x(), Vec3::unit_y()]
    );
    assert_eq!(tri.normals, vec![Vec3::unit_z(); 3]);
    assert_eq!(tri.indices, vec![0, 1, 2]);
    assert!(tri.texture_coordinates.is_empty());
    assert!(tri.material.name.is_empty());
    assert!(tri.validate().is_ok());

    // three resolved corners, one welded model
    assert_eq!(reports.len(), 4);
    assert_eq!(reports.last(), Some(&100.0));
}

#[test]
pub fn test_default_axes() {
    let import = import(&data("tri.obj"), &ParseOptions::default(), &mut NoProgress)
        .expect("Failed to import triangle");
    let tri = &import.models[0];

    // file +Y (up) ends up on -Z, file +Z on -Y
    assert!(close(tri.vertices[1], -Vec3::unit_x()));
    assert!(close(tri.vertices[2], -Vec3::unit_z()));
    assert!(close(tri.normals[0], -Vec3::unit_y()));
}

#[test]
pub fn test_quad_with_material() {
    let import = import(&data("quad.obj"), &ParseOptions::identity(), &mut NoProgress)
        .expect("Failed to import quad");

    assert!(import.is_complete());
    assert_eq!(import.materials.len(), 2);

    let quad = &import.models[0];
    assert_eq!(quad.count_vertices, 4);
    assert_eq!(quad.count_texture_coordinates, 4);
    assert_eq!(quad.indices, vec![0, 1, 2, 2, 3, 0]);
    assert_eq!(quad.triangle_count(), 2);
    assert_eq!(quad.texture_coordinates[2], Vec2::new(1.0, 1.0));

    let material = &quad.material;
    assert_eq!(material.name, "Checker");
    assert_eq!(material.specular_exponent, 250.0);
    assert_eq!(material.diffuse_color, Vec3::new(0.8, 0.8, 0.8));
    assert_eq!(material.optical_density, 1.45);
    assert_eq!(material, &import.materials["Checker"]);

    let diffuse = material
        .texture(TextureSlot::Diffuse)
        .expect("Missing diffuse map");
    assert_eq!(diffuse.filename, "checker.png");
    assert_eq!(diffuse.path, data("checker.png"));
    assert!(!diffuse.use_texture);
}

#[test]
pub fn test_unwelded() {
    let options = ParseOptions {
        weld: false,
        ..ParseOptions::identity()
    };
    let import = import(&data("quad.obj"), &options, &mut NoProgress).expect("Failed to import quad");

    let quad = &import.models[0];
    assert_eq!(quad.count_vertices, 6);
    assert_eq!(quad.indices, vec![0, 1, 2, 3, 4, 5]);
    assert_eq!(quad.vertices[2], quad.vertices[3]);
}

#[test]
pub fn test_truncated() {
    let import = import(&data("broken.obj"), &ParseOptions::identity(), &mut NoProgress)
        .expect("A malformed line is not an error");

    match &import.status {
        ImportStatus::Truncated(truncation) => {
            assert_eq!(truncation.line, 8);
            assert!(matches!(truncation.error, ParserError::ParseFace(_)));
        }
        status => panic!("Unexpected status: {:?}", status),
    }

    assert_eq!(import.models.len(), 2);
    assert_eq!(import.models[0].count_indices, 3);
    assert_eq!(import.models[1].title, "Second");
    assert!(import.models[1].indices.is_empty());
}

#[test]
pub fn test_empty() {
    let import = import(&data("empty.obj"), &ParseOptions::default(), &mut NoProgress)
        .expect("Failed to import empty file");

    assert!(matches!(import.status, ImportStatus::Empty));
    assert!(import.models.is_empty());
}

#[test]
pub fn test_missing_file() {
    assert!(matches!(
        import(&data("missing.obj"), &ParseOptions::default(), &mut NoProgress),
        Err(ParserError::Io(_))
    ));
}

#[test]
pub fn test_mixed_texture_coordinates() {
    let import = import(&data("mixed.obj"), &ParseOptions::identity(), &mut NoProgress)
        .expect("Failed to import mixed model");
    let mixed = &import.models[0];

    assert_eq!(mixed.count_vertices, 6);
    assert_eq!(mixed.count_texture_coordinates, 6);
    assert_eq!(mixed.texture_coordinates[0], Vec2::new(0.5, 0.5));
    assert_eq!(mixed.texture_coordinates[5], Vec2::zero());
    assert!(mixed.validate().is_ok());
}

#[test]
pub fn test_non_utf8_comment() {
    let import = import(&data("latin1.obj"), &ParseOptions::identity(), &mut NoProgress)
        .expect("Failed to import latin1 file");

    assert!(import.is_complete());
    assert_eq!(import.models.len(), 1);
    assert_eq!(import.models[0].title, "Tri");
    assert_eq!(import.models[0].count_indices, 3);
}
