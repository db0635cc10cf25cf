pub mod error;
pub mod material;
pub mod mesh;
