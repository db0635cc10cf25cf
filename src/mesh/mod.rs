pub mod export;
pub mod mtl;
pub mod obj;
pub mod weld;
