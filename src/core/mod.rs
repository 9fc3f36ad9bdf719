pub use studio_core::*;

// Shaders bundled as string constants
pub static POINTS_WGSL: &str = include_str!("../../shaders/points.wgsl");
pub static SPRITES_WGSL: &str = include_str!("../../shaders/sprites.wgsl");
pub static MESHES_WGSL: &str = include_str!("../../shaders/meshes.wgsl");
