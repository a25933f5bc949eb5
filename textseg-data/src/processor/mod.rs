//! Data preprocessing building blocks.

pub mod class_map;
pub mod color_jitter;
pub mod normalize;
pub mod sync_transform;

pub use class_map::*;
pub use color_jitter::*;
pub use normalize::*;
pub use sync_transform::*;
