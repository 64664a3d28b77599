//! ltface - face occlusion classifier for voxel tile trees
//!
//! Given a tree of tile groups built from boxes on an integer grid, every face
//! of every box is classified as unloaded, outside, uncovered, partially
//! covered or covered. Tilted (transformable) boxes additionally get a
//! current-vs-fresh check of their memoized face cache.

pub mod core;
pub mod math;
pub mod model;
pub mod transform;
pub mod face;
pub mod diagnostics;
pub mod export;

pub use crate::core::{Error, Result};
pub use export::{ExportConfig, FileEvaluation, evaluate_tree};
pub use face::{FaceState, GeometryMode};
pub use model::{Facing, TileTree};
