//! Geometry model: groups, tiles, boxes and facings

pub mod facing;
pub mod flatten;
pub mod group;
pub mod loader;
pub mod tile;
pub mod tile_box;

pub use facing::{Axis, Facing};
pub use flatten::TileRef;
pub use group::{Group, TileTree};
pub use loader::{LoadedTree, Schema};
pub use tile::Tile;
pub use tile_box::{BoxId, TileBox, TransformableBox};
