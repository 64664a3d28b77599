//! Grid boxes, planes and polygon clipping

pub mod grid_box;
pub mod plane;
pub mod polygon;

pub use grid_box::{BoxCorner, GridBox};
pub use plane::Plane;
pub use polygon::Polygon;
