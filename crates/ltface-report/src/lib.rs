//! Report documents for the ltface face-state exporter.
//!
//! The field names here are the comparison contract with the reference
//! renderer's own export, so they are spelled exactly as that export spells
//! them (camelCase, upper-case facing and state names).
//!
//! ```ignore
//! let doc: ReportDocument = build_report(...);
//! doc.write_to(Path::new("out/house.json"))?;
//! ```

pub mod document;
pub mod writer;

pub use document::*;
pub use writer::{ReportError, read_report};

/// Value of `outsideNeighborPolicy`: faces on the block boundary see air.
pub const OUTSIDE_NEIGHBOR_POLICY_AIR: &str = "air";
