//! Cache consistency diagnostic and per-file aggregation

pub mod consistency;
pub mod summary;

pub use consistency::{
    CacheDiagnostic, FaceLocation, FieldMismatches, MismatchTally, SAMPLE_LIMIT, TransformableDiagnostics,
};
pub use summary::{Aggregator, FaceStateSummary, TreeStats};
