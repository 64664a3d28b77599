//! Transformable (tilted) boxes: payload decoding, face caches and the
//! current-vs-fresh cache adapter

pub mod adapter;
pub mod cache;
pub mod payload;

pub use adapter::diagnose;
pub use cache::{BoxFaceCache, CacheSnapshot, FaceCacheTable, FacingCache};
pub use payload::PayloadDiagnostics;
