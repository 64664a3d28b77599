//! Face footprints, coverage scanning and classification

pub mod classifier;
pub mod footprint;
pub mod scanner;
pub mod state;

pub use classifier::{FaceEvaluation, GeometryMode, evaluate_face};
pub use footprint::Footprint;
pub use scanner::ScanCounters;
pub use state::FaceState;
