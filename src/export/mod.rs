//! Per-file evaluation, report conversion and the batch driver

pub mod batch;
pub mod config;
pub mod evaluate;
pub mod report;

pub use batch::{BatchSummary, FileOutcome, output_file_name, process_file, run_batch};
pub use config::{BehaviorOverride, ExportConfig};
pub use evaluate::{
    BoxEvaluation, FileEvaluation, GroupEvaluation, TileEvaluation, evaluate_tree, evaluate_tree_with_cache,
};
pub use report::build_report;
