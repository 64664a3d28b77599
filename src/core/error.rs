//! Error types for ltface

use std::path::PathBuf;

use thiserror::Error;

/// Main error type.
///
/// The classifier itself never fails; these come from loading input trees,
/// writing reports and driving a batch.
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{path}: {message}")]
    Parse { path: String, message: String },

    #[error("input path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("input directory has no files: {}", .0.display())]
    NoInputFiles(PathBuf),

    #[error("invalid geometry_mode \"{0}\" (expected: client|server)")]
    InvalidGeometryMode(String),

    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("report error: {0}")]
    Report(#[from] ltface_report::ReportError),
}

impl Error {
    pub(crate) fn parse(path: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Parse {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Standard Result type for ltface
pub type Result<T> = std::result::Result<T, Error>;
