//! Reading and writing report documents

use std::path::Path;

use thiserror::Error;

use crate::document::ReportDocument;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReportDocument {
    /// Write the document as pretty JSON followed by a newline, creating the
    /// parent directory if needed.
    pub fn write_to(&self, path: &Path) -> Result<(), ReportError> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, json)?;
        log::debug!("Wrote report {}", path.display());
        Ok(())
    }
}

/// Load a previously written report.
pub fn read_report(path: &Path) -> Result<ReportDocument, ReportError> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}
