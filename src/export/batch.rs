//! Batch driver: one report per input file

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::core::{Error, Result};
use crate::face::GeometryMode;
use crate::model::loader;

use super::config::ExportConfig;
use super::evaluate::evaluate_tree;
use super::report::build_report;

/// Failure lines shown before the rest are folded into a count
const MAX_FAILURE_LINES: usize = 5;

/// Outcome of one processed input file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub tiles: usize,
    pub boxes: usize,
}

/// Totals of one batch run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchSummary {
    pub files: usize,
    pub ok: usize,
    pub failed: usize,
    pub tiles: usize,
    pub boxes: usize,
    pub geometry_mode: GeometryMode,
    /// `file name: message` per failed file, in input order
    pub failures: Vec<String>,
}

impl BatchSummary {
    /// At most five failure lines, then `... and N more failures`.
    pub fn failure_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self.failures.iter().take(MAX_FAILURE_LINES).cloned().collect();
        if self.failures.len() > MAX_FAILURE_LINES {
            lines.push(format!("... and {} more failures", self.failures.len() - MAX_FAILURE_LINES));
        }
        lines
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Report file name for `input`: the name up to its last dot plus `.json`.
pub fn output_file_name(input: &Path) -> String {
    let name = input.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    let stem = match name.rfind('.') {
        Some(dot) if dot > 0 => &name[..dot],
        _ => name.as_str(),
    };
    if stem.trim().is_empty() {
        format!("{name}.json")
    } else {
        format!("{stem}.json")
    }
}

/// Regular files directly inside `input_dir`, sorted by file name.
pub fn list_inputs(input_dir: &Path) -> Result<Vec<PathBuf>> {
    if !input_dir.is_dir() {
        return Err(Error::NotADirectory(input_dir.to_path_buf()));
    }
    let mut files = Vec::new();
    for entry in std::fs::read_dir(input_dir)? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    if files.is_empty() {
        return Err(Error::NoInputFiles(input_dir.to_path_buf()));
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Load, classify and write the report for one file.
pub fn process_file(input: &Path, output_dir: &Path, config: &ExportConfig) -> Result<FileOutcome> {
    let loaded = loader::load_file(input, config)?;
    let eval = evaluate_tree(&loaded.tree, config.geometry_mode);
    let output = output_dir.join(output_file_name(input));

    build_report(&eval, loaded.schema, input, &output).write_to(&output)?;

    log::debug!(
        "{} -> {}: {} tiles, {} boxes, {} renderable faces, {} cache mismatches",
        input.display(),
        output.display(),
        eval.stats.tiles,
        eval.stats.boxes,
        eval.renderable_faces(),
        eval.transformables.cache.count
    );

    Ok(FileOutcome {
        input: input.to_path_buf(),
        output,
        tiles: eval.stats.tiles,
        boxes: eval.stats.boxes,
    })
}

/// Export every file of `input_dir` into `output_dir`.
///
/// Only an unusable input directory fails the whole batch; per-file errors
/// are logged and counted.
pub fn run_batch(input_dir: &Path, output_dir: &Path, config: &ExportConfig) -> Result<BatchSummary> {
    let inputs = list_inputs(input_dir)?;
    std::fs::create_dir_all(output_dir)?;

    log::info!(
        "Exporting {} files from {} ({} mode, {} jobs)",
        inputs.len(),
        input_dir.display(),
        config.geometry_mode,
        config.jobs
    );

    let results: Vec<Result<FileOutcome>> = if config.jobs > 1 {
        // Local pool so the caller's global pool stays untouched
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.jobs)
            .build()?;
        pool.install(|| {
            inputs
                .par_iter()
                .map(|input| process_file(input, output_dir, config))
                .collect()
        })
    } else {
        inputs
            .iter()
            .map(|input| process_file(input, output_dir, config))
            .collect()
    };

    let mut summary = BatchSummary {
        files: inputs.len(),
        ok: 0,
        failed: 0,
        tiles: 0,
        boxes: 0,
        geometry_mode: config.geometry_mode,
        failures: Vec::new(),
    };

    for (input, result) in inputs.iter().zip(results) {
        match result {
            Ok(outcome) => {
                summary.ok += 1;
                summary.tiles += outcome.tiles;
                summary.boxes += outcome.boxes;
            }
            Err(e) => {
                log::error!("Failed to export {}: {}", input.display(), e);
                let name = input.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
                summary.failed += 1;
                summary.failures.push(format!("{name}: {e}"));
            }
        }
    }

    log::info!(
        "Export finished: ok={} failed={} tiles={} boxes={} geometry_mode={}",
        summary.ok,
        summary.failed,
        summary.tiles,
        summary.boxes,
        summary.geometry_mode
    );
    Ok(summary)
}
