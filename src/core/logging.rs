//! Logging setup for the export tools

/// Default filter: batch progress from this crate, warnings from the rest.
pub const DEFAULT_FILTER: &str = "warn,ltface=info";

/// Initialize env_logger for a batch run.
///
/// `RUST_LOG` replaces [`DEFAULT_FILTER`]; `RUST_LOG=ltface=trace` prints one
/// line per classified face.
///
/// # Example
/// ```no_run
/// use std::path::Path;
///
/// ltface::core::logging::init();
/// let config = ltface::ExportConfig::default();
/// let summary = ltface::export::run_batch(Path::new("trees"), Path::new("reports"), &config)?;
/// log::info!("{} of {} trees exported", summary.ok, summary.files);
/// # Ok::<(), ltface::Error>(())
/// ```
pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_FILTER))
        .format_timestamp_millis()
        .init();
}
