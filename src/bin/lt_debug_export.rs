//! Face-state debug export
//!
//! Classifies every face of every box in each input tree and writes one JSON
//! report per file.
//!
//! Usage:
//!   cargo run --release --bin lt_debug_export -- <input_dir> <output_dir> [client|server] [--jobs N] [--grid N] [--overrides FILE]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use ltface::GeometryMode;
use ltface::core::logging;
use ltface::export::{ExportConfig, run_batch};

/// Flags that take a value
const VALUE_FLAGS: [&str; 3] = ["--jobs", "--grid", "--overrides"];

fn main() -> ExitCode {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let positional = positional_args(&args);

    if positional.len() < 2 || positional.len() > 3 {
        eprintln!(
            "Usage: lt_debug_export <input_dir> <output_dir> [client|server] [--jobs N] [--grid N] [--overrides FILE]"
        );
        return ExitCode::from(2);
    }

    let mut config = ExportConfig::default();
    if let Some(mode) = positional.get(2) {
        match mode.parse::<GeometryMode>() {
            Ok(mode) => config.geometry_mode = mode,
            Err(e) => {
                eprintln!("{e}");
                return ExitCode::from(2);
            }
        }
    }
    config.jobs = parse_usize_arg(&args, "--jobs").unwrap_or(config.jobs).max(1);
    config.default_grid = parse_u32_arg(&args, "--grid").filter(|&g| g > 0).unwrap_or(config.default_grid);

    if let Some(path) = parse_str_arg(&args, "--overrides") {
        if let Err(e) = config.load_overrides(Path::new(&path)) {
            eprintln!("Failed to load overrides {path}: {e}");
            return ExitCode::from(2);
        }
    }

    let input_dir = PathBuf::from(positional[0]);
    let output_dir = PathBuf::from(positional[1]);

    println!("=== LT Face Debug Export ===");
    println!("Input:  {}", input_dir.display());
    println!("Output: {}", output_dir.display());
    println!("Mode:   {}", config.geometry_mode);
    println!("Jobs:   {}", config.jobs);
    println!();

    let summary = match run_batch(&input_dir, &output_dir, &config) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("Export failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    println!(
        "Done: ok={} failed={} tiles={} boxes={} geometry_mode={}",
        summary.ok, summary.failed, summary.tiles, summary.boxes, summary.geometry_mode
    );
    for line in summary.failure_lines() {
        println!("  {line}");
    }

    if summary.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Arguments that are neither flags nor flag values
fn positional_args(args: &[String]) -> Vec<&str> {
    let mut out = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if VALUE_FLAGS.contains(&arg.as_str()) {
            iter.next();
        } else if !arg.starts_with("--") {
            out.push(arg.as_str());
        }
    }
    out
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
