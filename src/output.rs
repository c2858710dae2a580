//! CLI output formatting for batch runs and plan inspection.
//!
//! Output is **file-centric**: every line block starts with the positional
//! index and file name, with the decisions taken for that file shown as
//! indented context lines underneath.
//!
//! # Output Format
//!
//! ## Run
//!
//! ```text
//! converter (3 files)
//!     001 photo.jpg
//!         2048x1536 → 1280x960, 1.50 MB, quality 30
//!         Moved: convertido/photo.jpg
//!     002 scan.bmp
//!         Skipped: Unsupported extension 'bmp': converter/scan.bmp
//!
//! Processed 2 files, 1 skipped
//! ```
//!
//! ## Inspect
//!
//! ```text
//! photo.jpg
//!     Type: image/jpeg (jpeg)
//!     Size: 1.50 MB → quality 30
//!     Resize: 2048x1536 → 1280x960
//!     Canvas: opaque
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure:
//! no I/O, no side effects.

use crate::imaging::TransformPlan;
use crate::process::{BatchReport, ProcessEvent};
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn format_dims((width, height): (u32, u32)) -> String {
    format!("{}x{}", width, height)
}

/// `1 file`, `3 files`.
fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

// ============================================================================
// Run
// ============================================================================

pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::BatchStarted {
            source_dir,
            file_count,
        } => vec![format!(
            "{} ({})",
            source_dir.display(),
            plural(*file_count, "file")
        )],
        ProcessEvent::FileProcessed { index, file } => vec![
            format!("{}{} {}", indent(1), format_index(*index), file_name(&file.source)),
            format!(
                "{}{} → {}, {:.2} MB, quality {}",
                indent(2),
                format_dims(file.original),
                format_dims(file.resized),
                file.size_mb,
                file.quality
            ),
            format!("{}Moved: {}", indent(2), file.dest.display()),
        ],
        ProcessEvent::FileFailed { index, file } => vec![
            format!("{}{} {}", indent(1), format_index(*index), file_name(&file.source)),
            format!("{}Skipped: {}", indent(2), file.error),
        ],
    }
}

pub fn format_batch_summary(report: &BatchReport) -> Vec<String> {
    if report.total() == 0 {
        return vec!["Nothing to process".to_string()];
    }
    let mut line = format!("Processed {}", plural(report.processed.len(), "file"));
    if report.has_failures() {
        line.push_str(&format!(", {} skipped", report.failed.len()));
    }
    vec![String::new(), line]
}

pub fn print_batch_summary(report: &BatchReport) {
    for line in format_batch_summary(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Inspect
// ============================================================================

pub fn format_plan(plan: &TransformPlan) -> Vec<String> {
    let kind = match plan.format {
        Some(format) => format!("{} ({})", plan.mime, format.as_str()),
        None => format!("{} (no decoder)", plan.mime),
    };
    let quality = if plan.quality_from_table {
        format!("quality {}", plan.quality.value())
    } else {
        format!("quality {} (encoder default)", plan.quality.value())
    };
    let resize = if plan.original == plan.target {
        format!("{} (unchanged)", format_dims(plan.original))
    } else {
        format!("{} → {}", format_dims(plan.original), format_dims(plan.target))
    };

    vec![
        file_name(&plan.source),
        format!("{}Type: {}", indent(1), kind),
        format!("{}Size: {:.2} MB → {}", indent(1), plan.size_mb, quality),
        format!("{}Resize: {}", indent(1), resize),
        format!("{}Canvas: {}", indent(1), plan.canvas.as_str()),
    ]
}

pub fn print_plan(plan: &TransformPlan) {
    for line in format_plan(plan) {
        println!("{}", line);
    }
}

pub fn format_inspect_error(path: &Path, error: &dyn std::fmt::Display) -> Vec<String> {
    vec![
        file_name(path),
        format!("{}Error: {}", indent(1), error),
    ]
}
