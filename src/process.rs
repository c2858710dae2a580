//! Batch driver: shrink every file in a directory and move it on.
//!
//! ## Flow per file
//!
//! ```text
//! converter/photo.jpg
//!   → ImageTransformer::open       (validate, probe, pick quality)
//!   → save in place                (temp file + atomic rename, JPEG)
//!   → move to convertido/photo.jpg (only after a successful save)
//! ```
//!
//! Files are handled strictly one at a time in file-name order. A failure
//! is recorded against its file and the loop moves on; only problems with
//! the directories themselves abort the run.
//!
//! Progress is reported twice: `tracing` events for logs, and
//! [`ProcessEvent`]s over an optional channel for terminal output (see
//! [`crate::output`]).

use crate::config::SqueezeConfig;
use crate::imaging::{
    ImageBackend, ImageTransformer, Quality, QualityTable, RustBackend, TransformError,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Cannot read source directory {}: {source}", .path.display())]
    SourceDir {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("Cannot create destination directory {}: {source}", .path.display())]
    DestDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Per-file failure; never aborts the batch.
#[derive(Error, Debug)]
pub enum FileError {
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error("Destination {} already exists", .0.display())]
    DestinationExists(PathBuf),
    #[error("Saved but could not move to {}: {source}", .dest.display())]
    Move {
        dest: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Knobs for one batch run that are not part of the config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Encode every file at this quality instead of the size table's pick.
    pub quality: Option<Quality>,
}

/// Progress events emitted while a batch runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    BatchStarted {
        source_dir: PathBuf,
        file_count: usize,
    },
    FileProcessed {
        index: usize,
        file: ProcessedFile,
    },
    FileFailed {
        index: usize,
        file: FailedFile,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedFile {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub original: (u32, u32),
    pub resized: (u32, u32),
    pub size_mb: f64,
    pub quality: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedFile {
    pub source: PathBuf,
    pub error: String,
}

/// Outcome of a whole run, in processing order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    pub processed: Vec<ProcessedFile>,
    pub failed: Vec<FailedFile>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.processed.len() + self.failed.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Write the report as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<(), ProcessError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Run the batch with the pure Rust backend.
pub fn process_directory(
    config: &SqueezeConfig,
    options: RunOptions,
    events: Option<Sender<ProcessEvent>>,
) -> Result<BatchReport, ProcessError> {
    process_with_backend(RustBackend::new, config, options, events)
}

/// Run the batch with a backend factory (allows testing with a mock).
///
/// The factory is called once per file: each transformer owns its backend,
/// so no state is shared between jobs.
pub fn process_with_backend<B, F>(
    make_backend: F,
    config: &SqueezeConfig,
    options: RunOptions,
    events: Option<Sender<ProcessEvent>>,
) -> Result<BatchReport, ProcessError>
where
    B: ImageBackend,
    F: Fn() -> B,
{
    let files = list_source_files(&config.source_dir)?;
    std::fs::create_dir_all(&config.dest_dir).map_err(|source| ProcessError::DestDir {
        path: config.dest_dir.clone(),
        source,
    })?;

    tracing::info!(
        source = %config.source_dir.display(),
        dest = %config.dest_dir.display(),
        files = files.len(),
        "starting batch"
    );
    emit(
        &events,
        ProcessEvent::BatchStarted {
            source_dir: config.source_dir.clone(),
            file_count: files.len(),
        },
    );

    let table = config.quality_table();
    let mut report = BatchReport::default();

    for (i, source) in files.into_iter().enumerate() {
        let index = i + 1;
        match process_file(make_backend(), &source, config, &table, options) {
            Ok(file) => {
                tracing::info!(
                    source = %file.source.display(),
                    dest = %file.dest.display(),
                    width = file.resized.0,
                    height = file.resized.1,
                    quality = file.quality,
                    "processed"
                );
                emit(
                    &events,
                    ProcessEvent::FileProcessed {
                        index,
                        file: file.clone(),
                    },
                );
                report.processed.push(file);
            }
            Err(err) => {
                tracing::warn!(source = %source.display(), error = %err, "skipped");
                let file = FailedFile {
                    source,
                    error: err.to_string(),
                };
                emit(
                    &events,
                    ProcessEvent::FileFailed {
                        index,
                        file: file.clone(),
                    },
                );
                report.failed.push(file);
            }
        }
    }

    tracing::info!(
        processed = report.processed.len(),
        failed = report.failed.len(),
        "batch finished"
    );
    Ok(report)
}

/// Shrink one file in place, then move it. The move never happens if the save failed.
fn process_file<B: ImageBackend>(
    backend: B,
    source: &Path,
    config: &SqueezeConfig,
    table: &QualityTable,
    options: RunOptions,
) -> Result<ProcessedFile, FileError> {
    let dest = destination_for(source, &config.dest_dir, config.output.rename_to_jpg);
    // Renaming can map different sources (a.gif, a.png) onto one name
    if config.output.rename_to_jpg && dest.exists() {
        return Err(FileError::DestinationExists(dest));
    }

    let mut transformer = ImageTransformer::open_with(backend, source, table)?;
    let bounds = config.max_dimensions();
    transformer.set_max_dimensions(bounds.width, bounds.height);
    let original = transformer.dimensions();
    let size_mb = transformer.size_mb();

    let saved = transformer.save(None, options.quality)?;

    move_file(&saved.path, &dest).map_err(|source| FileError::Move {
        dest: dest.clone(),
        source,
    })?;

    Ok(ProcessedFile {
        source: source.to_path_buf(),
        dest,
        original,
        resized: (saved.width, saved.height),
        size_mb,
        quality: saved.quality.value(),
    })
}

/// Regular files directly inside `dir`, sorted by name.
///
/// Subdirectories are skipped, not descended into.
pub fn list_source_files(dir: &Path) -> Result<Vec<PathBuf>, ProcessError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|source| ProcessError::SourceDir {
            path: dir.to_path_buf(),
            source,
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Where a processed file ends up: same name in `dest_dir`, optionally with a `.jpg` extension.
pub fn destination_for(source: &Path, dest_dir: &Path, rename_to_jpg: bool) -> PathBuf {
    let name = source.file_name().unwrap_or(source.as_os_str());
    let dest = dest_dir.join(name);
    if rename_to_jpg {
        dest.with_extension("jpg")
    } else {
        dest
    }
}

/// Rename, falling back to copy + delete across filesystems.
fn move_file(from: &Path, to: &Path) -> std::io::Result<()> {
    match std::fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::CrossesDevices => {
            std::fs::copy(from, to)?;
            std::fs::remove_file(from)
        }
        Err(e) => Err(e),
    }
}

fn emit(events: &Option<Sender<ProcessEvent>>, event: ProcessEvent) {
    if let Some(tx) = events {
        // The receiver going away only silences progress output
        let _ = tx.send(event);
    }
}
