//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the [`transformer`](super::transformer) (which decides
//! target size and quality for a file) and the [`backend`](super::backend)
//! (which does the actual pixel work). This separation allows swapping
//! backends (e.g. for testing with a mock) without changing transform logic.
//!
//! ## Types
//!
//! - [`Quality`]: JPEG encoding quality (1–100). Clamped on construction.
//! - [`QualityTable`]: Ordered file-size → quality steps, first match wins.
//! - [`MaxDimensions`]: The bounding box an image must fit into.
//! - [`TranscodeParams`]: Everything needed for one decode → resize → JPEG run.

use super::format::{CanvasKind, SourceFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Quality setting for JPEG encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

/// The libjpeg default, used when no quality step matched a file.
impl Default for Quality {
    fn default() -> Self {
        Self(75)
    }
}

/// One row of the size → quality table.
///
/// Files of at least `min_size_mb` megabytes are encoded at `quality`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QualityStep {
    pub min_size_mb: f64,
    pub quality: u32,
}

impl QualityStep {
    pub const fn new(min_size_mb: f64, quality: u32) -> Self {
        Self {
            min_size_mb,
            quality,
        }
    }
}

/// Ordered list of [`QualityStep`]s.
///
/// Steps are evaluated in declared order and the first one whose threshold
/// the file size meets wins. The table is never sorted: with the stock steps
/// the largest threshold comes first, so big files get the most compression.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityTable {
    steps: Vec<QualityStep>,
}

/// Stock steps: ≥1 MB → 30, ≥0.5 MB → 40, ≥0.3 MB → 60, anything else → 80.
pub const DEFAULT_QUALITY_STEPS: [QualityStep; 4] = [
    QualityStep::new(1.0, 30),
    QualityStep::new(0.5, 40),
    QualityStep::new(0.3, 60),
    QualityStep::new(0.0, 80),
];

impl QualityTable {
    pub fn new(steps: Vec<QualityStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[QualityStep] {
        &self.steps
    }

    /// Quality for a file of `size_mb` megabytes, or `None` when no step matches.
    pub fn select(&self, size_mb: f64) -> Option<Quality> {
        self.steps
            .iter()
            .find(|step| size_mb >= step.min_size_mb)
            .map(|step| Quality::new(step.quality))
    }
}

impl Default for QualityTable {
    fn default() -> Self {
        Self::new(DEFAULT_QUALITY_STEPS.to_vec())
    }
}

/// Bounding box for the output image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxDimensions {
    pub width: u32,
    pub height: u32,
}

impl MaxDimensions {
    /// Zero is coerced to 1 so ratio math never divides by zero.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }
}

impl Default for MaxDimensions {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 960,
        }
    }
}

/// Parameters for a decode → canvas → resample → JPEG encode run.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    /// Decoder picked from the sniffed MIME type.
    pub decoder: SourceFormat,
    pub canvas: CanvasKind,
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
}
