//! The per-file transform job.
//!
//! An [`ImageTransformer`] is opened on one path, validates it eagerly
//! (existence, extension, header) and picks a JPEG quality from the file
//! size. Pixels are only touched when [`save`](ImageTransformer::save) runs.
//!
//! ```text
//! open(path)  → exists? → extension allowed? → probe header → quality from size
//! save(..)    → MIME → decoder → fit_within → canvas → resample → JPEG → write
//! ```

use super::backend::{BackendError, Dimensions, ImageBackend, ImageInfo};
use super::calculations::fit_within;
use super::format::{self, CanvasKind, SourceFormat};
use super::params::{MaxDimensions, Quality, QualityTable, TranscodeParams};
use super::rust_backend::RustBackend;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Every save produces this, whatever went in.
const JPEG_MIME: &str = "image/jpeg";

#[derive(Error, Debug)]
pub enum TransformError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Unsupported extension '{extension}': {}", .path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },
    #[error("Unable to decode image from {}: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },
    #[error("Unable to encode image to {}: {reason}", .path.display())]
    Encode { path: PathBuf, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransformError {
    /// Attach `path` to a backend failure.
    fn from_backend(err: BackendError, path: &Path) -> Self {
        match err {
            BackendError::Io(e) => Self::Io(e),
            BackendError::Decode(reason) => Self::Decode {
                path: path.to_path_buf(),
                reason,
            },
            BackendError::Encode(reason) => Self::Encode {
                path: path.to_path_buf(),
                reason,
            },
        }
    }
}

/// Everything the transformer decided about one file, before any pixel work.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformPlan {
    pub source: PathBuf,
    pub mime: String,
    pub format: Option<SourceFormat>,
    pub original: (u32, u32),
    pub target: (u32, u32),
    pub size_mb: f64,
    pub quality: Quality,
    /// `false` when no quality step matched and the encoder default is used.
    pub quality_from_table: bool,
    pub canvas: CanvasKind,
}

/// Outcome of a successful [`ImageTransformer::save`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SavedImage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub quality: Quality,
}

/// Resize-and-recompress job for a single image file.
pub struct ImageTransformer<B: ImageBackend = RustBackend> {
    backend: B,
    path: PathBuf,
    extension: String,
    info: ImageInfo,
    size_mb: f64,
    quality: Option<Quality>,
    bounds: MaxDimensions,
}

impl ImageTransformer<RustBackend> {
    /// Open `path` with the pure Rust backend and the stock quality table.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, TransformError> {
        Self::open_with(RustBackend::new(), path, &QualityTable::default())
    }
}

impl<B: ImageBackend> ImageTransformer<B> {
    /// Validate `path` and read its header through `backend`.
    ///
    /// Checks run in a fixed order and stop at the first failure: existence,
    /// then the extension allow-list, then the header. Nothing is decoded and
    /// nothing is written.
    pub fn open_with(
        backend: B,
        path: impl AsRef<Path>,
        table: &QualityTable,
    ) -> Result<Self, TransformError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TransformError::NotFound(path.to_path_buf()));
        }

        let extension = format::extension_of(path);
        if !format::is_supported_extension(&extension) {
            return Err(TransformError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            });
        }

        let info = backend
            .probe(path)
            .map_err(|e| TransformError::from_backend(e, path))?;
        let size_mb = std::fs::metadata(path)?.len() as f64 / 1024.0 / 1024.0;
        let quality = table.select(size_mb);

        Ok(Self {
            backend,
            path: path.to_path_buf(),
            extension,
            info,
            size_mb,
            quality,
            bounds: MaxDimensions::default(),
        })
    }

    pub fn set_max_width(&mut self, width: u32) -> &mut Self {
        self.bounds = MaxDimensions::new(width, self.bounds.height);
        self
    }

    pub fn set_max_height(&mut self, height: u32) -> &mut Self {
        self.bounds = MaxDimensions::new(self.bounds.width, height);
        self
    }

    pub fn set_max_dimensions(&mut self, width: u32, height: u32) -> &mut Self {
        self.set_max_width(width).set_max_height(height)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn mime(&self) -> &str {
        &self.info.mime
    }

    pub fn format(&self) -> Option<SourceFormat> {
        self.info.format
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.info.dimensions.width, self.info.dimensions.height)
    }

    pub fn size_mb(&self) -> f64 {
        self.size_mb
    }

    /// Quality picked from the size table, `None` if no step matched.
    pub fn quality(&self) -> Option<Quality> {
        self.quality
    }

    pub fn max_dimensions(&self) -> MaxDimensions {
        self.bounds
    }

    pub fn target_dimensions(&self) -> (u32, u32) {
        fit_within(self.dimensions(), (self.bounds.width, self.bounds.height))
    }

    pub fn canvas(&self) -> CanvasKind {
        CanvasKind::for_format(self.info.format)
    }

    pub fn plan(&self) -> TransformPlan {
        TransformPlan {
            source: self.path.clone(),
            mime: self.info.mime.clone(),
            format: self.info.format,
            original: self.dimensions(),
            target: self.target_dimensions(),
            size_mb: self.size_mb,
            quality: self.quality.unwrap_or_default(),
            quality_from_table: self.quality.is_some(),
            canvas: self.canvas(),
        }
    }

    /// Resize and write the image as JPEG.
    ///
    /// `path` replaces the stored path for later saves; `None` writes back
    /// over the current path. `quality` overrides the computed quality for
    /// this call only.
    ///
    /// The output is always JPEG, whatever the source format and whatever
    /// the extension of the target path. After a successful save the
    /// transformer describes the file just written (JPEG, target size), so
    /// a further save reads it with the right decoder. A failed save leaves
    /// the transformer untouched.
    pub fn save(
        &mut self,
        path: Option<&Path>,
        quality: Option<Quality>,
    ) -> Result<SavedImage, TransformError> {
        let source = self.path.clone();
        let output = path.map_or_else(|| source.clone(), Path::to_path_buf);

        let decoder = SourceFormat::from_mime(&self.info.mime).ok_or_else(|| {
            TransformError::Decode {
                path: source.clone(),
                reason: format!("no decoder for MIME type {}", self.info.mime),
            }
        })?;

        let (width, height) = self.target_dimensions();
        let quality = quality.or(self.quality).unwrap_or_default();
        let params = TranscodeParams {
            source,
            output,
            decoder,
            canvas: self.canvas(),
            width,
            height,
            quality,
        };

        tracing::debug!(
            source = %params.source.display(),
            output = %params.output.display(),
            width,
            height,
            quality = quality.value(),
            canvas = params.canvas.as_str(),
            "transcoding"
        );

        self.backend.transcode(&params).map_err(|e| match e {
            BackendError::Decode(_) => TransformError::from_backend(e, &params.source),
            other => TransformError::from_backend(other, &params.output),
        })?;

        self.path = params.output;
        self.info = ImageInfo {
            mime: JPEG_MIME.to_string(),
            format: Some(SourceFormat::Jpeg),
            dimensions: Dimensions { width, height },
        };

        Ok(SavedImage {
            path: self.path.clone(),
            width,
            height,
            quality,
        })
    }
}
