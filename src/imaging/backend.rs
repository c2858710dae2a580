//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations every backend must
//! support: probe (header-only inspection) and transcode (decode, resample
//! onto a canvas, encode JPEG, write).
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), pure Rust on top of the
//! `image` crate. Tests use the recording `MockBackend` below.

use super::format::SourceFormat;
use super::params::TranscodeParams;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Header facts about a source file, gathered without decoding pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    /// MIME type sniffed from the leading bytes.
    pub mime: String,
    /// Format code; `None` for image types without a compiled-in decoder.
    pub format: Option<SourceFormat>,
    pub dimensions: Dimensions,
}

/// Trait for image processing backends.
///
/// Backends own every byte of pixel work so the transformer stays pure
/// policy: which size, which quality, which canvas.
pub trait ImageBackend {
    /// Sniff the content type and read dimensions from the header.
    fn probe(&self, path: &Path) -> Result<ImageInfo, BackendError>;

    /// Decode `params.source`, resample onto the requested canvas and write
    /// a JPEG to `params.output`.
    ///
    /// Implementations must not leave a partially written output behind.
    fn transcode(&self, params: &TranscodeParams) -> Result<(), BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::format::CanvasKind;
    use crate::imaging::params::Quality;
    use std::sync::Mutex;

    /// Mock backend that records operations without executing them.
    #[derive(Default)]
    pub struct MockBackend {
        pub probe_results: Mutex<Vec<ImageInfo>>,
        pub fail_transcode: bool,
        pub operations: Mutex<Vec<RecordedOp>>,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Probe(String),
        Transcode {
            source: String,
            output: String,
            decoder: SourceFormat,
            canvas: CanvasKind,
            width: u32,
            height: u32,
            quality: u32,
        },
    }

    /// Header info for a JPEG of the given size.
    pub fn jpeg_info(width: u32, height: u32) -> ImageInfo {
        ImageInfo {
            mime: "image/jpeg".to_string(),
            format: Some(SourceFormat::Jpeg),
            dimensions: Dimensions { width, height },
        }
    }

    /// Header info for a PNG of the given size.
    pub fn png_info(width: u32, height: u32) -> ImageInfo {
        ImageInfo {
            mime: "image/png".to_string(),
            format: Some(SourceFormat::Png),
            dimensions: Dimensions { width, height },
        }
    }

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        /// Probe results are consumed from the back, so list them in reverse
        /// processing order.
        pub fn with_probes(infos: Vec<ImageInfo>) -> Self {
            Self {
                probe_results: Mutex::new(infos),
                ..Self::default()
            }
        }

        pub fn failing(infos: Vec<ImageInfo>) -> Self {
            Self {
                probe_results: Mutex::new(infos),
                fail_transcode: true,
                ..Self::default()
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }

        pub fn transcodes(&self) -> Vec<RecordedOp> {
            self.get_operations()
                .into_iter()
                .filter(|op| matches!(op, RecordedOp::Transcode { .. }))
                .collect()
        }
    }

    impl ImageBackend for MockBackend {
        fn probe(&self, path: &Path) -> Result<ImageInfo, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Probe(path.to_string_lossy().to_string()));

            self.probe_results
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| BackendError::Decode("No mock header".to_string()))
        }

        fn transcode(&self, params: &TranscodeParams) -> Result<(), BackendError> {
            self.operations.lock().unwrap().push(RecordedOp::Transcode {
                source: params.source.to_string_lossy().to_string(),
                output: params.output.to_string_lossy().to_string(),
                decoder: params.decoder,
                canvas: params.canvas,
                width: params.width,
                height: params.height,
                quality: params.quality.value(),
            });
            if self.fail_transcode {
                return Err(BackendError::Encode("mock encoder refused".to_string()));
            }
            Ok(())
        }
    }

    #[test]
    fn mock_records_probe() {
        let backend = MockBackend::with_probes(vec![jpeg_info(800, 600)]);

        let info = backend.probe(Path::new("/test/image.jpg")).unwrap();
        assert_eq!(info.dimensions.width, 800);
        assert_eq!(info.dimensions.height, 600);

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::Probe(p) if p == "/test/image.jpg"));
    }

    #[test]
    fn mock_probe_without_results_errors() {
        let backend = MockBackend::new();
        assert!(matches!(
            backend.probe(Path::new("/x.jpg")),
            Err(BackendError::Decode(_))
        ));
    }

    #[test]
    fn mock_records_transcode() {
        let backend = MockBackend::new();

        backend
            .transcode(&TranscodeParams {
                source: "/source.png".into(),
                output: "/source.png".into(),
                decoder: SourceFormat::Png,
                canvas: CanvasKind::Alpha,
                width: 640,
                height: 480,
                quality: Quality::new(60),
            })
            .unwrap();

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(
            &ops[0],
            RecordedOp::Transcode {
                canvas: CanvasKind::Alpha,
                width: 640,
                height: 480,
                quality: 60,
                ..
            }
        ));
    }

    #[test]
    fn failing_mock_still_records() {
        let backend = MockBackend::failing(vec![]);
        let result = backend.transcode(&TranscodeParams {
            source: "/a.jpg".into(),
            output: "/a.jpg".into(),
            decoder: SourceFormat::Jpeg,
            canvas: CanvasKind::Opaque,
            width: 1,
            height: 1,
            quality: Quality::default(),
        });
        assert!(matches!(result, Err(BackendError::Encode(_))));
        assert_eq!(backend.transcodes().len(), 1);
    }
}
