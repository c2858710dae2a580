//! Image processing: pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Sniff + header** | `image::ImageReader::with_guessed_format` |
//! | **Decode** | `image` JPEG / PNG / GIF decoders, chosen by MIME |
//! | **Resize** | Lanczos3 onto an opaque or transparent canvas |
//! | **Encode** | `JpegEncoder` at a size-dependent quality |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Format**: Extension allow-list, MIME dispatch, canvas selection
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Transformer**: [`ImageTransformer`], the per-file job combining all of the above

pub mod backend;
mod calculations;
pub mod format;
mod params;
pub mod rust_backend;
pub mod transformer;

pub use backend::{BackendError, Dimensions, ImageBackend, ImageInfo};
pub use calculations::fit_within;
pub use format::{CanvasKind, SourceFormat};
pub use params::{MaxDimensions, Quality, QualityStep, QualityTable, TranscodeParams};
pub use rust_backend::RustBackend;
pub use transformer::{ImageTransformer, SavedImage, TransformError, TransformPlan};
