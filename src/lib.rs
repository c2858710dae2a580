//! # Photo Squeeze
//!
//! Shrinks a directory of photos so they fit inside a bounding box and weigh
//! less, then moves each finished file to a destination directory. Every
//! output is a baseline JPEG, whatever the input was.
//!
//! # Flow
//!
//! ```text
//! converter/            ImageTransformer per file            convertido/
//!   photo.jpg   →  validate → probe → quality by size  →  photo.jpg
//!   logo.png        fit within 1280x960 → canvas → JPEG      logo.png (JPEG bytes)
//!   scan.bmp    →  rejected, left in place
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | The per-file [`ImageTransformer`](imaging::ImageTransformer), fit-within math, quality table, pure Rust backend |
//! | [`process`] | Batch driver: list, transform in place, move, report |
//! | [`config`] | `squeeze.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting for runs and plan inspection |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Design Decisions
//!
//! ## Quality by File Size
//!
//! Heavier files are compressed harder. The stock table maps ≥ 1 MB to
//! quality 30, ≥ 0.5 MB to 40, ≥ 0.3 MB to 60 and anything smaller to 80.
//! Steps are checked in the order they are declared and the first match wins,
//! so a custom table controls precedence simply by ordering.
//!
//! ## Transparent Canvas for PNG and GIF
//!
//! PNG and GIF sources are resampled onto a fully transparent canvas, JPEG
//! sources onto an opaque one. The alpha channel is discarded at encode time
//! because JPEG cannot store it.
//!
//! ## Nothing Moves Until It Is Saved
//!
//! Each file is rewritten in place through a temporary file and an atomic
//! rename. Only a successful save is followed by the move to the destination
//! directory, so a failure never leaves a half-written image or loses the
//! original.

pub mod config;
pub mod imaging;
pub mod logging;
pub mod output;
pub mod process;

#[cfg(test)]
pub(crate) mod test_helpers;
