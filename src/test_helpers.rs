//! Shared test utilities for the photo-squeeze test suite.
//!
//! Synthetic fixtures are generated with the `image` crate's own encoders so
//! tests never depend on binary files checked into the repository.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! let path = tmp.path().join("photo.jpg");
//! create_test_jpeg(&path, 2048, 1536);
//! write_sized_file(&tmp.path().join("big.jpg"), 2 * MB);
//! ```

use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::path::Path;

/// One megabyte as the transformer counts it.
pub const MB: u64 = 1024 * 1024;

/// Create a gradient JPEG with the given dimensions.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 128]));
    img.save_with_format(path, ImageFormat::Jpeg).unwrap();
}

/// Create a PNG whose left half is opaque red and right half fully transparent.
pub fn create_test_png_with_hole(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([0, 0, 255, 0])
        }
    });
    img.save_with_format(path, ImageFormat::Png).unwrap();
}

/// Create a single-frame GIF.
pub fn create_test_gif(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 4 % 256) as u8, (y * 4 % 256) as u8, 0, 255])
    });
    img.save_with_format(path, ImageFormat::Gif).unwrap();
}

/// Write a file of exactly `len` bytes. Content is irrelevant to the mock backend.
pub fn write_sized_file(path: &Path, len: u64) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let file = std::fs::File::create(path).unwrap();
    file.set_len(len).unwrap();
}
