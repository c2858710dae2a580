//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Sniff + header | `image::ImageReader::with_guessed_format` + `into_dimensions` |
//! | Decode (JPEG, PNG, GIF) | `image::codecs::{jpeg, png, gif}` decoders, picked explicitly |
//! | Resample | `image::imageops::resize` with `Lanczos3` filter |
//! | Canvas | `RgbImage` / `RgbaImage` + `imageops::replace` (no blending) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder::new_with_quality` |
//! | Atomic write | `tempfile::NamedTempFile::persist` in the target directory |

use super::backend::{BackendError, Dimensions, ImageBackend, ImageInfo};
use super::format::{CanvasKind, SourceFormat, mime_for};
use super::params::TranscodeParams;
use image::codecs::gif::GifDecoder;
use image::codecs::jpeg::{JpegDecoder, JpegEncoder};
use image::codecs::png::PngDecoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader, Rgba, RgbaImage, RgbImage};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Fill colour of an alpha canvas: white at zero opacity.
const TRANSPARENT: Rgba<u8> = Rgba([255, 255, 255, 0]);

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode with the decoder chosen by MIME dispatch, not by re-sniffing.
fn decode(path: &Path, decoder: SourceFormat) -> Result<DynamicImage, BackendError> {
    let reader = BufReader::new(File::open(path)?);
    let failed =
        |e: image::ImageError| BackendError::Decode(format!("{}: {}", path.display(), e));

    let img = match decoder {
        SourceFormat::Jpeg => DynamicImage::from_decoder(JpegDecoder::new(reader).map_err(failed)?),
        SourceFormat::Png => DynamicImage::from_decoder(PngDecoder::new(reader).map_err(failed)?),
        SourceFormat::Gif => DynamicImage::from_decoder(GifDecoder::new(reader).map_err(failed)?),
    }
    .map_err(failed)?;

    if img.width() == 0 || img.height() == 0 {
        return Err(BackendError::Decode(format!(
            "{}: decoded an empty image",
            path.display()
        )));
    }
    Ok(img)
}

/// Resample `img` to `width`×`height` and draw it onto a fresh canvas.
///
/// Alpha canvases start fully transparent and are overwritten pixel for pixel,
/// so source transparency is kept as-is rather than composited.
pub(crate) fn compose_canvas(
    img: &DynamicImage,
    width: u32,
    height: u32,
    kind: CanvasKind,
) -> DynamicImage {
    match kind {
        CanvasKind::Alpha => {
            let mut canvas = RgbaImage::from_pixel(width, height, TRANSPARENT);
            let resized = image::imageops::resize(&img.to_rgba8(), width, height, FilterType::Lanczos3);
            image::imageops::replace(&mut canvas, &resized, 0, 0);
            DynamicImage::ImageRgba8(canvas)
        }
        CanvasKind::Opaque => {
            let mut canvas = RgbImage::new(width, height);
            let resized = image::imageops::resize(&img.to_rgb8(), width, height, FilterType::Lanczos3);
            image::imageops::replace(&mut canvas, &resized, 0, 0);
            DynamicImage::ImageRgb8(canvas)
        }
    }
}

/// Encode as JPEG and atomically replace `path`.
///
/// JPEG has no alpha channel, so alpha canvases are flattened to RGB here.
/// The bytes go to a temp file next to `path` first; only a complete encode
/// is renamed over the target, which keeps its permissions.
fn save_jpeg(img: &DynamicImage, path: &Path, quality: u32) -> Result<(), BackendError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = tempfile::NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        let encoder = JpegEncoder::new_with_quality(&mut writer, quality.clamp(1, 100) as u8);
        img.to_rgb8()
            .write_with_encoder(encoder)
            .map_err(|e| BackendError::Encode(format!("JPEG encode failed: {}", e)))?;
        writer.flush()?;
    }
    // Temp files are created 0600; an in-place save keeps the target's mode
    if let Ok(existing) = std::fs::metadata(path) {
        tmp.as_file().set_permissions(existing.permissions())?;
    }
    tmp.persist(path).map_err(|e| BackendError::Io(e.error))?;
    Ok(())
}

impl ImageBackend for RustBackend {
    fn probe(&self, path: &Path) -> Result<ImageInfo, BackendError> {
        let reader = ImageReader::open(path)?.with_guessed_format()?;
        let sniffed = reader.format();
        let (width, height) = reader.into_dimensions().map_err(|e| {
            BackendError::Decode(format!("Failed to read dimensions: {}", e))
        })?;
        Ok(ImageInfo {
            mime: mime_for(sniffed),
            format: sniffed.and_then(SourceFormat::from_image_format),
            dimensions: Dimensions { width, height },
        })
    }

    fn transcode(&self, params: &TranscodeParams) -> Result<(), BackendError> {
        let img = decode(&params.source, params.decoder)?;
        let canvas = compose_canvas(&img, params.width, params.height, params.canvas);
        drop(img);
        save_jpeg(&canvas, &params.output, params.quality.value())
    }
}
