//! Input format classification.
//!
//! Three independent questions are answered here, each from a different
//! source of truth:
//!
//! | Question | Decided by |
//! |---|---|
//! | Is this file on the allow-list? | File name extension ([`is_supported_extension`]) |
//! | Which decoder reads it? | MIME type sniffed from content ([`SourceFormat::from_mime`]) |
//! | Does the canvas need alpha? | Format code from the header ([`CanvasKind::for_format`]) |

use image::ImageFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Extensions accepted by the transformer. Always compared lowercase.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "x-png", "jpg", "jpeg", "pjpeg", "gif"];

/// MIME reported when content matches no known image signature.
pub const UNKNOWN_MIME: &str = "application/octet-stream";

/// Lowercase substring after the last dot of the file name; empty when there is none.
pub fn extension_of(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default()
}

pub fn is_supported_extension(extension: &str) -> bool {
    SUPPORTED_EXTENSIONS.contains(&extension)
}

/// MIME type for content recognised by the `image` crate's signature sniffer.
pub fn mime_for(format: Option<ImageFormat>) -> String {
    format
        .map(|f| f.to_mime_type().to_string())
        .unwrap_or_else(|| UNKNOWN_MIME.to_string())
}

/// Decodable source formats (the "format code").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Jpeg,
    Png,
    Gif,
}

impl SourceFormat {
    /// Decoder dispatch by MIME type, including the legacy aliases browsers send.
    pub fn from_mime(mime: &str) -> Option<Self> {
        match mime {
            "image/jpg" | "image/jpeg" | "image/pjpeg" => Some(Self::Jpeg),
            "image/gif" => Some(Self::Gif),
            "image/png" | "image/x-png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Format code for a header sniffed by the `image` crate.
    pub fn from_image_format(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Jpeg => Some(Self::Jpeg),
            ImageFormat::Png => Some(Self::Png),
            ImageFormat::Gif => Some(Self::Gif),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::Gif => "gif",
        }
    }
}

/// Pixel layout of the canvas the source is resampled onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanvasKind {
    /// RGB, no transparency.
    Opaque,
    /// RGBA pre-filled with transparent white, copied onto without blending.
    Alpha,
}

impl CanvasKind {
    /// PNG and GIF can carry transparency; everything else is drawn opaque.
    pub fn for_format(format: Option<SourceFormat>) -> Self {
        match format {
            Some(SourceFormat::Png | SourceFormat::Gif) => Self::Alpha,
            _ => Self::Opaque,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Opaque => "opaque",
            Self::Alpha => "alpha",
        }
    }
}
