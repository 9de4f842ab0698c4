//! Encoders backed by the `image` crate.

use std::io::Cursor;
use std::path::Path;

use image::codecs::bmp::BmpEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::raster::Image;

/// JPEG quality used when saving by file extension.
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// Errors that can occur while encoding or saving.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// No encoder for the requested file type
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// The encoder rejected the image
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    /// The destination could not be written
    #[error("I/O error: {0}")]
    Io(String),
}

/// Output container format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// JPEG with quality 1-100 (out-of-range values are clamped)
    Jpeg { quality: u8 },
    Png,
    Bmp,
    /// Lossless WebP
    #[serde(rename = "webp")]
    WebP,
}

impl OutputFormat {
    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg { .. } => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::Bmp => "bmp",
            OutputFormat::WebP => "webp",
        }
    }
}

/// Encode an image to bytes.
///
/// # Quality Guidelines
///
/// * 90-100: High quality, suitable for archival or further editing
/// * 80-90: Good quality for most uses
/// * Below 60: Visible artifacts
///
/// # Errors
///
/// Returns `EncodeError::InvalidDimensions` for an empty image and
/// `EncodeError::EncodingFailed` if the encoder fails.
pub fn encode(image: &Image, format: OutputFormat) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = (image.width(), image.height());
    if image.is_empty() {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let mut buffer = Cursor::new(Vec::new());
    let pixels = image.pixels();
    let result = match format {
        OutputFormat::Jpeg { quality } => JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100))
            .write_image(pixels, width, height, ExtendedColorType::Rgb8),
        OutputFormat::Png => PngEncoder::new(&mut buffer).write_image(pixels, width, height, ExtendedColorType::Rgb8),
        OutputFormat::Bmp => BmpEncoder::new(&mut buffer).write_image(pixels, width, height, ExtendedColorType::Rgb8),
        OutputFormat::WebP => {
            WebPEncoder::new_lossless(&mut buffer).write_image(pixels, width, height, ExtendedColorType::Rgb8)
        }
    };
    result.map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    let bytes = buffer.into_inner();
    debug!(?format, width, height, bytes = bytes.len(), "encoded image");
    Ok(bytes)
}

/// Pick an output format from a path's extension.
///
/// `.jpg`/`.jpeg` use [`DEFAULT_JPEG_QUALITY`]. Matching is case-insensitive.
pub fn format_for_path(path: &Path) -> Result<OutputFormat, EncodeError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => Ok(OutputFormat::Jpeg {
            quality: DEFAULT_JPEG_QUALITY,
        }),
        "png" => Ok(OutputFormat::Png),
        "bmp" => Ok(OutputFormat::Bmp),
        "webp" => Ok(OutputFormat::WebP),
        _ => Err(EncodeError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Encode an image and write it to `path`.
pub fn save(image: &Image, path: impl AsRef<Path>) -> Result<(), EncodeError> {
    let path = path.as_ref();
    let bytes = encode(image, format_for_path(path)?)?;
    std::fs::write(path, bytes).map_err(|e| EncodeError::Io(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode_jpeg_markers() {
        let img = Image::filled(100, 100, [128, 128, 128]);
        let jpeg = encode(&img, OutputFormat::Jpeg { quality: 90 }).unwrap();

        // SOI and EOI markers
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
        assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_png_signature() {
        let png = encode(&Image::filled(3, 2, [1, 2, 3]), OutputFormat::Png).unwrap();
        assert_eq!(&png[0..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_encode_bmp_signature() {
        let bmp = encode(&Image::filled(3, 2, [1, 2, 3]), OutputFormat::Bmp).unwrap();
        assert_eq!(&bmp[0..2], b"BM");
    }

    #[test]
    fn test_encode_webp_is_lossless() {
        let img = Image::new(2, 1, vec![10, 20, 30, 200, 150, 100]).unwrap();
        let webp = encode(&img, OutputFormat::WebP).unwrap();
        assert_eq!(&webp[0..4], b"RIFF");
        assert_eq!(&webp[8..12], b"WEBP");

        let decoded = image::load_from_memory(&webp).unwrap().into_rgb8();
        assert_eq!(decoded.into_raw(), img.pixels());
    }

    #[test]
    fn test_output_format_serde_names() {
        assert_eq!(serde_json::to_string(&OutputFormat::WebP).unwrap(), "\"webp\"");
        assert_eq!(serde_json::to_string(&OutputFormat::Png).unwrap(), "\"png\"");
    }

    #[test]
    fn test_encode_jpeg_quality_clamping() {
        let img = Image::filled(10, 10, [128, 128, 128]);
        assert!(encode(&img, OutputFormat::Jpeg { quality: 0 }).is_ok());
        assert!(encode(&img, OutputFormat::Jpeg { quality: 255 }).is_ok());
    }

    #[test]
    fn test_encode_empty_image() {
        let img = Image::new(0, 100, vec![]).unwrap();
        let result = encode(&img, OutputFormat::Png);
        assert!(matches!(
            result,
            Err(EncodeError::InvalidDimensions { width: 0, height: 100 })
        ));
    }

    #[test]
    fn test_format_for_path() {
        assert_eq!(
            format_for_path(Path::new("out/photo.JPG")).unwrap(),
            OutputFormat::Jpeg { quality: 90 }
        );
        assert_eq!(
            format_for_path(Path::new("photo.jpeg")).unwrap(),
            OutputFormat::Jpeg { quality: 90 }
        );
        assert_eq!(format_for_path(Path::new("a.png")).unwrap(), OutputFormat::Png);
        assert_eq!(format_for_path(Path::new("a.bmp")).unwrap(), OutputFormat::Bmp);
        assert_eq!(format_for_path(Path::new("a.WebP")).unwrap(), OutputFormat::WebP);
        assert!(matches!(
            format_for_path(Path::new("a.tiff")),
            Err(EncodeError::UnsupportedFormat(_))
        ));
        assert!(format_for_path(Path::new("no_extension")).is_err());
    }

    #[test]
    fn test_save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        save(&Image::filled(4, 4, [9, 8, 7]), &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn test_save_unwritable_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");
        let result = save(&Image::filled(2, 2, [0, 0, 0]), &path);
        assert!(matches!(result, Err(EncodeError::Io(_))));
    }

    proptest! {
        #[test]
        fn prop_jpeg_always_has_markers(
            width in 1u32..=32,
            height in 1u32..=32,
            quality in 1u8..=100,
            shade in any::<u8>(),
        ) {
            let img = Image::filled(width, height, [shade, shade / 2, 255 - shade]);
            let jpeg = encode(&img, OutputFormat::Jpeg { quality }).unwrap();
            prop_assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);
            prop_assert_eq!(&jpeg[jpeg.len() - 2..], &[0xFF, 0xD9]);
        }
    }
}
