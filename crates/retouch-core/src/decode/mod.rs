//! Image decoding.
//!
//! Turns encoded bytes (JPEG, PNG, BMP or WebP) into an RGB8 [`Image`],
//! applying the EXIF orientation tag when the file carries one. Alpha is
//! dropped and higher bit depths are reduced to 8 bits per channel.
//!
//! # Examples
//!
//! ```ignore
//! use retouch_core::decode::decode_file;
//!
//! let image = decode_file("photo.jpg").unwrap();
//! println!("Decoded {}x{} image", image.width(), image.height());
//! ```

mod types;

use std::io::Cursor;
use std::path::Path;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};
use tracing::debug;

use crate::raster::Image;

pub use types::{DecodeError, Orientation};

/// Decode an image from bytes, applying EXIF orientation correction.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format cannot be recognized.
/// Returns `DecodeError::CorruptedFile` if the data is damaged.
pub fn decode_bytes(bytes: &[u8]) -> Result<Image, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let Some(format) = reader.format() else {
        return Err(DecodeError::InvalidFormat);
    };

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let orientation = get_orientation(bytes);
    debug!(
        ?format,
        ?orientation,
        width = img.width(),
        height = img.height(),
        "decoded image"
    );

    let rgb = apply_orientation(img, orientation).into_rgb8();
    Ok(Image::from_rgb_image(rgb))
}

/// Read and decode an image file.
pub fn decode_file(path: impl AsRef<Path>) -> Result<Image, DecodeError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)
        .map_err(|e| DecodeError::Io(format!("{}: {}", path.display(), e)))?;
    decode_bytes(&bytes)
}

/// Extract the EXIF orientation from encoded bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    Reader::new()
        .read_from_container(&mut cursor)
        .ok()
        .and_then(|exif| {
            exif.get_field(Tag::Orientation, In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
        })
        .map(Orientation::from)
        .unwrap_or_default()
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}
