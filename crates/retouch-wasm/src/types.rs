//! WASM-compatible wrapper types for image data.

use retouch_core::{Image, ImageError};
use wasm_bindgen::prelude::*;

/// An RGB image handed across the JavaScript boundary.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. `pixels()` copies it out to a
/// `Uint8Array`; keep images in WASM memory and only extract pixels for
/// display.
#[wasm_bindgen]
pub struct JsImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsImage {
    /// Create an image from dimensions and RGB pixel data (3 bytes per
    /// pixel, row-major order).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsImage {
        JsImage {
            width,
            height,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes in the pixel buffer (width * height * 3)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGB pixel data as Uint8Array (a copy).
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {}
}

impl JsImage {
    pub(crate) fn from_image(image: Image) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            pixels: image.into_pixels(),
        }
    }

    /// Validate and copy into a core image.
    pub(crate) fn to_image(&self) -> Result<Image, ImageError> {
        Image::new(self.width, self.height, self.pixels.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_image_creation() {
        let img = JsImage::new(100, 50, vec![0u8; 100 * 50 * 3]);
        assert_eq!(img.width(), 100);
        assert_eq!(img.height(), 50);
        assert_eq!(img.byte_length(), 15000);
    }

    #[test]
    fn test_core_roundtrip() {
        let core = Image::filled(4, 2, [9, 8, 7]);
        let js = JsImage::from_image(core.clone());
        assert_eq!(js.pixels().len(), 24);
        assert_eq!(js.to_image().unwrap(), core);
    }

    #[test]
    fn test_to_image_rejects_bad_buffer() {
        let js = JsImage::new(2, 2, vec![0u8; 5]);
        assert!(matches!(
            js.to_image(),
            Err(ImageError::BufferSizeMismatch { expected: 12, actual: 5 })
        ));
    }
}
