//! Decode and encode bindings.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, encode_jpeg, encode_png } from '@retouch/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! const jpeg = encode_jpeg(image, 90);
//! ```

use retouch_core::encode::{self, OutputFormat};
use retouch_core::decode;
use wasm_bindgen::prelude::*;

use crate::types::JsImage;

pub(crate) fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Decode a JPEG, PNG, BMP or WebP file, applying EXIF orientation.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsImage, JsValue> {
    decode::decode_bytes(bytes)
        .map(JsImage::from_image)
        .map_err(to_js_error)
}

/// Encode an image to JPEG bytes.
///
/// # Quality Guidelines
///
/// * 90-100: High quality, suitable for archival
/// * 80-90: Good quality, recommended for most uses
/// * Below 60: Visible artifacts
#[wasm_bindgen]
pub fn encode_jpeg(image: &JsImage, quality: u8) -> Result<Vec<u8>, JsValue> {
    let image = image.to_image().map_err(to_js_error)?;
    encode::encode(&image, OutputFormat::Jpeg { quality }).map_err(to_js_error)
}

/// Encode an image to PNG bytes.
#[wasm_bindgen]
pub fn encode_png(image: &JsImage) -> Result<Vec<u8>, JsValue> {
    let image = image.to_image().map_err(to_js_error)?;
    encode::encode(&image, OutputFormat::Png).map_err(to_js_error)
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_decode_garbage_is_error() {
        assert!(decode_image(&[0x00, 0x01, 0x02, 0x03]).is_err());
    }

    #[wasm_bindgen_test]
    fn test_encode_jpeg_invalid_pixel_data() {
        let js = JsImage::new(100, 100, vec![128u8; 50 * 50 * 3]);
        assert!(encode_jpeg(&js, 90).is_err());
    }

    #[wasm_bindgen_test]
    fn test_encode_png_zero_width() {
        let js = JsImage::new(0, 4, vec![]);
        assert!(encode_png(&js).is_err());
    }
}
