//! Histogram WASM bindings.

use retouch_core::histogram::compute_histogram as compute_histogram_core;
use retouch_core::Histogram;
use wasm_bindgen::prelude::*;

/// Histogram result accessible from JavaScript.
///
/// 256-bin histograms for red, green, blue and luma, plus helpers for
/// clipping detection and normalization.
#[wasm_bindgen]
pub struct JsHistogram {
    red: Vec<u32>,
    green: Vec<u32>,
    blue: Vec<u32>,
    luminance: Vec<u32>,
    total: u64,
    max_value: u32,
    mean_luma: f32,
    has_highlight_clipping: bool,
    has_shadow_clipping: bool,
}

#[wasm_bindgen]
impl JsHistogram {
    pub fn red(&self) -> Vec<u32> {
        self.red.clone()
    }

    pub fn green(&self) -> Vec<u32> {
        self.green.clone()
    }

    pub fn blue(&self) -> Vec<u32> {
        self.blue.clone()
    }

    pub fn luminance(&self) -> Vec<u32> {
        self.luminance.clone()
    }

    /// Number of pixels counted
    #[wasm_bindgen(getter)]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Maximum bin value across the RGB channels, for normalizing the display.
    #[wasm_bindgen(getter)]
    pub fn max_value(&self) -> u32 {
        self.max_value
    }

    #[wasm_bindgen(getter)]
    pub fn mean_luma(&self) -> f32 {
        self.mean_luma
    }

    #[wasm_bindgen(getter)]
    pub fn has_highlight_clipping(&self) -> bool {
        self.has_highlight_clipping
    }

    #[wasm_bindgen(getter)]
    pub fn has_shadow_clipping(&self) -> bool {
        self.has_shadow_clipping
    }
}

impl From<Histogram> for JsHistogram {
    fn from(hist: Histogram) -> Self {
        Self {
            red: hist.red.to_vec(),
            green: hist.green.to_vec(),
            blue: hist.blue.to_vec(),
            luminance: hist.luminance.to_vec(),
            total: hist.total,
            max_value: hist.max_value(),
            mean_luma: hist.mean_luma(),
            has_highlight_clipping: hist.has_highlight_clipping(),
            has_shadow_clipping: hist.has_shadow_clipping(),
        }
    }
}

/// Compute a histogram from RGB pixel data (3 bytes per pixel).
///
/// # Example (TypeScript)
/// ```typescript
/// const hist = compute_histogram(image.pixels());
/// const redBins = hist.red();        // Uint32Array[256]
/// const max = hist.max_value;        // For normalization
/// hist.free();
/// ```
#[wasm_bindgen]
pub fn compute_histogram(pixels: &[u8]) -> JsHistogram {
    compute_histogram_core(pixels).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_histogram_primaries() {
        let pixels = vec![255, 0, 0, 0, 255, 0, 0, 0, 255];
        let hist = compute_histogram(&pixels);

        assert_eq!(hist.red().len(), 256);
        assert_eq!(hist.luminance().len(), 256);
        assert_eq!(hist.red()[255], 1);
        assert_eq!(hist.red()[0], 2);
        assert_eq!(hist.total(), 3);
        assert!(hist.has_highlight_clipping());
        assert!(hist.has_shadow_clipping());
    }

    #[test]
    fn test_js_histogram_mean_luma() {
        let hist = compute_histogram(&[100, 100, 100, 200, 200, 200]);
        assert_eq!(hist.mean_luma(), 150.0);
        assert_eq!(hist.max_value(), 1);
    }

    #[test]
    fn test_js_histogram_empty() {
        let hist = compute_histogram(&[]);
        assert_eq!(hist.total(), 0);
        assert_eq!(hist.max_value(), 0);
        assert!(!hist.has_highlight_clipping());
    }
}
