//! Editing-session bindings.
//!
//! A `JsDocument` owns one image's history and slider state. The host moves
//! sliders with `set_parameter`, commits effects by name, and reads back
//! `preview()` and `histogram()` after every change.
//!
//! # Example
//!
//! ```typescript
//! const doc = JsDocument.from_bytes(bytes, file.name);
//! doc.set_parameter('brightness', 25);
//! draw(doc.preview());
//!
//! doc.commit_effect('sharpen');
//! doc.portrait_retouch(new Uint32Array([40, 30, 120, 140])); // x, y, w, h
//! if (!doc.undo()) showMessage('Nothing to undo');
//! ```

use retouch_core::encode::{encode, OutputFormat};
use retouch_core::{decode, AdjustmentParameters, Document, EditorConfig, Effect, ParameterKey, Region};
use serde::Serialize;
use tracing::debug;
use wasm_bindgen::prelude::*;

use crate::codec::to_js_error;
use crate::histogram::JsHistogram;
use crate::types::JsImage;

/// Snapshot handed to the host by `JsDocument.to_json`.
#[derive(Debug, Serialize)]
struct DocumentState<'a> {
    name: Option<&'a str>,
    history_len: usize,
    has_pending_adjustments: bool,
    parameters: &'a AdjustmentParameters,
}

impl<'a> From<&'a Document> for DocumentState<'a> {
    fn from(doc: &'a Document) -> Self {
        Self {
            name: doc.name(),
            history_len: doc.history_len(),
            has_pending_adjustments: doc.has_pending_adjustments(),
            parameters: doc.parameters(),
        }
    }
}

/// One image being edited.
#[wasm_bindgen]
pub struct JsDocument {
    inner: Document,
}

#[wasm_bindgen]
impl JsDocument {
    /// Start editing an image with the stock configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(image: &JsImage) -> Result<JsDocument, JsValue> {
        let image = image.to_image().map_err(to_js_error)?;
        Ok(Self {
            inner: Document::load(image),
        })
    }

    /// Start editing with a configuration object. Missing fields keep their
    /// defaults, e.g. `{ max_history: 20, effects: { brighten_factor: 1.1 } }`.
    pub fn with_config(image: &JsImage, config: JsValue) -> Result<JsDocument, JsValue> {
        let config: EditorConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| JsValue::from_str(&format!("Invalid editor config: {}", e)))?;
        let image = image.to_image().map_err(to_js_error)?;
        Ok(Self {
            inner: Document::with_config(image, config),
        })
    }

    /// Decode file bytes and start editing. `name` is used for export naming.
    pub fn from_bytes(bytes: &[u8], name: Option<String>) -> Result<JsDocument, JsValue> {
        let image = decode::decode_bytes(bytes).map_err(to_js_error)?;
        let inner = match name {
            Some(name) => Document::load(image).with_name(name),
            None => Document::load(image),
        };
        Ok(Self { inner })
    }

    #[wasm_bindgen(getter)]
    pub fn name(&self) -> Option<String> {
        self.inner.name().map(str::to_string)
    }

    #[wasm_bindgen(getter)]
    pub fn history_len(&self) -> usize {
        self.inner.history_len()
    }

    #[wasm_bindgen(getter)]
    pub fn has_pending_adjustments(&self) -> bool {
        self.inner.has_pending_adjustments()
    }

    /// Set a slider by name and re-render the preview.
    ///
    /// Returns the clamped value actually applied.
    pub fn set_parameter(&mut self, key: &str, value: f32) -> Result<f32, JsValue> {
        let key: ParameterKey = key.parse().map_err(to_js_error)?;
        Ok(self.inner.set_parameter(key, value))
    }

    /// Current value of a slider.
    pub fn parameter(&self, key: &str) -> Result<f32, JsValue> {
        let key: ParameterKey = key.parse().map_err(to_js_error)?;
        Ok(self.inner.parameters().get(key))
    }

    pub fn reset_adjustments(&mut self) {
        self.inner.reset_adjustments();
    }

    /// Replace every slider at once from an object such as
    /// `{ brightness: 10, contrast: -5 }`. Missing sliders take their
    /// defaults; values are clamped.
    pub fn set_parameters(&mut self, value: JsValue) -> Result<(), JsValue> {
        let params: AdjustmentParameters = serde_wasm_bindgen::from_value(value)
            .map_err(|e| JsValue::from_str(&format!("Invalid parameters: {}", e)))?;
        self.inner.set_parameters(params);
        Ok(())
    }

    /// Serialize the session state (name, history depth, sliders) for storage.
    pub fn to_json(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&DocumentState::from(&self.inner)).map_err(to_js_error)
    }

    /// Apply a named effect (see `effect_names()`) to the baseline.
    pub fn commit_effect(&mut self, name: &str) -> Result<(), JsValue> {
        let effect: Effect = name.parse().map_err(to_js_error)?;
        debug!(%effect, "commit from host");
        self.inner.commit_effect(effect).map_err(to_js_error)
    }

    /// Portrait retouch with host-detected faces as flat `[x, y, w, h, ...]`
    /// quadruples. An empty array smooths the whole image.
    pub fn portrait_retouch(&mut self, faces: &[u32]) -> Result<(), JsValue> {
        if faces.len() % 4 != 0 {
            return Err(JsValue::from_str(
                "Face list must contain x, y, width, height quadruples",
            ));
        }
        let regions = regions_from_flat(faces);
        self.inner.portrait_retouch(&regions[..]).map_err(to_js_error)
    }

    /// Drop the newest snapshot. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.inner.undo()
    }

    /// The image to display.
    pub fn preview(&self) -> JsImage {
        JsImage::from_image(self.inner.current_preview().clone())
    }

    /// Histogram of the image to display.
    pub fn histogram(&self) -> JsHistogram {
        self.inner.histogram().into()
    }

    /// Encode the image to display as JPEG (`quality` 1-100) or PNG
    /// (`quality` omitted).
    pub fn export(&self, quality: Option<u8>) -> Result<Vec<u8>, JsValue> {
        let format = match quality {
            Some(quality) => OutputFormat::Jpeg { quality },
            None => OutputFormat::Png,
        };
        encode(self.inner.current_preview(), format).map_err(to_js_error)
    }
}

fn regions_from_flat(faces: &[u32]) -> Vec<Region> {
    faces
        .chunks_exact(4)
        .map(|q| Region::new(q[0], q[1], q[2], q[3]))
        .collect()
}

/// Names accepted by `JsDocument.commit_effect`, in menu order.
#[wasm_bindgen]
pub fn effect_names() -> Vec<String> {
    Effect::ALL.iter().map(|e| e.to_string()).collect()
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn doc() -> JsDocument {
        JsDocument::new(&JsImage::new(2, 2, vec![90u8; 12])).unwrap()
    }

    #[wasm_bindgen_test]
    fn test_unknown_parameter_is_error() {
        let mut d = doc();
        assert!(d.set_parameter("exposure", 1.0).is_err());
        assert!(d.parameter("exposure").is_err());
    }

    #[wasm_bindgen_test]
    fn test_unknown_effect_is_error() {
        let mut d = doc();
        assert!(d.commit_effect("posterize").is_err());
        assert_eq!(d.history_len(), 1);
    }

    #[wasm_bindgen_test]
    fn test_ragged_face_list_is_error() {
        let mut d = doc();
        assert!(d.portrait_retouch(&[0, 0, 1]).is_err());
        assert_eq!(d.history_len(), 1);
    }

    #[wasm_bindgen_test]
    fn test_set_parameters_from_object() {
        #[derive(Serialize)]
        struct Sliders {
            brightness: f32,
            contrast: f32,
        }

        let mut d = doc();
        let value = serde_wasm_bindgen::to_value(&Sliders {
            brightness: 250.0,
            contrast: 10.0,
        })
        .unwrap();
        d.set_parameters(value).unwrap();
        assert_eq!(d.parameter("brightness").unwrap(), 100.0);
        assert_eq!(d.parameter("contrast").unwrap(), 10.0);
        assert_eq!(d.parameter("saturation").unwrap(), 0.0);
        assert!(d.to_json().is_ok());
    }

    #[wasm_bindgen_test]
    fn test_bad_config_is_error() {
        let image = JsImage::new(1, 1, vec![0, 0, 0]);
        let config = JsValue::from_str("not an object");
        assert!(JsDocument::with_config(&image, config).is_err());
    }
}
