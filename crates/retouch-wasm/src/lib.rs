//! Retouch WASM - WebAssembly bindings for the retouch editing engine
//!
//! # Module Structure
//!
//! - `document` - Editing sessions: sliders, effects, undo, preview
//! - `types` - WASM-compatible wrapper type for image data
//! - `histogram` - Histogram bindings
//! - `codec` - Decode and encode bindings
//!
//! The core is built without its `parallel` feature here; every filter runs
//! on the calling thread.
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsDocument } from '@retouch/wasm';
//!
//! await init();
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const doc = JsDocument.from_bytes(bytes, file.name);
//! doc.set_parameter('contrast', 20);
//! const preview = doc.preview();
//! localStorage.setItem(file.name, JSON.stringify(doc.to_json()));
//! console.log(`Preview ${preview.width}x${preview.height}`);
//! ```

use wasm_bindgen::prelude::*;

mod codec;
mod document;
mod histogram;
mod types;

pub use codec::{decode_image, encode_jpeg, encode_png};
pub use document::{effect_names, JsDocument};
pub use histogram::{compute_histogram, JsHistogram};
pub use types::JsImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
