//! Image encoding for saving and export.
//!
//! This module provides:
//! - Encoding an [`Image`](crate::Image) to JPEG (configurable quality), PNG, BMP or lossless WebP bytes
//! - Saving to a path, with the format chosen from the file extension
//!
//! # Examples
//!
//! ```ignore
//! use retouch_core::encode::{encode, OutputFormat};
//!
//! let bytes = encode(&image, OutputFormat::Jpeg { quality: 90 }).unwrap();
//! println!("Encoded {} bytes", bytes.len());
//! ```

mod encoder;

pub use encoder::{encode, format_for_path, save, EncodeError, OutputFormat, DEFAULT_JPEG_QUALITY};
