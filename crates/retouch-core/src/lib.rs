//! Retouch Core - Photo adjustment engine
//!
//! This crate provides the editing core for Retouch: a per-document edit
//! history, a non-destructive adjustment pipeline (white balance, brightness,
//! contrast, saturation, shadows/highlights), a catalog of destructive effect
//! operators, and histogram analysis.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod adjustments;
pub mod config;
pub mod decode;
pub mod document;
pub mod effects;
pub mod encode;
pub mod export;
pub mod histogram;
pub mod luminance;
pub mod raster;
pub mod tone;
pub mod white_balance;

pub use adjustments::preview;
pub use config::{EditorConfig, EffectConfig, ToneConfig};
pub use document::{Document, DocumentError};
pub use effects::{portrait_retouch, Effect, EffectError, FaceLocator, NoFaces};
pub use histogram::analyze;
pub use raster::{Image, ImageError, Region};
pub use white_balance::{kelvin_to_gains, NEUTRAL_KELVIN};

/// Adjustment slider values applied by the preview pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustmentParameters {
    /// Brightness offset (-100 to 100)
    pub brightness: f32,
    /// Contrast (-100 to 100)
    pub contrast: f32,
    /// Saturation (-100 to 100)
    pub saturation: f32,
    /// White point color temperature in Kelvin (2000 to 10000)
    pub temperature: f32,
    /// Shadow lift (-100 to 100)
    pub shadows: f32,
    /// Highlight compression (-100 to 100)
    pub highlights: f32,
}

impl Default for AdjustmentParameters {
    fn default() -> Self {
        Self {
            brightness: 0.0,
            contrast: 0.0,
            saturation: 0.0,
            temperature: NEUTRAL_KELVIN,
            shadows: 0.0,
            highlights: 0.0,
        }
    }
}

impl AdjustmentParameters {
    /// Create a new parameter set with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if all values are at their defaults
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Read a single parameter.
    pub fn get(&self, key: ParameterKey) -> f32 {
        match key {
            ParameterKey::Brightness => self.brightness,
            ParameterKey::Contrast => self.contrast,
            ParameterKey::Saturation => self.saturation,
            ParameterKey::Temperature => self.temperature,
            ParameterKey::Shadows => self.shadows,
            ParameterKey::Highlights => self.highlights,
        }
    }

    /// Return a copy with `key` set to `value`, clamped to the key's range.
    pub fn with(mut self, key: ParameterKey, value: f32) -> Self {
        let value = key.clamp(value);
        match key {
            ParameterKey::Brightness => self.brightness = value,
            ParameterKey::Contrast => self.contrast = value,
            ParameterKey::Saturation => self.saturation = value,
            ParameterKey::Temperature => self.temperature = value,
            ParameterKey::Shadows => self.shadows = value,
            ParameterKey::Highlights => self.highlights = value,
        }
        self
    }

    /// Return a copy with every value clamped to its declared range.
    pub fn clamped(&self) -> Self {
        ParameterKey::ALL
            .iter()
            .fold(*self, |params, &key| params.with(key, self.get(key)))
    }
}

/// Name of a single adjustment slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKey {
    Brightness,
    Contrast,
    Saturation,
    Temperature,
    Shadows,
    Highlights,
}

impl ParameterKey {
    /// Every key, in pipeline order.
    pub const ALL: [ParameterKey; 6] = [
        ParameterKey::Temperature,
        ParameterKey::Brightness,
        ParameterKey::Contrast,
        ParameterKey::Saturation,
        ParameterKey::Shadows,
        ParameterKey::Highlights,
    ];

    /// Inclusive range of accepted values.
    pub fn range(self) -> (f32, f32) {
        match self {
            ParameterKey::Temperature => (2000.0, 10000.0),
            _ => (-100.0, 100.0),
        }
    }

    /// Value of this key in `AdjustmentParameters::default()`.
    pub fn default_value(self) -> f32 {
        AdjustmentParameters::default().get(self)
    }

    /// Clamp `value` into this key's range. NaN maps to the default value.
    pub fn clamp(self, value: f32) -> f32 {
        if value.is_nan() {
            return self.default_value();
        }
        let (lo, hi) = self.range();
        value.clamp(lo, hi)
    }

    fn name(self) -> &'static str {
        match self {
            ParameterKey::Brightness => "brightness",
            ParameterKey::Contrast => "contrast",
            ParameterKey::Saturation => "saturation",
            ParameterKey::Temperature => "temperature",
            ParameterKey::Shadows => "shadows",
            ParameterKey::Highlights => "highlights",
        }
    }
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for parameter names a host sends that do not exist.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParameterError {
    #[error("Unknown adjustment parameter: {0}")]
    UnknownKey(String),
}

impl FromStr for ParameterKey {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "brightness" => Ok(ParameterKey::Brightness),
            "contrast" => Ok(ParameterKey::Contrast),
            "saturation" => Ok(ParameterKey::Saturation),
            "temperature" | "kelvin" => Ok(ParameterKey::Temperature),
            "shadows" => Ok(ParameterKey::Shadows),
            "highlights" => Ok(ParameterKey::Highlights),
            _ => Err(ParameterError::UnknownKey(s.to_string())),
        }
    }
}

/// Histogram data for an image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Histogram {
    /// Red channel histogram (256 bins)
    pub red: [u32; 256],
    /// Green channel histogram (256 bins)
    pub green: [u32; 256],
    /// Blue channel histogram (256 bins)
    pub blue: [u32; 256],
    /// Luminance histogram (256 bins)
    pub luminance: [u32; 256],
    /// Number of pixels counted
    pub total: u64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self {
            red: [0; 256],
            green: [0; 256],
            blue: [0; 256],
            luminance: [0; 256],
            total: 0,
        }
    }
}

impl Histogram {
    /// Create a new empty histogram
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the maximum value across all channels for normalization
    pub fn max_value(&self) -> u32 {
        let max_r = *self.red.iter().max().unwrap_or(&0);
        let max_g = *self.green.iter().max().unwrap_or(&0);
        let max_b = *self.blue.iter().max().unwrap_or(&0);
        max_r.max(max_g).max(max_b)
    }

    /// Check for highlight clipping (values at 255)
    pub fn has_highlight_clipping(&self) -> bool {
        self.red[255] > 0 || self.green[255] > 0 || self.blue[255] > 0
    }

    /// Check for shadow clipping (values at 0)
    pub fn has_shadow_clipping(&self) -> bool {
        self.red[0] > 0 || self.green[0] > 0 || self.blue[0] > 0
    }

    /// Mean of the luma channel (0-255). Zero for an empty histogram.
    pub fn mean_luma(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        let weighted: u64 = self
            .luminance
            .iter()
            .enumerate()
            .map(|(bin, &count)| bin as u64 * count as u64)
            .sum();
        (weighted as f64 / self.total as f64) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameters_default() {
        let params = AdjustmentParameters::new();
        assert!(params.is_default());
        assert_eq!(params.temperature, 6500.0);
    }

    #[test]
    fn test_parameters_not_default() {
        let mut params = AdjustmentParameters::new();
        params.brightness = 10.0;
        assert!(!params.is_default());
    }

    #[test]
    fn test_with_clamps_to_range() {
        let params = AdjustmentParameters::new()
            .with(ParameterKey::Brightness, 250.0)
            .with(ParameterKey::Temperature, 1000.0)
            .with(ParameterKey::Highlights, -180.0);
        assert_eq!(params.brightness, 100.0);
        assert_eq!(params.temperature, 2000.0);
        assert_eq!(params.highlights, -100.0);
    }

    #[test]
    fn test_nan_maps_to_default() {
        let params = AdjustmentParameters::new().with(ParameterKey::Temperature, f32::NAN);
        assert_eq!(params.temperature, 6500.0);
    }

    #[test]
    fn test_clamped_fixes_every_field() {
        let params = AdjustmentParameters {
            brightness: 101.0,
            contrast: -300.0,
            saturation: 5.0,
            temperature: 20000.0,
            shadows: 0.0,
            highlights: 100.5,
        }
        .clamped();
        assert_eq!(params.brightness, 100.0);
        assert_eq!(params.contrast, -100.0);
        assert_eq!(params.saturation, 5.0);
        assert_eq!(params.temperature, 10000.0);
        assert_eq!(params.highlights, 100.0);
    }

    #[test]
    fn test_parameter_key_parsing() {
        assert_eq!("brightness".parse(), Ok(ParameterKey::Brightness));
        assert_eq!(" Kelvin ".parse(), Ok(ParameterKey::Temperature));
        assert_eq!(
            "exposure".parse::<ParameterKey>(),
            Err(ParameterError::UnknownKey("exposure".to_string()))
        );
        for key in ParameterKey::ALL {
            assert_eq!(key.to_string().parse(), Ok(key));
        }
    }

    #[test]
    fn test_parameters_deserialize_partial() {
        let params: AdjustmentParameters = serde_json::from_str(r#"{"contrast": 20}"#).unwrap();
        assert_eq!(params.contrast, 20.0);
        assert_eq!(params.temperature, 6500.0);
    }

    #[test]
    fn test_histogram_clipping() {
        let mut hist = Histogram::new();
        assert!(!hist.has_highlight_clipping());
        assert!(!hist.has_shadow_clipping());

        hist.red[255] = 100;
        assert!(hist.has_highlight_clipping());

        hist.blue[0] = 50;
        assert!(hist.has_shadow_clipping());
    }

    #[test]
    fn test_histogram_mean_luma() {
        let mut hist = Histogram::new();
        assert_eq!(hist.mean_luma(), 0.0);

        hist.luminance[100] = 1;
        hist.luminance[200] = 1;
        hist.total = 2;
        assert!((hist.mean_luma() - 150.0).abs() < 1e-4);
    }
}
