//! Editor configuration.
//!
//! Every constant used by the tone remap and the effect catalog lives here
//! with its stock value as the default. All structs deserialize with
//! `#[serde(default)]`, so a host can override a single field from JSON.

use serde::{Deserialize, Serialize};

/// Top-level configuration for a [`Document`](crate::Document).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub tone: ToneConfig,
    pub effects: EffectConfig,
    /// Maximum number of history snapshots kept, including the root.
    /// `None` keeps every snapshot.
    pub max_history: Option<usize>,
}

/// Constants of the shadows/highlights tone remap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToneConfig {
    /// Value at which the shadow lift fades to zero (0.0 to 1.0)
    pub shadow_pivot: f32,
    /// Value at which highlight compression begins (0.0 to 1.0)
    pub highlight_pivot: f32,
    /// Scale applied to the normalized slider value
    pub strength: f32,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self {
            shadow_pivot: 0.6,
            highlight_pivot: 0.4,
            strength: 0.6,
        }
    }
}

/// Constants of the destructive effect catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    pub sharpen: SharpenConfig,
    pub casts: CastConfig,
    /// Multiplier of the Brighten effect
    pub brighten_factor: f32,
    /// Blend factor between the smoothed and original image for Clarity
    pub clarity_factor: f32,
    pub vignette: VignetteConfig,
    pub noise_reduction: BilateralConfig,
    pub portrait: PortraitConfig,
    pub auto_enhance: AutoEnhanceConfig,
}

/// Unsharp mask settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SharpenConfig {
    /// Gaussian blur sigma in pixels
    pub radius: f32,
    /// Fraction of the high-pass detail added back (1.2 = 120%)
    pub amount: f32,
    /// Minimum difference from the blurred value before a sample is touched
    pub threshold: u8,
}

impl Default for SharpenConfig {
    fn default() -> Self {
        Self {
            radius: 1.0,
            amount: 1.2,
            threshold: 3,
        }
    }
}

/// Additive channel offsets of the color cast effects, as `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CastConfig {
    pub orange: [u8; 3],
    pub red: [u8; 3],
    pub blue: [u8; 3],
}

impl Default for CastConfig {
    fn default() -> Self {
        Self {
            orange: [12, 6, 0],
            red: [18, 0, 0],
            blue: [0, 0, 18],
        }
    }
}

/// Radial darkening: `weight = floor + strength * falloff`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VignetteConfig {
    pub floor: f32,
    pub strength: f32,
}

impl Default for VignetteConfig {
    fn default() -> Self {
        Self {
            floor: 0.6,
            strength: 0.4,
        }
    }
}

/// Edge-preserving bilateral smoothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BilateralConfig {
    /// Neighborhood radius in pixels
    pub radius: u32,
    /// Falloff of the color-distance weight
    pub sigma_color: f32,
    /// Falloff of the spatial-distance weight
    pub sigma_space: f32,
}

impl Default for BilateralConfig {
    fn default() -> Self {
        Self {
            radius: 2,
            sigma_color: 75.0,
            sigma_space: 75.0,
        }
    }
}

/// Portrait retouch settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortraitConfig {
    /// Global `[r, g, b]` channel gains applied before smoothing
    pub channel_gains: [f32; 3],
    pub smoothing: BilateralConfig,
    /// Weight of the unsmoothed face region in the blend
    pub original_weight: f32,
}

impl Default for PortraitConfig {
    fn default() -> Self {
        Self {
            channel_gains: [0.95, 1.05, 1.05],
            smoothing: BilateralConfig {
                radius: 4,
                ..BilateralConfig::default()
            },
            original_weight: 0.6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoEnhanceConfig {
    pub contrast: f32,
    pub brightness: f32,
}

impl Default for AutoEnhanceConfig {
    fn default() -> Self {
        Self {
            contrast: 1.08,
            brightness: 1.06,
        }
    }
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            sharpen: SharpenConfig::default(),
            casts: CastConfig::default(),
            brighten_factor: 1.15,
            clarity_factor: 1.2,
            vignette: VignetteConfig::default(),
            noise_reduction: BilateralConfig::default(),
            portrait: PortraitConfig::default(),
            auto_enhance: AutoEnhanceConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_constants() {
        let config = EditorConfig::default();
        assert_eq!(config.tone.shadow_pivot, 0.6);
        assert_eq!(config.tone.highlight_pivot, 0.4);
        assert_eq!(config.effects.brighten_factor, 1.15);
        assert_eq!(config.effects.clarity_factor, 1.2);
        assert_eq!(config.effects.noise_reduction.radius, 2);
        assert_eq!(config.effects.portrait.smoothing.radius, 4);
        assert_eq!(config.effects.portrait.smoothing.sigma_color, 75.0);
        assert_eq!(config.effects.casts.orange, [12, 6, 0]);
        assert_eq!(config.max_history, None);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{"effects": {"vignette": {"floor": 0.5}}, "max_history": 20}"#;
        let config: EditorConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.effects.vignette.floor, 0.5);
        assert_eq!(config.effects.vignette.strength, 0.4);
        assert_eq!(config.effects.sharpen, SharpenConfig::default());
        assert_eq!(config.tone, ToneConfig::default());
        assert_eq!(config.max_history, Some(20));
    }

    #[test]
    fn test_json_roundtrip() {
        let config = EditorConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: EditorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
