//! Destructive effect operators.
//!
//! Every effect is a pure function from one [`Image`] to a new one. The
//! [`Document`](crate::Document) commits the result as a new history entry.
//!
//! # Catalog
//!
//! | Effect            | Kind                                       |
//! |-------------------|--------------------------------------------|
//! | `Rotate90`        | quarter turn clockwise, dimensions swap    |
//! | `FlipHorizontal`  | mirror left to right                       |
//! | `Sharpen`         | unsharp mask                               |
//! | `OrangeCast` etc. | additive channel offset                    |
//! | `Brighten`        | global multiply                            |
//! | `Clarity`         | 3x3 local contrast                         |
//! | `Vignette`        | radial darkening                           |
//! | `NoiseReduction`  | bilateral smoothing                        |
//! | `AutoEnhance`     | contrast about mean luma, then brighten    |
//!
//! Portrait retouch needs a face locator and is exposed separately as
//! [`portrait_retouch`].

mod color;
mod filter;
mod geometry;
mod portrait;
mod vignette;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use crate::config::{EffectConfig, PortraitConfig};
use crate::raster::Image;

pub use color::{auto_enhance, color_cast, scale, scale_channels};
pub use filter::{bilateral, clarity, convolve, gaussian_blur, unsharp_mask, Kernel};
pub use geometry::{flip_horizontal, rotate_90_clockwise};
pub use portrait::{FaceLocator, NoFaces};
pub use vignette::{vignette, vignette_weight};

/// Errors raised by effect operators.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EffectError {
    /// The input has a zero dimension
    #[error("Cannot apply effect to an empty image ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    /// Effect name not in the catalog
    #[error("Unknown effect: {0}")]
    UnknownEffect(String),
}

fn ensure_not_empty(image: &Image) -> Result<(), EffectError> {
    if image.is_empty() {
        return Err(EffectError::EmptyImage {
            width: image.width(),
            height: image.height(),
        });
    }
    Ok(())
}

/// The catalog of destructive effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    #[serde(rename = "rotate_90")]
    Rotate90,
    FlipHorizontal,
    Sharpen,
    OrangeCast,
    RedCast,
    BlueCast,
    Brighten,
    Clarity,
    Vignette,
    NoiseReduction,
    AutoEnhance,
}

impl Effect {
    /// Every effect, in menu order.
    pub const ALL: [Effect; 11] = [
        Effect::Rotate90,
        Effect::FlipHorizontal,
        Effect::Sharpen,
        Effect::OrangeCast,
        Effect::RedCast,
        Effect::BlueCast,
        Effect::Brighten,
        Effect::Clarity,
        Effect::Vignette,
        Effect::NoiseReduction,
        Effect::AutoEnhance,
    ];

    /// Stable snake_case name, as used by the host boundary.
    pub fn name(self) -> &'static str {
        match self {
            Effect::Rotate90 => "rotate_90",
            Effect::FlipHorizontal => "flip_horizontal",
            Effect::Sharpen => "sharpen",
            Effect::OrangeCast => "orange_cast",
            Effect::RedCast => "red_cast",
            Effect::BlueCast => "blue_cast",
            Effect::Brighten => "brighten",
            Effect::Clarity => "clarity",
            Effect::Vignette => "vignette",
            Effect::NoiseReduction => "noise_reduction",
            Effect::AutoEnhance => "auto_enhance",
        }
    }

    /// Whether the effect changes the image dimensions.
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Effect::Rotate90)
    }

    /// Apply the effect to `image`, producing a new image.
    ///
    /// # Errors
    /// Returns `EffectError::EmptyImage` if `image` has a zero dimension.
    pub fn apply(self, image: &Image, config: &EffectConfig) -> Result<Image, EffectError> {
        ensure_not_empty(image)?;
        trace!(effect = %self, width = image.width(), height = image.height(), "apply effect");

        let out = match self {
            Effect::Rotate90 => rotate_90_clockwise(image),
            Effect::FlipHorizontal => flip_horizontal(image),
            Effect::Sharpen => unsharp_mask(image, &config.sharpen),
            Effect::OrangeCast => color_cast(image, config.casts.orange),
            Effect::RedCast => color_cast(image, config.casts.red),
            Effect::BlueCast => color_cast(image, config.casts.blue),
            Effect::Brighten => scale(image, config.brighten_factor),
            Effect::Clarity => clarity(image, config.clarity_factor),
            Effect::Vignette => vignette(image, &config.vignette),
            Effect::NoiseReduction => bilateral(image, &config.noise_reduction),
            Effect::AutoEnhance => auto_enhance(image, &config.auto_enhance),
        };
        Ok(out)
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Effect {
    type Err = EffectError;

    /// Parse a snake_case effect name. `rotate` is accepted for `rotate_90`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        if name == "rotate" {
            return Ok(Effect::Rotate90);
        }
        Effect::ALL
            .into_iter()
            .find(|effect| effect.name() == name)
            .ok_or_else(|| EffectError::UnknownEffect(s.to_string()))
    }
}

/// Retouch a portrait using faces from `locator`.
///
/// The channels are rebalanced by `config.channel_gains`, then each face
/// (clipped to the image) is blended with its bilateral-smoothed version.
/// Without faces the whole image is smoothed.
///
/// # Errors
/// Returns `EffectError::EmptyImage` if `image` has a zero dimension.
pub fn portrait_retouch<L>(image: &Image, locator: &L, config: &PortraitConfig) -> Result<Image, EffectError>
where
    L: FaceLocator + ?Sized,
{
    ensure_not_empty(image)?;
    trace!(width = image.width(), height = image.height(), "portrait retouch");
    Ok(portrait::portrait_retouch(image, locator, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Region;

    fn gradient(width: u32, height: u32) -> Image {
        let pixels = (0..width * height)
            .flat_map(|i| {
                let v = (i * 255 / (width * height)) as u8;
                [v, 255 - v, v / 2]
            })
            .collect();
        Image::new(width, height, pixels).unwrap()
    }

    #[test]
    fn test_every_effect_keeps_pixel_count() {
        let img = gradient(7, 5);
        let config = EffectConfig::default();
        for effect in Effect::ALL {
            let out = effect.apply(&img, &config).unwrap();
            assert_eq!(out.pixel_count(), img.pixel_count(), "{effect}");
            if effect.swaps_dimensions() {
                assert_eq!((out.width(), out.height()), (5, 7), "{effect}");
            } else {
                assert_eq!((out.width(), out.height()), (7, 5), "{effect}");
            }
        }
    }

    #[test]
    fn test_effects_do_not_mutate_input() {
        let img = gradient(6, 6);
        let copy = img.clone();
        let config = EffectConfig::default();
        for effect in Effect::ALL {
            let _ = effect.apply(&img, &config).unwrap();
        }
        assert_eq!(img, copy);
    }

    #[test]
    fn test_rotate_4x6() {
        let img = gradient(4, 6);
        let out = Effect::Rotate90.apply(&img, &EffectConfig::default()).unwrap();
        assert_eq!(out.width(), 6);
        assert_eq!(out.height(), 4);
        // top-left of the output is the bottom-left of the input
        assert_eq!(out.pixel(0, 0), img.pixel(0, 5));
        assert_eq!(out.pixel(5, 0), img.pixel(0, 0));
    }

    #[test]
    fn test_casts_use_config_offsets() {
        let img = Image::filled(2, 2, [100, 100, 100]);
        let config = EffectConfig::default();
        let apply = |e: Effect| e.apply(&img, &config).unwrap().pixel(0, 0);
        assert_eq!(apply(Effect::OrangeCast), [112, 106, 100]);
        assert_eq!(apply(Effect::RedCast), [118, 100, 100]);
        assert_eq!(apply(Effect::BlueCast), [100, 100, 118]);
    }

    #[test]
    fn test_brighten() {
        let img = Image::filled(3, 3, [100, 200, 250]);
        let out = Effect::Brighten.apply(&img, &EffectConfig::default()).unwrap();
        assert_eq!(out.pixel(1, 1), [115, 230, 255]);
    }

    #[test]
    fn test_empty_image_is_rejected() {
        let config = EffectConfig::default();
        for (w, h) in [(0, 0), (0, 4), (4, 0)] {
            let img = Image::new(w, h, vec![]).unwrap();
            for effect in Effect::ALL {
                assert_eq!(
                    effect.apply(&img, &config),
                    Err(EffectError::EmptyImage { width: w, height: h })
                );
            }
            assert!(portrait_retouch(&img, &NoFaces, &PortraitConfig::default()).is_err());
        }
    }

    #[test]
    fn test_single_pixel_image() {
        let img = Image::filled(1, 1, [90, 90, 90]);
        let config = EffectConfig::default();
        for effect in Effect::ALL {
            let out = effect.apply(&img, &config).unwrap();
            assert_eq!((out.width(), out.height()), (1, 1));
        }
    }

    #[test]
    fn test_names_roundtrip() {
        for effect in Effect::ALL {
            assert_eq!(effect.to_string().parse::<Effect>().unwrap(), effect);
        }
        assert_eq!("Rotate".parse::<Effect>().unwrap(), Effect::Rotate90);
        assert_eq!(" Noise_Reduction ".parse::<Effect>().unwrap(), Effect::NoiseReduction);
        assert_eq!(
            "emboss".parse::<Effect>(),
            Err(EffectError::UnknownEffect("emboss".to_string()))
        );
    }

    #[test]
    fn test_serde_names_match_display() {
        for effect in Effect::ALL {
            let json = serde_json::to_string(&effect).unwrap();
            assert_eq!(json, format!("\"{effect}\""));
        }
    }

    #[test]
    fn test_portrait_with_regions() {
        let img = gradient(8, 8);
        let faces = [Region::new(1, 1, 4, 4)];
        let out = portrait_retouch(&img, &faces[..], &PortraitConfig::default()).unwrap();
        assert_eq!((out.width(), out.height()), (8, 8));
    }
}
