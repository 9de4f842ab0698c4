//! Per-pixel color operators: casts, brightening, channel gains and auto
//! enhance.

use tracing::trace;

use crate::config::AutoEnhanceConfig;
use crate::histogram::analyze;
use crate::raster::Image;

#[inline]
fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Apply `f` to every pixel, keeping the dimensions.
fn map_pixels<F>(image: &Image, f: F) -> Image
where
    F: Fn([u8; 3]) -> [u8; 3],
{
    let pixels = image
        .pixels()
        .chunks_exact(3)
        .flat_map(|p| f([p[0], p[1], p[2]]))
        .collect();
    Image::from_parts(image.width(), image.height(), pixels)
}

/// Add a fixed `[r, g, b]` offset, saturating at 255.
pub fn color_cast(image: &Image, offsets: [u8; 3]) -> Image {
    map_pixels(image, |p| {
        [
            p[0].saturating_add(offsets[0]),
            p[1].saturating_add(offsets[1]),
            p[2].saturating_add(offsets[2]),
        ]
    })
}

/// Multiply every channel by `factor`.
pub fn scale(image: &Image, factor: f32) -> Image {
    scale_channels(image, [factor; 3])
}

/// Multiply each channel by its own gain.
pub fn scale_channels(image: &Image, gains: [f32; 3]) -> Image {
    map_pixels(image, |p| {
        [
            to_u8(p[0] as f32 * gains[0]),
            to_u8(p[1] as f32 * gains[1]),
            to_u8(p[2] as f32 * gains[2]),
        ]
    })
}

/// Slight contrast boost around the image's mean luma, then a slight brighten.
///
/// Each stage clamps to 0-255 before the next one runs.
pub fn auto_enhance(image: &Image, config: &AutoEnhanceConfig) -> Image {
    let mean = analyze(image).mean_luma();
    trace!(mean, "auto_enhance");

    let stage = |v: u8| {
        let contrasted = (mean + (v as f32 - mean) * config.contrast).clamp(0.0, 255.0);
        to_u8(contrasted * config.brightness)
    };
    map_pixels(image, |p| [stage(p[0]), stage(p[1]), stage(p[2])])
}
