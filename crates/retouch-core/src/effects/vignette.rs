//! Radial vignette: darken toward the corners.
//!
//! Pixel coordinates are normalized to `[-1, 1]` on both axes (a single
//! row or column maps to 0). The distance from the center, scaled so the
//! corners sit at 1, drives a linear falloff:
//! ```text
//! falloff = clamp(1 - dist / sqrt(2), 0, 1)
//! weight  = floor + strength * falloff
//! ```
//! With the stock config the center keeps its value and the corners drop
//! to 60%.

use std::f32::consts::SQRT_2;

use super::filter::render_rows;
use crate::config::VignetteConfig;
use crate::raster::Image;

/// Normalize a pixel index to `[-1, 1]` across an axis of `len` pixels.
#[inline]
fn normalized(i: usize, len: usize) -> f32 {
    if len <= 1 {
        0.0
    } else {
        -1.0 + 2.0 * i as f32 / (len - 1) as f32
    }
}

/// Per-pixel multiplier at (x, y).
#[inline]
pub fn vignette_weight(x: usize, y: usize, width: usize, height: usize, config: &VignetteConfig) -> f32 {
    let nx = normalized(x, width);
    let ny = normalized(y, height);
    let dist = (nx * nx + ny * ny).sqrt();
    let falloff = (1.0 - dist / SQRT_2).clamp(0.0, 1.0);
    config.floor + config.strength * falloff
}

pub fn vignette(image: &Image, config: &VignetteConfig) -> Image {
    let (w, h) = (image.width() as usize, image.height() as usize);
    let src = image.pixels();

    let pixels = render_rows(w * 3, h, |y, row| {
        let src_row = &src[image.row_offset(y)..image.row_offset(y) + w * 3];
        for (x, (dst, px)) in row.chunks_exact_mut(3).zip(src_row.chunks_exact(3)).enumerate() {
            let weight = vignette_weight(x, y, w, h, config);
            for c in 0..3 {
                dst[c] = (px[c] as f32 * weight).round().clamp(0.0, 255.0) as u8;
            }
        }
    });

    Image::from_parts(image.width(), image.height(), pixels)
}
