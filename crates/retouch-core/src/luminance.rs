//! Luma calculation using ITU-R BT.709 coefficients.
//!
//! The same weights drive the saturation stage of the preview pipeline and
//! the luma channel of the histogram.

/// ITU-R BT.709 coefficient for red channel in luminance calculation.
pub const LUMINANCE_R: f32 = 0.2126;

/// ITU-R BT.709 coefficient for green channel in luminance calculation.
pub const LUMINANCE_G: f32 = 0.7152;

/// ITU-R BT.709 coefficient for blue channel in luminance calculation.
pub const LUMINANCE_B: f32 = 0.0722;

/// Calculate luma from RGB samples on the 0-255 scale.
///
/// # Arguments
/// * `r` - Red channel value
/// * `g` - Green channel value
/// * `b` - Blue channel value
///
/// # Returns
/// Luma on the same scale as the inputs
#[inline]
pub fn luma(r: f32, g: f32, b: f32) -> f32 {
    LUMINANCE_R * r + LUMINANCE_G * g + LUMINANCE_B * b
}

/// Calculate luma from u8 RGB values, rounded down to an integer bin.
///
/// Computed in fixed point (weights scaled by 10000) so that neutral grays
/// land exactly in their own bin.
#[inline]
pub fn luma_u8(r: u8, g: u8, b: u8) -> u8 {
    let scaled = 2126 * r as u32 + 7152 * g as u32 + 722 * b as u32;
    (scaled / 10_000) as u8
}
