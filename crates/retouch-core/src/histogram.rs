//! Histogram computation from RGB images.
//!
//! Produces exact per-pixel counts for the red, green, blue and luma
//! channels, used for the histogram display next to the preview.

use crate::luminance::luma_u8;
use crate::raster::Image;
use crate::Histogram;

/// Compute RGB and luma histograms of an image.
///
/// The luma bin of each pixel is its BT.709 luma rounded down.
///
/// # Example
/// ```
/// use retouch_core::{histogram::analyze, Image};
///
/// let image = Image::new(2, 1, vec![255, 0, 0, 0, 255, 0]).unwrap();
/// let hist = analyze(&image);
/// assert_eq!(hist.red[255], 1);
/// assert_eq!(hist.green[255], 1);
/// assert_eq!(hist.total, 2);
/// ```
///
/// # Performance
/// Single pass, O(n) in the number of pixels; the bins take 4KB.
pub fn analyze(image: &Image) -> Histogram {
    compute_histogram(image.pixels())
}

/// Compute histograms from a raw RGB buffer (3 bytes per pixel).
///
/// A trailing partial pixel is ignored.
pub fn compute_histogram(pixels: &[u8]) -> Histogram {
    let mut hist = Histogram::new();

    for chunk in pixels.chunks_exact(3) {
        let (r, g, b) = (chunk[0], chunk[1], chunk[2]);

        hist.red[r as usize] += 1;
        hist.green[g as usize] += 1;
        hist.blue[b as usize] += 1;
        hist.luminance[luma_u8(r, g, b) as usize] += 1;
        hist.total += 1;
    }

    hist
}
