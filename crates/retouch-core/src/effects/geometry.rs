//! Lossless geometric transforms: quarter-turn rotation and mirroring.
//!
//! Both transforms only move pixels, so every output sample equals some
//! input sample exactly.
//!
//! # Coordinate System
//!
//! Origin is the top-left corner, x grows to the right, y grows downward.
//! For a clockwise quarter turn of a `w` x `h` image the output is `h` x `w`
//! and
//! ```text
//! dst(x, y) = src(y, h - 1 - x)
//! ```

use super::filter::render_rows;
use crate::raster::Image;

/// Rotate the image 90 degrees clockwise. Width and height swap.
///
/// # Example
///
/// ```
/// use retouch_core::effects::rotate_90_clockwise;
/// use retouch_core::Image;
///
/// let img = Image::filled(4, 6, [1, 2, 3]);
/// let rotated = rotate_90_clockwise(&img);
/// assert_eq!((rotated.width(), rotated.height()), (6, 4));
/// ```
pub fn rotate_90_clockwise(image: &Image) -> Image {
    let (w, h) = (image.width() as usize, image.height() as usize);
    let src = image.pixels();

    // Output rows are `h` pixels wide and there are `w` of them.
    let pixels = render_rows(h * 3, w, |y, row| {
        for x in 0..h {
            let idx = ((h - 1 - x) * w + y) * 3;
            row[x * 3..x * 3 + 3].copy_from_slice(&src[idx..idx + 3]);
        }
    });

    Image::from_parts(image.height(), image.width(), pixels)
}

/// Mirror the image left to right.
pub fn flip_horizontal(image: &Image) -> Image {
    let w = image.width() as usize;
    let src = image.pixels();

    let pixels = render_rows(w * 3, image.height() as usize, |y, row| {
        let src_row = &src[image.row_offset(y)..image.row_offset(y) + w * 3];
        for (dst, px) in row.chunks_exact_mut(3).zip(src_row.chunks_exact(3).rev()) {
            dst.copy_from_slice(px);
        }
    });

    Image::from_parts(image.width(), image.height(), pixels)
}
