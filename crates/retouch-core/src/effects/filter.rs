//! Convolution and edge-preserving filters used by the effect operators.
//!
//! # Filters
//!
//! - [`Kernel::smooth`] + [`convolve`] / [`clarity`] - 3x3 smoothing and local contrast
//! - [`gaussian_blur`] / [`unsharp_mask`] - Sharpen effect
//! - [`bilateral`] - Noise reduction and portrait skin smoothing
//!
//! The heavy filters fill their output one row at a time; with the
//! `parallel` feature enabled the rows are distributed over the rayon pool.
//! Each row depends only on the source buffer, so the output is identical
//! with and without the feature.

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::trace;

use crate::config::{BilateralConfig, SharpenConfig};
use crate::raster::{Image, Region};

/// Allocate `row_len * height` samples and fill them row by row.
pub(crate) fn render_rows<T, F>(row_len: usize, height: usize, fill_row: F) -> Vec<T>
where
    T: Copy + Default + Send,
    F: Fn(usize, &mut [T]) + Sync,
{
    let mut out = vec![T::default(); row_len * height];
    if row_len == 0 {
        return out;
    }

    #[cfg(feature = "parallel")]
    out.par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| fill_row(y, row));

    #[cfg(not(feature = "parallel"))]
    out.chunks_mut(row_len)
        .enumerate()
        .for_each(|(y, row)| fill_row(y, row));

    out
}

#[inline]
fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Square convolution kernel for image filtering.
#[derive(Debug, Clone)]
pub struct Kernel {
    /// Kernel weights, row-major.
    pub data: Vec<f32>,
    /// Kernel width and height (odd).
    pub size: usize,
}

impl Kernel {
    /// The classic 3x3 smoothing kernel: center weight 5, neighbors 1, sum 13.
    pub fn smooth() -> Self {
        let data = [1.0, 1.0, 1.0, 1.0, 5.0, 1.0, 1.0, 1.0, 1.0]
            .iter()
            .map(|w| w / 13.0)
            .collect();
        Self { data, size: 3 }
    }

    /// Half-width of the kernel.
    pub fn radius(&self) -> usize {
        self.size / 2
    }
}

/// Convolve an image with a square kernel.
///
/// Pixels closer to the border than the kernel radius are copied unchanged.
pub fn convolve(image: &Image, kernel: &Kernel) -> Image {
    let (w, h) = (image.width() as usize, image.height() as usize);
    let r = kernel.radius();
    let src = image.pixels();
    trace!(width = w, height = h, kernel = kernel.size, "convolve");

    let pixels = render_rows(w * 3, h, |y, row| {
        let src_row = &src[image.row_offset(y)..image.row_offset(y) + w * 3];
        for x in 0..w {
            let out = &mut row[x * 3..x * 3 + 3];
            if x < r || y < r || x + r >= w || y + r >= h {
                out.copy_from_slice(&src_row[x * 3..x * 3 + 3]);
                continue;
            }

            let mut sums = [0.0f32; 3];
            for ky in 0..kernel.size {
                let sy = y + ky - r;
                for kx in 0..kernel.size {
                    let sx = x + kx - r;
                    let idx = (sy * w + sx) * 3;
                    let kw = kernel.data[ky * kernel.size + kx];
                    for c in 0..3 {
                        sums[c] += src[idx + c] as f32 * kw;
                    }
                }
            }
            for c in 0..3 {
                out[c] = to_u8(sums[c]);
            }
        }
    });

    Image::from_parts(image.width(), image.height(), pixels)
}

/// Local contrast boost: push each pixel away from its 3x3 smoothed value.
///
/// `out = smooth + (in - smooth) * factor`. Border pixels have no smoothed
/// counterpart and come back unchanged.
pub fn clarity(image: &Image, factor: f32) -> Image {
    let smooth = convolve(image, &Kernel::smooth());
    let pixels = smooth
        .pixels()
        .iter()
        .zip(image.pixels())
        .map(|(&s, &v)| {
            let s = s as f32;
            to_u8(s + (v as f32 - s) * factor)
        })
        .collect();
    Image::from_parts(image.width(), image.height(), pixels)
}

/// Normalized 1-D Gaussian weights covering three standard deviations.
fn gaussian_weights(sigma: f32) -> Vec<f32> {
    let radius = (3.0 * sigma).ceil().max(1.0) as i32;
    let two_sigma_sq = 2.0 * sigma * sigma;
    let weights: Vec<f32> = (-radius..=radius)
        .map(|i| (-((i * i) as f32) / two_sigma_sq).exp())
        .collect();
    let sum: f32 = weights.iter().sum();
    weights.into_iter().map(|w| w / sum).collect()
}

/// Separable Gaussian blur with edge clamping, returned as unrounded floats.
pub fn gaussian_blur(image: &Image, sigma: f32) -> Vec<f32> {
    let (w, h) = (image.width() as usize, image.height() as usize);
    let src = image.pixels();
    if sigma <= 0.0 {
        return src.iter().map(|&v| v as f32).collect();
    }

    let weights = gaussian_weights(sigma);
    let radius = (weights.len() / 2) as isize;
    trace!(width = w, height = h, sigma, taps = weights.len(), "gaussian_blur");

    let horizontal = render_rows(w * 3, h, |y, row| {
        let base = y * w * 3;
        for x in 0..w {
            let mut sums = [0.0f32; 3];
            for (k, weight) in weights.iter().enumerate() {
                let sx = (x as isize + k as isize - radius).clamp(0, w as isize - 1) as usize;
                for c in 0..3 {
                    sums[c] += src[base + sx * 3 + c] as f32 * weight;
                }
            }
            row[x * 3..x * 3 + 3].copy_from_slice(&sums);
        }
    });

    render_rows(w * 3, h, |y, row| {
        for (k, weight) in weights.iter().enumerate() {
            let sy = (y as isize + k as isize - radius).clamp(0, h as isize - 1) as usize;
            let src_row = &horizontal[sy * w * 3..(sy + 1) * w * 3];
            for (acc, &v) in row.iter_mut().zip(src_row) {
                *acc += v * weight;
            }
        }
    })
}

/// Unsharp mask: add back the difference between the image and its blur.
///
/// A sample changes only when it differs from its blurred value by more than
/// `threshold`, which keeps flat areas and fine noise untouched.
pub fn unsharp_mask(image: &Image, config: &SharpenConfig) -> Image {
    let (w, h) = (image.width() as usize, image.height() as usize);
    let blurred = gaussian_blur(image, config.radius);
    let src = image.pixels();
    let threshold = config.threshold as i32;

    let pixels = render_rows(w * 3, h, |y, row| {
        let base = y * w * 3;
        for (i, out) in row.iter_mut().enumerate() {
            let s = src[base + i] as i32;
            let diff = s - blurred[base + i].round() as i32;
            *out = if diff.abs() > threshold {
                to_u8(s as f32 + diff as f32 * config.amount)
            } else {
                s as u8
            };
        }
    });

    Image::from_parts(image.width(), image.height(), pixels)
}

/// Bilateral filter over a whole image.
pub fn bilateral(image: &Image, config: &BilateralConfig) -> Image {
    let pixels = bilateral_region(image.pixels(), image.width(), Region::full(image), config);
    Image::from_parts(image.width(), image.height(), pixels)
}

/// Bilateral filter restricted to `region` of an RGB buffer `width` pixels wide.
///
/// Only pixels inside the region are read: the window is clamped to the
/// region edges. Returns the region's filtered pixels, row-major. The region
/// must lie inside the buffer.
///
/// Each neighbor within a circular window of `config.radius` is weighted by
/// `exp(-d²/2σs²) * exp(-Δ²/2σc²)`, where `d` is the spatial distance and `Δ`
/// the sum of absolute channel differences to the center pixel.
pub(crate) fn bilateral_region(
    pixels: &[u8],
    width: u32,
    region: Region,
    config: &BilateralConfig,
) -> Vec<u8> {
    let stride = width as usize * 3;
    let (rx, ry) = (region.x as usize, region.y as usize);
    let (rw, rh) = (region.width as usize, region.height as usize);
    let radius = config.radius as i32;
    trace!(x = rx, y = ry, width = rw, height = rh, radius, "bilateral");

    let sigma_space = config.sigma_space.max(f32::EPSILON);
    let sigma_color = config.sigma_color.max(f32::EPSILON);

    let window: Vec<(isize, isize, f32)> = (-radius..=radius)
        .flat_map(|dy| (-radius..=radius).map(move |dx| (dx, dy)))
        .filter(|&(dx, dy)| dx * dx + dy * dy <= radius * radius)
        .map(|(dx, dy)| {
            let dist_sq = (dx * dx + dy * dy) as f32;
            let weight = (-dist_sq / (2.0 * sigma_space * sigma_space)).exp();
            (dx as isize, dy as isize, weight)
        })
        .collect();

    // Indexed by the L1 color distance, 0..=765.
    let color_weights: Vec<f32> = (0..=765)
        .map(|d| {
            let d = d as f32;
            (-(d * d) / (2.0 * sigma_color * sigma_color)).exp()
        })
        .collect();

    render_rows(rw * 3, rh, |y, row| {
        for x in 0..rw {
            let center = (ry + y) * stride + (rx + x) * 3;
            let c = &pixels[center..center + 3];

            let mut sums = [0.0f32; 3];
            let mut weight_sum = 0.0f32;
            for &(dx, dy, spatial) in &window {
                let sx = (x as isize + dx).clamp(0, rw as isize - 1) as usize + rx;
                let sy = (y as isize + dy).clamp(0, rh as isize - 1) as usize + ry;
                let idx = sy * stride + sx * 3;
                let n = &pixels[idx..idx + 3];

                let distance = c
                    .iter()
                    .zip(n)
                    .map(|(&a, &b)| (a as i32 - b as i32).unsigned_abs() as usize)
                    .sum::<usize>();
                let weight = spatial * color_weights[distance];

                for ch in 0..3 {
                    sums[ch] += n[ch] as f32 * weight;
                }
                weight_sum += weight;
            }

            for ch in 0..3 {
                row[x * 3 + ch] = to_u8(sums[ch] / weight_sum);
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_edge() -> Image {
        // 6x3 image: left half dark, right half bright
        let row = [50u8, 50, 50, 200, 200, 200];
        let pixels = (0..3)
            .flat_map(|_| row.iter().flat_map(|&v| [v, v, v]))
            .collect();
        Image::new(6, 3, pixels).unwrap()
    }

    #[test]
    fn test_smooth_kernel_is_normalized() {
        let k = Kernel::smooth();
        assert_eq!(k.radius(), 1);
        let sum: f32 = k.data.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_convolve_flat_image_unchanged() {
        let img = Image::filled(5, 5, [90, 140, 200]);
        assert_eq!(convolve(&img, &Kernel::smooth()), img);
    }

    #[test]
    fn test_convolve_keeps_border() {
        let mut pixels = vec![0u8; 3 * 3 * 3];
        pixels[4 * 3] = 130; // center red
        let img = Image::new(3, 3, pixels).unwrap();
        let out = convolve(&img, &Kernel::smooth());
        // center: 130 * 5/13 = 50
        assert_eq!(out.pixel(1, 1), [50, 0, 0]);
        assert_eq!(out.pixel(0, 0), [0, 0, 0]);
    }

    #[test]
    fn test_clarity_pushes_away_from_smooth() {
        let mut pixels = vec![100u8; 3 * 3 * 3];
        pixels[4 * 3..4 * 3 + 3].copy_from_slice(&[139, 139, 139]);
        let img = Image::new(3, 3, pixels).unwrap();
        let out = clarity(&img, 1.2);
        // smooth = (8 * 100 + 5 * 139) / 13 = 115; 115 + 24 * 1.2 = 143.8
        assert_eq!(out.pixel(1, 1), [144, 144, 144]);
        assert_eq!(out.pixel(0, 0), [100, 100, 100]);
    }

    #[test]
    fn test_clarity_flat_image_unchanged() {
        let img = Image::filled(6, 4, [30, 60, 90]);
        assert_eq!(clarity(&img, 1.2), img);
    }

    #[test]
    fn test_gaussian_weights_normalized() {
        for sigma in [0.5f32, 1.0, 2.5] {
            let weights = gaussian_weights(sigma);
            assert_eq!(weights.len() % 2, 1);
            let sum: f32 = weights.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_gaussian_blur_zero_sigma_is_copy() {
        let img = step_edge();
        let out = gaussian_blur(&img, 0.0);
        assert_eq!(out[9], 200.0);
    }

    #[test]
    fn test_unsharp_flat_image_unchanged() {
        let img = Image::filled(8, 8, [100, 150, 200]);
        assert_eq!(unsharp_mask(&img, &SharpenConfig::default()), img);
    }

    #[test]
    fn test_unsharp_increases_edge_contrast() {
        let out = unsharp_mask(&step_edge(), &SharpenConfig::default());
        assert!(out.pixel(2, 1)[0] < 50, "dark side of edge should darken");
        assert!(out.pixel(3, 1)[0] > 200, "bright side of edge should brighten");
        // far from the edge nothing changes
        assert_eq!(out.pixel(0, 1)[0], 50);
    }

    #[test]
    fn test_unsharp_threshold_protects_small_detail() {
        let mut pixels = vec![100u8; 5 * 5 * 3];
        pixels[12 * 3] = 102;
        let img = Image::new(5, 5, pixels).unwrap();
        assert_eq!(unsharp_mask(&img, &SharpenConfig::default()), img);
    }

    #[test]
    fn test_bilateral_flat_image_unchanged() {
        let img = Image::filled(7, 5, [12, 34, 56]);
        assert_eq!(bilateral(&img, &BilateralConfig::default()), img);
    }

    #[test]
    fn test_bilateral_preserves_strong_edge() {
        let pixels = (0..4)
            .flat_map(|_| [0u8, 0, 0, 0, 0, 0, 255, 255, 255, 255, 255, 255])
            .collect();
        let img = Image::new(4, 4, pixels).unwrap();
        assert_eq!(bilateral(&img, &BilateralConfig::default()), img);
    }

    #[test]
    fn test_bilateral_smooths_small_noise() {
        let mut pixels = vec![120u8; 5 * 5 * 3];
        pixels[12 * 3..12 * 3 + 3].copy_from_slice(&[140, 140, 140]);
        let img = Image::new(5, 5, pixels).unwrap();
        let out = bilateral(&img, &BilateralConfig::default());
        let center = out.pixel(2, 2)[0];
        assert!(center < 140 && center >= 120, "center should move toward neighbors, got {}", center);
    }

    #[test]
    fn test_bilateral_region_reads_only_region() {
        // left column bright, rest dark; a region excluding the bright column
        // must come back unchanged
        let mut pixels = vec![10u8; 4 * 4 * 3];
        for y in 0..4 {
            pixels[y * 12..y * 12 + 3].copy_from_slice(&[60, 60, 60]);
        }
        let region = Region::new(1, 0, 3, 4);
        let out = bilateral_region(&pixels, 4, region, &BilateralConfig::default());
        assert_eq!(out, vec![10u8; 3 * 4 * 3]);
    }

    #[test]
    fn test_render_rows_order() {
        let out: Vec<u8> = render_rows(2, 3, |y, row| row.fill(y as u8));
        assert_eq!(out, vec![0, 0, 1, 1, 2, 2]);
    }
}
