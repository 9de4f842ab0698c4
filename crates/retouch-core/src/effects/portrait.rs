//! Portrait retouch: a global skin-tone shift plus bilateral smoothing of
//! detected face regions.
//!
//! Face detection is not part of this crate. Callers supply a
//! [`FaceLocator`], which may be a closure, a fixed slice of [`Region`]s, or
//! [`NoFaces`]. When no face is found the whole image is smoothed instead.

use tracing::{debug, warn};

use super::color::scale_channels;
use super::filter::bilateral_region;
use crate::config::PortraitConfig;
use crate::raster::{Image, Region};

/// Source of face bounding boxes for portrait retouch.
pub trait FaceLocator {
    /// Return face regions in pixel coordinates of `image`.
    fn locate(&self, image: &Image) -> Vec<Region>;
}

impl<F> FaceLocator for F
where
    F: Fn(&Image) -> Vec<Region>,
{
    fn locate(&self, image: &Image) -> Vec<Region> {
        self(image)
    }
}

impl FaceLocator for [Region] {
    fn locate(&self, _image: &Image) -> Vec<Region> {
        self.to_vec()
    }
}

/// A locator that never finds a face.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFaces;

impl FaceLocator for NoFaces {
    fn locate(&self, _image: &Image) -> Vec<Region> {
        Vec::new()
    }
}

/// Retouch a portrait.
///
/// 1. Scale the channels by `config.channel_gains` (slightly less red, more
///    green and blue).
/// 2. Ask `locator` for faces, located on the shifted image.
/// 3. For each face, clipped to the image, bilateral-smooth the region and
///    blend it back as `original_weight * shifted + (1 - original_weight) * smooth`.
///    Faces are processed in order, so an overlapping face sees the result
///    of the previous one.
/// 4. Without faces, bilateral-smooth the whole shifted image.
///
/// Faces that fall completely outside the image are skipped.
pub fn portrait_retouch<L>(image: &Image, locator: &L, config: &PortraitConfig) -> Image
where
    L: FaceLocator + ?Sized,
{
    let shifted = scale_channels(image, config.channel_gains);
    let faces = locator.locate(&shifted);
    let (width, height) = (image.width(), image.height());

    if faces.is_empty() {
        debug!("no faces located, smoothing the whole image");
        let pixels = bilateral_region(shifted.pixels(), width, Region::full(&shifted), &config.smoothing);
        return Image::from_parts(width, height, pixels);
    }

    debug!(faces = faces.len(), "smoothing face regions");
    let mut pixels = shifted.into_pixels();
    let original_weight = config.original_weight.clamp(0.0, 1.0);
    let stride = width as usize * 3;

    for face in faces {
        let region = face.clip_to(width, height);
        if !face.fits_within(width, height) {
            warn!(?face, ?region, "face region exceeds image bounds, clipping");
        }
        if region.is_empty() {
            continue;
        }

        let smooth = bilateral_region(&pixels, width, region, &config.smoothing);
        let row_len = region.width as usize * 3;
        for (ry, smooth_row) in smooth.chunks_exact(row_len).enumerate() {
            let start = (region.y as usize + ry) * stride + region.x as usize * 3;
            for (dst, &s) in pixels[start..start + row_len].iter_mut().zip(smooth_row) {
                let blended = original_weight * *dst as f32 + (1.0 - original_weight) * s as f32;
                *dst = blended.round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    Image::from_parts(width, height, pixels)
}
