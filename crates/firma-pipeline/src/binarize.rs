//! Ink/background segmentation.
//!
//! A single global cut turns the grayscale scan into an ink mask
//! (ink = 255, background = 0). Masks are produced at two resolutions:
//! the native one for true-size measurements and a fixed analysis
//! canvas so shape-sensitive features are computed on comparable grids
//! regardless of scan resolution. The analysis mask is reduced from the
//! native mask, never thresholded after resampling, so it has ink
//! wherever the native mask does.

use std::ops::Range;

use image::GrayImage;

/// Pixel value marking ink in a mask.
pub const INK: u8 = 255;

/// Threshold a grayscale image into an ink mask.
///
/// Pixels at or below `threshold` become [`INK`]; brighter pixels become
/// background. An empty image yields an empty mask.
#[must_use = "returns the ink mask"]
pub fn binarize(gray: &GrayImage, threshold: u8) -> GrayImage {
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        if gray.get_pixel(x, y).0[0] <= threshold {
            image::Luma([INK])
        } else {
            image::Luma([0])
        }
    })
}

/// Source pixels covered by target pixel `t` along one axis.
///
/// Never empty, so upscaling repeats source pixels.
fn footprint(t: u32, target: u32, source: u32) -> Range<u32> {
    let (t, target_len, source_len) = (u64::from(t), u64::from(target), u64::from(source));
    let start = t * source_len / target_len;
    let end = ((t + 1) * source_len).div_ceil(target_len).max(start + 1);
    let clamp = |v: u64| u32::try_from(v.min(source_len)).unwrap_or(source);
    clamp(start)..clamp(end)
}

/// Resample an ink mask to `width` x `height`.
///
/// A target pixel is ink if any source pixel it covers is ink. Strokes
/// thinner than the downscale factor survive instead of being averaged
/// away. Empty masks are returned unchanged.
#[must_use = "returns the resampled mask"]
pub fn resample_mask(mask: &GrayImage, width: u32, height: u32) -> GrayImage {
    if mask.width() == 0 || mask.height() == 0 || width == 0 || height == 0 {
        return mask.clone();
    }
    GrayImage::from_fn(width, height, |tx, ty| {
        let xs = footprint(tx, width, mask.width());
        let any_ink = footprint(ty, height, mask.height())
            .any(|y| xs.clone().any(|x| mask.get_pixel(x, y).0[0] == INK));
        image::Luma([if any_ink { INK } else { 0 }])
    })
}

/// Threshold at native resolution, then reduce to the analysis canvas.
#[must_use = "returns the analysis mask"]
pub fn analysis_mask(gray: &GrayImage, width: u32, height: u32, threshold: u8) -> GrayImage {
    resample_mask(&binarize(gray, threshold), width, height)
}

/// Number of ink pixels in a mask.
#[must_use]
pub fn ink_pixel_count(mask: &GrayImage) -> u64 {
    mask.pixels().map(|p| u64::from(p.0[0] == INK)).sum()
}
