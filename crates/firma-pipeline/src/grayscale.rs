//! Image decoding and grayscale conversion.
//!
//! Accepts raw image bytes (PNG, JPEG, BMP, WebP, TIFF) and produces the
//! single-channel intensity grid every later stage reads. Pressure is
//! measured on this grid, so no contrast adjustment happens here.

use image::GrayImage;

use crate::types::FirmaError;

/// Decode raw image bytes and convert to grayscale.
///
/// The standard luminance formula is used for RGB-to-gray conversion.
/// Alpha is dropped; transparent scans should be flattened upstream.
///
/// # Errors
///
/// Returns [`FirmaError::EmptyInput`] if `bytes` is empty.
/// Returns [`FirmaError::ImageDecode`] if the image format is
/// unrecognized or the data is corrupt.
pub fn decode_and_grayscale(bytes: &[u8]) -> Result<GrayImage, FirmaError> {
    if bytes.is_empty() {
        return Err(FirmaError::EmptyInput);
    }

    let img = image::load_from_memory(bytes)?;
    Ok(img.to_luma8())
}
