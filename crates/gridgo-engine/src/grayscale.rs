//! Image decoding and luminance conversion.
//!
//! First stage of the vision pipeline: raw bytes or a decoded image in,
//! single-channel `GrayImage` out.

use image::{DynamicImage, GrayImage, Luma};

use crate::types::EngineError;

/// Decode raw image bytes (PNG, JPEG, BMP, WebP).
///
/// # Errors
///
/// Returns [`EngineError::EmptyInput`] if `bytes` is empty and
/// [`EngineError::ImageDecode`] if the data is not a supported image.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, EngineError> {
    if bytes.is_empty() {
        return Err(EngineError::EmptyInput);
    }
    Ok(image::load_from_memory(bytes)?)
}

/// Convert an image to 8-bit luminance.
///
/// Uses `0.299*R + 0.587*G + 0.114*B`, rounded. Translucent pixels are
/// composited over black first, so a transparent background reads as
/// dark. 8-bit grayscale input is returned unchanged.
#[must_use]
pub fn luminance(img: &DynamicImage) -> GrayImage {
    if let DynamicImage::ImageLuma8(gray) = img {
        return gray.clone();
    }

    let rgba = img.to_rgba8();
    GrayImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        Luma([luma(r, g, b, a)])
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn luma(r: u8, g: u8, b: u8, a: u8) -> u8 {
    let y = 0.299f64.mul_add(
        f64::from(r),
        0.587f64.mul_add(f64::from(g), 0.114 * f64::from(b)),
    );
    // Clamped to 0..=255, so the cast is exact.
    (y * f64::from(a) / 255.0).round().clamp(0.0, 255.0) as u8
}
