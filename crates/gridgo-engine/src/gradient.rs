//! Sobel gradient magnitude and orientation.

use image::{GrayImage, ImageBuffer, Luma};
use imageproc::definitions::Image;
use imageproc::filter::filter_clamped;
use imageproc::kernel;

/// Single-channel `f64` raster.
pub type FloatImage = ImageBuffer<Luma<f64>, Vec<f64>>;

/// Per-pixel gradient of a grayscale image.
#[derive(Debug, Clone)]
pub struct Gradient {
    /// `sqrt(gx² + gy²)`.
    pub magnitude: FloatImage,
    /// `atan2(gy, gx)` in degrees, normalized to `[0, 180)`.
    pub angle: FloatImage,
}

/// Apply 3×3 Sobel kernels and keep the interior.
///
/// The one-pixel border stays zero in both outputs, as does the whole
/// image if either side is shorter than three pixels. `i16` responses
/// are exact for 8-bit input (`|g| <= 1020`).
#[must_use]
pub fn sobel(gray: &GrayImage) -> Gradient {
    let (width, height) = gray.dimensions();
    let gx: Image<Luma<i16>> = filter_clamped(gray, kernel::SOBEL_HORIZONTAL_3X3);
    let gy: Image<Luma<i16>> = filter_clamped(gray, kernel::SOBEL_VERTICAL_3X3);

    let mut magnitude = FloatImage::new(width, height);
    let mut angle = FloatImage::new(width, height);
    for y in 1..height.saturating_sub(1) {
        for x in 1..width.saturating_sub(1) {
            let h = f64::from(gx.get_pixel(x, y).0[0]);
            let v = f64::from(gy.get_pixel(x, y).0[0]);
            magnitude.put_pixel(x, y, Luma([h.hypot(v)]));
            angle.put_pixel(x, y, Luma([(v.atan2(h).to_degrees() + 180.0) % 180.0]));
        }
    }

    Gradient { magnitude, angle }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertical_step(width: u32, height: u32, split: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, _| Luma([if x < split { 0 } else { 255 }]))
    }

    #[test]
    fn flat_image_has_no_gradient() {
        let gray = GrayImage::from_pixel(8, 8, Luma([200]));
        let g = sobel(&gray);
        assert!(g.magnitude.pixels().all(|p| p.0[0] == 0.0));
    }

    #[test]
    fn border_stays_zero() {
        let gray = GrayImage::from_fn(6, 6, |x, y| Luma([u8::try_from((x * 37 + y * 11) % 256).unwrap_or(0)]));
        let g = sobel(&gray);
        for i in 0..6 {
            assert_eq!(g.magnitude.get_pixel(0, i).0[0], 0.0);
            assert_eq!(g.magnitude.get_pixel(5, i).0[0], 0.0);
            assert_eq!(g.magnitude.get_pixel(i, 0).0[0], 0.0);
            assert_eq!(g.magnitude.get_pixel(i, 5).0[0], 0.0);
        }
    }

    #[test]
    fn vertical_step_magnitude_and_angle() {
        let g = sobel(&vertical_step(6, 5, 3));
        // Columns 2 and 3 straddle the step: gx = 4 * 255.
        for x in [2, 3] {
            assert!((g.magnitude.get_pixel(x, 2).0[0] - 1020.0).abs() < 1e-9);
            assert!(g.angle.get_pixel(x, 2).0[0].abs() < 1e-9);
        }
        assert_eq!(g.magnitude.get_pixel(1, 2).0[0], 0.0);
        assert_eq!(g.magnitude.get_pixel(4, 2).0[0], 0.0);
    }

    #[test]
    fn horizontal_step_points_down() {
        let gray = GrayImage::from_fn(5, 6, |_, y| Luma([if y < 3 { 0 } else { 255 }]));
        let g = sobel(&gray);
        assert!((g.magnitude.get_pixel(2, 2).0[0] - 1020.0).abs() < 1e-9);
        assert!((g.angle.get_pixel(2, 2).0[0] - 90.0).abs() < 1e-9);
    }

    #[test]
    fn negative_gradient_folds_into_half_circle() {
        // Bright on the left: gx is negative, atan2 gives 180 degrees.
        let gray = GrayImage::from_fn(6, 5, |x, _| Luma([if x < 3 { 255 } else { 0 }]));
        let g = sobel(&gray);
        let a = g.angle.get_pixel(2, 2).0[0];
        assert!((0.0..180.0).contains(&a));
        assert!(a.abs() < 1e-9);
    }

    #[test]
    fn tiny_images_are_all_border() {
        let g = sobel(&GrayImage::from_pixel(2, 9, Luma([9])));
        assert_eq!(g.magnitude.dimensions(), (2, 9));
        assert!(g.magnitude.pixels().all(|p| p.0[0] == 0.0));
    }
}
