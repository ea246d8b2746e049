//! Non-maximum suppression: thin gradient ridges to one pixel.

use image::Luma;

use crate::gradient::{FloatImage, Gradient};

/// Keep only pixels whose magnitude is a local maximum along the
/// gradient direction.
///
/// The orientation is quantized into four bins and each interior pixel is
/// compared with its two neighbours across the edge:
///
/// | angle (degrees)           | neighbours                  |
/// |---------------------------|-----------------------------|
/// | `[0, 22.5)`, `[157.5, 180]` | `(x+1, y)`, `(x-1, y)`     |
/// | `[22.5, 67.5)`            | `(x-1, y+1)`, `(x+1, y-1)`  |
/// | `[67.5, 112.5)`           | `(x, y+1)`, `(x, y-1)`      |
/// | `[112.5, 157.5)`          | `(x-1, y-1)`, `(x+1, y+1)`  |
///
/// Ties keep the pixel, so a two-pixel-wide ridge of equal magnitude
/// survives on both sides. Border pixels are always zero.
#[must_use]
pub fn non_maximum_suppression(gradient: &Gradient) -> FloatImage {
    let mag = &gradient.magnitude;
    let (width, height) = mag.dimensions();
    let mut out = FloatImage::new(width, height);

    for y in 1..height.saturating_sub(1) {
        for x in 1..width.saturating_sub(1) {
            let angle = gradient.angle.get_pixel(x, y).0[0];
            let m = mag.get_pixel(x, y).0[0];
            let at = |x: u32, y: u32| mag.get_pixel(x, y).0[0];

            let (q, r) = if !(22.5..157.5).contains(&angle) {
                (at(x + 1, y), at(x - 1, y))
            } else if angle < 67.5 {
                (at(x - 1, y + 1), at(x + 1, y - 1))
            } else if angle < 112.5 {
                (at(x, y + 1), at(x, y - 1))
            } else {
                (at(x - 1, y - 1), at(x + 1, y + 1))
            };

            if m >= q && m >= r {
                out.put_pixel(x, y, Luma([m]));
            }
        }
    }

    out
}
