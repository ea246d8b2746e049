//! gridgo-export: Pure format serializers (sans-IO)
//!
//! Converts mazes (and optionally a solver trace) into output formats.
//! Currently supports SVG documents and PNG rasters.

pub mod raster;
pub mod svg;

pub use raster::{RenderOptions, render, to_png};
pub use self::svg::{SvgMetadata, to_svg};

/// Annotation at or above which a wall is drawn black.
pub const STRUCTURAL_WEIGHT: i32 = 1000;

/// Errors that can occur while exporting a maze.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The cell size must be at least one pixel.
    #[error("cell size must be at least 1 pixel")]
    InvalidCellSize,

    /// The raster would be empty or too large to allocate.
    #[error("cannot allocate a {width}x{height} canvas")]
    Canvas {
        /// Requested width in pixels.
        width: u64,
        /// Requested height in pixels.
        height: u64,
    },

    /// PNG encoding failed.
    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
}

/// RGB shade of a wall with the given annotation.
///
/// Structural walls (`>= STRUCTURAL_WEIGHT`) are black; everything else
/// is a light gray that varies slightly with the weight.
#[must_use]
pub fn wall_color(weight: i32) -> [u8; 3] {
    if weight >= STRUCTURAL_WEIGHT {
        return [0, 0, 0];
    }
    // rem_euclid keeps the shade in 201..=230 for negative weights too.
    let shade = u8::try_from(230 - weight.rem_euclid(30)).unwrap_or(230);
    [shade; 3]
}
