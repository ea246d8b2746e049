//! Image-to-edge-weight pipeline.
//!
//! Turns a source image into an [`EdgeWeights`] map that biases Kruskal
//! generation toward keeping walls along the image's outline:
//!
//! 1. Luminance conversion ([`grayscale`](crate::grayscale))
//! 2. Sobel gradient ([`gradient`](crate::gradient))
//! 3. Non-maximum suppression ([`suppress`](crate::suppress))
//! 4. Nearest-pixel sampling, one pixel per cell
//! 5. Dual-threshold classification into structural and supporting edges
//!
//! Structural cells get a heavy weight on their `top` and `left` faces,
//! supporting cells a moderate weight on `top` only. Heavy edges sort last
//! in Kruskal, so they are the walls most likely to survive.

use std::path::Path;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::gradient::{FloatImage, sobel};
use crate::grayscale::{decode, luminance};
use crate::suppress::non_maximum_suppression;
use crate::types::{DimensionLimits, Direction, EngineError, VisionConfig};
use crate::weights::{EdgeKey, EdgeWeights};

/// Counts gathered while running the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VisionReport {
    /// Source image width in pixels.
    pub width: u32,
    /// Source image height in pixels.
    pub height: u32,
    /// Cells classified as structural edges.
    pub strong_cells: usize,
    /// Cells classified as supporting edges.
    pub weak_cells: usize,
}

/// Output of [`analyze`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisionAnalysis {
    /// The sparse weight map.
    pub weights: EdgeWeights,
    /// Per-stage counts.
    pub report: VisionReport,
}

/// Run the pipeline on a decoded image and return the weight map.
///
/// # Errors
///
/// See [`analyze`].
pub fn edge_weights(
    img: &DynamicImage,
    rows: usize,
    cols: usize,
    config: &VisionConfig,
) -> Result<EdgeWeights, EngineError> {
    analyze(img, rows, cols, config).map(|a| a.weights)
}

/// Decode image bytes and run the pipeline.
///
/// # Errors
///
/// Returns [`EngineError::EmptyInput`] or [`EngineError::ImageDecode`] if
/// the bytes cannot be decoded, plus anything [`analyze`] returns.
pub fn analyze_bytes(
    bytes: &[u8],
    rows: usize,
    cols: usize,
    config: &VisionConfig,
) -> Result<VisionAnalysis, EngineError> {
    let img = decode(bytes)?;
    analyze(&img, rows, cols, config)
}

/// Read an image file and run the pipeline.
///
/// # Errors
///
/// Returns [`EngineError::Io`] if the file cannot be read, plus anything
/// [`analyze_bytes`] returns.
pub fn analyze_path(
    path: impl AsRef<Path>,
    rows: usize,
    cols: usize,
    config: &VisionConfig,
) -> Result<VisionAnalysis, EngineError> {
    let bytes = std::fs::read(path)?;
    analyze_bytes(&bytes, rows, cols, config)
}

/// Run every stage and keep the per-stage counts.
///
/// Deterministic: the same image, grid and config always give the same
/// map.
///
/// # Errors
///
/// Returns [`EngineError::InvalidConfig`] if `config` is invalid,
/// [`EngineError::InvalidDimensions`] if the grid holds fewer than two
/// cells, and [`EngineError::EmptyInput`] for a zero-sized image.
pub fn analyze(
    img: &DynamicImage,
    rows: usize,
    cols: usize,
    config: &VisionConfig,
) -> Result<VisionAnalysis, EngineError> {
    config.validate()?;
    DimensionLimits::UNBOUNDED.check(rows, cols)?;
    if img.width() == 0 || img.height() == 0 {
        return Err(EngineError::EmptyInput);
    }

    let gray = luminance(img);
    let thinned = non_maximum_suppression(&sobel(&gray));
    let (weights, strong_cells, weak_cells) = classify(&thinned, rows, cols, config);

    let report = VisionReport {
        width: gray.width(),
        height: gray.height(),
        strong_cells,
        weak_cells,
    };
    tracing::debug!(
        width = report.width,
        height = report.height,
        strong = strong_cells,
        weak = weak_cells,
        entries = weights.len(),
        "vision pipeline complete"
    );
    Ok(VisionAnalysis { weights, report })
}

/// Pixel sampled for cell `(row, col)`: `(col*width/cols, row*height/rows)`.
///
/// Callers guarantee `row < rows`, `col < cols` and a non-empty image.
fn sample_pixel(
    row: usize,
    col: usize,
    rows: usize,
    cols: usize,
    width: u32,
    height: u32,
) -> (u32, u32) {
    let scale = |i: usize, extent: u32, n: usize| {
        // i < n, so the quotient is below `extent`.
        u32::try_from(i as u64 * u64::from(extent) / n as u64)
            .unwrap_or_else(|_| extent.saturating_sub(1))
    };
    (scale(col, width, cols), scale(row, height, rows))
}

/// Sample one pixel per cell and apply the dual thresholds.
fn classify(
    thinned: &FloatImage,
    rows: usize,
    cols: usize,
    config: &VisionConfig,
) -> (EdgeWeights, usize, usize) {
    let (width, height) = thinned.dimensions();
    let mut weights = EdgeWeights::new();
    let (mut strong, mut weak) = (0, 0);

    for r in 0..rows {
        for c in 0..cols {
            let (x, y) = sample_pixel(r, c, rows, cols, width, height);
            let mag = thinned.get_pixel(x, y).0[0];
            if mag >= config.high_threshold {
                weights.insert(EdgeKey::new(r, c, Direction::Top), config.strong_weight);
                weights.insert(EdgeKey::new(r, c, Direction::Left), config.strong_weight);
                strong += 1;
            } else if mag >= config.low_threshold {
                weights.insert(EdgeKey::new(r, c, Direction::Top), config.weak_weight);
                weak += 1;
            }
        }
    }

    (weights, strong, weak)
}
