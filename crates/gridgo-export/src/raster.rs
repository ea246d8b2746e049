//! Raster export via `tiny-skia`.
//!
//! Walls are drawn as one-pixel rectangles on a white background, so a
//! maze of `rows × cols` cells at `cell_size` pixels per cell produces a
//! `cols*cell_size+1 × rows*cell_size+1` image. Wall shades follow
//! [`wall_color`].

use std::io::Cursor;

use image::{ImageFormat, RgbaImage};
use tiny_skia::{Color, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform};

use gridgo_engine::{Coord, Direction, Maze, Solution};

use crate::{ExportError, wall_color};

/// Options for [`render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Pixels per cell side. Must be at least 1.
    pub cell_size: u32,
    /// Shade visited cells when a solution is given.
    pub show_visited: bool,
}

impl RenderOptions {
    /// Default pixels per cell.
    pub const DEFAULT_CELL_SIZE: u32 = 10;
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            cell_size: Self::DEFAULT_CELL_SIZE,
            show_visited: true,
        }
    }
}

fn paint(r: u8, g: u8, b: u8) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, 255);
    paint.anti_alias = false;
    paint
}

/// Canvas size for `maze`, or [`ExportError::Canvas`] if it overflows.
fn canvas_size(maze: &Maze, cell: u32) -> Result<(u32, u32), ExportError> {
    let side = |n: usize| {
        u64::try_from(n)
            .ok()
            .and_then(|n| n.checked_mul(u64::from(cell)))
            .and_then(|n| n.checked_add(1))
            .unwrap_or(u64::MAX)
    };
    let (width, height) = (side(maze.cols()), side(maze.rows()));
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(ExportError::Canvas { width, height }),
    }
}

/// Top-left pixel of a cell.
#[allow(clippy::cast_precision_loss)]
fn origin(at: Coord, cell: u32) -> (f32, f32) {
    let cell = cell as f32;
    (at.col as f32 * cell, at.row as f32 * cell)
}

/// One-pixel rectangle covering the wall on side `dir` of `at`,
/// corners included.
#[allow(clippy::cast_precision_loss)]
fn wall_rect(at: Coord, dir: Direction, cell: u32) -> Option<Rect> {
    let (x, y) = origin(at, cell);
    let len = cell as f32 + 1.0;
    match dir {
        Direction::Top => Rect::from_xywh(x, y, len, 1.0),
        Direction::Bottom => Rect::from_xywh(x, y + cell as f32, len, 1.0),
        Direction::Left => Rect::from_xywh(x, y, 1.0, len),
        Direction::Right => Rect::from_xywh(x + cell as f32, y, 1.0, len),
    }
}

/// Render a maze to an RGBA image.
///
/// Layers, bottom to top: white background, visited cells (light blue,
/// when `options.show_visited`), walls, solution path (red stroke
/// through cell centres).
///
/// # Errors
///
/// Returns [`ExportError::InvalidCellSize`] for a zero cell size and
/// [`ExportError::Canvas`] if the image cannot be allocated.
#[allow(clippy::cast_precision_loss)]
pub fn render(
    maze: &Maze,
    options: &RenderOptions,
    solution: Option<&Solution>,
) -> Result<RgbaImage, ExportError> {
    let cell = options.cell_size;
    if cell == 0 {
        return Err(ExportError::InvalidCellSize);
    }
    let (width, height) = canvas_size(maze, cell)?;
    let Some(mut pixmap) = Pixmap::new(width, height) else {
        return Err(ExportError::Canvas {
            width: width.into(),
            height: height.into(),
        });
    };
    pixmap.fill(Color::WHITE);

    if options.show_visited
        && let Some(solution) = solution
    {
        let fill = paint(219, 234, 254);
        for at in &solution.visited {
            let (x, y) = origin(*at, cell);
            if let Some(rect) = Rect::from_xywh(x, y, cell as f32, cell as f32) {
                pixmap.fill_rect(rect, &fill, Transform::identity(), None);
            }
        }
    }

    for c in maze.cells() {
        for dir in Direction::ALL {
            if !c.has_wall(dir) {
                continue;
            }
            let [r, g, b] = wall_color(c.wall_weight(dir));
            if let Some(rect) = wall_rect(c.coord(), dir, cell) {
                pixmap.fill_rect(rect, &paint(r, g, b), Transform::identity(), None);
            }
        }
    }

    if let Some(solution) = solution {
        let half = cell as f32 / 2.0;
        let mut pb = PathBuilder::new();
        if let Some((first, rest)) = solution.path.split_first() {
            let (x, y) = origin(*first, cell);
            pb.move_to(x + half, y + half);
            for at in rest {
                let (x, y) = origin(*at, cell);
                pb.line_to(x + half, y + half);
            }
        }
        // `finish` yields `None` for an empty or single-point path.
        if let Some(path) = pb.finish() {
            let stroke = Stroke {
                width: (cell as f32 / 4.0).max(1.0),
                line_cap: LineCap::Round,
                line_join: LineJoin::Round,
                ..Stroke::default()
            };
            let mut red = paint(220, 38, 38);
            red.anti_alias = true;
            pixmap.stroke_path(&path, &red, &stroke, Transform::identity(), None);
        }
    }

    // The background is opaque, so premultiplied and straight RGBA agree.
    RgbaImage::from_raw(width, height, pixmap.take()).ok_or(ExportError::Canvas {
        width: width.into(),
        height: height.into(),
    })
}

/// Render a maze and encode it as PNG.
///
/// # Errors
///
/// Same as [`render`], plus [`ExportError::Encode`] if encoding fails.
pub fn to_png(
    maze: &Maze,
    options: &RenderOptions,
    solution: Option<&Solution>,
) -> Result<Vec<u8>, ExportError> {
    let img = render(maze, options, solution)?;
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}
