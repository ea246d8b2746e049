//! SVG export serializer.
//!
//! Converts a maze into an SVG string using the [`svg`] crate for
//! document construction and XML escaping. Each present wall becomes a
//! `<line>` whose stroke shade follows its annotation (see
//! [`wall_color`]). A solver trace, when given, adds one `<rect>` per
//! visited cell under the walls and a `<path>` through the solution.
//!
//! Optional [`SvgMetadata`] embeds `<title>` and `<desc>` elements.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use svg::Document;
use svg::node::Text;
use svg::node::element::path::Data;
use svg::node::element::{Circle, Description, Group, Line, Path, Rectangle, Title};

use gridgo_engine::{Coord, Direction, Maze, Solution};

use crate::wall_color;

/// Side of one cell in SVG user units.
const CELL: usize = 10;

/// Padding around the grid so boundary strokes are not clipped.
const MARGIN: usize = 1;

/// Fill of visited cells.
const VISITED_FILL: &str = "#dbeafe";

/// Stroke of the solution path.
const PATH_STROKE: &str = "#dc2626";

/// Metadata to embed in the SVG document.
///
/// Both fields are optional. Text values are XML-escaped automatically
/// by the `svg` crate.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Document title, emitted as `<title>`.
    pub title: Option<&'a str>,

    /// Document description, emitted as `<desc>`.
    ///
    /// Typically the generator, seed and dimensions, so exported files
    /// are distinguishable.
    pub description: Option<&'a str>,
}

fn hex([r, g, b]: [u8; 3]) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// Centre of a cell in user units.
const fn center(at: Coord) -> (usize, usize) {
    (at.col * CELL + CELL / 2, at.row * CELL + CELL / 2)
}

/// Faces drawn from `at`: top and left always, right and bottom only on
/// the last column and row, so each wall is emitted once.
fn drawn_faces(maze: &Maze, at: Coord) -> impl Iterator<Item = Direction> {
    let last_col = at.col + 1 == maze.cols();
    let last_row = at.row + 1 == maze.rows();
    [
        (Direction::Top, true),
        (Direction::Left, true),
        (Direction::Right, last_col),
        (Direction::Bottom, last_row),
    ]
    .into_iter()
    .filter_map(|(dir, drawn)| drawn.then_some(dir))
}

fn wall_line(at: Coord, dir: Direction, weight: i32) -> Line {
    let (x0, y0) = (at.col * CELL, at.row * CELL);
    let (x1, y1) = (x0 + CELL, y0 + CELL);
    let (a, b) = match dir {
        Direction::Top => ((x0, y0), (x1, y0)),
        Direction::Right => ((x1, y0), (x1, y1)),
        Direction::Bottom => ((x0, y1), (x1, y1)),
        Direction::Left => ((x0, y0), (x0, y1)),
    };
    Line::new()
        .set("x1", a.0)
        .set("y1", a.1)
        .set("x2", b.0)
        .set("y2", b.1)
        .set("stroke", hex(wall_color(weight)))
}

/// Build the SVG `d` attribute for a path through cell centres.
///
/// Returns `None` for fewer than two cells.
fn solution_data(path: &[Coord]) -> Option<Data> {
    let (first, rest) = path.split_first()?;
    if rest.is_empty() {
        return None;
    }
    let mut data = Data::new().move_to(center(*first));
    for at in rest {
        data = data.line_to(center(*at));
    }
    Some(data)
}

/// Serialize a maze into an SVG document string.
///
/// The `viewBox` covers the grid at ten user units per cell plus a
/// one-unit margin. Layers, bottom to top: white background, visited
/// cells, walls, solution path, start (green) and end (red) markers.
///
/// # Examples
///
/// ```
/// use gridgo_engine::Maze;
/// use gridgo_export::{SvgMetadata, to_svg};
///
/// let maze = Maze::new(2, 3).unwrap();
/// let metadata = SvgMetadata {
///     title: Some("walled"),
///     ..SvgMetadata::default()
/// };
/// let svg = to_svg(&maze, None, &metadata);
/// assert!(svg.contains("<title>walled</title>"));
/// assert!(svg.contains(r#"viewBox="-1 -1 32 22""#));
/// ```
#[must_use]
pub fn to_svg(maze: &Maze, solution: Option<&Solution>, metadata: &SvgMetadata<'_>) -> String {
    let width = maze.cols() * CELL;
    let height = maze.rows() * CELL;
    let mut doc = Document::new()
        .set("width", width + 2 * MARGIN)
        .set("height", height + 2 * MARGIN)
        .set(
            "viewBox",
            format!(
                "-{MARGIN} -{MARGIN} {} {}",
                width + 2 * MARGIN,
                height + 2 * MARGIN
            ),
        );

    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }
    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }

    doc = doc.add(
        Rectangle::new()
            .set("width", width)
            .set("height", height)
            .set("fill", "white"),
    );

    if let Some(solution) = solution
        && !solution.visited.is_empty()
    {
        let mut visited = Group::new()
            .set("id", "visited")
            .set("fill", VISITED_FILL);
        for at in &solution.visited {
            visited = visited.add(
                Rectangle::new()
                    .set("x", at.col * CELL)
                    .set("y", at.row * CELL)
                    .set("width", CELL)
                    .set("height", CELL),
            );
        }
        doc = doc.add(visited);
    }

    let mut walls = Group::new()
        .set("id", "walls")
        .set("stroke-width", 1)
        .set("stroke-linecap", "square");
    for cell in maze.cells() {
        let at = cell.coord();
        for dir in drawn_faces(maze, at) {
            if cell.has_wall(dir) {
                walls = walls.add(wall_line(at, dir, cell.wall_weight(dir)));
            }
        }
    }
    doc = doc.add(walls);

    if let Some(data) = solution.and_then(|s| solution_data(&s.path)) {
        doc = doc.add(
            Path::new()
                .set("id", "solution")
                .set("d", data)
                .set("fill", "none")
                .set("stroke", PATH_STROKE)
                .set("stroke-width", 2)
                .set("stroke-linejoin", "round"),
        );
    }

    for (at, fill) in [(maze.start(), "#16a34a"), (maze.end(), "#dc2626")] {
        let (cx, cy) = center(at);
        doc = doc.add(
            Circle::new()
                .set("cx", cx)
                .set("cy", cy)
                .set("r", CELL / 4)
                .set("fill", fill),
        );
    }

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}
