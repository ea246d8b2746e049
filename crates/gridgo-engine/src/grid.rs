//! Maze grid topology.
//!
//! A [`Maze`] owns a row-major array of [`Cell`]s, each carrying four wall
//! flags and four display-only wall weights. Generators carve passages by
//! clearing matching wall pairs; solvers only ever read the grid.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::types::{Coord, DimensionLimits, Direction, EngineError};
use crate::weights::EdgeWeights;

/// Number of boundary pairs sampled when placing start and end randomly.
const PLACEMENT_SAMPLES: usize = 20;

/// One square of the maze.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// Row of this cell.
    #[serde(default)]
    pub row: usize,
    /// Column of this cell.
    #[serde(default)]
    pub col: usize,
    /// Scratch flag used by depth-first generation.
    #[serde(default)]
    pub visited: bool,
    /// Wall presence, indexed by [`Direction::index`]. `true` = wall.
    pub walls: [bool; 4],
    /// Structural weight annotation per wall, used for shading only.
    #[serde(default)]
    pub wall_weights: [i32; 4],
}

impl Cell {
    /// A fully walled cell at `(row, col)`.
    #[must_use]
    pub const fn walled(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            visited: false,
            walls: [true; 4],
            wall_weights: [0; 4],
        }
    }

    /// Position of this cell.
    #[must_use]
    pub const fn coord(&self) -> Coord {
        Coord::new(self.row, self.col)
    }

    /// Whether the wall on side `dir` is present.
    #[must_use]
    pub const fn has_wall(&self, dir: Direction) -> bool {
        self.walls[dir.index()]
    }

    /// Annotation of the wall on side `dir`.
    #[must_use]
    pub const fn wall_weight(&self, dir: Direction) -> i32 {
        self.wall_weights[dir.index()]
    }

    /// Number of sides without a wall.
    #[must_use]
    pub fn open_sides(&self) -> usize {
        self.walls.iter().filter(|w| !**w).count()
    }
}

/// A rectangular maze with a start and an end on its outer ring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    start: Coord,
    end: Coord,
}

impl Maze {
    /// A fully walled `rows × cols` maze with the default limits
    /// (at least 2 rows and 2 columns).
    ///
    /// Start and end default to opposite corners until placed.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidDimensions`] if either axis is below 2.
    pub fn new(rows: usize, cols: usize) -> Result<Self, EngineError> {
        Self::with_limits(rows, cols, DimensionLimits::default())
    }

    /// A fully walled maze checked against explicit limits.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidDimensions`] if the dimensions fall
    /// outside `limits` or hold fewer than two cells, and
    /// [`EngineError::InvalidConfig`] if the limits are inconsistent.
    pub fn with_limits(
        rows: usize,
        cols: usize,
        limits: DimensionLimits,
    ) -> Result<Self, EngineError> {
        limits.check(rows, cols)?;
        let cells = (0..rows)
            .flat_map(|r| (0..cols).map(move |c| Cell::walled(r, c)))
            .collect();
        Ok(Self {
            rows,
            cols,
            cells,
            start: Coord::new(0, 0),
            end: Coord::new(rows - 1, cols - 1),
        })
    }

    /// Assemble a maze from a row-major grid, validating its shape.
    ///
    /// Cell positions are taken from their place in `grid`; any
    /// `row`/`col` values already on the cells are overwritten. The
    /// declared dimensions are only trusted once the grid has been
    /// measured against them.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::MalformedGrid`] if the grid is not
    /// `rows × cols`, the declared size overflows, the grid holds fewer
    /// than two cells, or `start`/`end` lie outside it.
    pub fn from_grid(
        rows: usize,
        cols: usize,
        grid: Vec<Vec<Cell>>,
        start: Coord,
        end: Coord,
    ) -> Result<Self, EngineError> {
        let Some(count) = rows.checked_mul(cols) else {
            return Err(EngineError::MalformedGrid(format!(
                "a {rows}x{cols} grid is too large"
            )));
        };
        if count < 2 {
            return Err(EngineError::MalformedGrid(format!(
                "a {rows}x{cols} grid has fewer than two cells"
            )));
        }
        if grid.len() != rows {
            return Err(EngineError::MalformedGrid(format!(
                "expected {rows} rows, found {}",
                grid.len()
            )));
        }
        if let Some((r, line)) = grid.iter().enumerate().find(|(_, line)| line.len() != cols) {
            return Err(EngineError::MalformedGrid(format!(
                "row {r} has {} cells, expected {cols}",
                line.len()
            )));
        }

        // Every row is now known to hold `cols` cells, so `count` is the
        // size of the input itself.
        let mut cells = Vec::with_capacity(count);
        for (r, line) in grid.into_iter().enumerate() {
            cells.extend(line.into_iter().enumerate().map(|(c, mut cell)| {
                cell.row = r;
                cell.col = c;
                cell
            }));
        }
        let maze = Self {
            rows,
            cols,
            cells,
            start,
            end,
        };
        for (name, at) in [("start", start), ("end", end)] {
            if !maze.contains(at) {
                return Err(EngineError::MalformedGrid(format!(
                    "{name} {at} is outside the {rows}x{cols} grid"
                )));
            }
        }
        Ok(maze)
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Start cell.
    #[must_use]
    pub const fn start(&self) -> Coord {
        self.start
    }

    /// End cell.
    #[must_use]
    pub const fn end(&self) -> Coord {
        self.end
    }

    /// All cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cells grouped by row.
    pub fn grid_rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        self.cells.chunks(self.cols)
    }

    /// The cell at `at`, if inside the grid.
    #[must_use]
    pub fn cell(&self, at: Coord) -> Option<&Cell> {
        self.index(at).map(|i| &self.cells[i])
    }

    pub(crate) fn cell_mut(&mut self, at: Coord) -> Option<&mut Cell> {
        self.index(at).map(|i| &mut self.cells[i])
    }

    /// Row-major index of `at`, if inside the grid.
    #[must_use]
    pub const fn index(&self, at: Coord) -> Option<usize> {
        if self.contains(at) {
            Some(at.row * self.cols + at.col)
        } else {
            None
        }
    }

    /// Whether `at` is inside the grid.
    #[must_use]
    pub const fn contains(&self, at: Coord) -> bool {
        at.row < self.rows && at.col < self.cols
    }

    /// Whether `at` is inside the grid and on its outer ring.
    #[must_use]
    pub const fn is_boundary(&self, at: Coord) -> bool {
        self.contains(at)
            && (at.row == 0 || at.col == 0 || at.row == self.rows - 1 || at.col == self.cols - 1)
    }

    /// The in-bounds cell adjacent to `at` on side `dir`.
    #[must_use]
    pub fn neighbor(&self, at: Coord, dir: Direction) -> Option<Coord> {
        if !self.contains(at) {
            return None;
        }
        dir.step(at).filter(|n| self.contains(*n))
    }

    /// Whether the wall on side `dir` of `at` is present.
    ///
    /// Cells outside the grid count as fully walled.
    #[must_use]
    pub fn has_wall(&self, at: Coord, dir: Direction) -> bool {
        self.cell(at).is_none_or(|c| c.has_wall(dir))
    }

    /// Whether `at` can move to its neighbour on side `dir`.
    ///
    /// Both faces of the shared wall must be open.
    #[must_use]
    pub fn is_passage(&self, at: Coord, dir: Direction) -> bool {
        self.neighbor(at, dir)
            .is_some_and(|n| !self.has_wall(at, dir) && !self.has_wall(n, dir.opposite()))
    }

    /// Neighbours reachable from `at`, in top, right, bottom, left order.
    pub fn open_neighbors(&self, at: Coord) -> impl Iterator<Item = Coord> + '_ {
        Direction::ALL
            .into_iter()
            .filter(move |d| self.is_passage(at, *d))
            .filter_map(move |d| d.step(at))
    }

    /// Number of internal edges that are open passages.
    ///
    /// A generated maze always has exactly `cell_count() - 1`.
    #[must_use]
    pub fn removed_wall_count(&self) -> usize {
        self.cells
            .iter()
            .map(|cell| {
                usize::from(self.is_passage(cell.coord(), Direction::Right))
                    + usize::from(self.is_passage(cell.coord(), Direction::Bottom))
            })
            .sum()
    }

    /// Number of cells with exactly one open passage.
    #[must_use]
    pub fn dead_ends(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| self.open_neighbors(cell.coord()).count() == 1)
            .count()
    }

    /// All cells on the outer ring, in row-major order.
    #[must_use]
    pub fn boundary_cells(&self) -> Vec<Coord> {
        self.cells
            .iter()
            .map(Cell::coord)
            .filter(|c| self.is_boundary(*c))
            .collect()
    }

    /// Clear the wall pair between two adjacent cells.
    ///
    /// Returns `false` and leaves the grid untouched if the cells are not
    /// grid-adjacent or either lies outside the grid.
    pub fn remove_walls(&mut self, a: Coord, b: Coord) -> bool {
        let Some(dir) = Direction::between(a, b) else {
            return false;
        };
        let (Some(ia), Some(ib)) = (self.index(a), self.index(b)) else {
            return false;
        };
        self.cells[ia].walls[dir.index()] = false;
        self.cells[ib].walls[dir.opposite().index()] = false;
        true
    }

    /// Annotate both faces of the edge on side `dir` of `at`.
    pub(crate) fn set_edge_weight(&mut self, at: Coord, dir: Direction, weight: i32) {
        if let Some(cell) = self.cell_mut(at) {
            cell.wall_weights[dir.index()] = weight;
        }
        if let Some(n) = self.neighbor(at, dir)
            && let Some(cell) = self.cell_mut(n)
        {
            cell.wall_weights[dir.opposite().index()] = weight;
        }
    }

    /// Restore every wall and clear all scratch state and annotations.
    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            cell.walls = [true; 4];
            cell.visited = false;
            cell.wall_weights = [0; 4];
        }
    }

    /// Zero every wall annotation, leaving walls untouched.
    pub fn clear_wall_weights(&mut self) {
        for cell in &mut self.cells {
            cell.wall_weights = [0; 4];
        }
    }

    /// Copy weights onto the faces of walls that are present.
    ///
    /// Internal keys are mirrored onto the neighbouring face. Negative
    /// weights mark passages and are skipped, as are keys outside the
    /// grid.
    pub fn apply_wall_weights(&mut self, weights: &EdgeWeights) {
        for (key, weight) in weights.iter() {
            if weight < 0 {
                continue;
            }
            let at = key.coord();
            if let Some(cell) = self.cell_mut(at)
                && cell.has_wall(key.dir)
            {
                cell.wall_weights[key.dir.index()] = weight;
            }
            if let Some(n) = self.neighbor(at, key.dir)
                && let Some(cell) = self.cell_mut(n)
                && cell.has_wall(key.dir.opposite())
            {
                cell.wall_weights[key.dir.opposite().index()] = weight;
            }
        }
    }

    /// Place start and end on two distinct boundary cells, favouring
    /// pairs that lie far apart.
    ///
    /// A fixed number of random boundary pairs is drawn and the pair with
    /// the greatest Manhattan distance wins.
    pub fn set_random_start_end<R: Rng>(&mut self, rng: &mut R) {
        let ring = self.boundary_cells();
        let n = ring.len();
        if n < 2 {
            return;
        }

        let mut best: Option<(Coord, Coord)> = None;
        for _ in 0..PLACEMENT_SAMPLES {
            let i = rng.random_range(0..n);
            let mut j = rng.random_range(0..n - 1);
            if j >= i {
                j += 1;
            }
            let (a, b) = (ring[i], ring[j]);
            if best.is_none_or(|(s, e)| a.manhattan(b) > s.manhattan(e)) {
                best = Some((a, b));
            }
        }
        if let Some((start, end)) = best {
            self.start = start;
            self.end = end;
        }
    }

    /// Place start and end explicitly.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::SameStartEnd`] if the points coincide and
    /// [`EngineError::NotOnBoundary`] if either is outside the grid or
    /// not on the outer ring. The previous placement is kept on error.
    pub fn set_manual_start_end(&mut self, start: Coord, end: Coord) -> Result<(), EngineError> {
        if start == end {
            return Err(EngineError::SameStartEnd);
        }
        for at in [start, end] {
            if !self.is_boundary(at) {
                return Err(EngineError::NotOnBoundary {
                    row: at.row,
                    col: at.col,
                });
            }
        }
        self.start = start;
        self.end = end;
        Ok(())
    }
}

impl fmt::Display for Maze {
    /// Plain-text rendering with `+---+` corners and `|` walls.
    ///
    /// `S` and `E` mark the start and end cells.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.grid_rows() {
            for cell in line {
                f.write_str(if cell.has_wall(Direction::Top) { "+---" } else { "+   " })?;
            }
            writeln!(f, "+")?;

            for cell in line {
                let side = if cell.has_wall(Direction::Left) { '|' } else { ' ' };
                let mark = if cell.coord() == self.start {
                    'S'
                } else if cell.coord() == self.end {
                    'E'
                } else {
                    ' '
                };
                write!(f, "{side} {mark} ")?;
            }
            let last_open = line.last().is_some_and(|c| !c.has_wall(Direction::Right));
            writeln!(f, "{}", if last_open { ' ' } else { '|' })?;
        }

        if let Some(bottom) = self.grid_rows().last() {
            for cell in bottom {
                f.write_str(if cell.has_wall(Direction::Bottom) { "+---" } else { "+   " })?;
            }
            writeln!(f, "+")?;
        }
        Ok(())
    }
}

/// Wire form of a maze: `{rows, cols, grid, start, end}`.
#[derive(Serialize)]
struct MazeRef<'a> {
    rows: usize,
    cols: usize,
    grid: Vec<&'a [Cell]>,
    start: Coord,
    end: Coord,
}

#[derive(Deserialize)]
struct MazeProxy {
    rows: usize,
    cols: usize,
    grid: Vec<Vec<Cell>>,
    start: Coord,
    end: Coord,
}

impl Serialize for Maze {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        MazeRef {
            rows: self.rows,
            cols: self.cols,
            grid: self.grid_rows().collect(),
            start: self.start,
            end: self.end,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Maze {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let proxy = MazeProxy::deserialize(deserializer)?;
        Self::from_grid(proxy.rows, proxy.cols, proxy.grid, proxy.start, proxy.end)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::weights::EdgeKey;

    fn c(row: usize, col: usize) -> Coord {
        Coord::new(row, col)
    }

    // --- Construction ---

    #[test]
    fn new_maze_is_fully_walled() {
        let maze = Maze::new(3, 4).unwrap();
        assert_eq!(maze.rows(), 3);
        assert_eq!(maze.cols(), 4);
        assert_eq!(maze.cells().len(), 12);
        assert!(maze.cells().iter().all(|cell| cell.walls == [true; 4]));
        assert_eq!(maze.removed_wall_count(), 0);
        assert_eq!(maze.cell(c(2, 3)).unwrap().coord(), c(2, 3));
    }

    #[test]
    fn new_rejects_thin_grids() {
        assert!(matches!(
            Maze::new(1, 5),
            Err(EngineError::InvalidDimensions { rows: 1, cols: 5, .. })
        ));
        assert!(Maze::new(5, 0).is_err());
    }

    #[test]
    fn strip_allowed_with_lowered_minimum() {
        let maze = Maze::with_limits(1, 6, DimensionLimits::UNBOUNDED).unwrap();
        assert_eq!(maze.cell_count(), 6);
        assert!(Maze::with_limits(1, 1, DimensionLimits::UNBOUNDED).is_err());
    }

    // --- Topology ---

    #[test]
    fn remove_walls_is_symmetric() {
        let mut a = Maze::new(3, 3).unwrap();
        let mut b = a.clone();
        assert!(a.remove_walls(c(1, 1), c(1, 2)));
        assert!(b.remove_walls(c(1, 2), c(1, 1)));
        assert_eq!(a, b);
        assert!(!a.cell(c(1, 1)).unwrap().has_wall(Direction::Right));
        assert!(!a.cell(c(1, 2)).unwrap().has_wall(Direction::Left));
        assert!(a.is_passage(c(1, 1), Direction::Right));
        assert!(a.is_passage(c(1, 2), Direction::Left));
    }

    #[test]
    fn remove_walls_ignores_non_adjacent_cells() {
        let mut maze = Maze::new(3, 3).unwrap();
        let before = maze.clone();
        assert!(!maze.remove_walls(c(0, 0), c(1, 1)));
        assert!(!maze.remove_walls(c(0, 0), c(0, 2)));
        assert!(!maze.remove_walls(c(2, 2), c(2, 3)));
        assert_eq!(maze, before);
    }

    #[test]
    fn passage_needs_both_faces_open() {
        let mut maze = Maze::new(2, 2).unwrap();
        maze.cell_mut(c(0, 0)).unwrap().walls[Direction::Right.index()] = false;
        assert!(!maze.is_passage(c(0, 0), Direction::Right));
        assert_eq!(maze.open_neighbors(c(0, 0)).count(), 0);
    }

    #[test]
    fn open_boundary_face_is_not_a_passage() {
        let mut maze = Maze::new(2, 2).unwrap();
        maze.cell_mut(c(0, 0)).unwrap().walls[Direction::Top.index()] = false;
        assert!(!maze.is_passage(c(0, 0), Direction::Top));
    }

    #[test]
    fn open_neighbors_follow_fixed_order() {
        let mut maze = Maze::new(3, 3).unwrap();
        let center = c(1, 1);
        maze.remove_walls(center, c(1, 0));
        maze.remove_walls(center, c(2, 1));
        maze.remove_walls(center, c(0, 1));
        maze.remove_walls(center, c(1, 2));
        let order: Vec<_> = maze.open_neighbors(center).collect();
        assert_eq!(order, [c(0, 1), c(1, 2), c(2, 1), c(1, 0)]);
    }

    #[test]
    fn neighbor_respects_bounds() {
        let maze = Maze::new(2, 3).unwrap();
        assert_eq!(maze.neighbor(c(0, 0), Direction::Top), None);
        assert_eq!(maze.neighbor(c(1, 2), Direction::Right), None);
        assert_eq!(maze.neighbor(c(1, 2), Direction::Bottom), None);
        assert_eq!(maze.neighbor(c(1, 2), Direction::Left), Some(c(1, 1)));
        assert_eq!(maze.neighbor(c(5, 5), Direction::Left), None);
    }

    #[test]
    fn dead_ends_count_single_openings() {
        let mut maze = Maze::with_limits(1, 3, DimensionLimits::UNBOUNDED).unwrap();
        maze.remove_walls(c(0, 0), c(0, 1));
        maze.remove_walls(c(0, 1), c(0, 2));
        assert_eq!(maze.dead_ends(), 2);
        assert_eq!(maze.removed_wall_count(), 2);
    }

    #[test]
    fn boundary_ring() {
        let maze = Maze::new(3, 3).unwrap();
        let ring = maze.boundary_cells();
        assert_eq!(ring.len(), 8);
        assert!(!ring.contains(&c(1, 1)));
        assert!(maze.is_boundary(c(2, 1)));
        assert!(!maze.is_boundary(c(3, 0)));
    }

    #[test]
    fn reset_restores_walls_and_clears_state() {
        let mut maze = Maze::new(2, 2).unwrap();
        maze.remove_walls(c(0, 0), c(0, 1));
        maze.cell_mut(c(1, 1)).unwrap().visited = true;
        maze.set_edge_weight(c(1, 0), Direction::Right, 77);
        maze.reset();
        assert_eq!(maze, Maze::new(2, 2).unwrap());
    }

    // --- Annotations ---

    #[test]
    fn wall_weights_only_land_on_present_walls() {
        let mut maze = Maze::new(2, 2).unwrap();
        maze.remove_walls(c(0, 0), c(1, 0));

        let weights: EdgeWeights = [
            (EdgeKey::new(1, 0, Direction::Top), 5000),
            (EdgeKey::new(0, 1, Direction::Left), 1500),
            (EdgeKey::new(0, 0, Direction::Top), 900),
            (EdgeKey::new(1, 1, Direction::Top), -1),
        ]
        .into_iter()
        .collect();
        maze.apply_wall_weights(&weights);

        assert_eq!(maze.cell(c(1, 0)).unwrap().wall_weight(Direction::Top), 0);
        assert_eq!(maze.cell(c(0, 0)).unwrap().wall_weight(Direction::Bottom), 0);
        assert_eq!(maze.cell(c(0, 1)).unwrap().wall_weight(Direction::Left), 1500);
        assert_eq!(maze.cell(c(0, 0)).unwrap().wall_weight(Direction::Right), 1500);
        assert_eq!(maze.cell(c(0, 0)).unwrap().wall_weight(Direction::Top), 900);
        assert_eq!(maze.cell(c(1, 1)).unwrap().wall_weight(Direction::Top), 0);
    }

    // --- Start / end ---

    #[test]
    fn random_start_end_are_distinct_boundary_cells() {
        let mut rng = StdRng::seed_from_u64(9);
        for (rows, cols) in [(2, 2), (5, 5), (7, 3), (30, 40)] {
            let mut maze = Maze::new(rows, cols).unwrap();
            maze.set_random_start_end(&mut rng);
            assert_ne!(maze.start(), maze.end());
            assert!(maze.is_boundary(maze.start()));
            assert!(maze.is_boundary(maze.end()));
        }
    }

    #[test]
    fn random_start_end_prefers_distance() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut total = 0;
        for _ in 0..20 {
            let mut maze = Maze::new(20, 20).unwrap();
            maze.set_random_start_end(&mut rng);
            total += maze.start().manhattan(maze.end());
        }
        // A single unbiased pair on this ring averages well below 20.
        assert!(total / 20 > 20, "mean distance {}", total / 20);
    }

    #[test]
    fn manual_start_end_validation() {
        let mut maze = Maze::new(5, 5).unwrap();
        assert!(matches!(
            maze.set_manual_start_end(c(0, 0), c(0, 0)),
            Err(EngineError::SameStartEnd)
        ));
        assert!(matches!(
            maze.set_manual_start_end(c(1, 1), c(4, 4)),
            Err(EngineError::NotOnBoundary { row: 1, col: 1 })
        ));
        assert!(matches!(
            maze.set_manual_start_end(c(0, 0), c(9, 0)),
            Err(EngineError::NotOnBoundary { row: 9, col: 0 })
        ));
        assert_eq!(maze.start(), c(0, 0));
        assert_eq!(maze.end(), c(4, 4));

        maze.set_manual_start_end(c(0, 3), c(4, 1)).unwrap();
        assert_eq!(maze.start(), c(0, 3));
        assert_eq!(maze.end(), c(4, 1));
    }

    // --- Rendering ---

    #[test]
    fn ascii_rendering() {
        let mut maze = Maze::new(2, 2).unwrap();
        maze.remove_walls(c(0, 0), c(0, 1));
        maze.remove_walls(c(0, 1), c(1, 1));
        maze.remove_walls(c(1, 1), c(1, 0));
        let text = maze.to_string();
        let expected = "\
+---+---+
| S     |
+---+   +
|     E |
+---+---+
";
        assert_eq!(text, expected);
    }

    // --- Serde ---

    #[test]
    fn json_shape() {
        let maze = Maze::new(2, 2).unwrap();
        let value = serde_json::to_value(&maze).unwrap();
        assert_eq!(value["rows"], 2);
        assert_eq!(value["grid"].as_array().unwrap().len(), 2);
        assert_eq!(value["grid"][1][0]["row"], 1);
        assert_eq!(value["grid"][1][0]["walls"][0], true);
        assert_eq!(value["start"], serde_json::json!([0, 0]));
        assert_eq!(value["end"], serde_json::json!([1, 1]));

        let back: Maze = serde_json::from_value(value).unwrap();
        assert_eq!(back, maze);
    }

    #[test]
    fn json_cells_may_omit_optional_fields() {
        let json = r#"{
            "rows": 1, "cols": 2,
            "grid": [[
                {"walls": [true, false, true, true]},
                {"walls": [true, true, true, false]}
            ]],
            "start": [0, 0], "end": [0, 1]
        }"#;
        let maze: Maze = serde_json::from_str(json).unwrap();
        assert_eq!(maze.cell(c(0, 1)).unwrap().coord(), c(0, 1));
        assert!(maze.is_passage(c(0, 0), Direction::Right));
    }

    #[test]
    fn malformed_grids_are_rejected() {
        let short_row = r#"{"rows":2,"cols":2,"grid":[[{"walls":[true,true,true,true]}],
            [{"walls":[true,true,true,true]},{"walls":[true,true,true,true]}]],
            "start":[0,0],"end":[1,1]}"#;
        let err = serde_json::from_str::<Maze>(short_row).unwrap_err();
        assert!(err.to_string().contains("malformed maze grid"));

        let column = vec![vec![Cell::walled(0, 0)], vec![Cell::walled(1, 0)]];
        let result = Maze::from_grid(2, 1, column, c(0, 0), c(3, 0));
        assert!(matches!(result, Err(EngineError::MalformedGrid(_))));

        let result = Maze::from_grid(3, 1, vec![vec![Cell::walled(0, 0)]], c(0, 0), c(0, 0));
        assert!(matches!(result, Err(EngineError::MalformedGrid(_))));
    }

    #[test]
    fn declared_dimensions_must_match_the_grid() {
        // Two empty rows claiming a trillion columns each.
        let json = r#"{"rows":2,"cols":1000000000000,"grid":[[],[]],
            "start":[0,0],"end":[1,0]}"#;
        let err = serde_json::from_str::<Maze>(json).unwrap_err();
        assert!(err.to_string().contains("row 0 has 0 cells"), "{err}");

        let overflow = r#"{"rows":4294967296,"cols":4294967296,"grid":[],
            "start":[0,0],"end":[1,1]}"#;
        let err = serde_json::from_str::<Maze>(overflow).unwrap_err();
        assert!(err.to_string().contains("too large"), "{err}");

        let result = Maze::from_grid(usize::MAX, 2, Vec::new(), c(0, 0), c(0, 1));
        assert!(matches!(result, Err(EngineError::MalformedGrid(_))));
    }
}
