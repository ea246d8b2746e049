//! Sparse edge-weight maps keyed by cell face.
//!
//! The vision pipeline produces these maps, Kruskal generation consumes
//! them, and snapshots persist them. Keys name one face of one cell; an
//! internal edge can be addressed from either side, but the pipeline and
//! snapshots always write the canonical face (see [`EdgeKey::canonical`]).
//!
//! On the wire a key is the string `"row-col-direction"`, e.g. `"3-7-top"`.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::{Coord, Direction, EngineError};

/// Weight stored for an open internal edge in a snapshot.
///
/// Lower than any random fill weight, so rebuilding with Kruskal always
/// carves these edges before any other.
pub const PASSAGE_WEIGHT: i32 = -1;

/// One face of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    /// Row of the owning cell.
    pub row: usize,
    /// Column of the owning cell.
    pub col: usize,
    /// Which face of the cell.
    pub dir: Direction,
}

impl EdgeKey {
    /// Create a key for face `dir` of cell `(row, col)`.
    #[must_use]
    pub const fn new(row: usize, col: usize, dir: Direction) -> Self {
        Self { row, col, dir }
    }

    /// Key for face `dir` of the cell at `at`.
    #[must_use]
    pub const fn face(at: Coord, dir: Direction) -> Self {
        Self::new(at.row, at.col, dir)
    }

    /// The cell that owns this face.
    #[must_use]
    pub const fn coord(self) -> Coord {
        Coord::new(self.row, self.col)
    }

    /// Canonical key of the edge between two grid-adjacent cells.
    ///
    /// A vertical edge is keyed on the lower cell's `top` face and a
    /// horizontal edge on the right cell's `left` face. Returns `None` if
    /// the cells are not adjacent.
    #[must_use]
    pub fn canonical(a: Coord, b: Coord) -> Option<Self> {
        match Direction::between(a, b)? {
            Direction::Bottom => Some(Self::face(b, Direction::Top)),
            Direction::Right => Some(Self::face(b, Direction::Left)),
            Direction::Top => Some(Self::face(a, Direction::Top)),
            Direction::Left => Some(Self::face(a, Direction::Left)),
        }
    }

    /// The same edge seen from the neighbouring cell.
    ///
    /// `None` for `top`/`left` faces on row/column 0. The far boundary is
    /// not known here, so callers bounds-check the result.
    #[must_use]
    pub const fn mirror(self) -> Option<Self> {
        match self.dir.step(self.coord()) {
            Some(n) => Some(Self::face(n, self.dir.opposite())),
            None => None,
        }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.row, self.col, self.dir)
    }
}

impl FromStr for EdgeKey {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidEdgeKey(s.to_string());
        let mut parts = s.splitn(3, '-');
        let (Some(row), Some(col), Some(dir)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        let row = row.parse().map_err(|_| invalid())?;
        let col = col.parse().map_err(|_| invalid())?;
        let dir = dir.parse().map_err(|_| invalid())?;
        Ok(Self { row, col, dir })
    }
}

/// Ordered map from cell faces to integer priorities.
///
/// Iteration follows key order (row, column, direction), which keeps every
/// consumer deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, i32>",
    into = "BTreeMap<String, i32>"
)]
pub struct EdgeWeights {
    entries: BTreeMap<EdgeKey, i32>,
}

impl EdgeWeights {
    /// Create an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Set the weight of one face, returning the previous weight.
    pub fn insert(&mut self, key: EdgeKey, weight: i32) -> Option<i32> {
        self.entries.insert(key, weight)
    }

    /// Weight stored under exactly this face.
    #[must_use]
    pub fn get(&self, key: EdgeKey) -> Option<i32> {
        self.entries.get(&key).copied()
    }

    /// Weight of the edge between two adjacent cells.
    ///
    /// Tries the canonical key first, then the opposite face. Returns
    /// `None` if neither is present or the cells are not adjacent.
    #[must_use]
    pub fn edge_weight(&self, a: Coord, b: Coord) -> Option<i32> {
        let key = EdgeKey::canonical(a, b)?;
        self.get(key)
            .or_else(|| key.mirror().and_then(|m| self.get(m)))
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (EdgeKey, i32)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, *v))
    }
}

impl FromIterator<(EdgeKey, i32)> for EdgeWeights {
    fn from_iter<I: IntoIterator<Item = (EdgeKey, i32)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for EdgeWeights {
    type Item = (EdgeKey, i32);
    type IntoIter = btree_map::IntoIter<EdgeKey, i32>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl TryFrom<BTreeMap<String, i32>> for EdgeWeights {
    type Error = EngineError;

    fn try_from(raw: BTreeMap<String, i32>) -> Result<Self, Self::Error> {
        raw.into_iter()
            .map(|(k, v)| Ok((k.parse::<EdgeKey>()?, v)))
            .collect()
    }
}

impl From<EdgeWeights> for BTreeMap<String, i32> {
    fn from(weights: EdgeWeights) -> Self {
        weights
            .entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect()
    }
}
