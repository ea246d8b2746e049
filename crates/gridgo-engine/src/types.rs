//! Shared types for the gridgo maze engine.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A cell position in the maze grid.
///
/// Serialized as a two-element `[row, col]` array, the form used by
/// generation responses and solver traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "[usize; 2]", into = "[usize; 2]")]
pub struct Coord {
    /// Row index (0 = top row).
    pub row: usize,
    /// Column index (0 = leftmost column).
    pub col: usize,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Manhattan (L1) distance to another coordinate.
    #[must_use]
    pub const fn manhattan(self, other: Self) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl From<[usize; 2]> for Coord {
    fn from([row, col]: [usize; 2]) -> Self {
        Self { row, col }
    }
}

impl From<Coord> for [usize; 2] {
    fn from(c: Coord) -> Self {
        [c.row, c.col]
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the four sides of a cell.
///
/// The discriminant doubles as the index into [`Cell::walls`] and
/// [`Cell::wall_weights`](crate::Cell::wall_weights).
///
/// [`Cell::walls`]: crate::Cell::walls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards row - 1.
    Top = 0,
    /// Towards col + 1.
    Right = 1,
    /// Towards row + 1.
    Bottom = 2,
    /// Towards col - 1.
    Left = 3,
}

impl Direction {
    /// All directions in neighbour expansion order.
    ///
    /// Solvers rely on this order for reproducible visited traces.
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    /// Index into a cell's `walls` / `wall_weights` arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The side facing back from the neighbour in this direction.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Right => Self::Left,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
        }
    }

    /// Lowercase wire name (`top`, `right`, `bottom`, `left`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Left => "left",
        }
    }

    /// Step from `from` one cell in this direction.
    ///
    /// Returns `None` when the step would leave the non-negative
    /// quadrant; callers still have to bounds-check the far edge.
    #[must_use]
    pub const fn step(self, from: Coord) -> Option<Coord> {
        match self {
            Self::Top => match from.row.checked_sub(1) {
                Some(row) => Some(Coord::new(row, from.col)),
                None => None,
            },
            Self::Right => Some(Coord::new(from.row, from.col + 1)),
            Self::Bottom => Some(Coord::new(from.row + 1, from.col)),
            Self::Left => match from.col.checked_sub(1) {
                Some(col) => Some(Coord::new(from.row, col)),
                None => None,
            },
        }
    }

    /// Direction that leads from `a` to the grid-adjacent cell `b`.
    ///
    /// Returns `None` unless the two cells differ by exactly one in
    /// exactly one axis.
    #[must_use]
    pub fn between(a: Coord, b: Coord) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.step(a) == Some(b))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(Self::Top),
            "right" => Ok(Self::Right),
            "bottom" => Ok(Self::Bottom),
            "left" => Ok(Self::Left),
            other => Err(EngineError::InvalidEdgeKey(format!(
                "unknown direction '{other}'"
            ))),
        }
    }
}

/// Inclusive bounds on maze rows and columns.
///
/// The grid model itself only requires two cells; the default floor of
/// 2 per axis matches the generation boundary, and services add a
/// ceiling (see [`EngineConfig`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionLimits {
    /// Smallest allowed row/column count. Must be at least 1.
    pub min: usize,
    /// Largest allowed row/column count.
    pub max: usize,
}

impl DimensionLimits {
    /// Default floor on rows and columns.
    pub const DEFAULT_MIN: usize = 2;

    /// Default ceiling applied at the service boundary.
    pub const DEFAULT_MAX: usize = 300;

    /// No ceiling, single-row/column strips allowed.
    ///
    /// Used when rebuilding snapshots, whose dimensions were already
    /// validated when they were generated.
    pub const UNBOUNDED: Self = Self {
        min: 1,
        max: usize::MAX,
    };

    /// Hard ceiling on `rows × cols`, whatever the per-axis limits say.
    ///
    /// Keeps a grid allocated from untrusted dimensions (a stored
    /// snapshot, say) to a few hundred megabytes.
    pub const MAX_CELLS: usize = 1 << 22;

    /// Check `rows × cols` against these limits.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if the limits themselves
    /// are inconsistent, and [`EngineError::InvalidDimensions`] if either
    /// axis is out of range or the grid would hold fewer than two or more
    /// than [`MAX_CELLS`](Self::MAX_CELLS) cells.
    pub fn check(&self, rows: usize, cols: usize) -> Result<(), EngineError> {
        self.validate()?;
        let in_range = |n: usize| (self.min..=self.max).contains(&n);
        let cells_ok = rows
            .checked_mul(cols)
            .is_some_and(|n| (2..=Self::MAX_CELLS).contains(&n));
        if !in_range(rows) || !in_range(cols) || !cells_ok {
            return Err(EngineError::InvalidDimensions {
                rows,
                cols,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    /// Validate the limits themselves.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if `min` is zero or
    /// exceeds `max`.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.min == 0 {
            return Err(EngineError::InvalidConfig(
                "dimension minimum must be at least 1".to_string(),
            ));
        }
        if self.min > self.max {
            return Err(EngineError::InvalidConfig(format!(
                "dimension minimum {} exceeds maximum {}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

impl Default for DimensionLimits {
    /// Floor of 2 per axis, no ceiling.
    fn default() -> Self {
        Self {
            min: Self::DEFAULT_MIN,
            max: usize::MAX,
        }
    }
}

/// Parameters of the image-to-edge-weight pipeline.
///
/// # Threshold invariants
///
/// Both thresholds must be finite and non-negative, and
/// `low_threshold` must not exceed `high_threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// Suppressed gradient magnitude at or above which a cell is a
    /// structural edge.
    pub high_threshold: f64,

    /// Suppressed gradient magnitude at or above which a cell is a
    /// supporting detail.
    pub low_threshold: f64,

    /// Weight written to the `top` and `left` keys of structural cells.
    pub strong_weight: i32,

    /// Weight written to the `top` key of supporting cells.
    pub weak_weight: i32,
}

impl VisionConfig {
    /// Default high threshold.
    pub const DEFAULT_HIGH_THRESHOLD: f64 = 100.0;
    /// Default low threshold.
    pub const DEFAULT_LOW_THRESHOLD: f64 = 40.0;
    /// Default weight for structural edges.
    pub const DEFAULT_STRONG_WEIGHT: i32 = 5000;
    /// Default weight for supporting edges.
    pub const DEFAULT_WEAK_WEIGHT: i32 = 1500;

    /// Validate threshold invariants.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] describing the first
    /// violated invariant.
    pub fn validate(&self) -> Result<(), EngineError> {
        for (name, value) in [
            ("high_threshold", self.high_threshold),
            ("low_threshold", self.low_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::InvalidConfig(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if self.low_threshold > self.high_threshold {
            return Err(EngineError::InvalidConfig(format!(
                "low_threshold {} exceeds high_threshold {}",
                self.low_threshold, self.high_threshold
            )));
        }
        Ok(())
    }
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            high_threshold: Self::DEFAULT_HIGH_THRESHOLD,
            low_threshold: Self::DEFAULT_LOW_THRESHOLD,
            strong_weight: Self::DEFAULT_STRONG_WEIGHT,
            weak_weight: Self::DEFAULT_WEAK_WEIGHT,
        }
    }
}

/// Configuration for request-level engine operations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Accepted maze dimensions.
    pub limits: DimensionLimits,
    /// Vision pipeline parameters for image-guided generation.
    pub vision: VisionConfig,
}

impl EngineConfig {
    /// Validate every nested invariant.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if any part is invalid.
    pub fn validate(&self) -> Result<(), EngineError> {
        self.limits.validate()?;
        self.vision.validate()
    }
}

impl Default for EngineConfig {
    /// Service defaults: 2 to 300 cells per axis, stock thresholds.
    fn default() -> Self {
        Self {
            limits: DimensionLimits {
                min: DimensionLimits::DEFAULT_MIN,
                max: DimensionLimits::DEFAULT_MAX,
            },
            vision: VisionConfig::default(),
        }
    }
}

/// Errors produced by the maze engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Rows or columns outside the accepted range.
    #[error("invalid maze dimensions {rows}x{cols} (allowed {min}..={max} per axis)")]
    InvalidDimensions {
        /// Requested rows.
        rows: usize,
        /// Requested columns.
        cols: usize,
        /// Smallest accepted value.
        min: usize,
        /// Largest accepted value.
        max: usize,
    },

    /// A manual start/end point is outside the grid or off the outer ring.
    #[error("cell ({row}, {col}) is not on the maze boundary")]
    NotOnBoundary {
        /// Offending row.
        row: usize,
        /// Offending column.
        col: usize,
    },

    /// Manual start and end are the same cell.
    #[error("start and end must be different cells")]
    SameStartEnd,

    /// The source image could not be decoded.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// The source image bytes were empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// The source image could not be read.
    #[error("failed to read image: {0}")]
    Io(#[from] std::io::Error),

    /// Image-guided generation was requested without an image.
    #[error("image generation requires an image")]
    MissingImage,

    /// Unknown generator or solver name.
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Configuration violates an invariant.
    #[error("invalid engine configuration: {0}")]
    InvalidConfig(String),

    /// A deserialized grid is internally inconsistent.
    #[error("malformed maze grid: {0}")]
    MalformedGrid(String),

    /// A weight-map key is not of the form `row-col-direction`.
    #[error("invalid edge key: {0}")]
    InvalidEdgeKey(String),
}
