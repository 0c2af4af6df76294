use grid_util::point::Point;
use thiserror::Error;

/// Rejected search requests. Not finding a route is a normal [SearchOutcome](crate::SearchOutcome)
/// and never an error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("start {0:?} is outside the map or blocked by an obstacle")]
    InvalidStart(Point),
    #[error("goal {0:?} is outside the map or blocked by an obstacle")]
    InvalidGoal(Point),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapParseError {
    #[error("map text contains no rows")]
    Empty,
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown map symbol '{symbol}' at ({x}, {y})")]
    UnknownSymbol { symbol: char, x: usize, y: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("cannot place {requested} sites on a map with {available} cells")]
    NotEnoughSpace { requested: usize, available: usize },
    #[error("traffic weights {min}..={max} must be a non-empty range starting at 2 or more")]
    InvalidTrafficWeights { min: u32, max: u32 },
}
