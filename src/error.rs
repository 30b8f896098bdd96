//! Error types for the grid engine and the still-life search

use thiserror::Error;

/// Errors reported by the core simulation and search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifeError {
    /// A grid needs at least one row and one column.
    #[error("invalid grid dimensions {rows}x{cols}: rows and columns must be at least 1")]
    InvalidDimension { rows: usize, cols: usize },

    /// A cell coordinate outside the grid.
    #[error("cell ({row}, {col}) is out of bounds for a {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// A 1D cell index that does not decode to a cell of the grid.
    #[error("cell index {index} is outside [0, {len})")]
    InvalidIndex { index: i64, len: usize },

    /// The board leaves no interior once the dead margin is removed.
    #[error("a {rows}x{cols} board has no interior inside a 1-cell margin")]
    BoardTooSmall { rows: usize, cols: usize },

    /// A persisted pattern that does not follow the `.life` layout.
    #[error("malformed pattern: {0}")]
    MalformedPattern(String),

    /// Generation numbers start at 1.
    #[error("generation {0} is invalid: generations are numbered from 1")]
    InvalidGeneration(u64),

    /// Randomisation density above 100 percent.
    #[error("density {0}% is outside 0..=100")]
    InvalidDensity(u8),
}

pub type LifeResult<T> = Result<T, LifeError>;
