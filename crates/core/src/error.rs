//! Error types surfaced across the interactor boundary and configuration loading.
//!
//! Unreachable goals are not errors: the pathfinder returns an empty path. Out-of-bounds
//! coordinates and non-adjacent moves requested by the agent itself are programming errors and
//! panic where they are detected.

use std::io;

use thiserror::Error;

use crate::types::{CellState, Coord};

/// The interactor reported a state that contradicts what the grid already knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cell {coord} is known as {current:?} but was reported as {reported:?}")]
pub struct RevealConflict {
    pub coord: Coord,
    pub current: CellState,
    pub reported: CellState,
}

/// Failures of one request/response exchange with the interactor.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Reading from or writing to the interactor channel failed.
    #[error("interactor channel failed: {0}")]
    Io(#[from] io::Error),

    /// The channel closed while a reply was still expected.
    #[error("interactor closed the channel while {expected} was expected")]
    UnexpectedEof { expected: &'static str },

    /// A reply line does not match the declared shape.
    #[error("malformed interactor line {line:?}: {reason}")]
    Malformed { line: String, reason: &'static str },

    /// A reply used a character outside the wire alphabet.
    #[error("unknown symbol {symbol:?} in interactor line {line:?}")]
    UnknownSymbol { symbol: String, line: String },

    /// A reply referenced a cell outside the grid.
    #[error("interactor reported out-of-bounds cell {coord} on a {size}x{size} grid")]
    OutOfBounds { coord: Coord, size: usize },

    /// A reply contradicted established knowledge.
    #[error(transparent)]
    Conflict(#[from] RevealConflict),

    /// The interactor refused a move (simulated worlds validate every step).
    #[error("interactor rejected move from {from} to {to}: {reason}")]
    Rejected { from: Coord, to: Coord, reason: &'static str },
}

impl ProtocolError {
    pub fn malformed(line: &str, reason: &'static str) -> Self {
        Self::Malformed { line: line.to_string(), reason }
    }
}

/// Invalid agent configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("grid size must be at least 1")]
    EmptyGrid,

    #[error("grid size {size} exceeds the supported maximum of {max}")]
    GridTooLarge { size: usize, max: usize },

    #[error("start {start} lies outside the {size}x{size} grid")]
    StartOutOfBounds { start: Coord, size: usize },
}

/// Map fixture text that cannot describe a square world.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorldMapError {
    #[error("map has no rows")]
    Empty,

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow { row: usize, found: usize, expected: usize },

    #[error("unknown map symbol {symbol:?} at {coord}")]
    UnknownSymbol { symbol: String, coord: Coord },

    #[error("map has {count} goal cells, expected exactly one")]
    GoalCount { count: usize },

    #[error("map has {count} pickup cells, expected at most one")]
    PickupCount { count: usize },
}
