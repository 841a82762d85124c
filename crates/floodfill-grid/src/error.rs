//! Error types for grid parsing and tile visits.

use std::path::PathBuf;

use thiserror::Error;

use crate::tile::TileId;

/// Errors raised by a grid or one of its tiles.
#[derive(Debug, Error)]
pub enum GridError {
    /// A row is wider or narrower than the first row.
    #[error("Row {row} has width {width}, expected {expected}")]
    Ragged {
        row: usize,
        width: usize,
        expected: usize,
    },

    /// A character that is not a known tile symbol.
    #[error("Unknown symbol {symbol:?} at {id}")]
    UnknownSymbol { symbol: char, id: TileId },

    /// A tile was visited a second time.
    #[error("Tile {id} visited before")]
    AlreadyVisited { id: TileId },

    /// A faulty tile refused the visit.
    #[error("Tile {id} is faulty")]
    Faulty { id: TileId },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GridError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
