use std::io;

/// A grid that cannot be turned into a [`Board`](crate::Board).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidArgument {
    #[error("board has no tiles")]
    Empty,
    #[error("board is not square: row {row} has {len} tiles, expected {dimension}")]
    NotSquare {
        row: usize,
        len: usize,
        dimension: usize,
    },
    #[error("board dimension {0} is too large")]
    TooLarge(usize),
    #[error("board dimension {0} is too small, need at least 2")]
    TooSmall(usize),
    #[error("tile {tile} is out of range, tiles must be below {limit}")]
    TileOutOfRange { tile: u32, limit: u32 },
    #[error("tile {0} appears more than once")]
    DuplicateTile(u32),
}

/// Failure while reading the textual puzzle format.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing board dimension")]
    MissingDimension,
    #[error("invalid token {0:?}")]
    BadToken(String),
    #[error("truncated input: expected {expected} tiles, found {found}")]
    Truncated { expected: usize, found: usize },
    #[error("unexpected trailing token {0:?}")]
    Trailing(String),
    #[error(transparent)]
    Invalid(#[from] InvalidArgument),
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("invalid board: {0}")]
    InvalidArgument(#[from] InvalidArgument),
}
