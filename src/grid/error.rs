use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("corner arrays are not co-shaped: expected {expected} values for a {rows}x{cols} vertex grid, lat has {lat_len}, lon has {lon_len}")]
    ShapeMismatch {
        rows: usize,
        cols: usize,
        expected: usize,
        lat_len: usize,
        lon_len: usize,
    },

    #[error("vertex grid must be at least 2x2 to form a cell, got {rows}x{cols}")]
    TooFewVertices { rows: usize, cols: usize },

    #[error("non-finite corner coordinate at vertex ({y}, {x})")]
    NonFiniteCorner { y: usize, x: usize },
}
