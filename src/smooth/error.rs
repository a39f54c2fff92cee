use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SmoothError {
    #[error("invalid year range: from_year {from} is after to_year {to}")]
    InvalidYearRange { from: i32, to: i32 },

    #[error("smoothing input has no 'date' column")]
    MissingDateColumn,

    #[error("rolling average computation failed")]
    Polars(#[from] PolarsError),
}
