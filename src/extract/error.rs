use crate::raster::error::RasterError;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("no variables requested for extraction")]
    NoVariablesRequested,

    #[error("none of the requested variables {requested:?} are present in dataset '{dataset}'")]
    NoRequestedVariables {
        dataset: String,
        requested: Vec<String>,
    },

    #[error("failed to assemble the output frame")]
    Frame(#[from] PolarsError),

    #[error(transparent)]
    Raster(#[from] RasterError),
}
