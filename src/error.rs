use crate::extract::error::ExtractError;
use crate::grid::error::GridError;
use crate::raster::error::RasterError;
use crate::smooth::error::SmoothError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridClimError {
    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Raster(#[from] RasterError),

    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Smooth(#[from] SmoothError),

    #[error("no locations supplied for the run")]
    NoLocations,

    #[error("no datasets supplied for the run")]
    NoDatasets,

    #[error("unknown location id '{0}'")]
    UnknownLocation(String),

    #[error("location '{0}' has not been resolved to a grid cell")]
    UnresolvedLocation(String),

    #[error("failed to create output directory '{0}'")]
    OutputDirCreation(PathBuf, #[source] std::io::Error),

    #[error("failed to create output file '{0}'")]
    OutputFileCreation(PathBuf, #[source] std::io::Error),

    #[error("failed to serialize table to '{0}'")]
    OutputSerialize(PathBuf, #[source] polars::error::PolarsError),
}
