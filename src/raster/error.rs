use crate::grid::error::GridError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("dataset file not found: '{0}'")]
    FileNotFound(PathBuf),

    #[error("failed to open dataset '{0}'")]
    Open(PathBuf, #[source] netcdf::Error),

    #[error("no coordinate variable matching {aliases:?} in '{path}'")]
    MissingCoordinates {
        aliases: Vec<String>,
        path: PathBuf,
    },

    #[error("coordinate variable '{name}' in '{path}' has {got} dimensions, expected 2")]
    CoordinateRank {
        name: String,
        path: PathBuf,
        got: usize,
    },

    #[error("coordinate arrays in '{path}' do not describe a usable grid")]
    InvalidGrid {
        path: PathBuf,
        #[source]
        source: GridError,
    },

    #[error("variable '{name}' not present in '{path}'")]
    MissingVariable { name: String, path: PathBuf },

    #[error("variable '{name}' in '{path}' has {got} dimensions, expected 3 (time, y, x) or 4 with a bounds axis")]
    VariableRank {
        name: String,
        path: PathBuf,
        got: usize,
    },

    #[error("cell ({y}, {x}) outside variable '{name}' with spatial shape {ny}x{nx} in '{path}'")]
    CellOutOfRange {
        name: String,
        path: PathBuf,
        y: usize,
        x: usize,
        ny: usize,
        nx: usize,
    },

    #[error("failed to read variable '{name}' from '{path}'")]
    VariableRead {
        name: String,
        path: PathBuf,
        #[source]
        source: netcdf::Error,
    },

    #[error("variable '{name}' in '{path}' yields {values} values for {timesteps} timesteps")]
    TimeLengthMismatch {
        name: String,
        path: PathBuf,
        values: usize,
        timesteps: usize,
    },

    #[error("unusable time axis in '{path}': {reason}")]
    InvalidTime { path: PathBuf, reason: String },

    #[error("NetCDF operation failed")]
    Netcdf(#[from] netcdf::Error),
}
