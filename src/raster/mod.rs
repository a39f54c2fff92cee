pub mod dataset;
pub mod error;
pub mod netcdf_source;
mod time;
