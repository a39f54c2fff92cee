mod error;
mod extract;
mod grid;
mod gridclim;
mod output;
mod raster;
mod smooth;
mod types;
mod utils;

pub use error::GridClimError;
pub use gridclim::*;

pub use extract::error::ExtractError;
pub use extract::extractor::SeriesExtractor;
pub use extract::report::{DatasetReport, DatasetStatus, RunReport};
pub use extract::table::SeriesTable;

pub use grid::error::GridError;
pub use grid::geometry::{CellBounds, CellCenters, Grid, GridCell, LatLon};

pub use raster::dataset::{RasterDataset, VariableSeries};
pub use raster::error::RasterError;
pub use raster::netcdf_source::NetcdfRaster;

pub use smooth::error::SmoothError;
pub use smooth::rolling::RollingMean;

pub use types::location::{Location, LocationMetadata, ResolvedCell};

pub use output::{write_location_metadata, write_location_series, write_smoothed_series};
pub use utils::location_id_from_name;
