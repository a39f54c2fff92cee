//! The seam between extraction and whatever storage backs a raster dataset.

use crate::grid::geometry::{Grid, GridCell};
use crate::raster::error::RasterError;
use chrono::NaiveDate;

/// One variable's full time series at a single grid cell.
///
/// `dates` and `values` are index-aligned; a `None` value is a masked or
/// sentinel entry that should stay absent downstream rather than default to
/// zero.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableSeries {
    pub dates: Vec<NaiveDate>,
    pub values: Vec<Option<f64>>,
}

impl VariableSeries {
    /// Iterates over `(date, value)` pairs, skipping masked entries.
    pub fn present(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.dates
            .iter()
            .zip(self.values.iter())
            .filter_map(|(d, v)| v.map(|v| (*d, v)))
    }
}

/// A readable raster dataset handle: vertex coordinate arrays plus zero or
/// more data variables indexed by `(time, y, x)`.
///
/// Implemented by [`crate::NetcdfRaster`] for NetCDF files; extraction only
/// ever talks to this trait, so tests can substitute in-memory datasets.
pub trait RasterDataset {
    /// Short human-readable identifier used in logs and reports, typically
    /// the file name.
    fn label(&self) -> &str;

    /// Loads the vertex coordinate arrays as a [`Grid`].
    ///
    /// # Errors
    ///
    /// Returns [`RasterError`] when the coordinate variables are missing,
    /// have the wrong rank, or do not form a valid grid.
    fn grid(&self) -> Result<Grid, RasterError>;

    /// True when the dataset carries a data variable with this name.
    fn has_variable(&self, name: &str) -> bool;

    /// Reads one variable's complete time series at `cell`.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError`] when the variable is absent, has an
    /// unsupported shape, or the underlying read fails.
    fn read_series(&self, variable: &str, cell: GridCell) -> Result<VariableSeries, RasterError>;
}
