//! NetCDF-backed raster datasets.
//!
//! Opens one file per dataset and exposes it through [`RasterDataset`]:
//! 2-D vertex coordinate arrays (tried under the usual CF aliases), a CF
//! time axis, and per-cell hyperslab reads of the data variables with
//! fill-value masking.

use crate::grid::geometry::{Grid, GridCell};
use crate::raster::dataset::{RasterDataset, VariableSeries};
use crate::raster::error::RasterError;
use crate::raster::time::decode_time_axis;
use chrono::NaiveDate;
use netcdf::AttributeValue;
use std::path::{Path, PathBuf};

const LAT_ALIASES: &[&str] = &["lat", "latitude"];
const LON_ALIASES: &[&str] = &["lon", "longitude"];
const TIME_VAR: &str = "time";

/// A single open NetCDF file treated as a raster dataset.
///
/// The handle is scoped to one extraction pass; grid geometry derived from
/// it is recomputed per open rather than cached across files.
pub struct NetcdfRaster {
    file: netcdf::File,
    path: PathBuf,
    label: String,
}

impl NetcdfRaster {
    /// Opens the NetCDF file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RasterError::FileNotFound`] if the path does not exist on
    /// disk and [`RasterError::Open`] if the NetCDF library rejects it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RasterError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Err(RasterError::FileNotFound(path));
        }
        let file = netcdf::open(&path).map_err(|e| RasterError::Open(path.clone(), e))?;
        let label = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Ok(Self { file, path, label })
    }

    /// Read a 2-D coordinate variable, trying each alias in order.
    fn corner_array(&self, aliases: &[&str]) -> Result<(Vec<f64>, usize, usize), RasterError> {
        for &alias in aliases {
            let Some(var) = self.file.variable(alias) else {
                continue;
            };
            let dims = var.dimensions();
            if dims.len() != 2 {
                return Err(RasterError::CoordinateRank {
                    name: alias.to_string(),
                    path: self.path.clone(),
                    got: dims.len(),
                });
            }
            let rows = dims[0].len();
            let cols = dims[1].len();
            let values = var
                .get_values::<f64, _>(..)
                .map_err(|e| RasterError::VariableRead {
                    name: alias.to_string(),
                    path: self.path.clone(),
                    source: e,
                })?;
            return Ok((values, rows, cols));
        }
        Err(RasterError::MissingCoordinates {
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            path: self.path.clone(),
        })
    }

    /// Decode the time axis to calendar dates via its CF `units` attribute.
    fn time_axis(&self) -> Result<Vec<NaiveDate>, RasterError> {
        let var = self
            .file
            .variable(TIME_VAR)
            .ok_or_else(|| RasterError::MissingVariable {
                name: TIME_VAR.to_string(),
                path: self.path.clone(),
            })?;

        let offsets = var
            .get_values::<f64, _>(..)
            .map_err(|e| RasterError::VariableRead {
                name: TIME_VAR.to_string(),
                path: self.path.clone(),
                source: e,
            })?;

        let units: String = var
            .attribute_value("units")
            .ok_or_else(|| RasterError::InvalidTime {
                path: self.path.clone(),
                reason: "time variable has no 'units' attribute".to_string(),
            })?
            .map_err(|e| RasterError::InvalidTime {
                path: self.path.clone(),
                reason: format!("failed to read 'units' attribute: {e}"),
            })?
            .try_into()
            .map_err(|e: netcdf::Error| RasterError::InvalidTime {
                path: self.path.clone(),
                reason: format!("'units' attribute is not a string: {e}"),
            })?;

        decode_time_axis(&units, &offsets).map_err(|reason| RasterError::InvalidTime {
            path: self.path.clone(),
            reason,
        })
    }

    /// The declared fill/missing sentinel of a variable, if any.
    fn fill_value(var: &netcdf::Variable) -> Option<f64> {
        for attr in ["_FillValue", "missing_value"] {
            let value = var.attribute_value(attr).and_then(Result::ok);
            match value {
                Some(AttributeValue::Double(v)) => return Some(v),
                Some(AttributeValue::Float(v)) => return Some(v as f64),
                Some(AttributeValue::Int(v)) => return Some(v as f64),
                Some(AttributeValue::Short(v)) => return Some(v as f64),
                _ => {}
            }
        }
        None
    }
}

impl RasterDataset for NetcdfRaster {
    fn label(&self) -> &str {
        &self.label
    }

    fn grid(&self) -> Result<Grid, RasterError> {
        let (lat, lat_rows, lat_cols) = self.corner_array(LAT_ALIASES)?;
        let (lon, lon_rows, lon_cols) = self.corner_array(LON_ALIASES)?;
        // Let Grid validation report shape disagreements between the two
        // arrays; they share dimensions in well-formed files.
        let rows = lat_rows.max(lon_rows);
        let cols = lat_cols.max(lon_cols);
        Grid::from_corners(lat, lon, rows, cols).map_err(|source| RasterError::InvalidGrid {
            path: self.path.clone(),
            source,
        })
    }

    fn has_variable(&self, name: &str) -> bool {
        self.file.variable(name).is_some()
    }

    fn read_series(&self, variable: &str, cell: GridCell) -> Result<VariableSeries, RasterError> {
        let var = self
            .file
            .variable(variable)
            .ok_or_else(|| RasterError::MissingVariable {
                name: variable.to_string(),
                path: self.path.clone(),
            })?;

        let dims = var.dimensions();
        let rank = dims.len();
        if rank != 3 && rank != 4 {
            return Err(RasterError::VariableRank {
                name: variable.to_string(),
                path: self.path.clone(),
                got: rank,
            });
        }

        let (ny, nx) = (dims[1].len(), dims[2].len());
        if cell.y >= ny || cell.x >= nx {
            return Err(RasterError::CellOutOfRange {
                name: variable.to_string(),
                path: self.path.clone(),
                y: cell.y,
                x: cell.x,
                ny,
                nx,
            });
        }

        let raw = if rank == 3 {
            var.get_values::<f64, _>((.., cell.y, cell.x))
        } else {
            // A trailing bounds axis: only the first bounds entry carries the
            // primary value.
            var.get_values::<f64, _>((.., cell.y, cell.x, 0usize))
        }
        .map_err(|e| RasterError::VariableRead {
            name: variable.to_string(),
            path: self.path.clone(),
            source: e,
        })?;

        let dates = self.time_axis()?;
        if raw.len() != dates.len() {
            return Err(RasterError::TimeLengthMismatch {
                name: variable.to_string(),
                path: self.path.clone(),
                values: raw.len(),
                timesteps: dates.len(),
            });
        }

        let fill = Self::fill_value(&var);
        let values = raw
            .into_iter()
            .map(|v| {
                if !v.is_finite() || fill.is_some_and(|f| v == f) {
                    None
                } else {
                    Some(v)
                }
            })
            .collect();

        Ok(VariableSeries { dates, values })
    }
}
