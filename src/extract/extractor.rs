//! Per-dataset extraction: resolve each location against the dataset's grid,
//! read every requested variable that is present, and fold the results into
//! the locations' running tables.

use crate::extract::error::ExtractError;
use crate::extract::report::{DatasetReport, DatasetStatus};
use crate::extract::table::SeriesTable;
use crate::raster::dataset::RasterDataset;
use crate::types::location::Location;
use log::{error, warn};
use std::collections::BTreeMap;

/// Extracts the requested variables from raster datasets, one dataset at a
/// time.
///
/// The extractor itself is stateless between datasets; all accumulation
/// lives in the locations (frozen cell resolution) and their tables, which
/// the caller owns and threads through each call.
#[derive(Debug, Clone)]
pub struct SeriesExtractor {
    variables: Vec<String>,
}

impl SeriesExtractor {
    /// Creates an extractor for the given variable names.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::NoVariablesRequested`] when `variables` is
    /// empty; that is a configuration mistake, not a skippable condition.
    pub fn new(variables: Vec<String>) -> Result<Self, ExtractError> {
        if variables.is_empty() {
            return Err(ExtractError::NoVariablesRequested);
        }
        Ok(Self { variables })
    }

    /// The requested variable names, in request order.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Runs one dataset for every location, merging extracted series into
    /// `tables` (keyed by location id).
    ///
    /// Locations are resolved lazily: the first dataset that reaches an
    /// unresolved location freezes its grid cell. A read failure skips that
    /// location for this dataset only; the other locations still extract.
    ///
    /// # Errors
    ///
    /// Returns an error when the dataset as a whole is unusable (none of the
    /// requested variables present, unreadable coordinates); the caller is
    /// expected to record the skip and carry on with the next dataset.
    pub fn process_dataset(
        &self,
        dataset: &dyn RasterDataset,
        locations: &mut [Location],
        tables: &mut BTreeMap<String, SeriesTable>,
    ) -> Result<DatasetReport, ExtractError> {
        let available: Vec<&str> = self
            .variables
            .iter()
            .map(String::as_str)
            .filter(|v| dataset.has_variable(v))
            .collect();
        if available.is_empty() {
            return Err(ExtractError::NoRequestedVariables {
                dataset: dataset.label().to_string(),
                requested: self.variables.clone(),
            });
        }

        let grid = dataset.grid()?;
        let centers = grid.cell_centers();

        let mut extracted = 0;
        let mut skipped = 0;

        for location in locations.iter_mut() {
            let Some(cell) = location.resolve_if_unset(&grid, &centers) else {
                warn!(
                    "location '{}' did not resolve against dataset '{}'",
                    location.id,
                    dataset.label()
                );
                skipped += 1;
                continue;
            };

            let table = tables.entry(location.id.clone()).or_default();
            let mut failed = false;
            for &variable in &available {
                match dataset.read_series(variable, cell) {
                    Ok(series) => table.merge_series(variable, &series),
                    Err(e) => {
                        error!(
                            "failed to read '{}' at cell ({}, {}) for location '{}' from '{}': {}",
                            variable,
                            cell.y,
                            cell.x,
                            location.id,
                            dataset.label(),
                            e
                        );
                        failed = true;
                        break;
                    }
                }
            }
            if failed {
                skipped += 1;
            } else {
                extracted += 1;
            }
        }

        Ok(DatasetReport {
            label: dataset.label().to_string(),
            status: DatasetStatus::Processed,
            locations_extracted: extracted,
            locations_skipped: skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::geometry::{Grid, GridCell};
    use crate::raster::dataset::VariableSeries;
    use crate::raster::error::RasterError;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::path::PathBuf;

    /// In-memory dataset over a 2x3-vertex grid (two cells side by side).
    struct FakeRaster {
        label: String,
        variables: HashMap<String, Vec<Option<f64>>>,
        dates: Vec<NaiveDate>,
        failing_cells: Vec<GridCell>,
    }

    impl FakeRaster {
        fn new(label: &str, year: i32, variables: &[(&str, f64)]) -> Self {
            let dates: Vec<NaiveDate> = (1..=5)
                .map(|d| NaiveDate::from_ymd_opt(year, 1, d).unwrap())
                .collect();
            let variables = variables
                .iter()
                .map(|(name, base)| {
                    let values = (0..dates.len()).map(|i| Some(base + i as f64)).collect();
                    (name.to_string(), values)
                })
                .collect();
            Self {
                label: label.to_string(),
                variables,
                dates,
                failing_cells: Vec::new(),
            }
        }
    }

    impl RasterDataset for FakeRaster {
        fn label(&self) -> &str {
            &self.label
        }

        fn grid(&self) -> Result<Grid, RasterError> {
            let mut lat = Vec::new();
            let mut lon = Vec::new();
            for y in 0..2 {
                for x in 0..3 {
                    lat.push(y as f64);
                    lon.push(x as f64);
                }
            }
            Ok(Grid::from_corners(lat, lon, 2, 3).expect("valid grid"))
        }

        fn has_variable(&self, name: &str) -> bool {
            self.variables.contains_key(name)
        }

        fn read_series(
            &self,
            variable: &str,
            cell: GridCell,
        ) -> Result<VariableSeries, RasterError> {
            if self.failing_cells.contains(&cell) {
                return Err(RasterError::CellOutOfRange {
                    name: variable.to_string(),
                    path: PathBuf::from(&self.label),
                    y: cell.y,
                    x: cell.x,
                    ny: 2,
                    nx: 3,
                });
            }
            let values = self.variables[variable].clone();
            Ok(VariableSeries {
                dates: self.dates.clone(),
                values,
            })
        }
    }

    fn requested() -> Vec<String> {
        vec!["tasmax".to_string(), "tasmin".to_string()]
    }

    fn locations() -> Vec<Location> {
        vec![
            Location::new("west", "West", 0.5, 0.5),
            Location::new("east", "East", 0.5, 1.5),
        ]
    }

    #[test]
    fn merges_variables_from_separate_datasets() {
        let extractor = SeriesExtractor::new(requested()).expect("variables");
        let mut locs = locations();
        let mut tables = BTreeMap::new();

        // One file per variable covering the same year, as yearly archives
        // are commonly partitioned.
        let first = FakeRaster::new("tasmax_1961.nc", 1961, &[("tasmax", 10.0)]);
        let second = FakeRaster::new("tasmin_1961.nc", 1961, &[("tasmin", -5.0)]);

        let r1 = extractor
            .process_dataset(&first, &mut locs, &mut tables)
            .expect("first dataset");
        assert_eq!(r1.locations_extracted, 2);

        let r2 = extractor
            .process_dataset(&second, &mut locs, &mut tables)
            .expect("second dataset");
        assert_eq!(r2.locations_extracted, 2);

        let table = &tables["west"];
        assert_eq!(table.len(), 5);
        for day in 1..=5 {
            let date = NaiveDate::from_ymd_opt(1961, 1, day).unwrap();
            // Values from the first extraction survive the second merge.
            assert_eq!(table.value(date, "tasmax"), Some(10.0 + (day - 1) as f64));
            assert_eq!(table.value(date, "tasmin"), Some(-5.0 + (day - 1) as f64));
        }
    }

    #[test]
    fn dataset_with_no_requested_variables_is_reported_and_harmless() {
        let extractor = SeriesExtractor::new(requested()).expect("variables");
        let mut locs = locations();
        let mut tables = BTreeMap::new();

        let unrelated = FakeRaster::new("huss_1961.nc", 1961, &[("huss", 0.0)]);
        let err = extractor
            .process_dataset(&unrelated, &mut locs, &mut tables)
            .unwrap_err();
        assert!(matches!(err, ExtractError::NoRequestedVariables { .. }));
        assert!(tables.is_empty());
        // Locations are not resolved by a dataset that contributed nothing.
        assert!(locs.iter().all(|l| l.grid_cell().is_none()));
    }

    #[test]
    fn read_failure_skips_only_the_affected_location() {
        let extractor = SeriesExtractor::new(requested()).expect("variables");
        let mut locs = locations();
        let mut tables = BTreeMap::new();

        let mut dataset = FakeRaster::new("tasmax_1961.nc", 1961, &[("tasmax", 10.0)]);
        dataset.failing_cells.push(GridCell { y: 0, x: 1 });

        let report = extractor
            .process_dataset(&dataset, &mut locs, &mut tables)
            .expect("dataset processes");
        assert_eq!(report.locations_extracted, 1);
        assert_eq!(report.locations_skipped, 1);
        assert_eq!(tables["west"].len(), 5);
        assert!(tables
            .get("east")
            .map(SeriesTable::is_empty)
            .unwrap_or(true));
    }

    #[test]
    fn resolution_is_frozen_by_the_first_dataset() {
        let extractor = SeriesExtractor::new(requested()).expect("variables");
        let mut locs = locations();
        let mut tables = BTreeMap::new();

        let dataset = FakeRaster::new("tasmax_1961.nc", 1961, &[("tasmax", 10.0)]);
        extractor
            .process_dataset(&dataset, &mut locs, &mut tables)
            .expect("dataset processes");

        assert_eq!(locs[0].grid_cell(), Some(GridCell { y: 0, x: 0 }));
        assert_eq!(locs[1].grid_cell(), Some(GridCell { y: 0, x: 1 }));
        assert!(locs[0].metadata().is_some());
    }

    #[test]
    fn rejects_empty_variable_list() {
        assert!(matches!(
            SeriesExtractor::new(Vec::new()),
            Err(ExtractError::NoVariablesRequested)
        ));
    }
}
