//! This module provides the main entry point for extracting per-location
//! daily climate series from gridded raster datasets. A run takes a set of
//! named locations and a list of dataset files, resolves each location to
//! its grid cell once, and accumulates every requested variable into one
//! date-keyed table per location.

use crate::error::GridClimError;
use crate::extract::extractor::SeriesExtractor;
use crate::extract::report::{DatasetReport, RunReport};
use crate::extract::table::SeriesTable;
use crate::raster::dataset::RasterDataset;
use crate::raster::netcdf_source::NetcdfRaster;
use crate::types::location::{Location, LocationMetadata};
use bon::bon;
use log::{info, warn};
use polars::prelude::{Column, DataFrame};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// The main client for extracting per-location time series.
///
/// Configured once with the variable names to pull out of every dataset;
/// [`GridClim::extract`] then runs the full dataset-by-dataset,
/// location-by-location pass and returns an [`ExtractionRun`] holding the
/// accumulated tables, the frozen location resolutions, and a run report.
///
/// # Examples
///
/// ```no_run
/// use gridclim::{GridClim, Location};
/// use std::path::PathBuf;
///
/// # fn run() -> Result<(), gridclim::GridClimError> {
/// let client = GridClim::builder()
///     .variables(vec!["tasmax".to_string(), "tasmin".to_string()])
///     .build()?;
///
/// let run = client
///     .extract()
///     .locations(vec![Location::new("berlin", "Berlin", 52.52, 13.405)])
///     .datasets(vec![
///         PathBuf::from("tasmax_1961.nc"),
///         PathBuf::from("tasmin_1961.nc"),
///     ])
///     .call()?;
///
/// let frame = run.frame("berlin")?;
/// println!("{frame}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct GridClim {
    extractor: SeriesExtractor,
}

#[bon]
impl GridClim {
    /// Creates a client that extracts the given variables.
    ///
    /// # Arguments
    ///
    /// * `.variables(Vec<String>)`: **Required.** Names of the data
    ///   variables to read from each dataset. Datasets carrying only a
    ///   subset are fine; absent variables are skipped per dataset.
    ///
    /// # Errors
    ///
    /// Returns [`GridClimError::Extract`] when the variable list is empty.
    #[builder]
    pub fn new(variables: Vec<String>) -> Result<Self, GridClimError> {
        Ok(Self {
            extractor: SeriesExtractor::new(variables)?,
        })
    }

    /// The variable names this client extracts.
    pub fn variables(&self) -> &[String] {
        self.extractor.variables()
    }

    /// Runs a full extraction over NetCDF dataset files.
    ///
    /// Datasets are processed sequentially, locations sequentially within
    /// each dataset. A dataset that cannot be opened, or that carries none
    /// of the requested variables, is logged and skipped without aborting
    /// the run; the same holds for a single location failing to read. The
    /// first dataset that resolves a location freezes its grid cell for the
    /// rest of the run.
    ///
    /// # Arguments
    ///
    /// * `.locations(Vec<Location>)`: **Required.** Targets to extract;
    ///   ownership moves into the returned run, which carries their frozen
    ///   resolutions.
    /// * `.datasets(Vec<PathBuf>)`: **Required.** NetCDF files to process,
    ///   typically one file per variable per year.
    ///
    /// # Errors
    ///
    /// Returns [`GridClimError::NoLocations`] or
    /// [`GridClimError::NoDatasets`] when either list is empty. Per-dataset
    /// and per-location failures never surface as errors; consult
    /// [`ExtractionRun::report`] for what was skipped.
    #[builder]
    pub fn extract(
        &self,
        locations: Vec<Location>,
        datasets: Vec<PathBuf>,
    ) -> Result<ExtractionRun, GridClimError> {
        if locations.is_empty() {
            return Err(GridClimError::NoLocations);
        }
        if datasets.is_empty() {
            return Err(GridClimError::NoDatasets);
        }

        let mut locations = locations;
        let mut tables = BTreeMap::new();
        let mut report = RunReport::default();

        info!(
            "extracting {} variables for {} locations from {} datasets",
            self.variables().len(),
            locations.len(),
            datasets.len()
        );

        for path in &datasets {
            match NetcdfRaster::open(path) {
                Ok(raster) => {
                    self.run_dataset(&raster, &mut locations, &mut tables, &mut report)
                }
                Err(e) => {
                    warn!("skipping unreadable dataset '{}': {}", path.display(), e);
                    let label = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.to_string_lossy().into_owned());
                    report.record(DatasetReport::skipped(label, e.to_string()));
                }
            }
        }

        info!(
            "extraction finished: {} datasets processed, {} skipped",
            report.processed_datasets(),
            report.skipped_datasets()
        );

        Ok(ExtractionRun {
            variables: self.variables().to_vec(),
            locations,
            tables,
            report,
        })
    }

    /// Runs a full extraction over already-opened raster datasets.
    ///
    /// Same semantics as [`GridClim::extract`], for callers that manage
    /// their own [`RasterDataset`] handles (or substitute non-NetCDF
    /// implementations).
    ///
    /// # Errors
    ///
    /// Returns [`GridClimError::NoLocations`] or
    /// [`GridClimError::NoDatasets`] when either list is empty.
    pub fn extract_datasets(
        &self,
        locations: Vec<Location>,
        datasets: &[&dyn RasterDataset],
    ) -> Result<ExtractionRun, GridClimError> {
        if locations.is_empty() {
            return Err(GridClimError::NoLocations);
        }
        if datasets.is_empty() {
            return Err(GridClimError::NoDatasets);
        }

        let mut locations = locations;
        let mut tables = BTreeMap::new();
        let mut report = RunReport::default();

        for &dataset in datasets {
            self.run_dataset(dataset, &mut locations, &mut tables, &mut report);
        }

        Ok(ExtractionRun {
            variables: self.variables().to_vec(),
            locations,
            tables,
            report,
        })
    }

    /// Processes one dataset, downgrading dataset-level failures to a
    /// logged skip entry in the report.
    fn run_dataset(
        &self,
        dataset: &dyn RasterDataset,
        locations: &mut [Location],
        tables: &mut BTreeMap<String, SeriesTable>,
        report: &mut RunReport,
    ) {
        match self.extractor.process_dataset(dataset, locations, tables) {
            Ok(dataset_report) => {
                info!(
                    "processed '{}': {} locations extracted, {} skipped",
                    dataset_report.label,
                    dataset_report.locations_extracted,
                    dataset_report.locations_skipped
                );
                report.record(dataset_report);
            }
            Err(e) => {
                warn!("skipping dataset '{}': {}", dataset.label(), e);
                report.record(DatasetReport::skipped(dataset.label(), e.to_string()));
            }
        }
    }
}

/// The result of one extraction run.
///
/// Owns the locations (with their frozen grid resolutions), one
/// [`SeriesTable`] per location that produced data, and the run-level
/// report. Tables convert to date-sorted [`DataFrame`]s on demand for
/// smoothing or persistence.
#[derive(Debug)]
pub struct ExtractionRun {
    variables: Vec<String>,
    locations: Vec<Location>,
    tables: BTreeMap<String, SeriesTable>,
    report: RunReport,
}

impl ExtractionRun {
    /// The locations of this run, resolutions included.
    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// Looks up a location by id.
    pub fn location(&self, id: &str) -> Option<&Location> {
        self.locations.iter().find(|l| l.id == id)
    }

    /// Best-effort accounting of processed and skipped work.
    pub fn report(&self) -> &RunReport {
        &self.report
    }

    /// The accumulated table for a location, if any dataset produced data
    /// for it.
    pub fn table(&self, id: &str) -> Option<&SeriesTable> {
        self.tables.get(id)
    }

    /// Converts a location's table into a date-sorted [`DataFrame`] with
    /// one column per requested variable that carries data.
    ///
    /// A location no dataset reached yields an empty, headered frame.
    ///
    /// # Errors
    ///
    /// Returns [`GridClimError::UnknownLocation`] for an id outside this
    /// run and [`GridClimError::Extract`] if the frame cannot be built.
    pub fn frame(&self, id: &str) -> Result<DataFrame, GridClimError> {
        if self.location(id).is_none() {
            return Err(GridClimError::UnknownLocation(id.to_string()));
        }
        let table = match self.tables.get(id) {
            Some(table) => table.to_frame(&self.variables)?,
            None => SeriesTable::new().to_frame(&self.variables)?,
        };
        Ok(table)
    }

    /// Resolution metadata rows for every resolved location, in run order.
    pub fn metadata(&self) -> Vec<LocationMetadata> {
        self.locations.iter().filter_map(Location::metadata).collect()
    }

    /// The resolution metadata as a [`DataFrame`] ready for persistence.
    ///
    /// # Errors
    ///
    /// Returns [`GridClimError::Extract`] if the frame cannot be built.
    pub fn metadata_frame(&self) -> Result<DataFrame, GridClimError> {
        let rows = self.metadata();
        let ids: Vec<&str> = rows.iter().map(|r| r.location_id.as_str()).collect();
        let lat: Vec<f64> = rows.iter().map(|r| r.lat).collect();
        let lon: Vec<f64> = rows.iter().map(|r| r.lon).collect();
        let grid_y: Vec<u32> = rows.iter().map(|r| r.grid_y as u32).collect();
        let grid_x: Vec<u32> = rows.iter().map(|r| r.grid_x as u32).collect();
        let lat1: Vec<f64> = rows.iter().map(|r| r.cell_lat1).collect();
        let lon1: Vec<f64> = rows.iter().map(|r| r.cell_lon1).collect();
        let lat2: Vec<f64> = rows.iter().map(|r| r.cell_lat2).collect();
        let lon2: Vec<f64> = rows.iter().map(|r| r.cell_lon2).collect();

        let frame = DataFrame::new(vec![
            Column::new("location_id".into(), ids),
            Column::new("lat".into(), lat),
            Column::new("lon".into(), lon),
            Column::new("grid_y".into(), grid_y),
            Column::new("grid_x".into(), grid_x),
            Column::new("cell_lat1".into(), lat1),
            Column::new("cell_lon1".into(), lon1),
            Column::new("cell_lat2".into(), lat2),
            Column::new("cell_lon2".into(), lon2),
        ])
        .map_err(crate::extract::error::ExtractError::from)?;
        Ok(frame)
    }
}
