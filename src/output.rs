//! CSV persistence for extracted and smoothed series.
//!
//! File naming mirrors the resolved grid cell so outputs are traceable back
//! to the raster: `{grid_y}_{grid_x}_{location_id}.csv` for raw series,
//! `avg_{radius}d_{grid_y}_{grid_x}_{location_id}_{from}-{to}.csv` for
//! smoothed ones, plus a single `locations_metadata.csv` table of every
//! resolved location.
//!
//! These helpers are callable per location as soon as its table is
//! complete, so long runs can flush partial progress instead of holding
//! everything until the end.

use crate::error::GridClimError;
use crate::gridclim::ExtractionRun;
use crate::smooth::rolling::RollingMean;
use crate::types::location::Location;
use log::info;
use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use std::fs;
use std::path::{Path, PathBuf};

const METADATA_FILE_NAME: &str = "locations_metadata.csv";

/// Writes one location's extracted series as a headered CSV.
///
/// # Errors
///
/// Returns [`GridClimError::UnresolvedLocation`] when the location never
/// resolved to a grid cell, and I/O or serialization variants when the file
/// cannot be produced.
pub fn write_location_series(
    dir: &Path,
    location: &Location,
    frame: &DataFrame,
) -> Result<PathBuf, GridClimError> {
    let cell = location
        .grid_cell()
        .ok_or_else(|| GridClimError::UnresolvedLocation(location.id.clone()))?;
    let path = dir.join(format!("{}_{}_{}.csv", cell.y, cell.x, location.id));
    write_csv(dir, &path, frame)?;
    info!("saved series for '{}' to '{}'", location.id, path.display());
    Ok(path)
}

/// Writes one location's smoothed series, naming the file after the window
/// radius and year range that produced it.
///
/// # Errors
///
/// Same failure modes as [`write_location_series`].
pub fn write_smoothed_series(
    dir: &Path,
    location: &Location,
    smoother: &RollingMean,
    frame: &DataFrame,
) -> Result<PathBuf, GridClimError> {
    let cell = location
        .grid_cell()
        .ok_or_else(|| GridClimError::UnresolvedLocation(location.id.clone()))?;
    let path = dir.join(format!(
        "avg_{}d_{}_{}_{}_{}-{}.csv",
        smoother.radius(),
        cell.y,
        cell.x,
        location.id,
        smoother.from_year(),
        smoother.to_year()
    ));
    write_csv(dir, &path, frame)?;
    info!(
        "saved smoothed series for '{}' to '{}'",
        location.id,
        path.display()
    );
    Ok(path)
}

/// Writes the run's resolution metadata table.
///
/// One row per resolved location, updated at most once per run; callers
/// re-invoke this between datasets to checkpoint progress.
///
/// # Errors
///
/// Returns I/O or serialization variants of [`GridClimError`] when the file
/// cannot be produced.
pub fn write_location_metadata(
    dir: &Path,
    run: &ExtractionRun,
) -> Result<PathBuf, GridClimError> {
    let path = dir.join(METADATA_FILE_NAME);
    let frame = run.metadata_frame()?;
    write_csv(dir, &path, &frame)?;
    info!(
        "saved metadata for {} resolved locations to '{}'",
        frame.height(),
        path.display()
    );
    Ok(path)
}

fn write_csv(dir: &Path, path: &Path, frame: &DataFrame) -> Result<(), GridClimError> {
    fs::create_dir_all(dir)
        .map_err(|e| GridClimError::OutputDirCreation(dir.to_path_buf(), e))?;
    let file = fs::File::create(path)
        .map_err(|e| GridClimError::OutputFileCreation(path.to_path_buf(), e))?;
    let mut frame = frame.clone();
    CsvWriter::new(file)
        .include_header(true)
        .finish(&mut frame)
        .map_err(|e| GridClimError::OutputSerialize(path.to_path_buf(), e))?;
    Ok(())
}
