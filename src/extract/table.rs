//! Per-location accumulation of extracted daily values.

use crate::extract::error::ExtractError;
use crate::raster::dataset::VariableSeries;
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::BTreeMap;

/// A location's running table of daily values, keyed by calendar date.
///
/// Entries accumulate across every dataset of a run; a date seen again later
/// (a second file carrying another variable for the same year, say) merges
/// field-wise into the existing record instead of replacing it. Within one
/// `(date, variable)` slot the last write wins, so re-reading a duplicate
/// file cannot crash the run.
#[derive(Debug, Clone, Default)]
pub struct SeriesTable {
    rows: BTreeMap<NaiveDate, BTreeMap<String, f64>>,
}

impl SeriesTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct dates in the table.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sets one variable's value for one date, creating the date record if
    /// it does not exist yet.
    pub fn insert(&mut self, date: NaiveDate, variable: &str, value: f64) {
        self.rows
            .entry(date)
            .or_default()
            .insert(variable.to_string(), value);
    }

    /// Folds a whole extracted series into the table, skipping masked
    /// entries so sentinel values stay absent rather than defaulting.
    pub fn merge_series(&mut self, variable: &str, series: &VariableSeries) {
        for (date, value) in series.present() {
            self.insert(date, variable, value);
        }
    }

    /// The value stored for `(date, variable)`, if any.
    pub fn value(&self, date: NaiveDate, variable: &str) -> Option<f64> {
        self.rows.get(&date).and_then(|r| r.get(variable)).copied()
    }

    /// True when at least one date carries a value for `variable`.
    pub fn has_variable(&self, variable: &str) -> bool {
        self.rows.values().any(|r| r.contains_key(variable))
    }

    /// Converts the table into a date-sorted [`DataFrame`].
    ///
    /// The frame holds a `date` column plus one column per requested
    /// variable that carries at least one value, in the requested order;
    /// dates with no value for a variable become nulls. Variables that never
    /// appeared are left out entirely. An empty table yields an empty,
    /// headered frame.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::Frame`] if the frame cannot be assembled.
    pub fn to_frame(&self, variables: &[String]) -> Result<DataFrame, ExtractError> {
        let dates: Vec<NaiveDate> = self.rows.keys().copied().collect();
        let mut columns = vec![date_column("date", &dates)];

        for variable in variables {
            if !self.has_variable(variable) {
                continue;
            }
            let values: Vec<Option<f64>> = self
                .rows
                .values()
                .map(|record| record.get(variable).copied())
                .collect();
            columns.push(Column::new(variable.as_str().into(), values));
        }

        DataFrame::new(columns).map_err(ExtractError::from)
    }
}

/// Builds a polars `Date` column from calendar dates.
fn date_column(name: &str, dates: &[NaiveDate]) -> Column {
    let epoch = NaiveDate::default();
    let days: Vec<i32> = dates.iter().map(|d| (*d - epoch).num_days() as i32).collect();
    Int32Chunked::from_vec(name.into(), days)
        .into_date()
        .into_series()
        .into_column()
}
