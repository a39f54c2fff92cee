//! Run-level accounting of what was extracted and what was skipped.

/// Outcome of one dataset within a run.
#[derive(Debug, Clone, PartialEq)]
pub enum DatasetStatus {
    /// The dataset was opened and iterated; per-location counts apply.
    Processed,
    /// The whole dataset was skipped, with the reason it was skipped.
    Skipped(String),
}

/// Per-dataset record in a [`RunReport`].
#[derive(Debug, Clone)]
pub struct DatasetReport {
    /// The dataset's label, typically its file name.
    pub label: String,
    pub status: DatasetStatus,
    /// Locations whose series were extracted from this dataset.
    pub locations_extracted: usize,
    /// Locations skipped for this dataset only (read failures, unresolved).
    pub locations_skipped: usize,
}

impl DatasetReport {
    pub(crate) fn skipped(label: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            status: DatasetStatus::Skipped(reason.into()),
            locations_extracted: 0,
            locations_skipped: 0,
        }
    }
}

/// Aggregated best-effort accounting for an extraction run.
///
/// One bad input never prevents output for the remaining valid inputs; this
/// report is how the caller learns what was dropped along the way instead of
/// having to scrape logs.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    datasets: Vec<DatasetReport>,
}

impl RunReport {
    pub(crate) fn record(&mut self, report: DatasetReport) {
        self.datasets.push(report);
    }

    /// Per-dataset outcomes, in processing order.
    pub fn datasets(&self) -> &[DatasetReport] {
        &self.datasets
    }

    /// Number of datasets that were processed.
    pub fn processed_datasets(&self) -> usize {
        self.datasets
            .iter()
            .filter(|d| d.status == DatasetStatus::Processed)
            .count()
    }

    /// Number of datasets that were skipped entirely.
    pub fn skipped_datasets(&self) -> usize {
        self.datasets.len() - self.processed_datasets()
    }
}
