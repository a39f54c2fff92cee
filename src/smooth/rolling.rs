//! Centered rolling-mean smoothing of per-location daily series.

use crate::smooth::error::SmoothError;
use bon::bon;
use polars::prelude::*;

const DATE_COLUMN: &str = "date";
const DEFAULT_RADIUS: usize = 7;

/// A centered rolling-mean pass over a date-keyed frame, followed by a
/// year-range filter.
///
/// The window spans `radius` days on either side of each day. At the edges
/// of the series the window shrinks to whatever days exist instead of
/// padding, so every input date yields an output value. Averages are rounded
/// to 2 decimal places. The year filter runs strictly *after* smoothing;
/// days just outside the requested range still feed the windows of in-range
/// boundary days.
///
/// # Examples
///
/// ```no_run
/// use gridclim::RollingMean;
/// # use polars::prelude::DataFrame;
///
/// # fn run(frame: DataFrame) -> Result<(), Box<dyn std::error::Error>> {
/// let smoother = RollingMean::builder()
///     .from_year(1961)
///     .to_year(1990)
///     .build()?;
/// let smoothed = smoother.smooth(&frame)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollingMean {
    radius: usize,
    from_year: i32,
    to_year: i32,
}

#[bon]
impl RollingMean {
    /// Creates a smoothing configuration.
    ///
    /// # Arguments
    ///
    /// * `.radius(usize)`: Optional. Days included before and after each day.
    ///   Defaults to `7`, a 15-day window.
    /// * `.from_year(i32)`: **Required.** First output year, inclusive.
    /// * `.to_year(i32)`: **Required.** Last output year, inclusive.
    ///
    /// # Errors
    ///
    /// Returns [`SmoothError::InvalidYearRange`] when `from_year` is after
    /// `to_year`.
    #[builder]
    pub fn new(radius: Option<usize>, from_year: i32, to_year: i32) -> Result<Self, SmoothError> {
        let radius = radius.unwrap_or(DEFAULT_RADIUS);
        if from_year > to_year {
            return Err(SmoothError::InvalidYearRange {
                from: from_year,
                to: to_year,
            });
        }
        Ok(Self {
            radius,
            from_year,
            to_year,
        })
    }

    /// Days included before and after each day.
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// Total window size, the day itself plus `radius` days on either side.
    pub fn window_size(&self) -> usize {
        2 * self.radius + 1
    }

    /// First output year, inclusive.
    pub fn from_year(&self) -> i32 {
        self.from_year
    }

    /// Last output year, inclusive.
    pub fn to_year(&self) -> i32 {
        self.to_year
    }

    /// Smooths every metric column of `frame` and filters to the configured
    /// year range.
    ///
    /// `frame` must carry a `date` column; every other column is treated as
    /// a metric. The input is never mutated; the result is a new frame,
    /// sorted by date. Dates whose metric value was absent in the input stay
    /// absent in the output rather than being filled from neighbouring days.
    /// An empty input, or a year range that excludes every row, yields an
    /// empty frame with the same columns.
    ///
    /// # Errors
    ///
    /// Returns [`SmoothError::MissingDateColumn`] when `frame` has no `date`
    /// column and [`SmoothError::Polars`] when executing the rolling
    /// computation fails.
    pub fn smooth(&self, frame: &DataFrame) -> Result<DataFrame, SmoothError> {
        let names = frame.get_column_names_str();
        if !names.iter().any(|n| *n == DATE_COLUMN) {
            return Err(SmoothError::MissingDateColumn);
        }
        let metrics: Vec<String> = names
            .iter()
            .filter(|n| **n != DATE_COLUMN)
            .map(|n| n.to_string())
            .collect();

        if frame.height() == 0 {
            return Ok(frame.clone());
        }

        let options = RollingOptionsFixedWindow {
            window_size: self.window_size(),
            min_periods: 1,
            center: true,
            ..Default::default()
        };

        let smoothed = metrics
            .iter()
            .map(|metric| {
                when(col(metric.as_str()).is_not_null())
                    .then(
                        col(metric.as_str())
                            .rolling_mean(options.clone())
                            .round(2),
                    )
                    .otherwise(lit(NULL))
                    .alias(metric.as_str())
            })
            .collect::<Vec<Expr>>();

        let year = col(DATE_COLUMN).dt().year();
        let result = frame
            .clone()
            .lazy()
            .sort([DATE_COLUMN], Default::default())
            .with_columns(smoothed)
            .filter(
                year.clone()
                    .gt_eq(lit(self.from_year))
                    .and(year.lt_eq(lit(self.to_year))),
            )
            .collect()?;

        Ok(result)
    }
}
