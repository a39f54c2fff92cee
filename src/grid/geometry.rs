//! Curvilinear grid geometry.
//!
//! A [`Grid`] is defined by two co-shaped 2-D arrays giving the geographic
//! coordinate of every grid *vertex*. The quadrilateral between four adjacent
//! vertices is a cell; [`Grid::cell_centers`] derives one center point per
//! cell and [`CellCenters::nearest_cell`] matches a target coordinate to its
//! enclosing cell by scanning those centers.

use crate::grid::error::GridError;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
/// Both values are represented as `f64`.
///
/// # Examples
///
/// ```
/// use gridclim::LatLon;
///
/// let berlin_center = LatLon(52.5200, 13.4050);
/// assert_eq!(berlin_center.0, 52.5200); // Latitude
/// assert_eq!(berlin_center.1, 13.4050); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

/// Index of a grid cell, `y` along the first axis and `x` along the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub y: usize,
    pub x: usize,
}

/// Approximate bounding box of a grid cell.
///
/// `lat1`/`lon1` is the cell's own corner coordinate; `lat2`/`lon2` is the
/// next corner along each axis, or a linearly extrapolated estimate when the
/// cell sits on the last row or column of the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellBounds {
    pub lat1: f64,
    pub lon1: f64,
    pub lat2: f64,
    pub lon2: f64,
}

/// A curvilinear quadrilateral mesh defined by vertex coordinate arrays.
///
/// Corner arrays are stored flattened in row-major order; `rows` and `cols`
/// count *vertices*, so the grid holds `(rows - 1) * (cols - 1)` cells.
/// Construction validates that both arrays are co-shaped, finite, and large
/// enough to form at least one cell.
#[derive(Debug, Clone)]
pub struct Grid {
    lat: Vec<f64>,
    lon: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl Grid {
    /// Builds a grid from flattened row-major vertex coordinate arrays.
    ///
    /// # Arguments
    ///
    /// * `lat` - Vertex latitudes, `rows * cols` values in row-major order.
    /// * `lon` - Vertex longitudes, same shape as `lat`.
    /// * `rows` - Number of vertex rows (the Y axis).
    /// * `cols` - Number of vertex columns (the X axis).
    ///
    /// # Errors
    ///
    /// Returns [`GridError::TooFewVertices`] if the grid cannot form a single
    /// cell, [`GridError::ShapeMismatch`] if either array does not hold
    /// exactly `rows * cols` values, and [`GridError::NonFiniteCorner`] if
    /// any coordinate is NaN or infinite.
    pub fn from_corners(
        lat: Vec<f64>,
        lon: Vec<f64>,
        rows: usize,
        cols: usize,
    ) -> Result<Self, GridError> {
        if rows < 2 || cols < 2 {
            return Err(GridError::TooFewVertices { rows, cols });
        }
        let expected = rows * cols;
        if lat.len() != expected || lon.len() != expected {
            return Err(GridError::ShapeMismatch {
                rows,
                cols,
                expected,
                lat_len: lat.len(),
                lon_len: lon.len(),
            });
        }
        for (i, (la, lo)) in lat.iter().zip(lon.iter()).enumerate() {
            if !la.is_finite() || !lo.is_finite() {
                return Err(GridError::NonFiniteCorner {
                    y: i / cols,
                    x: i % cols,
                });
            }
        }
        Ok(Self {
            lat,
            lon,
            rows,
            cols,
        })
    }

    /// Number of vertex rows.
    pub fn vertex_rows(&self) -> usize {
        self.rows
    }

    /// Number of vertex columns.
    pub fn vertex_cols(&self) -> usize {
        self.cols
    }

    /// Number of cell rows, one less than the vertex rows.
    pub fn cell_rows(&self) -> usize {
        self.rows - 1
    }

    /// Number of cell columns, one less than the vertex columns.
    pub fn cell_cols(&self) -> usize {
        self.cols - 1
    }

    fn corner(&self, y: usize, x: usize) -> (f64, f64) {
        let i = y * self.cols + x;
        (self.lat[i], self.lon[i])
    }

    /// Derives the center of every cell by averaging its four corner
    /// coordinates, latitude and longitude independently.
    ///
    /// Pure function of the corner arrays; runs in O(rows * cols). The
    /// resulting centers form a `(rows - 1) x (cols - 1)` array.
    pub fn cell_centers(&self) -> CellCenters {
        let crows = self.cell_rows();
        let ccols = self.cell_cols();
        let mut lat = Vec::with_capacity(crows * ccols);
        let mut lon = Vec::with_capacity(crows * ccols);
        for y in 0..crows {
            for x in 0..ccols {
                let (la00, lo00) = self.corner(y, x);
                let (la10, lo10) = self.corner(y + 1, x);
                let (la01, lo01) = self.corner(y, x + 1);
                let (la11, lo11) = self.corner(y + 1, x + 1);
                lat.push((la00 + la10 + la01 + la11) / 4.0);
                lon.push((lo00 + lo10 + lo01 + lo11) / 4.0);
            }
        }
        CellCenters {
            lat,
            lon,
            rows: crows,
            cols: ccols,
        }
    }

    /// Reports the approximate bounds of the cell anchored at vertex `(y, x)`.
    ///
    /// The first coordinate pair is the cell's own corner; the second is the
    /// next corner along each axis. On the last row or column the missing
    /// neighbor is estimated by extending the delta to the previous interior
    /// vertex. An axis with no interior neighbor at all collapses to a
    /// zero-width bound rather than failing; grids that narrow only occur in
    /// degenerate inputs.
    ///
    /// # Panics
    ///
    /// Panics if `(y, x)` is outside the vertex arrays.
    pub fn cell_bounds(&self, y: usize, x: usize) -> CellBounds {
        assert!(
            y < self.rows && x < self.cols,
            "vertex ({y}, {x}) outside {}x{} grid",
            self.rows,
            self.cols
        );
        let (lat1, lon1) = self.corner(y, x);

        let lat2 = if y + 1 < self.rows {
            self.corner(y + 1, x).0
        } else if y > 0 {
            let prev = self.corner(y - 1, x).0;
            lat1 + (lat1 - prev)
        } else {
            lat1
        };

        let lon2 = if x + 1 < self.cols {
            self.corner(y, x + 1).1
        } else if x > 0 {
            let prev = self.corner(y, x - 1).1;
            lon1 + (lon1 - prev)
        } else {
            lon1
        };

        CellBounds {
            lat1,
            lon1,
            lat2,
            lon2,
        }
    }
}

/// Cell-center coordinates derived from a [`Grid`], one entry per cell.
///
/// Scoped to one open dataset; recomputed whenever a grid is loaded rather
/// than persisted across runs.
#[derive(Debug, Clone)]
pub struct CellCenters {
    lat: Vec<f64>,
    lon: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl CellCenters {
    /// Number of cell rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of cell columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// True when the grid holds no cells at all.
    pub fn is_empty(&self) -> bool {
        self.lat.is_empty()
    }

    /// Center coordinate of cell `(y, x)`.
    ///
    /// # Panics
    ///
    /// Panics if `(y, x)` is outside the cell array.
    pub fn center(&self, y: usize, x: usize) -> LatLon {
        assert!(y < self.rows && x < self.cols);
        let i = y * self.cols + x;
        LatLon(self.lat[i], self.lon[i])
    }

    /// Finds the cell whose center is closest to `target`.
    ///
    /// Distance is plain Euclidean in raw (lat, lon) degree space, with no
    /// geodesic correction; good enough to pick the enclosing cell of a
    /// regional grid. Ties keep the first match in row-major scan order so
    /// repeated runs resolve identically. Returns `None` only when the grid
    /// holds no cells.
    pub fn nearest_cell(&self, target: LatLon) -> Option<GridCell> {
        let mut best: Option<(usize, f64)> = None;
        for (i, (la, lo)) in self.lat.iter().zip(self.lon.iter()).enumerate() {
            let dy = la - target.0;
            let dx = lo - target.1;
            let dist2 = dy * dy + dx * dx;
            match best {
                Some((_, best_dist)) if dist2 >= best_dist => {}
                _ => best = Some((i, dist2)),
            }
        }
        best.map(|(i, _)| GridCell {
            y: i / self.cols,
            x: i % self.cols,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 3x3 vertex grid (2x2 cells) with unit spacing: lat rows 0,1,2 and lon
    /// columns 10,11,12.
    fn unit_grid() -> Grid {
        let mut lat = Vec::new();
        let mut lon = Vec::new();
        for y in 0..3 {
            for x in 0..3 {
                lat.push(y as f64);
                lon.push(10.0 + x as f64);
            }
        }
        Grid::from_corners(lat, lon, 3, 3).expect("valid grid")
    }

    fn single_cell_grid() -> Grid {
        // Corners at (0,0), (0,2), (2,0), (2,2).
        Grid::from_corners(vec![0.0, 0.0, 2.0, 2.0], vec![0.0, 2.0, 0.0, 2.0], 2, 2)
            .expect("valid grid")
    }

    #[test]
    fn rejects_mismatched_shapes() {
        let err = Grid::from_corners(vec![0.0; 9], vec![0.0; 8], 3, 3).unwrap_err();
        assert!(matches!(err, GridError::ShapeMismatch { .. }));
    }

    #[test]
    fn rejects_single_row() {
        let err = Grid::from_corners(vec![0.0; 3], vec![0.0; 3], 1, 3).unwrap_err();
        assert!(matches!(err, GridError::TooFewVertices { .. }));
    }

    #[test]
    fn rejects_nan_corner() {
        let err = Grid::from_corners(
            vec![0.0, 0.0, f64::NAN, 2.0],
            vec![0.0, 2.0, 0.0, 2.0],
            2,
            2,
        )
        .unwrap_err();
        assert!(matches!(err, GridError::NonFiniteCorner { y: 1, x: 0 }));
    }

    #[test]
    fn single_cell_center_is_corner_mean() {
        let centers = single_cell_grid().cell_centers();
        assert_eq!(centers.rows(), 1);
        assert_eq!(centers.cols(), 1);
        let c = centers.center(0, 0);
        assert_eq!(c, LatLon(1.0, 1.0));
    }

    #[test]
    fn single_cell_grid_always_resolves_to_origin() {
        let centers = single_cell_grid().cell_centers();
        for target in [
            LatLon(0.0, 0.0),
            LatLon(-90.0, 180.0),
            LatLon(55.5, -3.25),
            LatLon(1.0, 1.0),
        ] {
            assert_eq!(
                centers.nearest_cell(target),
                Some(GridCell { y: 0, x: 0 }),
                "target {target:?}"
            );
        }
    }

    #[test]
    fn nearest_cell_picks_enclosing_cell() {
        let centers = unit_grid().cell_centers();
        // Centers are at lat 0.5/1.5, lon 10.5/11.5.
        assert_eq!(
            centers.nearest_cell(LatLon(0.4, 10.4)),
            Some(GridCell { y: 0, x: 0 })
        );
        assert_eq!(
            centers.nearest_cell(LatLon(1.6, 11.9)),
            Some(GridCell { y: 1, x: 1 })
        );
    }

    #[test]
    fn vertex_target_ties_break_row_major() {
        // The shared vertex (1, 11) is equidistant from all four cell
        // centers; the first cell in row-major order must win, every run.
        let centers = unit_grid().cell_centers();
        for _ in 0..5 {
            assert_eq!(
                centers.nearest_cell(LatLon(1.0, 11.0)),
                Some(GridCell { y: 0, x: 0 })
            );
        }
    }

    #[test]
    fn interior_cell_bounds_use_exact_neighbors() {
        let grid = unit_grid();
        let b = grid.cell_bounds(0, 0);
        assert_eq!(
            b,
            CellBounds {
                lat1: 0.0,
                lon1: 10.0,
                lat2: 1.0,
                lon2: 11.0,
            }
        );
        let b = grid.cell_bounds(1, 1);
        assert_eq!(
            b,
            CellBounds {
                lat1: 1.0,
                lon1: 11.0,
                lat2: 2.0,
                lon2: 12.0,
            }
        );
    }

    #[test]
    fn last_row_and_column_bounds_extrapolate() {
        let grid = unit_grid();
        let b = grid.cell_bounds(2, 2);
        // Previous interior deltas are 1 degree on both axes.
        assert_eq!(
            b,
            CellBounds {
                lat1: 2.0,
                lon1: 12.0,
                lat2: 3.0,
                lon2: 13.0,
            }
        );
    }

    #[test]
    fn smallest_grid_bounds_stay_consistent() {
        // 2x2 grid: vertex (1, 1) sits on the last row and column but still
        // has interior neighbors to extrapolate from, while (0, 0) reads its
        // real neighbors directly.
        let grid = single_cell_grid();
        let b = grid.cell_bounds(1, 1);
        assert_eq!(b.lat1, 2.0);
        assert_eq!(b.lat2, 4.0);
        assert_eq!(b.lon1, 2.0);
        assert_eq!(b.lon2, 4.0);
        let b = grid.cell_bounds(0, 0);
        assert_eq!(b.lat2, 2.0);
        assert_eq!(b.lon2, 2.0);
    }
}
