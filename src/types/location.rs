//! Target locations and their frozen grid resolution.

use crate::grid::geometry::{CellBounds, CellCenters, Grid, GridCell, LatLon};
use serde::{Deserialize, Serialize};

/// The grid cell a location resolved to, together with the cell's
/// approximate bounds at resolution time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedCell {
    pub cell: GridCell,
    pub bounds: CellBounds,
}

/// A named extraction target.
///
/// Produced by the caller from whatever source lists locations (structured
/// records, delimited tables); this crate never parses those formats itself.
/// The serde field layout matches the documented `{name, lat, lon}` mapping.
///
/// A location starts unresolved. The first dataset that successfully matches
/// it to a grid cell freezes that resolution for the rest of the run, so
/// every dataset sharing a grid agrees on the cell; a later dataset with a
/// different grid cannot revise it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    /// Stable identifier, used in output file names and report keys.
    pub id: String,
    /// Human-readable display name.
    pub name: String,
    /// Target latitude in decimal degrees.
    pub lat: f64,
    /// Target longitude in decimal degrees.
    pub lon: f64,
    #[serde(skip)]
    resolved: Option<ResolvedCell>,
}

impl Location {
    /// Creates an unresolved location.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        lat: f64,
        lon: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            lat,
            lon,
            resolved: None,
        }
    }

    /// The target coordinate as a [`LatLon`].
    pub fn coordinate(&self) -> LatLon {
        LatLon(self.lat, self.lon)
    }

    /// Resolves this location against a grid, unless it is already resolved.
    ///
    /// The first successful call stores the nearest cell and its bounds
    /// permanently; subsequent calls are no-ops that return the frozen cell,
    /// regardless of the grid passed in. Returns `None` only when the
    /// location is unresolved and `centers` holds no cells.
    pub fn resolve_if_unset(&mut self, grid: &Grid, centers: &CellCenters) -> Option<GridCell> {
        if let Some(resolved) = self.resolved {
            return Some(resolved.cell);
        }
        let cell = centers.nearest_cell(self.coordinate())?;
        let bounds = grid.cell_bounds(cell.y, cell.x);
        self.resolved = Some(ResolvedCell { cell, bounds });
        Some(cell)
    }

    /// The frozen grid cell, if this location has been resolved.
    pub fn grid_cell(&self) -> Option<GridCell> {
        self.resolved.map(|r| r.cell)
    }

    /// The frozen cell bounds, if this location has been resolved.
    pub fn cell_bounds(&self) -> Option<CellBounds> {
        self.resolved.map(|r| r.bounds)
    }

    /// The resolution metadata row for persistence, if resolved.
    pub fn metadata(&self) -> Option<LocationMetadata> {
        self.resolved.map(|r| LocationMetadata {
            location_id: self.id.clone(),
            lat: self.lat,
            lon: self.lon,
            grid_y: r.cell.y,
            grid_x: r.cell.x,
            cell_lat1: r.bounds.lat1,
            cell_lon1: r.bounds.lon1,
            cell_lat2: r.bounds.lat2,
            cell_lon2: r.bounds.lon2,
        })
    }
}

/// One row of location resolution metadata, written at most once per
/// location (from the first dataset that resolved it).
#[derive(Debug, Clone, Serialize)]
pub struct LocationMetadata {
    pub location_id: String,
    pub lat: f64,
    pub lon: f64,
    pub grid_y: usize,
    pub grid_x: usize,
    pub cell_lat1: f64,
    pub cell_lon1: f64,
    pub cell_lat2: f64,
    pub cell_lon2: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_cell_grid(offset: f64) -> Grid {
        // 2x3 vertices, two cells side by side; `offset` shifts the whole
        // grid so a second resolve attempt would pick a different cell if it
        // were allowed to.
        let mut lat = Vec::new();
        let mut lon = Vec::new();
        for y in 0..2 {
            for x in 0..3 {
                lat.push(offset + y as f64);
                lon.push(offset + x as f64);
            }
        }
        Grid::from_corners(lat, lon, 2, 3).expect("valid grid")
    }

    #[test]
    fn first_resolution_freezes_cell_and_bounds() {
        let grid = two_cell_grid(0.0);
        let centers = grid.cell_centers();
        let mut location = Location::new("aachen", "Aachen", 0.5, 0.5);

        let cell = location.resolve_if_unset(&grid, &centers).expect("resolves");
        assert_eq!(cell, GridCell { y: 0, x: 0 });
        assert_eq!(location.grid_cell(), Some(cell));
        assert!(location.cell_bounds().is_some());

        // A shifted grid must not change the frozen resolution.
        let other = two_cell_grid(5.0);
        let other_centers = other.cell_centers();
        let again = location
            .resolve_if_unset(&other, &other_centers)
            .expect("still resolved");
        assert_eq!(again, cell);
        assert_eq!(location.grid_cell(), Some(cell));
    }

    #[test]
    fn metadata_reflects_frozen_resolution() {
        let grid = two_cell_grid(0.0);
        let centers = grid.cell_centers();
        let mut location = Location::new("bonn", "Bonn", 0.4, 1.6);
        assert!(location.metadata().is_none());

        location.resolve_if_unset(&grid, &centers).expect("resolves");
        let meta = location.metadata().expect("resolved metadata");
        assert_eq!(meta.location_id, "bonn");
        assert_eq!((meta.grid_y, meta.grid_x), (0, 1));
        assert_eq!(meta.cell_lat1, 0.0);
        assert_eq!(meta.cell_lon1, 1.0);
    }

    #[test]
    fn deserializes_from_plain_mapping() {
        let location: Location =
            serde_json::from_str(r#"{"id": "essen", "name": "Essen", "lat": 51.45, "lon": 7.01}"#)
                .expect("valid location json");
        assert_eq!(location.id, "essen");
        assert!(location.grid_cell().is_none());
    }
}
