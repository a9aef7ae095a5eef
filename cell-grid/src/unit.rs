//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Grid units and conversion between cell indices and map coordinates

use crate::grid::{CellIndex, Coord, GridGeometry};

/// Unit of cell width and height
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum Unit {
    /// Distance in the projected plane
    Projection,
    /// Geographic distance in meters
    Meter,
    /// Offset in map coordinate units
    Degree,
}

impl Default for Unit {
    fn default() -> Self {
        Unit::Projection
    }
}

impl Unit {
    pub fn from_name(name: &str) -> Option<Unit> {
        match &name.to_lowercase() as &str {
            "projection" => Some(Unit::Projection),
            "meter" => Some(Unit::Meter),
            "degree" => Some(Unit::Degree),
            _ => None,
        }
    }
    pub fn name(&self) -> &'static str {
        match self {
            Unit::Projection => "projection",
            Unit::Meter => "meter",
            Unit::Degree => "degree",
        }
    }
    /// Conversion strategy of this unit
    pub fn mapper(&self) -> &'static dyn UnitMapper {
        match self {
            Unit::Projection => &PlaneMapper,
            Unit::Meter => &MeterMapper,
            Unit::Degree => &DegreeMapper,
        }
    }
}

/// Conversion between continuous cell space and map coordinates.
///
/// Cell space `(col, row)` has its origin at the grid center, one unit per cell,
/// columns growing east and rows growing south.
pub trait UnitMapper: Sync {
    /// Continuous cell position of a map coordinate
    fn to_cell_space(&self, grid: &GridGeometry, coord: &Coord) -> Option<(f64, f64)>;
    /// Map coordinate of a continuous cell position
    fn from_cell_space(&self, grid: &GridGeometry, col: f64, row: f64) -> Option<Coord>;

    fn cell_to_world_nw(&self, grid: &GridGeometry, col: i64, row: i64) -> Option<Coord> {
        self.from_cell_space(grid, col as f64, row as f64)
    }
    fn cell_to_world_center(&self, grid: &GridGeometry, col: i64, row: i64) -> Option<Coord> {
        self.from_cell_space(grid, col as f64 + 0.5, row as f64 + 0.5)
    }
    fn world_to_cell(&self, grid: &GridGeometry, coord: &Coord) -> Option<CellIndex> {
        let (col, row) = self.to_cell_space(grid, coord)?;
        let (col, row) = (col.floor(), row.floor());
        if col.is_finite() && row.is_finite() {
            Some((col as i64, row as i64))
        } else {
            None
        }
    }
}

fn finite_coord(c: Coord) -> Option<Coord> {
    if c.is_finite() {
        Some(c)
    } else {
        None
    }
}

fn finite_pair(col: f64, row: f64) -> Option<(f64, f64)> {
    if col.is_finite() && row.is_finite() {
        Some((col, row))
    } else {
        None
    }
}

/// Offsets in the projected plane
pub struct PlaneMapper;

impl UnitMapper for PlaneMapper {
    fn to_cell_space(&self, grid: &GridGeometry, coord: &Coord) -> Option<(f64, f64)> {
        let origin = grid.projection.project(&grid.center);
        let p = grid.projection.project(coord);
        finite_pair(
            (p.x - origin.x) / grid.width,
            (origin.y - p.y) / grid.height,
        )
    }
    fn from_cell_space(&self, grid: &GridGeometry, col: f64, row: f64) -> Option<Coord> {
        let origin = grid.projection.project(&grid.center);
        let p = Coord::new(origin.x + col * grid.width, origin.y - row * grid.height);
        finite_coord(grid.projection.unproject(&p))
    }
}

/// Distances measured on the projection's measurer
pub struct MeterMapper;

impl UnitMapper for MeterMapper {
    fn to_cell_space(&self, grid: &GridGeometry, coord: &Coord) -> Option<(f64, f64)> {
        let (east, north) = grid.measurer().displacement(&grid.center, coord)?;
        finite_pair(east / grid.width, -north / grid.height)
    }
    fn from_cell_space(&self, grid: &GridGeometry, col: f64, row: f64) -> Option<Coord> {
        grid.measurer()
            .locate(&grid.center, col * grid.width, -row * grid.height)
    }
}

/// Flat offsets in map coordinates
pub struct DegreeMapper;

impl UnitMapper for DegreeMapper {
    fn to_cell_space(&self, grid: &GridGeometry, coord: &Coord) -> Option<(f64, f64)> {
        finite_pair(
            (coord.x - grid.center.x) / grid.width,
            (grid.center.y - coord.y) / grid.height,
        )
    }
    fn from_cell_space(&self, grid: &GridGeometry, col: f64, row: f64) -> Option<Coord> {
        finite_coord(Coord::new(
            grid.center.x + col * grid.width,
            grid.center.y - row * grid.height,
        ))
    }
}
