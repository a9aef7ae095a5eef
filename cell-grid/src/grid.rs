//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Cell grids

use crate::projection::{Measurer, Projection};
use crate::range::CellRange;
use crate::unit::Unit;
use std::f64;

/// Guard against floating point noise on cell edges, in cell units
pub const CELL_EPSILON: f64 = 1e-6;

/// Cell index `(col, row)`. Columns grow east, rows grow south.
pub type CellIndex = (i64, i64);

/// Map coordinate
#[derive(PartialEq, Clone, Copy, Debug, Default)]
pub struct Coord {
    pub x: f64,
    pub y: f64,
}

impl Coord {
    pub fn new(x: f64, y: f64) -> Coord {
        Coord { x, y }
    }
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Geographic extent
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct Extent {
    pub minx: f64,
    pub miny: f64,
    pub maxx: f64,
    pub maxy: f64,
}

impl Extent {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Extent {
        Extent {
            minx: x1.min(x2),
            miny: y1.min(y2),
            maxx: x1.max(x2),
            maxy: y1.max(y2),
        }
    }
    pub fn from_corners(a: &Coord, b: &Coord) -> Extent {
        Extent::new(a.x, a.y, b.x, b.y)
    }
    /// Bounding box of all given coordinates
    pub fn from_coords<'a, I>(coords: I) -> Option<Extent>
    where
        I: IntoIterator<Item = &'a Coord>,
    {
        let mut iter = coords.into_iter();
        let first = iter.next()?;
        let mut extent = Extent::from_corners(first, first);
        for c in iter {
            extent.minx = extent.minx.min(c.x);
            extent.miny = extent.miny.min(c.y);
            extent.maxx = extent.maxx.max(c.x);
            extent.maxy = extent.maxy.max(c.y);
        }
        Some(extent)
    }
    pub fn width(&self) -> f64 {
        self.maxx - self.minx
    }
    pub fn height(&self) -> f64 {
        self.maxy - self.miny
    }
    pub fn center(&self) -> Coord {
        Coord::new((self.minx + self.maxx) / 2.0, (self.miny + self.maxy) / 2.0)
    }
    pub fn corners(&self) -> [Coord; 4] {
        [
            Coord::new(self.minx, self.maxy),
            Coord::new(self.maxx, self.maxy),
            Coord::new(self.maxx, self.miny),
            Coord::new(self.minx, self.miny),
        ]
    }
    /// Inclusive containment test
    pub fn contains(&self, c: &Coord) -> bool {
        c.x >= self.minx && c.x <= self.maxx && c.y >= self.miny && c.y <= self.maxy
    }
    /// Inclusive overlap test, touching extents intersect
    pub fn intersects(&self, other: &Extent) -> bool {
        self.minx <= other.maxx
            && other.minx <= self.maxx
            && self.miny <= other.maxy
            && other.miny <= self.maxy
    }
    /// Overlapping area, `None` unless it has a positive area
    pub fn intersection(&self, other: &Extent) -> Option<Extent> {
        let extent = Extent {
            minx: self.minx.max(other.minx),
            miny: self.miny.max(other.miny),
            maxx: self.maxx.min(other.maxx),
            maxy: self.maxy.min(other.maxy),
        };
        if extent.minx < extent.maxx && extent.miny < extent.maxy {
            Some(extent)
        } else {
            None
        }
    }
    pub fn is_finite(&self) -> bool {
        self.minx.is_finite()
            && self.miny.is_finite()
            && self.maxx.is_finite()
            && self.maxy.is_finite()
    }
}

/// Column or row limits in cell edge multiples.
///
/// `None` is unbounded. The covered cells are `lo ..= hi - 1`.
#[derive(PartialEq, Clone, Copy, Debug, Default)]
pub struct AxisBounds {
    pub lo: Option<i64>,
    pub hi: Option<i64>,
}

impl AxisBounds {
    pub fn new(lo: Option<i64>, hi: Option<i64>) -> AxisBounds {
        AxisBounds { lo, hi }
    }
    pub fn unbounded() -> AxisBounds {
        AxisBounds { lo: None, hi: None }
    }
    pub fn is_bounded(&self) -> bool {
        self.lo.is_some() && self.hi.is_some()
    }
    pub fn contains(&self, index: i64) -> bool {
        self.lo.map_or(true, |lo| index >= lo) && self.hi.map_or(true, |hi| index < hi)
    }
}

/// Geometric description of one grid
#[derive(PartialEq, Clone, Debug)]
pub struct GridGeometry {
    /// Anchor of cell (0, 0), its north west corner
    pub center: Coord,
    /// Cell width in grid units
    pub width: f64,
    /// Cell height in grid units
    pub height: f64,
    pub unit: Unit,
    pub projection: Projection,
    pub cols: AxisBounds,
    pub rows: AxisBounds,
}

impl GridGeometry {
    pub fn new(
        center: Coord,
        width: f64,
        height: f64,
        unit: Unit,
        projection: Projection,
    ) -> GridGeometry {
        GridGeometry {
            center,
            width,
            height,
            unit,
            projection,
            cols: AxisBounds::unbounded(),
            rows: AxisBounds::unbounded(),
        }
    }
    pub fn with_bounds(mut self, cols: AxisBounds, rows: AxisBounds) -> GridGeometry {
        self.cols = cols;
        self.rows = rows;
        self
    }
    pub fn is_valid(&self) -> bool {
        self.center.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
            && self.width > 0.0
            && self.height > 0.0
    }
    pub fn measurer(&self) -> Measurer {
        self.projection.measurer()
    }
    /// North west corner of a cell
    pub fn cell_nw(&self, col: i64, row: i64) -> Option<Coord> {
        self.unit.mapper().cell_to_world_nw(self, col, row)
    }
    pub fn cell_center(&self, col: i64, row: i64) -> Option<Coord> {
        self.unit.mapper().cell_to_world_center(self, col, row)
    }
    /// Cell containing a coordinate. Points on a shared edge belong to the higher index.
    pub fn cell_at(&self, coord: &Coord) -> Option<CellIndex> {
        if !self.is_valid() {
            return None;
        }
        self.unit.mapper().world_to_cell(self, coord)
    }
    pub fn cell_extent(&self, col: i64, row: i64) -> Option<Extent> {
        let nw = self.cell_nw(col, row)?;
        let se = self.cell_nw(col + 1, row + 1)?;
        Some(Extent::from_corners(&nw, &se))
    }

    /// Coordinates where the cell space extremes of an extent are found
    fn sample_points(&self, extent: &Extent) -> Vec<Coord> {
        let mut samples = extent.corners().to_vec();
        // East distances of spherical meter grids peak at the equator
        if self.crosses_equator(extent.miny, extent.maxy) {
            samples.push(Coord::new(extent.minx, 0.0));
            samples.push(Coord::new(extent.maxx, 0.0));
        }
        samples
    }
    fn crosses_equator(&self, y1: f64, y2: f64) -> bool {
        self.unit == Unit::Meter && self.measurer().is_spherical() && y1 < 0.0 && y2 > 0.0
    }

    /// Continuous cell space span `(mincol, maxcol, minrow, maxrow)` of an extent
    pub fn cell_space_span(&self, extent: &Extent) -> Option<(f64, f64, f64, f64)> {
        let mapper = self.unit.mapper();
        let mut span = (
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::INFINITY,
            f64::NEG_INFINITY,
        );
        for sample in self.sample_points(extent) {
            let (col, row) = mapper.to_cell_space(self, &sample)?;
            span.0 = span.0.min(col);
            span.1 = span.1.max(col);
            span.2 = span.2.min(row);
            span.3 = span.3.max(row);
        }
        Some(span)
    }

    /// Grid extent in map coordinates.
    ///
    /// Unbounded sides are taken from `fallback`, usually the map's full extent
    /// or the current view.
    pub fn extent(&self, fallback: &Extent) -> Option<Extent> {
        if !self.is_valid() {
            return None;
        }
        let span = if self.cols.is_bounded() && self.rows.is_bounded() {
            (0.0, 0.0, 0.0, 0.0)
        } else {
            self.cell_space_span(fallback)?
        };
        let c0 = self.cols.lo.map_or(span.0, |v| v as f64);
        let c1 = self.cols.hi.map_or(span.1, |v| v as f64);
        let r0 = self.rows.lo.map_or(span.2, |v| v as f64);
        let r1 = self.rows.hi.map_or(span.3, |v| v as f64);
        if c0 > c1 || r0 > r1 {
            return None;
        }

        let mapper = self.unit.mapper();
        let mut samples = Vec::with_capacity(6);
        for &(col, row) in &[(c0, r0), (c1, r0), (c1, r1), (c0, r1)] {
            samples.push(mapper.from_cell_space(self, col, row)?);
        }
        if self.unit == Unit::Meter && self.measurer().is_spherical() {
            let (_, equator) = mapper.to_cell_space(self, &Coord::new(self.center.x, 0.0))?;
            if r0 < equator && equator < r1 {
                samples.push(mapper.from_cell_space(self, c0, equator)?);
                samples.push(mapper.from_cell_space(self, c1, equator)?);
            }
        }
        let bbox = Extent::from_coords(&samples)?;

        // rows grow southwards
        let extent = Extent {
            minx: if self.cols.lo.is_some() { bbox.minx } else { fallback.minx },
            maxx: if self.cols.hi.is_some() { bbox.maxx } else { fallback.maxx },
            maxy: if self.rows.lo.is_some() { bbox.maxy } else { fallback.maxy },
            miny: if self.rows.hi.is_some() { bbox.miny } else { fallback.miny },
        };
        if extent.minx <= extent.maxx && extent.miny <= extent.maxy && extent.is_finite() {
            Some(extent)
        } else {
            None
        }
    }

    /// Inclusive range of cells overlapping `view`.
    ///
    /// Cells which only touch the view on an edge are excluded.
    pub fn cell_range(&self, view: &Extent) -> Option<CellRange> {
        let extent = self.extent(view)?;
        let visible = extent.intersection(view)?;
        let (cmin, cmax, rmin, rmax) = self.cell_space_span(&visible)?;

        let mut mincol = to_index((cmin + CELL_EPSILON).floor())?;
        let mut maxcol = to_index((cmax - CELL_EPSILON).ceil() - 1.0)?;
        let mut minrow = to_index((rmin + CELL_EPSILON).floor())?;
        let mut maxrow = to_index((rmax - CELL_EPSILON).ceil() - 1.0)?;
        if let Some(lo) = self.cols.lo {
            mincol = mincol.max(lo);
        }
        if let Some(hi) = self.cols.hi {
            maxcol = maxcol.min(hi.saturating_sub(1));
        }
        if let Some(lo) = self.rows.lo {
            minrow = minrow.max(lo);
        }
        if let Some(hi) = self.rows.hi {
            maxrow = maxrow.min(hi.saturating_sub(1));
        }
        if mincol > maxcol || minrow > maxrow {
            return None;
        }
        Some(CellRange::new(mincol, maxcol, minrow, maxrow))
    }
}

/// Largest cell index with an exact `f64` representation
pub const MAX_CELL_INDEX: f64 = 9_007_199_254_740_992.0;

fn to_index(value: f64) -> Option<i64> {
    if value.is_finite() && value.abs() <= MAX_CELL_INDEX {
        Some(value as i64)
    } else {
        None
    }
}
