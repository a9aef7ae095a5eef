//! A library for map grid cell calculations
//!
//! ## Cells of a grid
//!
//! ```rust
//! use cell_grid::{AxisBounds, Coord, Extent, GridGeometry, Projection, Unit};
//!
//! let grid = GridGeometry::new(
//!     Coord::new(0.0, 0.0),
//!     100.0,
//!     100.0,
//!     Unit::Projection,
//!     Projection::Identity,
//! )
//! .with_bounds(AxisBounds::new(Some(-5), Some(5)), AxisBounds::new(Some(-5), Some(5)));
//! let world = Projection::Identity.full_extent();
//! assert_eq!(
//!     grid.extent(&world),
//!     Some(Extent {
//!         minx: -500.0,
//!         miny: -500.0,
//!         maxx: 500.0,
//!         maxy: 500.0,
//!     })
//! );
//! assert_eq!(grid.cell_at(&Coord::new(50.0, -50.0)), Some((0, 0)));
//! ```
//!
//! ## Visible cells
//!
//! ```rust
//! use cell_grid::{Coord, Extent, GridGeometry, Projection, Unit};
//!
//! let grid = GridGeometry::new(Coord::new(0.0, 0.0), 10.0, 10.0, Unit::Degree, Projection::Wgs84);
//! let view = Extent::new(-15.0, -15.0, 15.0, 15.0);
//! if let Some(range) = grid.cell_range(&view) {
//!     for (col, row) in range {
//!         println!("Cell {}/{}", col, row);
//!     }
//! }
//! ```

mod grid;
mod projection;
mod range;
mod unit;

pub use grid::{AxisBounds, CellIndex, Coord, Extent, GridGeometry, CELL_EPSILON, MAX_CELL_INDEX};
pub use projection::{
    lonlat_to_merc, merc_to_lonlat, Measurer, Projection, EARTH_RADIUS, MERC_MAX, MERC_MAX_LAT,
};
pub use range::{CellIterator, CellRange};
pub use unit::{DegreeMapper, MeterMapper, PlaneMapper, Unit, UnitMapper};
