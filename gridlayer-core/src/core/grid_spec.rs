//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::config::{DataCellCfg, GridCfg};
use crate::core::Config;
use crate::style::toml_converter::{inline_toml, json_to_toml, toml_to_json, toml_to_symbol};
use crate::style::Symbol;
use cell_grid::{AxisBounds, CellRange, Coord, GridGeometry, Projection, Unit};
use serde_json::Value as JsonValue;
use std::fmt;
use std::sync::Arc;

/// Offset added to the grid center, evaluated on every access
pub type OffsetFn = Arc<dyn Fn() -> (f64, f64) + Send + Sync>;

/// Cells sharing properties and symbol
#[derive(Clone, PartialEq, Debug)]
pub struct DataCell {
    /// Inclusive column range
    pub cols: (i64, i64),
    /// Inclusive row range
    pub rows: (i64, i64),
    pub properties: Option<JsonValue>,
    pub symbol: Option<Symbol>,
}

impl DataCell {
    pub fn new(cols: (i64, i64), rows: (i64, i64)) -> DataCell {
        DataCell {
            cols,
            rows,
            properties: None,
            symbol: None,
        }
    }
    pub fn single(col: i64, row: i64) -> DataCell {
        DataCell::new((col, col), (row, row))
    }
    pub fn with_symbol(mut self, symbol: Symbol) -> DataCell {
        self.symbol = Some(symbol);
        self
    }
    pub fn with_properties(mut self, properties: JsonValue) -> DataCell {
        self.properties = Some(properties);
        self
    }
    /// Cells without symbol are not drawn
    pub fn has_symbol(&self) -> bool {
        self.symbol.is_some()
    }
    pub fn cell_range(&self) -> CellRange {
        CellRange::new(self.cols.0, self.cols.1, self.rows.0, self.rows.1)
    }
}

impl<'a> Config<'a, DataCellCfg> for DataCell {
    fn from_config(cfg: &DataCellCfg) -> Result<Self, String> {
        let cols = cfg.cols.span();
        let rows = cfg.rows.span();
        if cols.0 > cols.1 || rows.0 > rows.1 {
            return Err(format!(
                "Invalid data cell range cols: {:?} rows: {:?}",
                cols, rows
            ));
        }
        let symbol = match cfg.symbol {
            Some(ref symbol) => Some(toml_to_symbol(symbol)?),
            None => None,
        };
        Ok(DataCell {
            cols,
            rows,
            properties: cfg.properties.as_ref().map(toml_to_json),
            symbol,
        })
    }
    fn gen_config() -> String {
        let toml = r##"
[[layer.grid.data]]
cols = [2, 4]
rows = 5
properties = { name = "A" }
symbol = { polygonFill = "#f00", polygonOpacity = 0.5 }
"##;
        toml.to_string()
    }
    fn gen_runtime_config(&self) -> String {
        let mut config = format!(
            "\n[[layer.grid.data]]\ncols = [{}, {}]\nrows = [{}, {}]\n",
            self.cols.0, self.cols.1, self.rows.0, self.rows.1
        );
        if let Some(properties) = self.properties.as_ref().and_then(json_to_toml) {
            config.push_str(&format!("properties = {}\n", inline_toml(&properties)));
        }
        if let Some(symbol) = self.symbol.as_ref().and_then(|s| json_to_toml(&JsonValue::Object(s.clone()))) {
            config.push_str(&format!("symbol = {}\n", inline_toml(&symbol)));
        }
        config
    }
}

/// Grid definition with its data cells
#[derive(Clone)]
pub struct GridSpec {
    /// Configured center, without offset
    pub center: Coord,
    pub width: f64,
    pub height: f64,
    pub unit: Unit,
    pub altitude: Option<f64>,
    pub cols: AxisBounds,
    pub rows: AxisBounds,
    pub data: Vec<DataCell>,
    offset: Option<OffsetFn>,
}

impl fmt::Debug for GridSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("GridSpec")
            .field("center", &self.center)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("unit", &self.unit)
            .field("altitude", &self.altitude)
            .field("cols", &self.cols)
            .field("rows", &self.rows)
            .field("data", &self.data)
            .field("dynamic", &self.is_dynamic())
            .finish()
    }
}

impl GridSpec {
    pub fn new(center: Coord, width: f64, height: f64) -> GridSpec {
        GridSpec {
            center,
            width,
            height,
            unit: Unit::default(),
            altitude: None,
            cols: AxisBounds::unbounded(),
            rows: AxisBounds::unbounded(),
            data: Vec::new(),
            offset: None,
        }
    }
    pub fn with_unit(mut self, unit: Unit) -> GridSpec {
        self.unit = unit;
        self
    }
    pub fn with_bounds(mut self, cols: AxisBounds, rows: AxisBounds) -> GridSpec {
        self.cols = cols;
        self.rows = rows;
        self
    }
    pub fn with_altitude(mut self, altitude: f64) -> GridSpec {
        self.altitude = Some(altitude);
        self
    }
    pub fn with_data(mut self, data: Vec<DataCell>) -> GridSpec {
        self.data = data;
        self
    }
    pub fn with_offset(mut self, offset: OffsetFn) -> GridSpec {
        self.offset = Some(offset);
        self
    }
    pub fn set_offset(&mut self, offset: Option<OffsetFn>) {
        self.offset = offset;
    }
    /// Grids with an offset function move between frames
    pub fn is_dynamic(&self) -> bool {
        self.offset.is_some()
    }
    /// Center including the current offset
    pub fn effective_center(&self) -> Coord {
        match self.offset {
            Some(ref offset) => {
                let (dx, dy) = offset();
                Coord::new(self.center.x + dx, self.center.y + dy)
            }
            None => self.center,
        }
    }
    pub fn geometry(&self, projection: Projection) -> GridGeometry {
        GridGeometry::new(
            self.effective_center(),
            self.width,
            self.height,
            self.unit,
            projection,
        )
        .with_bounds(self.cols, self.rows)
    }
    pub fn validate(&self) -> Result<(), String> {
        if !(self.center.is_finite()) {
            return Err(format!("Invalid grid center {:?}", self.center));
        }
        if !(self.width.is_finite() && self.width > 0.0)
            || !(self.height.is_finite() && self.height > 0.0)
        {
            return Err(format!(
                "Grid cell size must be positive, got {} x {}",
                self.width, self.height
            ));
        }
        for (name, bounds) in &[("cols", self.cols), ("rows", self.rows)] {
            if let (Some(lo), Some(hi)) = (bounds.lo, bounds.hi) {
                if lo > hi {
                    return Err(format!("Invalid grid {} [{}, {}]", name, lo, hi));
                }
            }
        }
        Ok(())
    }
}

fn bounds_from_config(cfg: &Option<crate::core::config::BoundsCfg>) -> AxisBounds {
    match cfg {
        Some(bounds) => {
            let (lo, hi) = bounds.limits();
            AxisBounds::new(lo, hi)
        }
        None => AxisBounds::unbounded(),
    }
}

fn bounds_to_config(bounds: &AxisBounds) -> Option<String> {
    match (bounds.lo, bounds.hi) {
        (None, None) => None,
        (Some(lo), Some(hi)) => Some(format!("[{}, {}]", lo, hi)),
        (Some(lo), None) => Some(format!("{{ min = {} }}", lo)),
        (None, Some(hi)) => Some(format!("{{ max = {} }}", hi)),
    }
}

impl<'a> Config<'a, GridCfg> for GridSpec {
    fn from_config(grid_cfg: &GridCfg) -> Result<Self, String> {
        let unit = match grid_cfg.unit {
            Some(ref name) => {
                Unit::from_name(name).ok_or(format!("Unknown grid unit '{}'", name))?
            }
            None => Unit::default(),
        };
        let data = grid_cfg
            .data
            .iter()
            .map(DataCell::from_config)
            .collect::<Result<Vec<_>, _>>()?;
        let grid = GridSpec {
            center: Coord::new(grid_cfg.center.0, grid_cfg.center.1),
            width: grid_cfg.width,
            height: grid_cfg.height,
            unit,
            altitude: grid_cfg.altitude,
            cols: bounds_from_config(&grid_cfg.cols),
            rows: bounds_from_config(&grid_cfg.rows),
            data,
            offset: None,
        };
        grid.validate()?;
        Ok(grid)
    }
    fn gen_config() -> String {
        let toml = r#"
[[layer.grid]]
center = [0.0, 0.0]
width = 100.0
height = 100.0
unit = "projection"
#altitude = 0.0
#cols = [-5, 5]
#rows = { min = -5 }
"#;
        toml.to_string()
    }
    fn gen_runtime_config(&self) -> String {
        let mut config = format!(
            "\n[[layer.grid]]\ncenter = [{:?}, {:?}]\nwidth = {:?}\nheight = {:?}\nunit = \"{}\"\n",
            self.center.x,
            self.center.y,
            self.width,
            self.height,
            self.unit.name()
        );
        if let Some(altitude) = self.altitude {
            config.push_str(&format!("altitude = {:?}\n", altitude));
        }
        for (name, bounds) in &[("cols", self.cols), ("rows", self.rows)] {
            if let Some(limits) = bounds_to_config(bounds) {
                config.push_str(&format!("{} = {}\n", name, limits));
            }
        }
        for data in &self.data {
            config.push_str(&data.gen_runtime_config());
        }
        config
    }
}
