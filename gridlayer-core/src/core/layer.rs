//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::config::LayerCfg;
use crate::core::grid_spec::{DataCell, GridSpec, OffsetFn};
use crate::core::sequencer::{self, CellRecord, Visit};
use crate::core::viewport::Viewport;
use crate::core::Config;
use crate::render::GridSource;
use crate::style::symbol::merge_symbol;
use crate::style::toml_converter::{inline_toml, json_to_toml, toml_to_symbol};
use crate::style::{default_symbol, Symbol};
use cell_grid::{CellIndex, Coord, Extent, GridGeometry, Projection, Unit};
use serde_json::Value as JsonValue;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_LAYER_UID: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Debug)]
pub struct LayerOptions {
    /// Grid line style
    pub symbol: Symbol,
    /// Grid projection, map projection if not set
    pub projection: Option<Projection>,
    /// Altitude of grids without their own altitude
    pub altitude: Option<f64>,
    pub debug: bool,
}

impl Default for LayerOptions {
    fn default() -> Self {
        LayerOptions {
            symbol: default_symbol(),
            projection: None,
            altitude: None,
            debug: false,
        }
    }
}

/// Cell outline in map coordinates
#[derive(Clone, PartialEq, Debug)]
pub struct Rectangle {
    pub nw: Coord,
    /// Width in meters
    pub width: f64,
    /// Height in meters
    pub height: f64,
    pub altitude: Option<f64>,
    /// Closed ring nw, ne, se, sw, nw
    pub ring: Vec<Coord>,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Identified {
    pub col: i64,
    pub row: i64,
    pub geometry: Rectangle,
}

/// Layer of grids with data cells
#[derive(Debug)]
pub struct GridLayer {
    pub id: String,
    grids: Vec<GridSpec>,
    options: LayerOptions,
    uid: u64,
    version: u64,
}

impl GridLayer {
    pub fn new(id: &str, grids: Vec<GridSpec>) -> GridLayer {
        GridLayer::with_options(id, grids, LayerOptions::default())
    }
    pub fn with_options(id: &str, grids: Vec<GridSpec>, options: LayerOptions) -> GridLayer {
        GridLayer {
            id: String::from(id),
            grids,
            options,
            uid: NEXT_LAYER_UID.fetch_add(1, Ordering::Relaxed),
            version: 0,
        }
    }
    pub fn options(&self) -> &LayerOptions {
        &self.options
    }
    /// Replace the grid line style, merged over the default symbol
    pub fn set_symbol(&mut self, symbol: &Symbol) {
        self.options.symbol = merge_symbol(&default_symbol(), symbol);
        self.touch();
    }
    pub fn grid_count(&self) -> usize {
        self.grids.len()
    }
    pub fn grid(&self, grid_index: usize) -> Option<&GridSpec> {
        self.grids.get(grid_index)
    }
    pub fn grids(&self) -> &[GridSpec] {
        &self.grids
    }
    /// Counter changed by every modification
    pub fn version(&self) -> u64 {
        self.version
    }
    fn touch(&mut self) {
        self.version += 1;
    }
    /// Replace the grid at `grid_index` or append it at index `grid_count()`
    pub fn set_grid(&mut self, grid: GridSpec, grid_index: usize) -> Result<(), String> {
        grid.validate()?;
        if grid_index < self.grids.len() {
            self.grids[grid_index] = grid;
        } else if grid_index == self.grids.len() {
            self.grids.push(grid);
        } else {
            return Err(format!(
                "Grid index {} out of range (grid count {})",
                grid_index,
                self.grids.len()
            ));
        }
        debug!("Layer '{}': grid {} replaced", self.id, grid_index);
        self.touch();
        Ok(())
    }
    pub fn set_grid_data(&mut self, data: Vec<DataCell>, grid_index: usize) -> Result<(), String> {
        let grid = self
            .grids
            .get_mut(grid_index)
            .ok_or(format!("Grid index {} out of range", grid_index))?;
        grid.data = data;
        self.touch();
        Ok(())
    }
    pub fn set_offset(&mut self, offset: Option<OffsetFn>, grid_index: usize) -> Result<(), String> {
        let grid = self
            .grids
            .get_mut(grid_index)
            .ok_or(format!("Grid index {} out of range", grid_index))?;
        grid.set_offset(offset);
        self.touch();
        Ok(())
    }
    pub fn is_empty(&self, grid_index: usize) -> bool {
        self.grids.get(grid_index).is_none()
    }
    /// Remove all grids
    pub fn clear(&mut self) {
        self.grids.clear();
        self.touch();
    }
    pub fn grid_projection(&self, viewport: &dyn Viewport) -> Projection {
        self.options.projection.unwrap_or_else(|| viewport.projection())
    }
    pub fn grid_geometry(&self, grid_index: usize, viewport: &dyn Viewport) -> Option<GridGeometry> {
        self.grid(grid_index)
            .map(|grid| grid.geometry(self.grid_projection(viewport)))
    }

    /// Map area covered by a grid, unbounded sides limited to the full extent
    pub fn get_grid_extent(&self, grid_index: usize, viewport: &dyn Viewport) -> Option<Extent> {
        let geometry = self.grid_geometry(grid_index, viewport)?;
        geometry.extent(&geometry.projection.full_extent())
    }

    /// Cell at a coordinate, `None` outside of the grid
    pub fn get_cell_at(
        &self,
        coord: &Coord,
        grid_index: usize,
        viewport: &dyn Viewport,
    ) -> Option<CellIndex> {
        let geometry = self.grid_geometry(grid_index, viewport)?;
        let extent = geometry.extent(&geometry.projection.full_extent())?;
        if !extent.contains(coord) {
            return None;
        }
        let (col, row) = geometry.cell_at(coord)?;
        if geometry.cols.contains(col) && geometry.rows.contains(row) {
            Some((col, row))
        } else {
            None
        }
    }

    /// Outline of a cell
    pub fn get_cell_geometry(
        &self,
        col: i64,
        row: i64,
        grid_index: usize,
        viewport: &dyn Viewport,
    ) -> Option<Rectangle> {
        let grid = self.grid(grid_index)?;
        let geometry = grid.geometry(self.grid_projection(viewport));
        let nw = geometry.cell_nw(col, row)?;
        let ne = geometry.cell_nw(col + 1, row)?;
        let se = geometry.cell_nw(col + 1, row + 1)?;
        let sw = geometry.cell_nw(col, row + 1)?;
        let (width, height) = match grid.unit {
            Unit::Meter => (grid.width, grid.height),
            Unit::Projection | Unit::Degree => {
                let measurer = geometry.measurer();
                (
                    measurer.measure_length(&nw, &ne),
                    measurer.measure_length(&nw, &sw),
                )
            }
        };
        Some(Rectangle {
            nw,
            width,
            height,
            altitude: grid.altitude,
            ring: vec![nw, ne, se, sw, nw],
        })
    }

    /// Cell index and outline at a coordinate
    pub fn identify(
        &self,
        coord: &Coord,
        grid_index: usize,
        viewport: &dyn Viewport,
    ) -> Option<Identified> {
        let (col, row) = self.get_cell_at(coord, grid_index, viewport)?;
        let geometry = self.get_cell_geometry(col, row, grid_index, viewport)?;
        Some(Identified { col, row, geometry })
    }

    /// Visit data cells ordered by distance to the cell at `coord`
    pub fn visit_around<F>(
        &self,
        coord: &Coord,
        visitor: F,
        grid_index: usize,
        viewport: &dyn Viewport,
    ) where
        F: FnMut(&CellRecord) -> Visit,
    {
        let grid = match self.grid(grid_index) {
            Some(grid) if !grid.data.is_empty() => grid,
            _ => return,
        };
        if let Some(start) = self.get_cell_at(coord, grid_index, viewport) {
            sequencer::visit_around(&grid.data, start, visitor);
        }
    }
}

impl GridSource for GridLayer {
    fn grid_count(&self) -> usize {
        self.grid_count()
    }
    fn grid(&self, grid_index: usize) -> Option<&GridSpec> {
        self.grid(grid_index)
    }
    fn grid_projection(&self, viewport: &dyn Viewport) -> Projection {
        self.grid_projection(viewport)
    }
    fn grid_symbol(&self) -> &Symbol {
        &self.options.symbol
    }
    fn layer_altitude(&self) -> Option<f64> {
        self.options.altitude
    }
    fn debug(&self) -> bool {
        self.options.debug
    }
    fn source_id(&self) -> u64 {
        self.uid
    }
    fn version(&self) -> u64 {
        self.version
    }
}

impl<'a> Config<'a, LayerCfg> for GridLayer {
    fn from_config(layer_cfg: &LayerCfg) -> Result<Self, String> {
        let projection = match layer_cfg.projection {
            Some(ref code) => Some(
                Projection::from_code(code).ok_or(format!("Unknown projection '{}'", code))?,
            ),
            None => None,
        };
        let symbol = match layer_cfg.symbol {
            Some(ref symbol) => merge_symbol(&default_symbol(), &toml_to_symbol(symbol)?),
            None => default_symbol(),
        };
        let grids = layer_cfg
            .grids
            .iter()
            .enumerate()
            .map(|(i, cfg)| {
                GridSpec::from_config(cfg).map_err(|e| format!("Layer '{}' grid {}: {}", layer_cfg.id, i, e))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if grids.is_empty() {
            warn!("Layer '{}' has no grid", layer_cfg.id);
        }
        info!(
            "Layer '{}' with {} grid(s) and {} data entries",
            layer_cfg.id,
            grids.len(),
            grids.iter().map(|g| g.data.len()).sum::<usize>()
        );
        let options = LayerOptions {
            symbol,
            projection,
            altitude: layer_cfg.altitude,
            debug: layer_cfg.debug,
        };
        Ok(GridLayer::with_options(&layer_cfg.id, grids, options))
    }
    fn gen_config() -> String {
        let mut config = String::new();
        config.push_str(
            r##"
[layer]
id = "grid"
#projection = "EPSG:3857"
#altitude = 0.0

[layer.symbol]
lineColor = "#bbb"
lineWidth = 1
lineOpacity = 1
"##,
        );
        config.push_str(&GridSpec::gen_config());
        config.push_str(&DataCell::gen_config());
        config
    }
    fn gen_runtime_config(&self) -> String {
        let mut config = format!(
            "\n[layer]\nid = {}\n",
            inline_toml(&toml::Value::String(self.id.clone()))
        );
        if let Some(projection) = self.options.projection {
            config.push_str(&format!("projection = \"{}\"\n", projection.code()));
        }
        if let Some(altitude) = self.options.altitude {
            config.push_str(&format!("altitude = {:?}\n", altitude));
        }
        if self.options.debug {
            config.push_str("debug = true\n");
        }
        if let Some(symbol) = json_to_toml(&JsonValue::Object(self.options.symbol.clone())) {
            config.push_str(&format!("symbol = {}\n", inline_toml(&symbol)));
        }
        for grid in &self.grids {
            config.push_str(&grid.gen_runtime_config());
        }
        config
    }
}
