//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::grid_spec::{DataCell, GridSpec};
use crate::core::viewport::Viewport;
use crate::style::{resolve_style, ResolvedStyle, StyleContext, Symbol};
use cell_grid::{CellRange, GridGeometry, Projection};

/// Grids and styles drawn by the renderers
pub trait GridSource {
    fn grid_count(&self) -> usize;
    fn grid(&self, grid_index: usize) -> Option<&GridSpec>;
    fn grid_projection(&self, viewport: &dyn Viewport) -> Projection;
    /// Grid line style, including defaults
    fn grid_symbol(&self) -> &Symbol;
    fn layer_altitude(&self) -> Option<f64>;
    fn debug(&self) -> bool;
    /// Unique per source instance
    fn source_id(&self) -> u64;
    /// Changes whenever grids or styles are modified
    fn version(&self) -> u64;

    fn grid_geometry(&self, grid_index: usize, viewport: &dyn Viewport) -> Option<GridGeometry> {
        self.grid(grid_index)
            .map(|grid| grid.geometry(self.grid_projection(viewport)))
    }
    /// Cells of a grid overlapping the current view
    fn get_cell_range(&self, grid_index: usize, viewport: &dyn Viewport) -> Option<CellRange> {
        self.grid_geometry(grid_index, viewport)?
            .cell_range(&viewport.extent())
    }
    fn get_data_cells(&self, grid_index: usize) -> &[DataCell] {
        match self.grid(grid_index) {
            Some(grid) => &grid.data,
            None => &[],
        }
    }
    /// Evaluated symbol of a data entry, `None` for entries without symbol
    fn get_style_for(&self, grid_index: usize, data_index: usize, zoom: f64) -> Option<ResolvedStyle> {
        let entry = self.get_data_cells(grid_index).get(data_index)?;
        let symbol = entry.symbol.as_ref()?;
        Some(resolve_style(
            symbol,
            &StyleContext::new(zoom, entry.properties.as_ref()),
        ))
    }
}
