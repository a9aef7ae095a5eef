//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::render::gpu::{BufferId, DataBufferIds, DataCellBuffers, ProgramId};
use crate::render::source::GridSource;
use crate::style::symbol::{is_label_symbol, label_placement_symbol};
use crate::style::{resolve_style, ResolvedStyle, StyleContext, Symbol};
use std::collections::HashMap;

type DataKey = (usize, usize);

/// Renderer state kept between frames
#[derive(Default, Debug)]
pub struct RenderCache {
    /// Grid line symbol
    grid_symbol: Option<Symbol>,
    /// Data symbols per grid and data index
    data_symbols: Option<Vec<Vec<Option<Symbol>>>>,
    label_tests: HashMap<DataKey, bool>,
    placement_symbols: HashMap<DataKey, Symbol>,
    /// Source id and version the cached state was built from
    built_from: Option<(u64, u64)>,
    packed: HashMap<usize, DataCellBuffers>,
    data_buffers: HashMap<usize, DataBufferIds>,
    line_buffers: HashMap<usize, BufferId>,
    pub grid_program: Option<ProgramId>,
    pub data_program: Option<ProgramId>,
}

impl RenderCache {
    pub fn new() -> RenderCache {
        RenderCache::default()
    }

    pub fn is_compiled(&self) -> bool {
        self.grid_symbol.is_some() && self.data_symbols.is_some()
    }

    /// Built from this source at its current version
    pub fn is_current(&self, source: &dyn GridSource) -> bool {
        self.built_from == Some((source.source_id(), source.version()))
    }

    /// Take over symbols of the source, once per source and version
    pub fn compile(&mut self, source: &dyn GridSource) {
        if !self.is_current(source) {
            if self.built_from.is_some() {
                debug!("Source changed, dropping compiled styles");
            }
            self.invalidate();
            self.built_from = Some((source.source_id(), source.version()));
        }
        if self.grid_symbol.is_none() {
            self.grid_symbol = Some(source.grid_symbol().clone());
        }
        if self.data_symbols.is_none() {
            let symbols = (0..source.grid_count())
                .map(|i| {
                    source
                        .get_data_cells(i)
                        .iter()
                        .map(|entry| entry.symbol.clone())
                        .collect()
                })
                .collect();
            self.data_symbols = Some(symbols);
        }
    }

    /// Grid line style at `zoom`
    pub fn grid_style(&self, zoom: f64) -> ResolvedStyle {
        match self.grid_symbol {
            Some(ref symbol) => resolve_style(symbol, &StyleContext::new(zoom, None)),
            None => ResolvedStyle::default(),
        }
    }

    /// Data styles of a grid at `zoom`, `None` for entries without symbol
    pub fn data_styles(
        &self,
        grid_index: usize,
        source: &dyn GridSource,
        zoom: f64,
    ) -> Vec<Option<ResolvedStyle>> {
        let symbols = match self.data_symbols.as_ref().and_then(|s| s.get(grid_index)) {
            Some(symbols) => symbols,
            None => return Vec::new(),
        };
        let data = source.get_data_cells(grid_index);
        symbols
            .iter()
            .enumerate()
            .map(|(data_index, symbol)| {
                let properties = data.get(data_index).and_then(|d| d.properties.as_ref());
                symbol
                    .as_ref()
                    .map(|symbol| resolve_style(symbol, &StyleContext::new(zoom, properties)))
            })
            .collect()
    }

    /// External resources of all compiled symbols at `zoom`
    pub fn external_resources(&self, source: &dyn GridSource, zoom: f64) -> Vec<String> {
        let mut resources = self.grid_style(zoom).external_resources();
        let grids = self.data_symbols.as_ref().map_or(0, Vec::len);
        for grid_index in 0..grids {
            for style in self.data_styles(grid_index, source, zoom).iter().flatten() {
                for resource in style.external_resources() {
                    if !resources.contains(&resource) {
                        resources.push(resource);
                    }
                }
            }
        }
        resources
    }

    /// Memoized marker or text symbol test
    pub fn is_label(&mut self, grid_index: usize, data_index: usize, symbol: &Symbol) -> bool {
        *self
            .label_tests
            .entry((grid_index, data_index))
            .or_insert_with(|| is_label_symbol(symbol))
    }

    pub fn placement_symbol(
        &mut self,
        grid_index: usize,
        data_index: usize,
        symbol: &Symbol,
    ) -> &Symbol {
        self.placement_symbols
            .entry((grid_index, data_index))
            .or_insert_with(|| label_placement_symbol(symbol))
    }

    pub fn packed(&self, grid_index: usize) -> Option<&DataCellBuffers> {
        self.packed.get(&grid_index)
    }
    pub fn set_packed(&mut self, grid_index: usize, buffers: DataCellBuffers) {
        self.packed.insert(grid_index, buffers);
    }
    pub fn data_buffers(&self, grid_index: usize) -> Option<DataBufferIds> {
        self.data_buffers.get(&grid_index).copied()
    }
    pub fn set_data_buffers(&mut self, grid_index: usize, ids: DataBufferIds) {
        self.data_buffers.insert(grid_index, ids);
    }
    pub fn line_buffer(&self, grid_index: usize) -> Option<BufferId> {
        self.line_buffers.get(&grid_index).copied()
    }
    pub fn set_line_buffer(&mut self, grid_index: usize, id: BufferId) {
        self.line_buffers.insert(grid_index, id);
    }

    /// Drop compiled symbols and packed arrays, GPU objects stay alive
    pub fn invalidate(&mut self) {
        self.grid_symbol = None;
        self.data_symbols = None;
        self.label_tests.clear();
        self.placement_symbols.clear();
        self.packed.clear();
    }

    /// Force repacking of all grids
    pub fn drop_packed(&mut self) {
        self.packed.clear();
    }

    /// Remove all buffer ids, to be deleted by the caller
    pub fn take_buffers(&mut self) -> Vec<BufferId> {
        let mut buffers = self.line_buffers.drain().map(|(_, id)| id).collect::<Vec<_>>();
        for (_, ids) in self.data_buffers.drain() {
            buffers.extend_from_slice(&[ids.positions, ids.colors, ids.opacities, ids.indices]);
        }
        buffers.sort();
        buffers
    }

    /// Remove program ids, to be deleted by the caller
    pub fn take_programs(&mut self) -> Vec<ProgramId> {
        self.grid_program
            .take()
            .into_iter()
            .chain(self.data_program.take())
            .collect()
    }

    /// Forget everything
    pub fn clear(&mut self) {
        *self = RenderCache::default();
    }
}
