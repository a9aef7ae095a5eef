//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::stats::{Measure, Statistics};
use crate::core::viewport::Viewport;
use crate::render::cache::RenderCache;
use crate::render::cull::{grid_draw_plan, GridDrawPlan};
use crate::render::gpu::{
    altitude_to_z, pack_data_cells, pack_grid_lines, BufferId, BufferUsage, DataBufferIds,
    GpuBackend, LineUniforms, ProgramId,
};
use crate::render::labels::{label_anchors, LabelPlacement};
use crate::render::path::{build_data_cell_paths, build_grid_lines, PathBatch, PathEncodable, PathSink};
use crate::render::shaders::{DATA_SHADER, GRID_SHADER};
use crate::render::source::GridSource;
use crate::style::color::normalized;
use cell_grid::{CellRange, GridGeometry};

/// Drawing results of one grid
#[derive(Clone, PartialEq, Debug, Default)]
pub struct GridFrame {
    pub grid_index: usize,
    /// Visible cells, `None` if the grid is out of view
    pub range: Option<CellRange>,
    pub collapsed: bool,
    pub lines: usize,
    pub batches: usize,
    pub quads: usize,
    pub skipped: usize,
    pub labels: usize,
    /// GPU arrays were packed in this frame
    pub rebuilt: bool,
}

impl GridFrame {
    fn new(grid_index: usize) -> GridFrame {
        GridFrame {
            grid_index,
            ..Default::default()
        }
    }
    fn add_batches(&mut self, batches: &[PathBatch]) {
        self.batches += batches.len();
        self.quads += batches.iter().map(|b| b.quads).sum::<usize>();
        self.skipped += batches.iter().map(|b| b.skipped).sum::<usize>();
    }
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct FrameSummary {
    pub grids: Vec<GridFrame>,
}

impl FrameSummary {
    pub fn batches(&self) -> usize {
        self.grids.iter().map(|g| g.batches).sum()
    }
    pub fn quads(&self) -> usize {
        self.grids.iter().map(|g| g.quads).sum()
    }
    pub fn skipped(&self) -> usize {
        self.grids.iter().map(|g| g.skipped).sum()
    }
    pub fn labels(&self) -> usize {
        self.grids.iter().map(|g| g.labels).sum()
    }
}

/// Source changes require a new frame, unless zooming a flat map
fn need_to_redraw(
    to_redraw: bool,
    cache: &RenderCache,
    source: &dyn GridSource,
    viewport: &dyn Viewport,
) -> bool {
    if viewport.pitch() == 0.0 && viewport.is_zooming() {
        return false;
    }
    to_redraw
        || !cache.is_current(source)
        || (0..source.grid_count()).any(|i| source.grid(i).map_or(false, |g| g.is_dynamic()))
}

fn visible_grid(
    source: &dyn GridSource,
    grid_index: usize,
    viewport: &dyn Viewport,
) -> Option<(GridGeometry, CellRange)> {
    let geometry = source.grid_geometry(grid_index, viewport)?;
    let range = geometry.cell_range(&viewport.extent())?;
    Some((geometry, range))
}

fn fill_collapsed(plan: &GridDrawPlan, sink: &mut dyn PathSink) -> bool {
    match plan.collapse_fill {
        Some(ref fill) => {
            sink.fill_rect(&fill.rect, &fill.color, fill.opacity);
            true
        }
        None => false,
    }
}

fn paint_batches(batches: &[PathBatch], sink: &mut dyn PathSink) {
    for batch in batches {
        if batch.has_fill() {
            sink.fill_path(&batch.path, &batch.style, batch.fill_opacity);
        }
        sink.stroke_path(&batch.path, &batch.style, batch.stroke_opacity);
    }
}

/// Paint marker and text symbols on visible data cell centers
fn place_labels(
    cache: &mut RenderCache,
    source: &dyn GridSource,
    grid_index: usize,
    geometry: &GridGeometry,
    viewport: &dyn Viewport,
    sink: &mut dyn PathSink,
) -> usize {
    let extent = viewport.extent();
    let mut count = 0;
    for (data_index, entry) in source.get_data_cells(grid_index).iter().enumerate() {
        let symbol = match entry.symbol {
            Some(ref symbol) => symbol,
            None => continue,
        };
        if !cache.is_label(grid_index, data_index, symbol) {
            continue;
        }
        let anchors = label_anchors(entry, geometry, &extent);
        if anchors.is_empty() {
            continue;
        }
        let label = LabelPlacement {
            grid_index,
            data_index,
            anchors,
            symbol: cache.placement_symbol(grid_index, data_index, symbol).clone(),
            properties: entry.properties.clone(),
            debug: source.debug(),
        };
        sink.paint_label(&label);
        count += 1;
    }
    count
}

fn record_frame(stats: &mut Statistics, frame: &GridFrame) {
    let grid_index = frame.grid_index;
    stats.add(grid_index, Measure::Cells, frame.range.map_or(0, |r| r.len()));
    stats.add(grid_index, Measure::Quads, frame.quads as u64);
    stats.add(grid_index, Measure::Skipped, frame.skipped as u64);
    stats.add(grid_index, Measure::Labels, frame.labels as u64);
}

/// Draws grids as canvas paths
#[derive(Default)]
pub struct CanvasGridRenderer {
    cache: RenderCache,
    stats: Statistics,
    to_redraw: bool,
}

impl CanvasGridRenderer {
    pub fn new() -> CanvasGridRenderer {
        CanvasGridRenderer::default()
    }
    pub fn cache(&self) -> &RenderCache {
        &self.cache
    }
    pub fn stats(&self) -> &Statistics {
        &self.stats
    }
    /// Compile styles and list the external files they need
    pub fn check_resources(&mut self, source: &dyn GridSource, viewport: &dyn Viewport) -> Vec<String> {
        self.cache.compile(source);
        self.cache.external_resources(source, viewport.zoom())
    }
    pub fn need_to_redraw(&self, source: &dyn GridSource, viewport: &dyn Viewport) -> bool {
        need_to_redraw(self.to_redraw, &self.cache, source, viewport)
    }
    pub fn redraw(&mut self) {
        self.to_redraw = true;
    }
    pub fn reset(&mut self) {
        self.cache.invalidate();
    }
    pub fn on_remove(&mut self) {
        self.cache.clear();
    }

    pub fn draw(
        &mut self,
        source: &dyn GridSource,
        viewport: &dyn Viewport,
        sink: &mut dyn PathSink,
    ) -> FrameSummary {
        self.cache.compile(source);
        self.to_redraw = false;
        let zoom = viewport.zoom();
        let grid_style = self.cache.grid_style(zoom);
        let mut summary = FrameSummary::default();
        for grid_index in 0..source.grid_count() {
            let mut frame = GridFrame::new(grid_index);
            if let Some((geometry, range)) = visible_grid(source, grid_index, viewport) {
                debug!("Grid {}: drawing cells {:?}", grid_index, range);
                frame.range = Some(range);
                if let Some(plan) = grid_draw_plan(&geometry, range, &grid_style, viewport) {
                    frame.collapsed = fill_collapsed(&plan, sink);
                    if plan.draw_lines {
                        let lines = build_grid_lines(&geometry, &range, viewport);
                        frame.lines = lines.len();
                        sink.stroke_path(&lines[..].encode(), &grid_style, grid_style.line_opacity());
                    }
                }
                let styles = self.cache.data_styles(grid_index, source, zoom);
                let batches = build_data_cell_paths(
                    source.get_data_cells(grid_index),
                    &styles,
                    &geometry,
                    &range,
                    viewport,
                );
                paint_batches(&batches, sink);
                frame.add_batches(&batches);
                frame.labels =
                    place_labels(&mut self.cache, source, grid_index, &geometry, viewport, sink);
            }
            record_frame(&mut self.stats, &frame);
            summary.grids.push(frame);
        }
        summary
    }

    pub fn draw_on_interacting(
        &mut self,
        source: &dyn GridSource,
        viewport: &dyn Viewport,
        sink: &mut dyn PathSink,
    ) -> FrameSummary {
        self.draw(source, viewport, sink)
    }
}

/// Draws grid lines and data cells with a GPU backend.
///
/// Collapsed grids and labels are painted on the canvas sink.
pub struct GlGridRenderer<B: GpuBackend> {
    backend: B,
    cache: RenderCache,
    stats: Statistics,
    to_redraw: bool,
}

impl<B: GpuBackend> GlGridRenderer<B> {
    pub fn new(backend: B) -> GlGridRenderer<B> {
        GlGridRenderer {
            backend,
            cache: RenderCache::new(),
            stats: Statistics::new(),
            to_redraw: false,
        }
    }
    pub fn backend(&self) -> &B {
        &self.backend
    }
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
    pub fn cache(&self) -> &RenderCache {
        &self.cache
    }
    pub fn stats(&self) -> &Statistics {
        &self.stats
    }
    pub fn check_resources(&mut self, source: &dyn GridSource, viewport: &dyn Viewport) -> Vec<String> {
        self.cache.compile(source);
        self.cache.external_resources(source, viewport.zoom())
    }
    pub fn need_to_redraw(&self, source: &dyn GridSource, viewport: &dyn Viewport) -> bool {
        need_to_redraw(self.to_redraw, &self.cache, source, viewport)
    }
    /// Repack all GPU arrays in the next frame
    pub fn redraw(&mut self) {
        self.to_redraw = true;
        self.cache.drop_packed();
    }
    /// Delete all buffers and cached arrays, programs are kept
    pub fn reset(&mut self) {
        for buffer in self.cache.take_buffers() {
            self.backend.delete_buffer(buffer);
        }
        self.cache.invalidate();
    }
    pub fn on_remove(&mut self) {
        self.reset();
        for program in self.cache.take_programs() {
            self.backend.delete_program(program);
        }
        self.cache.clear();
    }

    fn programs(&mut self) -> Result<(ProgramId, ProgramId), String> {
        let grid_program = match self.cache.grid_program {
            Some(program) => program,
            None => {
                let program = self
                    .backend
                    .create_program(&GRID_SHADER)
                    .map_err(|e| format!("Failed to create grid program: {}", e))?;
                self.cache.grid_program = Some(program);
                program
            }
        };
        let data_program = match self.cache.data_program {
            Some(program) => program,
            None => {
                let program = self
                    .backend
                    .create_program(&DATA_SHADER)
                    .map_err(|e| format!("Failed to create data program: {}", e))?;
                self.cache.data_program = Some(program);
                program
            }
        };
        Ok((grid_program, data_program))
    }

    fn line_buffer(&mut self, grid_index: usize) -> Result<BufferId, String> {
        if let Some(buffer) = self.cache.line_buffer(grid_index) {
            return Ok(buffer);
        }
        let buffer = self.backend.create_buffer()?;
        self.cache.set_line_buffer(grid_index, buffer);
        Ok(buffer)
    }

    fn data_buffers(&mut self, grid_index: usize) -> Result<DataBufferIds, String> {
        if let Some(ids) = self.cache.data_buffers(grid_index) {
            return Ok(ids);
        }
        let ids = DataBufferIds {
            positions: self.backend.create_buffer()?,
            colors: self.backend.create_buffer()?,
            opacities: self.backend.create_buffer()?,
            indices: self.backend.create_buffer()?,
        };
        self.cache.set_data_buffers(grid_index, ids);
        Ok(ids)
    }

    pub fn draw(
        &mut self,
        source: &dyn GridSource,
        viewport: &dyn Viewport,
        sink: &mut dyn PathSink,
    ) -> Result<FrameSummary, String> {
        self.cache.compile(source);
        self.to_redraw = false;
        let (grid_program, data_program) = self.programs()?;
        let matrix = viewport.proj_view_matrix().to_cols_array();
        let zoom = viewport.zoom();
        let grid_style = self.cache.grid_style(zoom);
        let mut summary = FrameSummary::default();

        for grid_index in 0..source.grid_count() {
            let mut frame = GridFrame::new(grid_index);
            let grid = match source.grid(grid_index) {
                Some(grid) => grid,
                None => continue,
            };
            let (geometry, range) = match visible_grid(source, grid_index, viewport) {
                Some(visible) => visible,
                None => {
                    record_frame(&mut self.stats, &frame);
                    summary.grids.push(frame);
                    continue;
                }
            };
            frame.range = Some(range);
            let altitude = grid.altitude.or_else(|| source.layer_altitude()).unwrap_or(0.0);
            let z = altitude_to_z(viewport, altitude);

            if let Some(plan) = grid_draw_plan(&geometry, range, &grid_style, viewport) {
                frame.collapsed = fill_collapsed(&plan, sink);
                if plan.draw_lines {
                    let vertices = pack_grid_lines(&geometry, &range, viewport, z);
                    let buffer = self.line_buffer(grid_index)?;
                    self.backend
                        .upload(buffer, bytemuck::cast_slice(&vertices), BufferUsage::Dynamic);
                    let uniforms = LineUniforms {
                        matrix,
                        color: normalized(&grid_style.line_color().unwrap_or([0, 0, 0, 255])),
                        opacity: grid_style.line_opacity() as f32,
                        line_width: grid_style.line_width() as f32,
                    };
                    self.backend
                        .draw_lines(grid_program, buffer, vertices.len() / 3, &uniforms);
                    frame.lines = vertices.len() / 6;
                }
            }

            let data = source.get_data_cells(grid_index);
            if !data.is_empty() {
                let dynamic = grid.is_dynamic();
                if dynamic || self.cache.packed(grid_index).is_none() {
                    let styles = self.cache.data_styles(grid_index, source, zoom);
                    let packed = pack_data_cells(data, &styles, &geometry, viewport, z);
                    debug!(
                        "Grid {}: packed {} data cells",
                        grid_index,
                        packed.quad_count()
                    );
                    self.cache.set_packed(grid_index, packed);
                    frame.rebuilt = true;
                }
                let ids = self.data_buffers(grid_index)?;
                let usage = if dynamic {
                    BufferUsage::Dynamic
                } else {
                    BufferUsage::Static
                };
                if let Some(packed) = self.cache.packed(grid_index) {
                    if !packed.is_empty() {
                        self.backend
                            .upload(ids.positions, packed.position_bytes(), usage);
                        self.backend.upload(ids.colors, &packed.colors, usage);
                        self.backend.upload(ids.opacities, &packed.opacities, usage);
                        self.backend.upload(ids.indices, packed.index_bytes(), usage);
                        self.backend.draw_indexed_triangles(
                            data_program,
                            &ids,
                            packed.indices.len(),
                            &matrix,
                        );
                        frame.batches = 1;
                        frame.quads = packed.quad_count();
                    }
                    self.stats
                        .add(grid_index, Measure::Vertices, packed.vertex_count() as u64);
                }
            }
            frame.labels =
                place_labels(&mut self.cache, source, grid_index, &geometry, viewport, sink);
            record_frame(&mut self.stats, &frame);
            summary.grids.push(frame);
        }
        Ok(summary)
    }

    pub fn draw_on_interacting(
        &mut self,
        source: &dyn GridSource,
        viewport: &dyn Viewport,
        sink: &mut dyn PathSink,
    ) -> Result<FrameSummary, String> {
        self.draw(source, viewport, sink)
    }
}
