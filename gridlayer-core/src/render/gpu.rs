//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Vertex buffers for GPU drawing

use crate::core::grid_spec::DataCell;
use crate::core::screen::Point;
use crate::core::viewport::Viewport;
use crate::render::shaders::ShaderSource;
use crate::style::ResolvedStyle;
use cell_grid::{CellRange, GridGeometry};

pub type ProgramId = u32;
pub type BufferId = u32;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum BufferUsage {
    Static,
    Dynamic,
}

#[derive(PartialEq, Clone, Copy, Debug)]
pub struct LineUniforms {
    pub matrix: [f32; 16],
    pub color: [f32; 4],
    pub opacity: f32,
    pub line_width: f32,
}

/// Buffer objects holding `DataCellBuffers`
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct DataBufferIds {
    pub positions: BufferId,
    pub colors: BufferId,
    pub opacities: BufferId,
    pub indices: BufferId,
}

/// GL context of the host
pub trait GpuBackend {
    fn create_program(&mut self, shader: &ShaderSource) -> Result<ProgramId, String>;
    fn delete_program(&mut self, program: ProgramId);
    fn create_buffer(&mut self) -> Result<BufferId, String>;
    fn delete_buffer(&mut self, buffer: BufferId);
    fn upload(&mut self, buffer: BufferId, data: &[u8], usage: BufferUsage);
    /// Line list with 3 floats per vertex
    fn draw_lines(
        &mut self,
        program: ProgramId,
        positions: BufferId,
        vertex_count: usize,
        uniforms: &LineUniforms,
    );
    fn draw_indexed_triangles(
        &mut self,
        program: ProgramId,
        buffers: &DataBufferIds,
        index_count: usize,
        matrix: &[f32; 16],
    );
}

/// Packed data cell quads
#[derive(Clone, PartialEq, Debug, Default)]
pub struct DataCellBuffers {
    /// x, y, z per vertex
    pub positions: Vec<f32>,
    /// r, g, b per vertex
    pub colors: Vec<u8>,
    pub opacities: Vec<u8>,
    /// Two triangles per quad
    pub indices: Vec<u32>,
}

impl DataCellBuffers {
    pub fn new() -> DataCellBuffers {
        DataCellBuffers::default()
    }
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }
    pub fn quad_count(&self) -> usize {
        self.vertex_count() / 4
    }
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
    pub fn push_quad(&mut self, corners: &[Point; 4], z: f64, rgb: [u8; 3], opacity: u8) {
        let idx = self.vertex_count() as u32;
        self.indices
            .extend_from_slice(&[idx, idx + 1, idx + 2, idx, idx + 2, idx + 3]);
        for corner in corners {
            self.positions
                .extend_from_slice(&[corner.x as f32, corner.y as f32, z as f32]);
            self.colors.extend_from_slice(&rgb);
            self.opacities.push(opacity);
        }
    }
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// North west corner of a cell in GL point space
pub fn gl_nw(geometry: &GridGeometry, col: i64, row: i64, viewport: &dyn Viewport) -> Option<Point> {
    let nw = geometry.cell_nw(col, row)?;
    let point = viewport.coord_to_gl_point(&nw);
    if point.is_finite() {
        Some(point)
    } else {
        None
    }
}

/// Altitude in meters as GL z, measured at the view center
pub fn altitude_to_z(viewport: &dyn Viewport, altitude: f64) -> f64 {
    if altitude == 0.0 || !altitude.is_finite() {
        return 0.0;
    }
    let center = viewport.center();
    let measurer = viewport.projection().measurer();
    match measurer.locate(&center, altitude, 0.0) {
        Some(target) => {
            let p0 = viewport.coord_to_gl_point(&center);
            let p1 = viewport.coord_to_gl_point(&target);
            let z = (p1.x - p0.x).abs() * altitude.signum();
            if z.is_finite() {
                z
            } else {
                0.0
            }
        }
        None => 0.0,
    }
}

/// Vertex color and opacity byte of a data symbol
pub fn data_cell_color(style: &ResolvedStyle) -> ([u8; 3], u8) {
    let (rgba, opacity) = match style.polygon_fill() {
        Some(rgba) => (rgba, style.fill_opacity()),
        None => ([255, 255, 255, 255], 0.0),
    };
    let alpha = rgba[3] as f64 / 255.0 * opacity * 255.0;
    (
        [rgba[0], rgba[1], rgba[2]],
        alpha.round().max(0.0).min(255.0) as u8,
    )
}

/// Cell edges of a range as line list
pub fn pack_grid_lines(
    geometry: &GridGeometry,
    range: &CellRange,
    viewport: &dyn Viewport,
    z: f64,
) -> Vec<f32> {
    let mut vertices =
        Vec::with_capacity((range.cols() as usize + range.rows() as usize + 2) * 6);
    let z = z as f32;
    let mut push = |from: Option<Point>, to: Option<Point>| {
        if let (Some(from), Some(to)) = (from, to) {
            vertices.extend_from_slice(&[from.x as f32, from.y as f32, z, to.x as f32, to.y as f32, z]);
        }
    };
    for col in range.mincol..=range.maxcol + 1 {
        push(
            gl_nw(geometry, col, range.minrow, viewport),
            gl_nw(geometry, col, range.maxrow + 1, viewport),
        );
    }
    for row in range.minrow..=range.maxrow + 1 {
        push(
            gl_nw(geometry, range.mincol, row, viewport),
            gl_nw(geometry, range.maxcol + 1, row, viewport),
        );
    }
    vertices
}

/// Quads of all data cells with a symbol.
///
/// The GL point space does not depend on the view, so the buffers stay valid
/// until the grid changes.
pub fn pack_data_cells(
    data: &[DataCell],
    styles: &[Option<ResolvedStyle>],
    geometry: &GridGeometry,
    viewport: &dyn Viewport,
    z: f64,
) -> DataCellBuffers {
    let mut buffers = DataCellBuffers::new();
    for (data_index, entry) in data.iter().enumerate() {
        let style = match styles.get(data_index) {
            Some(Some(style)) => style,
            _ => continue,
        };
        let (rgb, opacity) = data_cell_color(style);
        for (col, row) in entry.cell_range() {
            let (p1, p3) = match (
                gl_nw(geometry, col, row, viewport),
                gl_nw(geometry, col + 1, row + 1, viewport),
            ) {
                (Some(p1), Some(p3)) => (p1, p3),
                _ => continue,
            };
            let p2 = Point::new(p3.x, p1.y);
            let p4 = Point::new(p1.x, p3.y);
            buffers.push_quad(&[p1, p2, p3, p4], z, rgb, opacity);
        }
    }
    buffers
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::render::test_view::ScaledView;
    use crate::style::{resolve_style, StyleContext};
    use cell_grid::{Coord, Extent, Projection, Unit};

    fn style(symbol: serde_json::Value) -> Option<ResolvedStyle> {
        match symbol {
            serde_json::Value::Object(map) => {
                Some(resolve_style(&map, &StyleContext::new(10.0, None)))
            }
            _ => None,
        }
    }

    fn geometry() -> GridGeometry {
        GridGeometry::new(
            Coord::new(0.0, 0.0),
            10.0,
            10.0,
            Unit::Projection,
            Projection::Identity,
        )
    }

    #[test]
    fn test_colors() {
        assert_eq!(
            data_cell_color(&style(json!({"polygonFill": "#f00"})).unwrap()),
            ([255, 0, 0], 255)
        );
        assert_eq!(
            data_cell_color(&style(json!({"polygonFill": "#0f0", "polygonOpacity": 0.5})).unwrap()),
            ([0, 255, 0], 128)
        );
        assert_eq!(
            data_cell_color(&style(json!({"polygonFill": "rgba(0,0,255,0.5)", "polygonOpacity": 0.5})).unwrap()),
            ([0, 0, 255], 64)
        );
        assert_eq!(
            data_cell_color(&style(json!({"polygonOpacity": 0.8})).unwrap()),
            ([255, 255, 255], 0)
        );
    }

    #[test]
    fn test_pack_data_cells() {
        let view = ScaledView::new(Extent::new(0.0, -100.0, 100.0, 0.0), 1.0);
        let data = vec![
            DataCell::new((2, 4), (5, 5)),
            DataCell::single(0, 0),
            DataCell::new((0, 1), (0, 1)),
        ];
        let styles = vec![
            style(json!({"polygonFill": "#f00"})),
            None,
            style(json!({"polygonFill": "#00f", "polygonOpacity": 0.0})),
        ];
        let buffers = pack_data_cells(&data, &styles, &geometry(), &view, 2.0);
        let n = 3 + 4;
        assert_eq!(buffers.quad_count(), n);
        assert_eq!(buffers.vertex_count(), 4 * n);
        assert_eq!(buffers.positions.len(), 12 * n);
        assert_eq!(buffers.colors.len(), 12 * n);
        assert_eq!(buffers.opacities.len(), 4 * n);
        assert_eq!(buffers.indices.len(), 6 * n);
        assert!(buffers.indices.iter().all(|i| (*i as usize) < 4 * n));
        assert_eq!(&buffers.indices[..12], &[0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]);

        // cell (2, 5): nw (20, -50), se (30, -60)
        assert_eq!(
            &buffers.positions[..12],
            &[20.0, -50.0, 2.0, 30.0, -50.0, 2.0, 30.0, -60.0, 2.0, 20.0, -60.0, 2.0]
        );
        assert_eq!(&buffers.colors[..6], &[255, 0, 0, 255, 0, 0]);
        assert_eq!(buffers.opacities[0], 255);
        assert_eq!(*buffers.opacities.last().unwrap(), 0);
        assert_eq!(buffers.position_bytes().len(), 4 * buffers.positions.len());
    }

    #[test]
    fn test_pack_grid_lines() {
        let view = ScaledView::new(Extent::new(0.0, -100.0, 100.0, 0.0), 1.0);
        let range = CellRange::new(0, 1, 0, 2);
        let vertices = pack_grid_lines(&geometry(), &range, &view, 0.0);
        // 3 vertical and 4 horizontal lines
        assert_eq!(vertices.len(), (3 + 4) * 6);
        assert_eq!(&vertices[..6], &[0.0, 0.0, 0.0, 0.0, -30.0, 0.0]);
        assert_eq!(&vertices[18..24], &[0.0, 0.0, 0.0, 20.0, 0.0, 0.0]);
    }

    #[test]
    fn test_altitude() {
        let view = ScaledView::new(Extent::new(0.0, -100.0, 100.0, 0.0), 2.0);
        assert_eq!(altitude_to_z(&view, 0.0), 0.0);
        assert_eq!(altitude_to_z(&view, 10.0), 20.0);
        assert_eq!(altitude_to_z(&view, -10.0), -20.0);
    }
}
