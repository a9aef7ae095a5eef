//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Decide what of a grid is worth drawing

use crate::core::screen::{Point, Quad, ScreenExtent};
use crate::core::viewport::Viewport;
use crate::style::color::Rgba;
use crate::style::ResolvedStyle;
use cell_grid::{CellRange, GridGeometry};

/// Cells smaller than this (device units) are not distinguishable
pub const MIN_CELL_SIZE: f64 = 0.5;

/// Quads larger than this (device units) are broken projections
pub const MAX_QUAD_SIZE: f64 = 1.0e4;

/// Device position of a cell's north west corner
pub fn device_nw(
    geometry: &GridGeometry,
    col: i64,
    row: i64,
    viewport: &dyn Viewport,
) -> Option<Point> {
    let nw = geometry.cell_nw(col, row)?;
    let point = viewport.coord_to_point(&nw);
    if point.is_finite() {
        Some(point)
    } else {
        None
    }
}

/// Device outline of a cell
pub fn device_quad(
    geometry: &GridGeometry,
    col: i64,
    row: i64,
    viewport: &dyn Viewport,
) -> Option<Quad> {
    Some(Quad::new(
        device_nw(geometry, col, row, viewport)?,
        device_nw(geometry, col + 1, row, viewport)?,
        device_nw(geometry, col + 1, row + 1, viewport)?,
        device_nw(geometry, col, row + 1, viewport)?,
    ))
}

/// Device width and height of the first cell of `range`
pub fn cell_device_size(
    geometry: &GridGeometry,
    range: &CellRange,
    viewport: &dyn Viewport,
) -> Option<(f64, f64)> {
    let p0 = device_nw(geometry, range.mincol, range.minrow, viewport)?;
    let px = device_nw(geometry, range.mincol + 1, range.minrow, viewport)?;
    let py = device_nw(geometry, range.mincol, range.minrow + 1, viewport)?;
    Some((
        (px.x - p0.x).hypot(px.y - p0.y),
        (py.x - p0.x).hypot(py.y - p0.y),
    ))
}

/// Draw the visible grid area as one rectangle instead of single cells
pub fn should_collapse_to_rect(width: f64, height: f64, grid_style: &ResolvedStyle) -> bool {
    width < MIN_CELL_SIZE || height < MIN_CELL_SIZE || grid_style.has_fill()
}

pub fn lines_enabled(grid_style: &ResolvedStyle) -> bool {
    grid_style.line_opacity() > 0.0 && grid_style.line_width() > 0.0
}

#[derive(Clone, PartialEq, Debug)]
pub struct CollapseFill {
    pub rect: ScreenExtent,
    pub color: Rgba,
    pub opacity: f64,
}

/// Grid drawing of one frame
#[derive(Clone, PartialEq, Debug)]
pub struct GridDrawPlan {
    pub range: CellRange,
    /// Device size of a cell
    pub cell_size: (f64, f64),
    pub collapse_fill: Option<CollapseFill>,
    pub draw_lines: bool,
}

/// Plan grid drawing, `None` if the style has no visible lines
pub fn grid_draw_plan(
    geometry: &GridGeometry,
    range: CellRange,
    grid_style: &ResolvedStyle,
    viewport: &dyn Viewport,
) -> Option<GridDrawPlan> {
    if !lines_enabled(grid_style) {
        return None;
    }
    let (width, height) = cell_device_size(geometry, &range, viewport)?;
    let too_small = width < MIN_CELL_SIZE || height < MIN_CELL_SIZE;
    let collapse_fill = if should_collapse_to_rect(width, height, grid_style) {
        let p0 = device_nw(geometry, range.mincol, range.minrow, viewport)?;
        let p2 = device_nw(geometry, range.maxcol + 1, range.maxrow + 1, viewport)?;
        Some(CollapseFill {
            rect: ScreenExtent::new(&p0, &p2),
            color: grid_style.line_color().unwrap_or([0, 0, 0, 255]),
            opacity: grid_style
                .polygon_opacity()
                .filter(|opacity| *opacity > 0.0)
                .unwrap_or(1.0),
        })
    } else {
        None
    };
    Some(GridDrawPlan {
        range,
        cell_size: (width, height),
        collapse_fill,
        draw_lines: !too_small,
    })
}

/// Quad is finite, not oversized and visible
pub fn quad_is_renderable(quad: &Quad, container: &ScreenExtent) -> bool {
    if !quad.is_finite() {
        return false;
    }
    let extent = quad.extent();
    extent.width() <= MAX_QUAD_SIZE
        && extent.height() <= MAX_QUAD_SIZE
        && extent.intersects(container)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::render::test_view::ScaledView;
    use crate::style::{default_symbol, resolve_style, StyleContext};
    use cell_grid::{Coord, Extent, Projection, Unit};

    fn grid_style(extra: serde_json::Value) -> ResolvedStyle {
        let mut symbol = default_symbol();
        if let serde_json::Value::Object(map) = extra {
            symbol.extend(map);
        }
        resolve_style(&symbol, &StyleContext::new(10.0, None))
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
    fn test_collapse() {
        let style = grid_style(json!({}));
        assert!(!should_collapse_to_rect(10.0, 10.0, &style));
        assert!(should_collapse_to_rect(0.4, 10.0, &style));
        assert!(should_collapse_to_rect(10.0, 0.49, &style));
        assert!(should_collapse_to_rect(
            10.0,
            10.0,
            &grid_style(json!({"polygonOpacity": 0.2}))
        ));
        assert!(should_collapse_to_rect(
            10.0,
            10.0,
            &grid_style(json!({"polygonFill": "#f00"}))
        ));
        assert!(should_collapse_to_rect(
            10.0,
            10.0,
            &grid_style(json!({"polygonPatternFile": "url(a.png)"}))
        ));
    }

    #[test]
    fn test_draw_plan() {
        let view = ScaledView::new(Extent::new(0.0, -100.0, 100.0, 0.0), 2.0);
        let range = CellRange::new(0, 9, 0, 9);
        let plan = grid_draw_plan(&geometry(), range, &grid_style(json!({})), &view).unwrap();
        assert_eq!(plan.cell_size, (20.0, 20.0));
        assert!(plan.draw_lines);
        assert_eq!(plan.collapse_fill, None);

        let plan = grid_draw_plan(
            &geometry(),
            range,
            &grid_style(json!({"polygonOpacity": 0.5, "lineColor": "#f00"})),
            &view,
        )
        .unwrap();
        assert!(plan.draw_lines);
        assert_eq!(
            plan.collapse_fill,
            Some(CollapseFill {
                rect: ScreenExtent::new(&Point::new(0.0, 0.0), &Point::new(200.0, 200.0)),
                color: [255, 0, 0, 255],
                opacity: 0.5,
            })
        );

        // sub-pixel cells
        let view = ScaledView::new(Extent::new(0.0, -100.0, 100.0, 0.0), 0.01);
        let plan = grid_draw_plan(&geometry(), range, &grid_style(json!({})), &view).unwrap();
        assert!(!plan.draw_lines);
        let fill = plan.collapse_fill.unwrap();
        assert_eq!(fill.color, [187, 187, 187, 255]);
        assert_eq!(fill.opacity, 1.0);

        assert_eq!(
            grid_draw_plan(&geometry(), range, &grid_style(json!({"lineOpacity": 0})), &view),
            None
        );
        assert_eq!(
            grid_draw_plan(&geometry(), range, &grid_style(json!({"lineWidth": 0})), &view),
            None
        );
    }

    #[test]
    fn test_quad_guard() {
        let container = ScreenExtent::new(&Point::origin(), &Point::new(100.0, 100.0));
        let quad = |x0: f64, y0: f64, x1: f64, y1: f64| {
            Quad::new(
                Point::new(x0, y0),
                Point::new(x1, y0),
                Point::new(x1, y1),
                Point::new(x0, y1),
            )
        };
        assert!(quad_is_renderable(&quad(10.0, 10.0, 20.0, 20.0), &container));
        // touching the container
        assert!(quad_is_renderable(&quad(-10.0, 0.0, 0.0, 10.0), &container));
        assert!(!quad_is_renderable(&quad(110.0, 10.0, 120.0, 20.0), &container));
        assert!(!quad_is_renderable(&quad(-2.0e4, 10.0, 20.0, 20.0), &container));
        assert!(!quad_is_renderable(&quad(10.0, 10.0, 20.0, 1.0e5), &container));
        assert!(!quad_is_renderable(&quad(f64::NAN, 10.0, 20.0, 20.0), &container));
    }
}
