//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::grid_spec::{DataCell, GridSpec, OffsetFn};
use crate::core::layer::{GridLayer, LayerOptions};
use crate::core::sequencer::Visit;
use crate::core::viewport::MapView;
use cell_grid::{AxisBounds, Coord, Extent, Projection, Unit};
use std::sync::Arc;

fn identity_view() -> MapView {
    MapView::new(Coord::new(0.0, 0.0), 10.0, 512, 512, Projection::Identity)
}

fn bounded_grid() -> GridSpec {
    GridSpec::new(Coord::new(0.0, 0.0), 100.0, 100.0).with_bounds(
        AxisBounds::new(Some(-5), Some(5)),
        AxisBounds::new(Some(-5), Some(5)),
    )
}

fn identity_layer(grids: Vec<GridSpec>) -> GridLayer {
    let options = LayerOptions {
        projection: Some(Projection::Identity),
        ..Default::default()
    };
    GridLayer::with_options("test", grids, options)
}

#[test]
fn test_grid_extent() {
    let view = identity_view();
    let layer = identity_layer(vec![bounded_grid()]);
    assert_eq!(
        layer.get_grid_extent(0, &view),
        Some(Extent::new(-500.0, -500.0, 500.0, 500.0))
    );
    assert_eq!(layer.get_grid_extent(1, &view), None);
}

#[test]
fn test_cell_at() {
    let view = identity_view();
    let layer = identity_layer(vec![bounded_grid()]);
    assert_eq!(layer.get_cell_at(&Coord::new(0.0, 0.0), 0, &view), Some((0, 0)));
    assert_eq!(layer.get_cell_at(&Coord::new(50.0, -50.0), 0, &view), Some((0, 0)));
    assert_eq!(layer.get_cell_at(&Coord::new(-450.0, 450.0), 0, &view), Some((-5, -5)));
    assert_eq!(layer.get_cell_at(&Coord::new(499.0, -499.0), 0, &view), Some((4, 4)));
    // On the outer edge, but the cell is out of bounds
    assert_eq!(layer.get_cell_at(&Coord::new(500.0, 0.0), 0, &view), None);
    assert_eq!(layer.get_cell_at(&Coord::new(600.0, 0.0), 0, &view), None);
    assert_eq!(layer.get_cell_at(&Coord::new(0.0, 0.0), 1, &view), None);
}

#[test]
fn test_identify() {
    let view = identity_view();
    let layer = identity_layer(vec![bounded_grid()]);
    let identified = layer
        .identify(&Coord::new(50.0, -50.0), 0, &view)
        .expect("no cell found");
    assert_eq!((identified.col, identified.row), (0, 0));
    let rect = identified.geometry;
    assert_eq!(rect.nw, Coord::new(0.0, 0.0));
    assert_eq!(rect.width, 100.0);
    assert_eq!(rect.height, 100.0);
    assert_eq!(rect.altitude, None);
    assert_eq!(
        rect.ring,
        vec![
            Coord::new(0.0, 0.0),
            Coord::new(100.0, 0.0),
            Coord::new(100.0, -100.0),
            Coord::new(0.0, -100.0),
            Coord::new(0.0, 0.0),
        ]
    );
    assert_eq!(layer.identify(&Coord::new(5000.0, 0.0), 0, &view), None);
}

#[test]
fn test_meter_cell_geometry() {
    let view = MapView::new(Coord::new(8.5, 47.3), 15.0, 512, 512, Projection::WebMercator);
    let grid = GridSpec::new(Coord::new(8.5, 47.3), 200.0, 100.0)
        .with_unit(Unit::Meter)
        .with_altitude(12.0);
    let layer = GridLayer::new("meter", vec![grid]);
    let rect = layer.get_cell_geometry(2, -3, 0, &view).unwrap();
    assert_eq!(rect.width, 200.0);
    assert_eq!(rect.height, 100.0);
    assert_eq!(rect.altitude, Some(12.0));
    assert_eq!(rect.ring.len(), 5);
    assert_eq!(rect.ring[0], rect.ring[4]);
    // north west corner is north of the south west one
    assert!(rect.ring[0].y > rect.ring[3].y);

    let grid = GridSpec::new(Coord::new(8.5, 47.3), 0.01, 0.01).with_unit(Unit::Degree);
    let layer = GridLayer::new("degree", vec![grid]);
    let rect = layer.get_cell_geometry(0, 0, 0, &view).unwrap();
    // Degree cells are measured on the sphere
    assert!((rect.height - 1113.2).abs() < 1.0, "{}", rect.height);
    assert!(rect.width < rect.height);
}

#[test]
fn test_visit_around() {
    let view = identity_view();
    let grid = GridSpec::new(Coord::new(0.0, 0.0), 100.0, 100.0)
        .with_data(vec![DataCell::new((2, 4), (5, 5))]);
    let layer = identity_layer(vec![grid]);
    let mut visited = Vec::new();
    // center of cell (3, 5)
    layer.visit_around(
        &Coord::new(350.0, -550.0),
        |r| {
            visited.push((r.col, r.row));
            Visit::Continue
        },
        0,
        &view,
    );
    assert_eq!(visited, vec![(3, 5), (2, 5), (4, 5)]);

    let mut visited = 0;
    layer.visit_around(
        &Coord::new(350.0, -550.0),
        |_| {
            visited += 1;
            Visit::Stop
        },
        0,
        &view,
    );
    assert_eq!(visited, 1);

    // Outside of bounded grid
    let layer = identity_layer(vec![bounded_grid().with_data(vec![DataCell::single(0, 0)])]);
    let mut visited = 0;
    layer.visit_around(
        &Coord::new(900.0, 0.0),
        |_| {
            visited += 1;
            Visit::Continue
        },
        0,
        &view,
    );
    assert_eq!(visited, 0);
}

#[test]
fn test_modifications() {
    let view = identity_view();
    let mut layer = identity_layer(vec![]);
    assert!(layer.is_empty(0));
    let v0 = layer.version();

    assert!(layer.set_grid(bounded_grid(), 0).is_ok());
    assert!(!layer.is_empty(0));
    assert_eq!(layer.grid_count(), 1);
    assert!(layer.version() > v0);

    assert_eq!(
        layer.set_grid(bounded_grid(), 5),
        Err("Grid index 5 out of range (grid count 1)".to_string())
    );
    let invalid = GridSpec::new(Coord::new(0.0, 0.0), -1.0, 100.0);
    assert!(layer.set_grid(invalid, 0).is_err());
    assert_eq!(layer.grid(0).unwrap().width, 100.0);

    let v1 = layer.version();
    layer
        .set_grid_data(vec![DataCell::single(1, 1)], 0)
        .unwrap();
    assert_eq!(layer.grid(0).unwrap().data.len(), 1);
    assert!(layer.version() > v1);
    assert!(layer.set_grid_data(vec![], 3).is_err());

    let offset: OffsetFn = Arc::new(|| (100.0, 0.0));
    layer.set_offset(Some(offset), 0).unwrap();
    assert!(layer.grid(0).unwrap().is_dynamic());
    assert_eq!(layer.get_cell_at(&Coord::new(50.0, -50.0), 0, &view), Some((-1, 0)));
    layer.set_offset(None, 0).unwrap();
    assert_eq!(layer.get_cell_at(&Coord::new(50.0, -50.0), 0, &view), Some((0, 0)));

    let v2 = layer.version();
    layer.clear();
    assert!(layer.is_empty(0));
    assert_eq!(layer.grid_count(), 0);
    assert!(layer.version() > v2);
}

#[test]
fn test_grid_projection() {
    let view = identity_view();
    let layer = GridLayer::new("map projection", vec![bounded_grid()]);
    assert_eq!(layer.grid_projection(&view), Projection::Identity);
    let mut options = LayerOptions::default();
    options.projection = Some(Projection::Wgs84);
    let layer = GridLayer::with_options("own projection", vec![bounded_grid()], options);
    assert_eq!(layer.grid_projection(&view), Projection::Wgs84);
}
