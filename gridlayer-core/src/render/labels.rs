//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Markers and texts on data cell centers

use crate::core::grid_spec::DataCell;
use crate::style::Symbol;
use cell_grid::{Coord, Extent, GridGeometry};
use serde_json::Value as JsonValue;

/// Label points of a data entry
#[derive(Clone, PartialEq, Debug)]
pub struct LabelPlacement {
    pub grid_index: usize,
    pub data_index: usize,
    pub anchors: Vec<Coord>,
    /// Symbol with point placement and without outline or fill
    pub symbol: Symbol,
    pub properties: Option<JsonValue>,
    pub debug: bool,
}

/// Centers of the data entry cells within `extent`
pub fn label_anchors(entry: &DataCell, geometry: &GridGeometry, extent: &Extent) -> Vec<Coord> {
    entry
        .cell_range()
        .iter()
        .filter_map(|(col, row)| geometry.cell_center(col, row))
        .filter(|center| extent.contains(center))
        .collect()
}

#[test]
fn test_anchors() {
    use cell_grid::{Projection, Unit};

    let geometry = GridGeometry::new(
        Coord::new(0.0, 0.0),
        10.0,
        10.0,
        Unit::Degree,
        Projection::Identity,
    );
    let extent = Extent::new(0.0, -20.0, 20.0, 0.0);
    let anchors = label_anchors(&DataCell::new((0, 3), (1, 1)), &geometry, &extent);
    assert_eq!(anchors, vec![Coord::new(5.0, -15.0), Coord::new(15.0, -15.0)]);
    assert!(label_anchors(&DataCell::single(-1, 0), &geometry, &extent).is_empty());
}
