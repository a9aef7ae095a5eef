//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Visiting data cells by distance

use crate::core::grid_spec::DataCell;
use crate::style::Symbol;
use cell_grid::CellIndex;
use serde_json::Value as JsonValue;

/// Visitor result
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Visit {
    Continue,
    Stop,
}

/// One cell of a data entry
#[derive(PartialEq, Clone, Debug)]
pub struct CellRecord<'a> {
    pub col: i64,
    pub row: i64,
    /// Index of the data entry
    pub data_index: usize,
    pub properties: Option<&'a JsonValue>,
    pub symbol: Option<&'a Symbol>,
}

/// All cells of all data entries, columns outer, rows inner
pub fn expand_data_cells(data: &[DataCell]) -> Vec<CellRecord> {
    let mut records = Vec::new();
    for (data_index, entry) in data.iter().enumerate() {
        for (col, row) in entry.cell_range() {
            records.push(CellRecord {
                col,
                row,
                data_index,
                properties: entry.properties.as_ref(),
                symbol: entry.symbol.as_ref(),
            });
        }
    }
    records
}

fn squared_distance(record: &CellRecord, start: &CellIndex) -> i128 {
    let dc = record.col as i128 - start.0 as i128;
    let dr = record.row as i128 - start.1 as i128;
    dc * dc + dr * dr
}

/// Visit data cells by ascending index distance to `start` until the visitor stops.
///
/// Cells with equal distance keep their expansion order.
pub fn visit_around<F>(data: &[DataCell], start: CellIndex, mut visitor: F)
where
    F: FnMut(&CellRecord) -> Visit,
{
    let mut records = expand_data_cells(data);
    if records.is_empty() {
        return;
    }
    records.sort_by_key(|record| squared_distance(record, &start));
    for record in &records {
        if visitor(record) == Visit::Stop {
            break;
        }
    }
}

#[test]
fn test_expand() {
    let data = vec![
        DataCell::new((2, 4), (5, 5)),
        DataCell::single(0, 0).with_properties(json!({ "foo": 1 })),
    ];
    let cells = expand_data_cells(&data)
        .iter()
        .map(|r| (r.col, r.row, r.data_index))
        .collect::<Vec<_>>();
    assert_eq!(cells, vec![(2, 5, 0), (3, 5, 0), (4, 5, 0), (0, 0, 1)]);
}

#[test]
fn test_visit_order() {
    let data = vec![DataCell::new((2, 4), (5, 5))];
    let mut visited = Vec::new();
    visit_around(&data, (3, 5), |r| {
        visited.push((r.col, r.row));
        Visit::Continue
    });
    assert_eq!(visited, vec![(3, 5), (2, 5), (4, 5)]);

    let data = vec![
        DataCell::new((-10, 10), (-10, 10)),
        DataCell::single(100, 100),
    ];
    let mut last = 0;
    let mut count = 0;
    visit_around(&data, (1, -2), |r| {
        let d = (r.col - 1).pow(2) + (r.row + 2).pow(2);
        assert!(d >= last);
        last = d;
        count += 1;
        Visit::Continue
    });
    assert_eq!(count, 21 * 21 + 1);
}

#[test]
fn test_visit_stop() {
    let data = vec![DataCell::new((0, 9), (0, 9))];
    let mut visited = Vec::new();
    visit_around(&data, (5, 5), |r| {
        visited.push((r.col, r.row));
        if visited.len() == 3 {
            Visit::Stop
        } else {
            Visit::Continue
        }
    });
    assert_eq!(visited.len(), 3);
    assert_eq!(visited[0], (5, 5));

    let mut called = false;
    visit_around(&[], (0, 0), |_| {
        called = true;
        Visit::Continue
    });
    assert!(!called);
}
