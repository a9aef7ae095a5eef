//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Frame statistics per grid

use stats::{MinMax, OnlineStats};
use std::collections::BTreeMap;
use std::fmt;

type MeasurementType = u64;

/// Quantity recorded once per drawn frame
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug)]
pub enum Measure {
    /// Visible cells
    Cells,
    /// Data cell quads drawn
    Quads,
    /// Quads rejected by the culler
    Skipped,
    Labels,
    /// Packed GPU vertices
    Vertices,
}

impl Measure {
    pub fn name(&self) -> &'static str {
        match self {
            Measure::Cells => "cells",
            Measure::Quads => "quads",
            Measure::Skipped => "skipped",
            Measure::Labels => "labels",
            Measure::Vertices => "vertices",
        }
    }
}

struct FrameSeries {
    online: OnlineStats,
    minmax: MinMax<MeasurementType>,
    last: MeasurementType,
}

impl FrameSeries {
    fn new() -> FrameSeries {
        FrameSeries {
            online: OnlineStats::new(),
            minmax: MinMax::new(),
            last: 0,
        }
    }
    fn push(&mut self, value: MeasurementType) {
        self.online.add(value);
        self.minmax.add(value);
        self.last = value;
    }
}

#[derive(PartialEq, Clone, Copy, Default)]
pub struct StatResults {
    /// Number of frames
    pub len: usize,
    pub last: MeasurementType,
    pub min: MeasurementType,
    pub max: MeasurementType,
    pub mean: f64,
    pub stddev: f64,
}

#[derive(Default)]
pub struct Statistics(BTreeMap<(usize, Measure), FrameSeries>);

impl Statistics {
    pub fn new() -> Statistics {
        Statistics(BTreeMap::new())
    }
    pub fn add(&mut self, grid_index: usize, measure: Measure, value: MeasurementType) {
        self.0
            .entry((grid_index, measure))
            .or_insert_with(FrameSeries::new)
            .push(value);
    }
    pub fn keys(&self) -> impl Iterator<Item = &(usize, Measure)> {
        self.0.keys()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn results(&self, grid_index: usize, measure: Measure) -> StatResults {
        match self.0.get(&(grid_index, measure)) {
            Some(series) => StatResults {
                len: series.minmax.len(),
                last: series.last,
                min: *series.minmax.min().unwrap_or(&0),
                max: *series.minmax.max().unwrap_or(&0),
                mean: series.online.mean(),
                stddev: series.online.stddev(),
            },
            None => StatResults::default(),
        }
    }
    /// Sum of the latest frame over all grids
    pub fn last_total(&self, measure: Measure) -> MeasurementType {
        self.0
            .iter()
            .filter(|((_, m), _)| *m == measure)
            .map(|(_, series)| series.last)
            .sum()
    }
}

impl fmt::Debug for StatResults {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "last: {}, #frames: {}, min: {}, max: {}, mean: {:.3} +/- {:.3}",
            self.last, self.len, self.min, self.max, self.mean, self.stddev
        )
    }
}

impl fmt::Debug for Statistics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &(grid_index, measure) in self.0.keys() {
            let res = self.results(grid_index, measure);
            writeln!(f, "grid{}.{}: {:?}", grid_index, measure.name(), res)?;
        }
        Ok(())
    }
}

#[test]
fn frame_counts() {
    let mut stats = Statistics::new();
    stats.add(0, Measure::Cells, 4);
    assert_eq!(stats.results(0, Measure::Cells).mean, 4.0);
    stats.add(0, Measure::Cells, 8);
    assert_eq!(stats.results(0, Measure::Cells).mean, 6.0);
    stats.add(1, Measure::Cells, 2);
    stats.add(0, Measure::Cells, 0);
    let cells = stats.results(0, Measure::Cells);
    assert_eq!(cells.len, 3);
    assert_eq!(cells.last, 0);
    assert_eq!(cells.min, 0);
    assert_eq!(cells.max, 8);
    assert_eq!(stats.keys().count(), 2);
    assert_eq!(stats.last_total(Measure::Cells), 2);

    assert_eq!(stats.results(0, Measure::Labels), StatResults::default());
    assert_eq!(
        format!("{:?}", stats),
        "grid0.cells: last: 0, #frames: 3, min: 0, max: 8, mean: 4.000 +/- 3.266\n\
         grid1.cells: last: 2, #frames: 1, min: 2, max: 2, mean: 2.000 +/- 0.000\n"
    );
}
