//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Cell ranges and iterators

use crate::grid::CellIndex;

/// Inclusive range of cell indices
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct CellRange {
    pub mincol: i64,
    pub maxcol: i64,
    pub minrow: i64,
    pub maxrow: i64,
}

impl CellRange {
    pub fn new(mincol: i64, maxcol: i64, minrow: i64, maxrow: i64) -> CellRange {
        CellRange {
            mincol,
            maxcol,
            minrow,
            maxrow,
        }
    }
    pub fn cols(&self) -> u64 {
        span(self.mincol, self.maxcol)
    }
    pub fn rows(&self) -> u64 {
        span(self.minrow, self.maxrow)
    }
    /// Number of cells, saturating at `u64::MAX`
    pub fn len(&self) -> u64 {
        self.cols().saturating_mul(self.rows())
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    pub fn contains(&self, col: i64, row: i64) -> bool {
        col >= self.mincol && col <= self.maxcol && row >= self.minrow && row <= self.maxrow
    }
    /// Common cells of both ranges
    pub fn clip(&self, other: &CellRange) -> Option<CellRange> {
        let clipped = CellRange {
            mincol: self.mincol.max(other.mincol),
            maxcol: self.maxcol.min(other.maxcol),
            minrow: self.minrow.max(other.minrow),
            maxrow: self.maxrow.min(other.maxrow),
        };
        if clipped.is_empty() {
            None
        } else {
            Some(clipped)
        }
    }
    pub fn iter(&self) -> CellIterator {
        CellIterator::new(*self)
    }
}

fn span(min: i64, max: i64) -> u64 {
    (i128::from(max) - i128::from(min) + 1).max(0).min(i128::from(u64::MAX)) as u64
}

impl IntoIterator for CellRange {
    type Item = CellIndex;
    type IntoIter = CellIterator;

    fn into_iter(self) -> CellIterator {
        CellIterator::new(self)
    }
}

/// Column by column iterator
pub struct CellIterator {
    col: i64,
    row: i64,
    range: CellRange,
    finished: bool,
}

impl CellIterator {
    pub fn new(range: CellRange) -> CellIterator {
        CellIterator {
            col: range.mincol,
            row: range.minrow,
            range,
            // Return "empty" iterator for inverted ranges
            finished: range.is_empty(),
        }
    }
}

impl Iterator for CellIterator {
    /// Current cell index `(col, row)`
    type Item = CellIndex;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let current = (self.col, self.row);
        if self.row < self.range.maxrow {
            self.row += 1;
        } else if self.col < self.range.maxcol {
            self.col += 1;
            self.row = self.range.minrow;
        } else {
            self.finished = true;
        }
        Some(current)
    }
}

#[test]
fn test_range_iter() {
    let range = CellRange::new(2, 4, 5, 6);
    let cells = range.iter().collect::<Vec<_>>();
    assert_eq!(
        cells,
        vec![(2, 5), (2, 6), (3, 5), (3, 6), (4, 5), (4, 6)]
    );
    assert_eq!(range.len(), 6);

    let cells = CellRange::new(-1, -1, 0, 0).into_iter().collect::<Vec<_>>();
    assert_eq!(cells, vec![(-1, 0)]);
}

#[test]
fn test_bad_range() {
    let range = CellRange::new(3, 2, 0, 1);
    assert!(range.is_empty());
    assert_eq!(range.iter().collect::<Vec<_>>(), vec![]);
    assert_eq!(CellRange::new(0, 1, 0, 1).clip(&CellRange::new(2, 3, 0, 1)), None);
    assert_eq!(
        CellRange::new(0, 5, 0, 5).clip(&CellRange::new(2, 9, -3, 1)),
        Some(CellRange::new(2, 5, 0, 1))
    );
}

#[test]
fn test_huge_range() {
    let range = CellRange::new(i64::MIN, i64::MAX, 0, 0);
    assert_eq!(range.cols(), u64::MAX);
    assert_eq!(range.len(), u64::MAX);
    assert!(!range.is_empty());
    let range = CellRange::new(-(1 << 53), 1 << 53, -(1 << 53), 1 << 53);
    assert_eq!(range.cols(), (1 << 54) + 1);
    assert_eq!(range.len(), u64::MAX);
    assert!(CellRange::new(i64::MAX, i64::MIN, 0, 0).is_empty());
}
