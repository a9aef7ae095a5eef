//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Canvas path buffers for grid lines and data cells

use crate::core::grid_spec::DataCell;
use crate::core::screen::{LineSegment, Point, Quad, ScreenExtent};
use crate::core::viewport::Viewport;
use crate::render::cull::{device_nw, device_quad, quad_is_renderable};
use crate::render::labels::LabelPlacement;
use crate::style::color::Rgba;
use crate::style::symbol::merge_symbol;
use crate::style::{default_symbol, ResolvedStyle};
use cell_grid::{CellRange, GridGeometry};

#[derive(PartialEq, Clone, Copy, Debug)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    ClosePath,
}

#[derive(PartialEq, Clone, Debug, Default)]
pub struct CommandSequence(pub Vec<PathCommand>);

impl CommandSequence {
    pub fn new() -> CommandSequence {
        CommandSequence(Vec::new())
    }
    pub fn push(&mut self, command: PathCommand) {
        self.0.push(command);
    }
    pub fn append(&mut self, other: &mut CommandSequence) {
        self.0.append(&mut other.0);
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn commands(&self) -> &[PathCommand] {
        &self.0
    }
}

#[test]
fn test_sequence() {
    let mut seq = CommandSequence::new();
    seq.push(PathCommand::MoveTo(Point::new(25.0, 17.0)));
    assert_eq!(seq.len(), 1);

    let mut seq2 = CommandSequence::new();
    seq2.push(PathCommand::ClosePath);
    seq.append(&mut seq2);
    assert!(seq2.is_empty());
    assert_eq!(
        seq.commands(),
        &[
            PathCommand::MoveTo(Point::new(25.0, 17.0)),
            PathCommand::ClosePath
        ]
    );
}

pub trait PathEncodable {
    fn encode(&self) -> CommandSequence {
        let mut seq = CommandSequence::new();
        self.encode_into(&mut seq);
        seq
    }
    fn encode_into(&self, seq: &mut CommandSequence);
}

impl PathEncodable for LineSegment {
    fn encode_into(&self, seq: &mut CommandSequence) {
        seq.push(PathCommand::MoveTo(self.from));
        seq.push(PathCommand::LineTo(self.to));
    }
}

impl PathEncodable for Quad {
    fn encode_into(&self, seq: &mut CommandSequence) {
        seq.push(PathCommand::MoveTo(self.points[0]));
        for point in &self.points[1..] {
            seq.push(PathCommand::LineTo(*point));
        }
        seq.push(PathCommand::ClosePath);
    }
}

impl<T: PathEncodable> PathEncodable for [T] {
    fn encode_into(&self, seq: &mut CommandSequence) {
        for geom in self {
            geom.encode_into(seq);
        }
    }
}

#[test]
fn test_encode_quad() {
    let quad = Quad::new(
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(10.0, 10.0),
        Point::new(0.0, 10.0),
    );
    let seq = quad.encode();
    assert_eq!(seq.len(), 5);
    assert_eq!(seq.0[0], PathCommand::MoveTo(Point::new(0.0, 0.0)));
    assert_eq!(seq.0[3], PathCommand::LineTo(Point::new(0.0, 10.0)));
    assert_eq!(seq.0[4], PathCommand::ClosePath);

    let lines = vec![
        LineSegment {
            from: Point::new(0.0, 0.0),
            to: Point::new(0.0, 10.0),
        };
        3
    ];
    assert_eq!(lines[..].encode().len(), 6);
}

/// Quads of one data entry, filled and stroked together
#[derive(Clone, PartialEq, Debug)]
pub struct PathBatch {
    pub data_index: usize,
    /// Data symbol merged with the default symbol
    pub style: ResolvedStyle,
    pub fill_opacity: f64,
    pub stroke_opacity: f64,
    pub path: CommandSequence,
    pub quads: usize,
    /// Cells dropped by the quad guard
    pub skipped: usize,
}

impl PathBatch {
    /// Fill is visible
    pub fn has_fill(&self) -> bool {
        self.fill_opacity > 0.0 && self.style.has_fill()
    }
}

/// 2D drawing surface
pub trait PathSink {
    fn fill_rect(&mut self, rect: &ScreenExtent, color: &Rgba, opacity: f64);
    fn fill_path(&mut self, path: &CommandSequence, style: &ResolvedStyle, opacity: f64);
    fn stroke_path(&mut self, path: &CommandSequence, style: &ResolvedStyle, opacity: f64);
    fn paint_label(&mut self, label: &LabelPlacement);
}

/// Cell edges of a range, vertical lines first
pub fn build_grid_lines(
    geometry: &GridGeometry,
    range: &CellRange,
    viewport: &dyn Viewport,
) -> Vec<LineSegment> {
    let mut lines = Vec::with_capacity(range.cols() as usize + range.rows() as usize + 2);
    let mut push = |from: Option<Point>, to: Option<Point>| {
        if let (Some(from), Some(to)) = (from, to) {
            lines.push(LineSegment { from, to });
        }
    };
    for col in range.mincol..=range.maxcol + 1 {
        push(
            device_nw(geometry, col, range.minrow, viewport),
            device_nw(geometry, col, range.maxrow + 1, viewport),
        );
    }
    for row in range.minrow..=range.maxrow + 1 {
        push(
            device_nw(geometry, range.mincol, row, viewport),
            device_nw(geometry, range.maxcol + 1, row, viewport),
        );
    }
    lines
}

/// One batch per visible data entry with a symbol.
///
/// `styles` holds the evaluated data symbols by data index.
pub fn build_data_cell_paths(
    data: &[DataCell],
    styles: &[Option<ResolvedStyle>],
    geometry: &GridGeometry,
    range: &CellRange,
    viewport: &dyn Viewport,
) -> Vec<PathBatch> {
    let container = viewport.container_extent();
    let mut batches = Vec::new();
    for (data_index, entry) in data.iter().enumerate() {
        let style = match styles.get(data_index) {
            Some(Some(style)) => style,
            _ => continue,
        };
        let visible = match entry.cell_range().clip(range) {
            Some(visible) => visible,
            None => continue,
        };
        let mut path = CommandSequence::new();
        let (mut quads, mut skipped) = (0, 0);
        for (col, row) in visible.iter() {
            match device_quad(geometry, col, row, viewport) {
                Some(ref quad) if quad_is_renderable(quad, &container) => {
                    quad.encode_into(&mut path);
                    quads += 1;
                }
                _ => skipped += 1,
            }
        }
        if skipped > 0 {
            debug!("Data entry {}: {} cells skipped", data_index, skipped);
        }
        if quads == 0 {
            continue;
        }
        batches.push(PathBatch {
            data_index,
            style: ResolvedStyle(merge_symbol(&default_symbol(), style.symbol())),
            fill_opacity: style.fill_opacity(),
            stroke_opacity: style.line_opacity(),
            path,
            quads,
            skipped,
        });
    }
    batches
}
