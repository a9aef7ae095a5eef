//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Geometry types in screen coordinates

#[derive(PartialEq, Clone, Copy, Debug, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Point {
        Point { x, y }
    }
    pub fn origin() -> Point {
        Point { x: 0.0, y: 0.0 }
    }
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Axis aligned box in screen coordinates
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct ScreenExtent {
    pub minx: f64,
    pub miny: f64,
    pub maxx: f64,
    pub maxy: f64,
}

impl ScreenExtent {
    pub fn new(a: &Point, b: &Point) -> ScreenExtent {
        ScreenExtent {
            minx: a.x.min(b.x),
            miny: a.y.min(b.y),
            maxx: a.x.max(b.x),
            maxy: a.y.max(b.y),
        }
    }
    pub fn width(&self) -> f64 {
        self.maxx - self.minx
    }
    pub fn height(&self) -> f64 {
        self.maxy - self.miny
    }
    pub fn intersects(&self, other: &ScreenExtent) -> bool {
        self.minx <= other.maxx
            && other.minx <= self.maxx
            && self.miny <= other.maxy
            && other.miny <= self.maxy
    }
}

#[derive(PartialEq, Clone, Copy, Debug)]
pub struct LineSegment {
    pub from: Point,
    pub to: Point,
}

/// Cell outline: north west, north east, south east, south west
#[derive(PartialEq, Clone, Copy, Debug)]
pub struct Quad {
    pub points: [Point; 4],
}

impl Quad {
    pub fn new(nw: Point, ne: Point, se: Point, sw: Point) -> Quad {
        Quad {
            points: [nw, ne, se, sw],
        }
    }
    /// Box spanned by the north west and south east corners
    pub fn extent(&self) -> ScreenExtent {
        ScreenExtent::new(&self.points[0], &self.points[2])
    }
    pub fn is_finite(&self) -> bool {
        self.points.iter().all(Point::is_finite)
    }
}
