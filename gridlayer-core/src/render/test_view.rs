//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Flat view with integer scale for exact expectations

use crate::core::screen::{Point, ScreenExtent};
use crate::core::viewport::Viewport;
use cell_grid::{Coord, Extent, Projection};
use glam::Mat4;

/// Identity projection, `scale` device units per map unit
pub struct ScaledView {
    pub extent: Extent,
    pub scale: f64,
    pub zoom: f64,
    pub pitch: f64,
    pub zooming: bool,
}

impl ScaledView {
    pub fn new(extent: Extent, scale: f64) -> ScaledView {
        ScaledView {
            extent,
            scale,
            zoom: 10.0,
            pitch: 0.0,
            zooming: false,
        }
    }
}

impl Viewport for ScaledView {
    fn zoom(&self) -> f64 {
        self.zoom
    }
    fn pitch(&self) -> f64 {
        self.pitch
    }
    fn is_zooming(&self) -> bool {
        self.zooming
    }
    fn projection(&self) -> Projection {
        Projection::Identity
    }
    fn extent(&self) -> Extent {
        self.extent
    }
    fn center(&self) -> Coord {
        self.extent.center()
    }
    fn container_extent(&self) -> ScreenExtent {
        ScreenExtent::new(
            &Point::origin(),
            &Point::new(
                self.extent.width() * self.scale,
                self.extent.height() * self.scale,
            ),
        )
    }
    fn coord_to_point(&self, coord: &Coord) -> Point {
        Point::new(
            (coord.x - self.extent.minx) * self.scale,
            (self.extent.maxy - coord.y) * self.scale,
        )
    }
    fn coord_to_gl_point(&self, coord: &Coord) -> Point {
        Point::new(coord.x * self.scale, coord.y * self.scale)
    }
    fn proj_view_matrix(&self) -> Mat4 {
        Mat4::IDENTITY
    }
}
