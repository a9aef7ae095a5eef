//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Map view abstraction

use crate::core::config::ViewCfg;
use crate::core::screen::{Point, ScreenExtent};
use crate::core::Config;
use cell_grid::{Coord, Extent, Projection};
use glam::{DMat4, Mat4};

/// Pixel size of zoom level 0
pub const TILE_SIZE: f64 = 256.0;

/// Zoom level of the GL point space
pub const GL_ZOOM: f64 = 18.0;

/// View of the host map
pub trait Viewport {
    fn zoom(&self) -> f64;
    fn pitch(&self) -> f64 {
        0.0
    }
    fn is_zooming(&self) -> bool {
        false
    }
    fn projection(&self) -> Projection;
    /// Valid map area
    fn full_extent(&self) -> Extent {
        self.projection().full_extent()
    }
    /// Visible map area
    fn extent(&self) -> Extent;
    fn center(&self) -> Coord;
    /// Device area, origin top left
    fn container_extent(&self) -> ScreenExtent;
    /// Map coordinate to container point
    fn coord_to_point(&self, coord: &Coord) -> Point;
    /// Map coordinate to point at the fixed GL zoom, y pointing up
    fn coord_to_gl_point(&self, coord: &Coord) -> Point;
    /// Transformation of GL points to clip space
    fn proj_view_matrix(&self) -> Mat4;
}

/// Flat map view, as seen from above
#[derive(Clone, Debug, PartialEq)]
pub struct MapView {
    pub center: Coord,
    pub zoom: f64,
    pub width: u32,
    pub height: u32,
    pub pitch: f64,
    pub projection: Projection,
    pub zooming: bool,
}

impl MapView {
    pub fn new(center: Coord, zoom: f64, width: u32, height: u32, projection: Projection) -> MapView {
        MapView {
            center,
            zoom,
            width,
            height,
            pitch: 0.0,
            projection,
            zooming: false,
        }
    }
    /// Plane units per pixel at zoom level 0
    pub fn max_resolution(&self) -> f64 {
        let full = self.projection.full_extent();
        let sw = self.projection.project(&Coord::new(full.minx, full.miny));
        let ne = self.projection.project(&Coord::new(full.maxx, full.maxy));
        (ne.x - sw.x) / TILE_SIZE
    }
    /// Plane units per pixel
    pub fn resolution(&self, zoom: f64) -> f64 {
        self.max_resolution() / 2f64.powf(zoom)
    }
    fn plane_center(&self) -> Coord {
        self.projection.project(&self.center)
    }
}

impl Viewport for MapView {
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
        self.projection
    }
    fn extent(&self) -> Extent {
        let res = self.resolution(self.zoom);
        let pc = self.plane_center();
        let (dx, dy) = (self.width as f64 / 2.0 * res, self.height as f64 / 2.0 * res);
        let sw = self.projection.unproject(&Coord::new(pc.x - dx, pc.y - dy));
        let ne = self.projection.unproject(&Coord::new(pc.x + dx, pc.y + dy));
        Extent::from_corners(&sw, &ne)
    }
    fn center(&self) -> Coord {
        self.center
    }
    fn container_extent(&self) -> ScreenExtent {
        ScreenExtent::new(
            &Point::origin(),
            &Point::new(self.width as f64, self.height as f64),
        )
    }
    fn coord_to_point(&self, coord: &Coord) -> Point {
        let res = self.resolution(self.zoom);
        let pc = self.plane_center();
        let p = self.projection.project(coord);
        Point::new(
            (p.x - pc.x) / res + self.width as f64 / 2.0,
            (pc.y - p.y) / res + self.height as f64 / 2.0,
        )
    }
    fn coord_to_gl_point(&self, coord: &Coord) -> Point {
        let res = self.resolution(GL_ZOOM);
        let p = self.projection.project(coord);
        Point::new(p.x / res, p.y / res)
    }
    fn proj_view_matrix(&self) -> Mat4 {
        let c = self.coord_to_gl_point(&self.center);
        // GL units per pixel
        let scale = 2f64.powf(GL_ZOOM - self.zoom);
        let (dx, dy) = (
            self.width as f64 / 2.0 * scale,
            self.height as f64 / 2.0 * scale,
        );
        DMat4::orthographic_rh_gl(c.x - dx, c.x + dx, c.y - dy, c.y + dy, -1.0e7, 1.0e7).as_mat4()
    }
}

impl<'a> Config<'a, ViewCfg> for MapView {
    fn from_config(cfg: &ViewCfg) -> Result<Self, String> {
        let projection = match cfg.projection {
            Some(ref code) => {
                Projection::from_code(code).ok_or(format!("Unknown projection '{}'", code))?
            }
            None => Projection::default(),
        };
        if cfg.width == 0 || cfg.height == 0 {
            return Err("View size must not be empty".to_string());
        }
        let mut view = MapView::new(
            Coord::new(cfg.center.0, cfg.center.1),
            cfg.zoom,
            cfg.width,
            cfg.height,
            projection,
        );
        view.pitch = cfg.pitch;
        Ok(view)
    }
    fn gen_config() -> String {
        let toml = r#"
[view]
center = [0.0, 0.0]
zoom = 17.0
width = 512
height = 512
#projection = "EPSG:3857"
"#;
        toml.to_string()
    }
}
