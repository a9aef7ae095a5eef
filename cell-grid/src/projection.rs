//
// Copyright (c) Pirmin Kalberer. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

//! Map projections and distance measurers

use crate::grid::{Coord, Extent};
use std::f64::consts;

/// Earth radius used by spherical measurers and Web Mercator
pub const EARTH_RADIUS: f64 = 6378137.0;

/// Half circumference of the Web Mercator plane
pub const MERC_MAX: f64 = 20037508.3427892480;

/// Latitude limit of Web Mercator
pub const MERC_MAX_LAT: f64 = 85.0511287798066;

/// Map projections supported for grid anchoring
#[derive(PartialEq, Clone, Copy, Debug)]
pub enum Projection {
    /// Plane coordinates are map coordinates
    Identity,
    /// Spherical Mercator (EPSG:3857), map coordinates in lon/lat
    WebMercator,
    /// Plate carrée (EPSG:4326), map coordinates in lon/lat
    Wgs84,
}

impl Default for Projection {
    fn default() -> Self {
        Projection::WebMercator
    }
}

impl Projection {
    pub fn from_code(code: &str) -> Option<Projection> {
        match &code.to_uppercase() as &str {
            "IDENTITY" => Some(Projection::Identity),
            "EPSG:3857" | "EPSG:900913" | "EPSG:102100" => Some(Projection::WebMercator),
            "EPSG:4326" | "WGS84" => Some(Projection::Wgs84),
            _ => None,
        }
    }
    pub fn code(&self) -> &'static str {
        match self {
            Projection::Identity => "identity",
            Projection::WebMercator => "EPSG:3857",
            Projection::Wgs84 => "EPSG:4326",
        }
    }
    /// Map coordinate to plane coordinate
    pub fn project(&self, c: &Coord) -> Coord {
        match self {
            Projection::Identity | Projection::Wgs84 => *c,
            Projection::WebMercator => {
                let lat = c.y.max(-MERC_MAX_LAT).min(MERC_MAX_LAT);
                let (x, y) = lonlat_to_merc(c.x, lat);
                Coord::new(x, y)
            }
        }
    }
    /// Plane coordinate to map coordinate
    pub fn unproject(&self, p: &Coord) -> Coord {
        match self {
            Projection::Identity | Projection::Wgs84 => *p,
            Projection::WebMercator => {
                let (lon, lat) = merc_to_lonlat(p.x, p.y);
                Coord::new(lon, lat)
            }
        }
    }
    pub fn measurer(&self) -> Measurer {
        match self {
            Projection::Identity => Measurer::Euclidean,
            Projection::WebMercator | Projection::Wgs84 => Measurer::Sphere {
                radius: EARTH_RADIUS,
            },
        }
    }
    /// Valid area in map coordinates
    pub fn full_extent(&self) -> Extent {
        match self {
            Projection::Identity => Extent::new(-MERC_MAX, -MERC_MAX, MERC_MAX, MERC_MAX),
            Projection::WebMercator => Extent::new(-180.0, -MERC_MAX_LAT, 180.0, MERC_MAX_LAT),
            Projection::Wgs84 => Extent::new(-180.0, -90.0, 180.0, 90.0),
        }
    }
}

pub fn lonlat_to_merc(lon: f64, lat: f64) -> (f64, f64) {
    let x = EARTH_RADIUS * lon.to_radians();
    let y = EARTH_RADIUS * ((consts::PI * 0.25) + (0.5 * lat.to_radians())).tan().ln();
    (x, y)
}

pub fn merc_to_lonlat(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / EARTH_RADIUS).to_degrees();
    let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - consts::FRAC_PI_2).to_degrees();
    (lon, lat)
}

/// Distance measurer of a projection
#[derive(PartialEq, Clone, Copy, Debug)]
pub enum Measurer {
    Euclidean,
    Sphere { radius: f64 },
}

impl Measurer {
    /// Coordinate reached when moving `dx` meters east and `dy` meters north.
    ///
    /// Returns `None` when the target is beyond a pole.
    pub fn locate(&self, c: &Coord, dx: f64, dy: f64) -> Option<Coord> {
        let target = match *self {
            Measurer::Euclidean => Coord::new(c.x + dx, c.y + dy),
            Measurer::Sphere { radius } => {
                if dx == 0.0 && dy == 0.0 {
                    return Some(*c);
                }
                let sy = 2.0 * (dy.abs() / (2.0 * radius)).sin();
                let ry = c.y.to_radians() + sy * dy.signum();
                if ry.abs() >= consts::FRAC_PI_2 {
                    return None;
                }
                let sx = 2.0 * (dx.abs() / (2.0 * radius)).sin().abs() / ry.cos().abs();
                let rx = c.x.to_radians() + sx * dx.signum();
                Coord::new(rx.to_degrees(), ry.to_degrees())
            }
        };
        if target.is_finite() {
            Some(target)
        } else {
            None
        }
    }
    /// Eastward and northward distance from `origin` to `target`, inverse of `locate`.
    ///
    /// Offsets beyond the reach of `locate` saturate.
    pub fn displacement(&self, origin: &Coord, target: &Coord) -> Option<(f64, f64)> {
        let (east, north) = match *self {
            Measurer::Euclidean => (target.x - origin.x, target.y - origin.y),
            Measurer::Sphere { radius } => {
                let dlat = target.y.to_radians() - origin.y.to_radians();
                let dlon = target.x.to_radians() - origin.x.to_radians();
                let north = 2.0 * radius * (dlat.abs() / 2.0).min(1.0).asin() * dlat.signum();
                let coslat = target.y.to_radians().cos().abs();
                let east =
                    2.0 * radius * (dlon.abs() * coslat / 2.0).min(1.0).asin() * dlon.signum();
                (east, north)
            }
        };
        if east.is_finite() && north.is_finite() {
            Some((east, north))
        } else {
            None
        }
    }
    /// Length between two coordinates (haversine on the sphere)
    pub fn measure_length(&self, a: &Coord, b: &Coord) -> f64 {
        match *self {
            Measurer::Euclidean => (b.x - a.x).hypot(b.y - a.y),
            Measurer::Sphere { radius } => {
                let lat1 = a.y.to_radians();
                let lat2 = b.y.to_radians();
                let dlat = lat1 - lat2;
                let dlon = a.x.to_radians() - b.x.to_radians();
                let h = (dlat / 2.0).sin().powi(2)
                    + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
                2.0 * h.sqrt().min(1.0).asin() * radius
            }
        }
    }
    pub fn is_spherical(&self) -> bool {
        match self {
            Measurer::Sphere { .. } => true,
            Measurer::Euclidean => false,
        }
    }
}

#[test]
fn test_merc_roundtrip() {
    let (x, y) = lonlat_to_merc(8.5, 47.3);
    let (lon, lat) = merc_to_lonlat(x, y);
    assert!((lon - 8.5).abs() < 1e-9);
    assert!((lat - 47.3).abs() < 1e-9);
    assert!((lonlat_to_merc(180.0, 0.0).0 - MERC_MAX).abs() < 1e-6);
}

#[test]
fn test_locate_displacement() {
    let measurer = Projection::WebMercator.measurer();
    let center = Coord::new(7.0, 46.0);
    let target = measurer.locate(&center, 1500.0, -2500.0).unwrap();
    assert!(target.x > center.x);
    assert!(target.y < center.y);
    let (east, north) = measurer.displacement(&center, &target).unwrap();
    assert!((east - 1500.0).abs() < 1e-6);
    assert!((north + 2500.0).abs() < 1e-6);
    // meridian offsets match the great-circle length
    let north_only = measurer.locate(&center, 0.0, 1000.0).unwrap();
    assert!((measurer.measure_length(&center, &north_only) - 1000.0).abs() < 1e-3);
    // beyond the pole
    assert_eq!(measurer.locate(&Coord::new(0.0, 89.0), 0.0, 500000.0), None);

    let plane = Projection::Identity.measurer();
    assert_eq!(
        plane.locate(&Coord::new(1.0, 2.0), 3.0, -4.0),
        Some(Coord::new(4.0, -2.0))
    );
    assert_eq!(
        plane.measure_length(&Coord::new(0.0, 0.0), &Coord::new(3.0, 4.0)),
        5.0
    );
}
