// src/domain/geo.rs

use serde::Serialize;
use std::f64::consts::PI;
use thiserror::Error;

/// Highest zoom level the map widget supports.
pub const MAX_ZOOM: u8 = 21;
/// Web-Mercator tile size in pixels at zoom 0.
const TILE_SIZE: f64 = 256.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoordinateError {
    #[error("latitude {0} is outside [-90, 90]")]
    Latitude(f64),
    #[error("longitude {0} is outside [-180, 180]")]
    Longitude(f64),
}

/// A validated geographic point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    lat: f64,
    lng: f64,
}

impl LatLng {
    pub const ORIGIN: LatLng = LatLng { lat: 0.0, lng: 0.0 };

    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::Latitude(lat));
        }
        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(CoordinateError::Longitude(lng));
        }
        Ok(Self { lat, lng })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Arithmetic mean of the points, `None` for an empty set.
    pub fn mean<I>(points: I) -> Option<LatLng>
    where
        I: IntoIterator<Item = LatLng>,
    {
        let (mut n, mut lat, mut lng) = (0usize, 0.0, 0.0);
        for p in points {
            n += 1;
            lat += p.lat;
            lng += p.lng;
        }
        (n > 0).then(|| LatLng {
            lat: lat / n as f64,
            lng: lng / n as f64,
        })
    }
}

/// Pixel position inside the map viewport (or the page, for pointer events).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
        }
    }
}

/// Smallest lat/lng box containing a set of points. Antimeridian wrapping is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl Bounds {
    pub fn enclosing<I>(points: I) -> Option<Bounds>
    where
        I: IntoIterator<Item = LatLng>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut b = Bounds {
            south_west: first,
            north_east: first,
        };
        for p in iter {
            b.extend(p);
        }
        Some(b)
    }

    pub fn extend(&mut self, p: LatLng) {
        self.south_west.lat = self.south_west.lat.min(p.lat);
        self.south_west.lng = self.south_west.lng.min(p.lng);
        self.north_east.lat = self.north_east.lat.max(p.lat);
        self.north_east.lng = self.north_east.lng.max(p.lng);
    }

    /// Centre in projected space, which is what the map widget centres on after a fit.
    pub fn center(&self) -> LatLng {
        let (x1, y1) = world_point(self.south_west);
        let (x2, y2) = world_point(self.north_east);
        unproject((x1 + x2) / 2.0, (y1 + y2) / 2.0)
    }
}

/// Web-Mercator world coordinates at zoom 0, in `[0, 256)`.
pub fn world_point(p: LatLng) -> (f64, f64) {
    let siny = (p.lat * PI / 180.0).sin().clamp(-0.9999, 0.9999);
    let x = TILE_SIZE * (0.5 + p.lng / 360.0);
    let y = TILE_SIZE * (0.5 - ((1.0 + siny) / (1.0 - siny)).ln() / (4.0 * PI));
    (x, y)
}

fn unproject(x: f64, y: f64) -> LatLng {
    let lng = (x / TILE_SIZE - 0.5) * 360.0;
    let n = PI * (1.0 - 2.0 * y / TILE_SIZE);
    let lat = n.sinh().atan() * 180.0 / PI;
    LatLng {
        lat: lat.clamp(-90.0, 90.0),
        lng: lng.clamp(-180.0, 180.0),
    }
}

/// Largest integer zoom at which `bounds` fits inside `viewport`.
pub fn fit_zoom(bounds: &Bounds, viewport: Viewport) -> u8 {
    let (x1, y1) = world_point(bounds.south_west);
    let (x2, y2) = world_point(bounds.north_east);
    let dx = (x2 - x1).abs();
    let dy = (y2 - y1).abs();

    let axis_zoom = |span: f64, pixels: f64| {
        if span <= f64::EPSILON {
            f64::from(MAX_ZOOM)
        } else {
            (pixels / span).log2()
        }
    };

    let zoom = axis_zoom(dx, viewport.width)
        .min(axis_zoom(dy, viewport.height))
        .floor();
    zoom.clamp(0.0, f64::from(MAX_ZOOM)) as u8
}

/// Pixel offset of `point` inside a viewport centred on `center` at `zoom`.
pub fn project(point: LatLng, center: LatLng, zoom: u8, viewport: Viewport) -> ScreenPoint {
    let scale = 2f64.powi(i32::from(zoom));
    let (px, py) = world_point(point);
    let (cx, cy) = world_point(center);
    ScreenPoint {
        x: viewport.width / 2.0 + (px - cx) * scale,
        y: viewport.height / 2.0 + (py - cy) * scale,
    }
}
