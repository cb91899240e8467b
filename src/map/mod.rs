pub mod controller;
pub mod script;

pub use controller::MapController;
pub use script::ScriptedMap;

use crate::domain::{Bounds, LatLng, ScreenPoint};
use serde::Serialize;

/// Listing map zoom before the fit to markers.
pub const DEFAULT_ZOOM: u8 = 10;
/// A fit to markers never zooms in closer than this.
pub const MAX_FIT_ZOOM: u8 = 15;
/// Zoom used when a sidebar row is clicked.
pub const FOCUS_ZOOM: u8 = 16;
/// Zoom of the capture map.
pub const CAPTURE_ZOOM: u8 = 15;
/// Shown when the browser cannot load the Maps script or the key is refused.
pub const MAP_LOAD_FAILED: &str = "Failed to load Google Maps. Please check your API key.";
/// Where the capture map opens before anything is picked (New Delhi).
pub const DEFAULT_CAPTURE_CENTER: (f64, f64) = (28.6139, 77.209);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MarkerId(pub u32);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub fill_color: &'static str,
    pub stroke_color: &'static str,
    pub fill_opacity: f64,
    pub stroke_weight: f64,
    pub scale: f64,
}

impl MarkerStyle {
    /// Indigo circle used for saved properties.
    pub fn property_pin() -> Self {
        Self {
            fill_color: "#6366F1",
            stroke_color: "#4338CA",
            fill_opacity: 0.9,
            stroke_weight: 1.5,
            scale: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerSpec {
    pub record_id: i64,
    pub position: LatLng,
    pub title: String,
    pub style: MarkerStyle,
}

/// The map widget, as far as the workflows are concerned.
pub trait MapCanvas {
    fn set_view(&mut self, center: LatLng, zoom: u8);
    fn set_center(&mut self, center: LatLng);
    fn set_zoom(&mut self, zoom: u8);
    fn zoom(&self) -> u8;
    fn place_marker(&mut self, marker: MarkerSpec) -> MarkerId;
    fn remove_marker(&mut self, id: MarkerId);
    /// Centre and zoom so every point of `bounds` is visible.
    fn fit_bounds(&mut self, bounds: Bounds);
    /// Viewport pixel position of a geographic point.
    fn project(&self, point: LatLng) -> ScreenPoint;
}
