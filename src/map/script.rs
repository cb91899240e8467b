// map/script.rs
use crate::domain::geo::{fit_zoom, project};
use crate::domain::{Bounds, LatLng, ScreenPoint, Viewport};
use crate::map::{MapCanvas, MarkerId, MarkerSpec};
use serde::Serialize;

/// One call made against the canvas, replayed in order by `static/listing.js`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MapCommand {
    SetView { center: LatLng, zoom: u8 },
    SetCenter { center: LatLng },
    SetZoom { zoom: u8 },
    AddMarker { id: MarkerId, marker: MarkerSpec },
    RemoveMarker { id: MarkerId },
    FitBounds { bounds: Bounds },
}

/// Server-side canvas. It keeps centre and zoom the way the browser widget
/// would (Web-Mercator, fixed viewport) and records every command so the page
/// can replay them against the real map.
#[derive(Debug)]
pub struct ScriptedMap {
    viewport: Viewport,
    center: LatLng,
    zoom: u8,
    next_marker: u32,
    live_markers: Vec<MarkerId>,
    commands: Vec<MapCommand>,
}

impl ScriptedMap {
    pub fn new(viewport: Viewport, center: LatLng, zoom: u8) -> Self {
        Self {
            viewport,
            center,
            zoom,
            next_marker: 0,
            live_markers: Vec::new(),
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[MapCommand] {
        &self.commands
    }

    /// JSON array of commands for embedding in the page.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.commands)
    }

    /// JSON array of the commands issued after the first `from`.
    pub fn json_since(&self, from: usize) -> Result<String, serde_json::Error> {
        serde_json::to_string(self.commands.get(from..).unwrap_or_default())
    }
}

#[cfg(test)]
impl ScriptedMap {
    pub fn center(&self) -> LatLng {
        self.center
    }

    pub fn live_markers(&self) -> &[MarkerId] {
        &self.live_markers
    }
}

impl MapCanvas for ScriptedMap {
    fn set_view(&mut self, center: LatLng, zoom: u8) {
        self.center = center;
        self.zoom = zoom;
        self.commands.push(MapCommand::SetView { center, zoom });
    }

    fn set_center(&mut self, center: LatLng) {
        self.center = center;
        self.commands.push(MapCommand::SetCenter { center });
    }

    fn set_zoom(&mut self, zoom: u8) {
        self.zoom = zoom;
        self.commands.push(MapCommand::SetZoom { zoom });
    }

    fn zoom(&self) -> u8 {
        self.zoom
    }

    fn place_marker(&mut self, marker: MarkerSpec) -> MarkerId {
        let id = MarkerId(self.next_marker);
        self.next_marker += 1;
        self.live_markers.push(id);
        self.commands.push(MapCommand::AddMarker { id, marker });
        id
    }

    fn remove_marker(&mut self, id: MarkerId) {
        self.live_markers.retain(|m| *m != id);
        self.commands.push(MapCommand::RemoveMarker { id });
    }

    fn fit_bounds(&mut self, bounds: Bounds) {
        self.center = bounds.center();
        self.zoom = fit_zoom(&bounds, self.viewport);
        self.commands.push(MapCommand::FitBounds { bounds });
    }

    fn project(&self, point: LatLng) -> ScreenPoint {
        project(point, self.center, self.zoom, self.viewport)
    }
}
