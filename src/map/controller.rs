// map/controller.rs
use crate::domain::{Bounds, LatLng, PropertyRecord, ScreenPoint};
use crate::map::{MapCanvas, MarkerId, MarkerSpec, MarkerStyle, DEFAULT_ZOOM, FOCUS_ZOOM, MAX_FIT_ZOOM};

/// Owns the map canvas and every marker placed on it.
///
/// Created once the map and the data are both ready; `teardown` removes the
/// markers and hands the canvas back.
pub struct MapController<C: MapCanvas> {
    canvas: C,
    markers: Vec<(i64, MarkerId)>,
}

impl<C: MapCanvas> MapController<C> {
    /// Centre on `center`, drop one marker per renderable record, fit the
    /// viewport around them and clamp the zoom to `MAX_FIT_ZOOM`.
    pub fn initialize(mut canvas: C, center: LatLng, records: &[PropertyRecord]) -> Self {
        canvas.set_view(center, DEFAULT_ZOOM);

        let mut markers = Vec::new();
        for (record, position) in records.iter().filter_map(|r| r.position().map(|p| (r, p))) {
            let id = canvas.place_marker(MarkerSpec {
                record_id: record.id,
                position,
                title: format!("Property #{}", record.id),
                style: MarkerStyle::property_pin(),
            });
            markers.push((record.id, id));
        }

        if let Some(bounds) = Bounds::enclosing(records.iter().filter_map(PropertyRecord::position)) {
            canvas.fit_bounds(bounds);
            if canvas.zoom() > MAX_FIT_ZOOM {
                canvas.set_zoom(MAX_FIT_ZOOM);
            }
        }

        Self { canvas, markers }
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    pub fn focus(&mut self, point: LatLng) {
        self.canvas.set_center(point);
        self.canvas.set_zoom(FOCUS_ZOOM);
    }

    pub fn screen_position(&self, point: LatLng) -> ScreenPoint {
        self.canvas.project(point)
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn teardown(mut self) -> C {
        for (_, marker) in self.markers.drain(..) {
            self.canvas.remove_marker(marker);
        }
        self.canvas
    }
}
