// src/workflows/listing.rs
//
// Listing screen: load every record once, put them on the map, filter the
// sidebar and preview a record under the pointer.

use crate::db::PropertyStore;
use crate::domain::filter::visible_indices;
use crate::domain::format::showing_caption;
use crate::domain::{LatLng, PropertyRecord, ScreenPoint};
use crate::map::{MapCanvas, MapController};
use thiserror::Error;
use tracing::{error, info, warn};

/// Pixels between the pointer and the top-left corner of the hover popup.
pub const HOVER_OFFSET: f64 = 10.0;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ListingError {
    #[error("Failed to load properties data: {0}")]
    LoadFailed(String),
    #[error("No valid property coordinates found")]
    NoValidCoordinates,
    #[error("No property with id {0}")]
    UnknownRecord(i64),
    #[error("Properties are not loaded yet")]
    NotLoaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingPhase {
    /// Data still loading; `map_ready` tells whether the widget already is.
    LoadingData { map_ready: bool },
    /// Data is in, the map widget is not.
    LoadingMap,
    Ready,
    Filtered,
    LoadFailed,
    MapFailed,
}

impl ListingPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingPhase::LoadingData { .. } => "loading-data",
            ListingPhase::LoadingMap => "loading-map",
            ListingPhase::Ready => "ready",
            ListingPhase::Filtered => "filtered",
            ListingPhase::LoadFailed => "load-failed",
            ListingPhase::MapFailed => "map-failed",
        }
    }
}

#[derive(Debug)]
enum DataState {
    Loading,
    Loaded(Vec<PropertyRecord>),
    Failed(String),
}

/// Record under the pointer and where its popup goes.
#[derive(Debug, Clone, PartialEq)]
pub struct HoverPreview<'a> {
    pub record: &'a PropertyRecord,
    pub position: ScreenPoint,
}

/// Arithmetic mean of every renderable record.
pub fn initial_center(records: &[PropertyRecord]) -> Option<LatLng> {
    LatLng::mean(records.iter().filter_map(PropertyRecord::position))
}

pub struct ListingWorkflow<C: MapCanvas> {
    data: DataState,
    pending_canvas: Option<C>,
    map: Option<MapController<C>>,
    map_error: Option<ListingError>,
    query: String,
    visible: Vec<usize>,
    hovered: Option<(i64, ScreenPoint)>,
}

impl<C: MapCanvas> Default for ListingWorkflow<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: MapCanvas> ListingWorkflow<C> {
    pub fn new() -> Self {
        Self {
            data: DataState::Loading,
            pending_canvas: None,
            map: None,
            map_error: None,
            query: String::new(),
            visible: Vec::new(),
            hovered: None,
        }
    }

    /// Workflow over records this page already loaded. The store is not
    /// consulted again; `load` becomes a no-op.
    pub fn from_snapshot(records: Vec<PropertyRecord>) -> Self {
        let mut wf = Self::new();
        wf.visible = (0..records.len()).collect();
        wf.data = DataState::Loaded(records);
        wf
    }

    pub fn phase(&self) -> ListingPhase {
        match &self.data {
            DataState::Loading => ListingPhase::LoadingData {
                map_ready: self.pending_canvas.is_some(),
            },
            DataState::Failed(_) => ListingPhase::LoadFailed,
            DataState::Loaded(_) if self.map_error.is_some() => ListingPhase::MapFailed,
            DataState::Loaded(_) if self.map.is_none() => ListingPhase::LoadingMap,
            DataState::Loaded(_) if self.query.is_empty() => ListingPhase::Ready,
            DataState::Loaded(_) => ListingPhase::Filtered,
        }
    }

    /// Fetch the full collection. Only the first call reaches the store.
    pub fn load(&mut self, store: &dyn PropertyStore) -> Result<(), ListingError> {
        match &self.data {
            DataState::Loaded(_) => return Ok(()),
            DataState::Failed(msg) => return Err(ListingError::LoadFailed(msg.clone())),
            DataState::Loading => {}
        }

        match store.list_records() {
            Ok(records) => {
                info!("🏠 Loaded {} properties", records.len());
                self.visible = (0..records.len()).collect();
                self.data = DataState::Loaded(records);
                self.try_initialize_map();
                Ok(())
            }
            Err(e) => {
                error!("Error loading properties: {e}");
                let msg = e.to_string();
                self.data = DataState::Failed(msg.clone());
                Err(ListingError::LoadFailed(msg))
            }
        }
    }

    /// Hand over the map widget once it has loaded. A second widget is ignored.
    pub fn attach_map(&mut self, canvas: C) {
        if self.map.is_some() || self.pending_canvas.is_some() {
            warn!("map already attached, ignoring second canvas");
            return;
        }
        self.pending_canvas = Some(canvas);
        self.try_initialize_map();
    }

    fn try_initialize_map(&mut self) {
        let DataState::Loaded(records) = &self.data else {
            return;
        };
        let Some(canvas) = self.pending_canvas.take() else {
            return;
        };

        match initial_center(records) {
            Some(center) => {
                let ctl = MapController::initialize(canvas, center, records);
                info!("🗺️ Map initialized with {} markers", ctl.marker_count());
                self.map = Some(ctl);
            }
            None => {
                warn!("{}", ListingError::NoValidCoordinates);
                self.pending_canvas = Some(canvas);
                self.map_error = Some(ListingError::NoValidCoordinates);
            }
        }
    }

    pub fn load_error(&self) -> Option<ListingError> {
        match &self.data {
            DataState::Failed(msg) => Some(ListingError::LoadFailed(msg.clone())),
            _ => None,
        }
    }

    pub fn map_error(&self) -> Option<&ListingError> {
        self.map_error.as_ref()
    }

    pub fn records(&self) -> &[PropertyRecord] {
        match &self.data {
            DataState::Loaded(records) => records,
            _ => &[],
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Recompute the sidebar projection. Markers are left alone.
    pub fn filter(&mut self, query: &str) {
        self.query = query.to_string();
        self.visible = visible_indices(self.records(), query);
    }

    pub fn visible(&self) -> impl Iterator<Item = &PropertyRecord> {
        let records = self.records();
        self.visible.iter().filter_map(move |&i| records.get(i))
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    pub fn total(&self) -> usize {
        self.records().len()
    }

    pub fn caption(&self) -> Option<String> {
        showing_caption(self.visible_count(), self.total())
    }

    pub fn hover(&mut self, record_id: i64, pointer: ScreenPoint) -> Result<(), ListingError> {
        self.find(record_id)?;
        self.hovered = Some((record_id, pointer));
        Ok(())
    }

    pub fn leave(&mut self) {
        self.hovered = None;
    }

    pub fn hovered(&self) -> Option<HoverPreview<'_>> {
        let (id, pointer) = self.hovered?;
        let record = self.find(id).ok()?;
        Some(HoverPreview {
            record,
            position: ScreenPoint {
                x: pointer.x + HOVER_OFFSET,
                y: pointer.y + HOVER_OFFSET,
            },
        })
    }

    /// Record behind a clicked marker, for its info window.
    pub fn details(&self, record_id: i64) -> Result<&PropertyRecord, ListingError> {
        self.find(record_id)
    }

    /// Coordinates a sidebar click would centre on, if the record has any.
    pub fn focus_target(&self, record_id: i64) -> Result<Option<LatLng>, ListingError> {
        Ok(self.find(record_id)?.position())
    }

    /// Centre on a record and zoom in. `Ok(false)` when it has no position
    /// or the map is not up yet.
    pub fn focus(&mut self, record_id: i64) -> Result<bool, ListingError> {
        let Some(point) = self.focus_target(record_id)? else {
            return Ok(false);
        };
        match self.map.as_mut() {
            Some(map) => {
                map.focus(point);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn marker_count(&self) -> usize {
        self.map.as_ref().map_or(0, MapController::marker_count)
    }

    pub fn map(&self) -> Option<&MapController<C>> {
        self.map.as_ref()
    }

    /// Leave the screen: markers are removed and the canvas is returned.
    pub fn unmount(self) -> Option<C> {
        match self.map {
            Some(map) => Some(map.teardown()),
            None => self.pending_canvas,
        }
    }

    fn find(&self, record_id: i64) -> Result<&PropertyRecord, ListingError> {
        if !matches!(self.data, DataState::Loaded(_)) {
            return Err(ListingError::NotLoaded);
        }
        self.records()
            .iter()
            .find(|r| r.id == record_id)
            .ok_or(ListingError::UnknownRecord(record_id))
    }
}
