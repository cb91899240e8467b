// src/workflows/capture.rs
//
// Capture screen: pick a point, resolve it to an address, fill in the
// property details and save one record.

use crate::db::PropertyStore;
use crate::domain::format::clipboard_text;
use crate::domain::geo::CoordinateError;
use crate::domain::property::{optional_text, parse_optional_amount, FieldError};
use crate::domain::{LatLng, NewProperty};
use crate::geocoding::{GeocodeError, Geocoder, ReverseMatch};
use crate::map::DEFAULT_CAPTURE_CENTER;
use crate::workflows::{RequestSlot, Ticket};
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapturePhase {
    AwaitingMapReady,
    Idle,
    PendingGeocode,
    Resolved,
    Submitting,
    Submitted,
}

impl CapturePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            CapturePhase::AwaitingMapReady => "awaiting-map-ready",
            CapturePhase::Idle => "idle-no-selection",
            CapturePhase::PendingGeocode => "selection-pending-geocode",
            CapturePhase::Resolved => "selection-resolved",
            CapturePhase::Submitting => "submitting",
            CapturePhase::Submitted => "submitted",
        }
    }
}

/// What the browser reported when asked for the device position.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeolocationError {
    #[error("Could not access your location. Please check browser permissions.")]
    PermissionDenied,
    #[error("Your location is currently unavailable.")]
    Unavailable,
    #[error("Timed out while looking up your location.")]
    Timeout,
    #[error("Geolocation is not supported by this browser.")]
    Unsupported,
}

impl GeolocationError {
    /// Maps `GeolocationPositionError.code` (1, 2, 3) and our own "unsupported".
    pub fn from_code(code: &str) -> Self {
        match code {
            "1" | "denied" => GeolocationError::PermissionDenied,
            "3" | "timeout" => GeolocationError::Timeout,
            "unsupported" => GeolocationError::Unsupported,
            _ => GeolocationError::Unavailable,
        }
    }
}

/// Every capture error is recoverable: it is shown, dismissed, and the
/// workflow carries on from where it was.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CaptureError {
    #[error("The map is still loading.")]
    MapNotReady,
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(#[from] CoordinateError),
    #[error("No address found for this location.")]
    NoAddressForPoint,
    #[error("Could not find the specified address.")]
    AddressNotFound,
    #[error("Address lookup failed: {0}")]
    Geocoder(#[from] GeocodeError),
    #[error("{0}")]
    Geolocation(#[from] GeolocationError),
    #[error("Please select a location")]
    NoSelection,
    #[error("Invalid {0}")]
    Field(#[from] FieldError),
    #[error("Failed to save location data. Please try again.")]
    SaveFailed,
    #[error("This property has already been saved.")]
    AlreadySubmitted,
}

/// A resolved point. Lives only while the capture screen is open.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationSelection {
    pub address: String,
    pub place_id: String,
    pub position: LatLng,
    pub state: Option<String>,
    pub city: Option<String>,
    pub street: Option<String>,
}

impl LocationSelection {
    fn from_match(position: LatLng, m: ReverseMatch) -> Self {
        Self {
            address: m.formatted_address,
            place_id: m.place_id,
            position,
            state: m.state,
            city: m.city,
            street: m.street,
        }
    }
}

/// Free-text inputs exactly as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureFields {
    pub broker: String,
    pub price: String,
    pub acres: String,
    pub city: String,
    pub state: String,
    pub street: String,
}

impl CaptureFields {
    /// Query used for forward geocoding.
    pub fn address_query(&self) -> String {
        format!("{}, {}, {}", self.street, self.city, self.state)
    }
}

/// Everything the page carries between requests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureSnapshot {
    pub map_ready: bool,
    pub fields: CaptureFields,
    pub selection: Option<LocationSelection>,
    pub displayed: Option<LatLng>,
    pub geolocation_issued: u64,
    pub geolocation_pending: Option<u64>,
}

/// Receives the "copy coordinates" text, e.g. the browser clipboard.
pub trait ClipboardSink {
    fn write_text(&mut self, text: &str) -> Result<(), String>;
}

#[derive(Debug)]
pub struct CaptureWorkflow {
    phase: CapturePhase,
    fields: CaptureFields,
    selection: Option<LocationSelection>,
    displayed: Option<LatLng>,
    pending_point: Option<LatLng>,
    geocode: RequestSlot,
    geolocation: RequestSlot,
    error: Option<CaptureError>,
}

impl Default for CaptureWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureWorkflow {
    pub fn new() -> Self {
        Self {
            phase: CapturePhase::AwaitingMapReady,
            fields: CaptureFields::default(),
            selection: None,
            displayed: None,
            pending_point: None,
            geocode: RequestSlot::default(),
            geolocation: RequestSlot::default(),
            error: None,
        }
    }

    pub fn restore(snapshot: CaptureSnapshot) -> Self {
        let phase = match (snapshot.map_ready, &snapshot.selection) {
            (false, _) => CapturePhase::AwaitingMapReady,
            (true, Some(_)) => CapturePhase::Resolved,
            (true, None) => CapturePhase::Idle,
        };

        Self {
            phase,
            fields: snapshot.fields,
            selection: snapshot.selection,
            displayed: snapshot.displayed,
            pending_point: None,
            geocode: RequestSlot::default(),
            geolocation: RequestSlot::restore(
                snapshot.geolocation_issued,
                snapshot.geolocation_pending,
            ),
            error: None,
        }
    }

    pub fn phase(&self) -> CapturePhase {
        self.phase
    }

    pub fn is_ready(&self) -> bool {
        self.phase != CapturePhase::AwaitingMapReady
    }

    pub fn fields(&self) -> &CaptureFields {
        &self.fields
    }

    #[cfg(test)]
    pub fn fields_mut(&mut self) -> &mut CaptureFields {
        &mut self.fields
    }

    pub fn selection(&self) -> Option<&LocationSelection> {
        self.selection.as_ref()
    }

    /// Coordinates shown in the card; these are what gets saved.
    pub fn displayed(&self) -> Option<LatLng> {
        self.displayed
    }

    pub fn error(&self) -> Option<&CaptureError> {
        self.error.as_ref()
    }

    pub fn geolocation_slot(&self) -> &RequestSlot {
        &self.geolocation
    }

    /// The map widget finished loading; interactions are now allowed.
    pub fn map_ready(&mut self) {
        if self.phase == CapturePhase::AwaitingMapReady {
            self.phase = if self.selection.is_some() {
                CapturePhase::Resolved
            } else {
                CapturePhase::Idle
            };
        }
        if self.displayed.is_none() {
            let (lat, lng) = DEFAULT_CAPTURE_CENTER;
            self.displayed = LatLng::new(lat, lng).ok();
        }
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Map click, marker drag or device position. Moves the displayed point
    /// and opens a reverse-geocode request for it.
    pub fn select_point(&mut self, lat: f64, lng: f64) -> Result<Ticket, CaptureError> {
        self.ensure_interactive()?;
        let point = match LatLng::new(lat, lng) {
            Ok(p) => p,
            Err(e) => return self.reject(e.into()),
        };

        self.displayed = Some(point);
        self.pending_point = Some(point);
        self.phase = CapturePhase::PendingGeocode;
        Ok(self.geocode.begin())
    }

    /// Answer to the reverse-geocode request opened by `select_point`.
    /// Returns `false` when the ticket was superseded and the answer dropped.
    pub fn apply_reverse_geocode(
        &mut self,
        ticket: Ticket,
        outcome: Result<Option<ReverseMatch>, GeocodeError>,
    ) -> bool {
        if !self.geocode.finish(ticket) {
            debug!("dropping stale reverse geocode {:?}", ticket);
            return false;
        }
        let Some(point) = self.pending_point.take() else {
            return false;
        };

        match outcome {
            Ok(Some(m)) => {
                let selection = LocationSelection::from_match(point, m);
                self.fields.state = selection.state.clone().unwrap_or_default();
                self.fields.city = selection.city.clone().unwrap_or_default();
                self.fields.street = selection.street.clone().unwrap_or_default();
                self.selection = Some(selection);
                self.phase = CapturePhase::Resolved;
                self.error = None;
            }
            Ok(None) => self.settle_after_failure(CaptureError::NoAddressForPoint),
            Err(e) => self.settle_after_failure(CaptureError::Geocoder(e)),
        }
        true
    }

    /// `select_point` plus a synchronous reverse geocode.
    pub fn resolve_point(
        &mut self,
        lat: f64,
        lng: f64,
        geocoder: &dyn Geocoder,
    ) -> Result<(), CaptureError> {
        let ticket = self.select_point(lat, lng)?;
        let point = self.displayed.ok_or(CaptureError::NoSelection)?;
        self.apply_reverse_geocode(ticket, geocoder.reverse(point));

        match &self.error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    /// Forward-geocode the typed street/city/state and, on a hit, treat the
    /// result as a point selection. A miss leaves the point where it was.
    pub fn update_from_address(&mut self, geocoder: &dyn Geocoder) -> Result<(), CaptureError> {
        self.ensure_interactive()?;

        let query = self.fields.address_query();
        let ticket = self.geocode.begin();
        let outcome = geocoder.forward(&query);
        if !self.geocode.finish(ticket) {
            return Ok(());
        }

        match outcome {
            Ok(Some(point)) => self.resolve_point(point.lat(), point.lng(), geocoder),
            Ok(None) => self.reject(CaptureError::AddressNotFound),
            Err(e) => self.reject(CaptureError::Geocoder(e)),
        }
    }

    /// Open the geolocation slot. A second call supersedes the first.
    pub fn begin_geolocation(&mut self) -> Result<Ticket, CaptureError> {
        self.ensure_interactive()?;
        let ticket = self.geolocation.begin();
        info!("📍 Geolocation request {:?}", ticket);
        Ok(ticket)
    }

    /// Browser answer for a geolocation ticket. Stale tickets are ignored
    /// and reported as `Ok(false)`.
    pub fn complete_geolocation(
        &mut self,
        ticket: Ticket,
        outcome: Result<(f64, f64), GeolocationError>,
        geocoder: &dyn Geocoder,
    ) -> Result<bool, CaptureError> {
        if !self.geolocation.finish(ticket) {
            debug!("dropping superseded geolocation {:?}", ticket);
            return Ok(false);
        }

        match outcome {
            Ok((lat, lng)) => self.resolve_point(lat, lng, geocoder).map(|_| true),
            Err(e) => self.reject(e.into()),
        }
    }

    /// Validate the form and create exactly one record.
    pub fn submit(&mut self, store: &dyn PropertyStore) -> Result<i64, CaptureError> {
        if self.phase == CapturePhase::Submitted {
            return self.reject(CaptureError::AlreadySubmitted);
        }
        self.ensure_interactive()?;

        let Some(selection) = self.selection.as_ref() else {
            return self.reject(CaptureError::NoSelection);
        };
        let position = self.displayed.unwrap_or(selection.position);

        let prop = match self.build_record(position) {
            Ok(p) => p,
            Err(e) => return self.reject(e),
        };

        self.phase = CapturePhase::Submitting;
        match store.create_record(&prop) {
            Ok(id) => {
                info!("✅ Captured property #{id} at {}", clipboard_text(position));
                self.phase = CapturePhase::Submitted;
                self.selection = None;
                self.error = None;
                Ok(id)
            }
            Err(e) => {
                error!("Error saving location data: {e}");
                self.phase = CapturePhase::Resolved;
                self.reject(CaptureError::SaveFailed)
            }
        }
    }

    /// Text form of the displayed coordinates.
    pub fn coordinates_text(&self) -> Option<String> {
        self.displayed.map(clipboard_text)
    }

    /// Side effect only; failures are logged and never change state.
    pub fn copy_coordinates(&self, sink: &mut dyn ClipboardSink) {
        let Some(text) = self.coordinates_text() else {
            return;
        };
        if let Err(e) = sink.write_text(&text) {
            warn!("Failed to copy coordinates: {e}");
        }
    }

    fn build_record(&self, position: LatLng) -> Result<NewProperty, CaptureError> {
        Ok(NewProperty {
            broker: optional_text(&self.fields.broker),
            price: parse_optional_amount("price", &self.fields.price)?,
            acres: parse_optional_amount("acres", &self.fields.acres)?,
            position,
            city: optional_text(&self.fields.city),
        })
    }

    fn ensure_interactive(&mut self) -> Result<(), CaptureError> {
        match self.phase {
            CapturePhase::AwaitingMapReady => self.reject(CaptureError::MapNotReady),
            CapturePhase::Submitted => self.reject(CaptureError::AlreadySubmitted),
            _ => Ok(()),
        }
    }

    /// Put the marker back on the last good selection and surface the error.
    fn settle_after_failure(&mut self, err: CaptureError) {
        match &self.selection {
            Some(sel) => {
                self.displayed = Some(sel.position);
                self.phase = CapturePhase::Resolved;
            }
            None => self.phase = CapturePhase::Idle,
        }
        warn!("⚠️ {err}");
        self.error = Some(err);
    }

    fn reject<T>(&mut self, err: CaptureError) -> Result<T, CaptureError> {
        warn!("⚠️ {err}");
        self.error = Some(err.clone());
        Err(err)
    }
}
