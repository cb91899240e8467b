// src/domain/property.rs

use crate::domain::geo::LatLng;
use thiserror::Error;

/// A saved property pin, as read back from the `properties` table.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyRecord {
    pub id: i64,
    pub broker: Option<String>,
    pub price: Option<f64>,
    pub acres: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub city: Option<String>,
}

impl PropertyRecord {
    /// Map position, only when both coordinates are present and in range.
    /// Records without one are listed but never get a marker.
    pub fn position(&self) -> Option<LatLng> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => LatLng::new(lat, lng).ok(),
            _ => None,
        }
    }

    pub fn is_renderable(&self) -> bool {
        self.position().is_some()
    }
}

/// Fields for a record that does not exist yet; the id is assigned on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProperty {
    pub broker: Option<String>,
    pub price: Option<f64>,
    pub acres: Option<f64>,
    pub position: LatLng,
    pub city: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FieldError {
    #[error("{field} must be a number, got {raw:?}")]
    NotANumber { field: &'static str, raw: String },
    #[error("{field} cannot be negative")]
    Negative { field: &'static str },
}

/// Parse an optional, non-negative amount typed into a text box.
/// Blank input means "not given"; anything else must be a finite number >= 0.
pub fn parse_optional_amount(field: &'static str, raw: &str) -> Result<Option<f64>, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: f64 = trimmed
        .replace(',', "")
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
        .ok_or_else(|| FieldError::NotANumber {
            field,
            raw: raw.to_string(),
        })?;

    if value < 0.0 {
        return Err(FieldError::Negative { field });
    }
    Ok(Some(value))
}

/// Blank free-text fields are stored as NULL.
pub fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
