// src/forms.rs
use crate::domain::LatLng;
use crate::errors::ServerError;
use crate::workflows::capture::{CaptureFields, CaptureSnapshot, LocationSelection};
use astra::Request;
use std::collections::HashMap;
use std::io::Read;

/// Upper bound for a urlencoded form body.
const MAX_FORM_BYTES: u64 = 64 * 1024;

/// Decoded `key=value` pairs from a query string or a urlencoded body.
/// A repeated key keeps its last value.
#[derive(Debug, Default, Clone)]
pub struct FormData {
    fields: HashMap<String, String>,
}

impl FormData {
    pub fn parse(raw: &[u8]) -> Self {
        Self {
            fields: url::form_urlencoded::parse(raw).into_owned().collect(),
        }
    }

    pub fn from_query(req: &Request) -> Self {
        Self::parse(req.uri().query().unwrap_or("").as_bytes())
    }

    /// Consumes the request body. Bodies over `MAX_FORM_BYTES` are refused.
    pub fn from_body(req: &mut Request) -> Result<Self, ServerError> {
        let mut raw = Vec::new();
        req.body_mut()
            .reader()
            .take(MAX_FORM_BYTES + 1)
            .read_to_end(&mut raw)
            .map_err(|e| ServerError::BadRequest(format!("Unreadable form body: {e}")))?;

        if raw.len() as u64 > MAX_FORM_BYTES {
            return Err(ServerError::BadRequest(format!(
                "Form body exceeds {MAX_FORM_BYTES} bytes"
            )));
        }
        Ok(Self::parse(&raw))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Value as typed, empty when missing.
    pub fn text(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_string()
    }

    /// Missing or blank is `Ok(None)`; anything else must parse.
    pub fn get_f64(&self, key: &str) -> Result<Option<f64>, ServerError> {
        self.parse_field(key)
    }

    pub fn get_u64(&self, key: &str) -> Result<Option<u64>, ServerError> {
        self.parse_field(key)
    }

    pub fn get_i64(&self, key: &str) -> Result<Option<i64>, ServerError> {
        self.parse_field(key)
    }

    /// Like `get_f64` but the field must be present.
    pub fn require_f64(&self, key: &str) -> Result<f64, ServerError> {
        self.get_f64(key)?
            .ok_or_else(|| ServerError::BadRequest(format!("Missing field: {key}")))
    }

    /// A `<prefix>_lat` / `<prefix>_lng` pair; both or neither.
    pub fn lat_lng(&self, prefix: &str) -> Result<Option<LatLng>, ServerError> {
        let lat = self.get_f64(&format!("{prefix}_lat"))?;
        let lng = self.get_f64(&format!("{prefix}_lng"))?;
        match (lat, lng) {
            (Some(lat), Some(lng)) => LatLng::new(lat, lng)
                .map(Some)
                .map_err(|e| ServerError::BadRequest(e.to_string())),
            (None, None) => Ok(None),
            _ => Err(ServerError::BadRequest(format!("Incomplete {prefix} coordinates"))),
        }
    }

    pub fn capture_fields(&self) -> CaptureFields {
        CaptureFields {
            broker: self.text("broker"),
            price: self.text("price"),
            acres: self.text("acres"),
            city: self.text("city"),
            state: self.text("state"),
            street: self.text("street"),
        }
    }

    /// Capture workflow state as rendered into the form's hidden inputs.
    pub fn capture_snapshot(&self) -> Result<CaptureSnapshot, ServerError> {
        let selection = self.lat_lng("sel")?.map(|position| LocationSelection {
            address: self.text("sel_address"),
            place_id: self.text("sel_place_id"),
            position,
            state: self.get("sel_state").map(str::to_string),
            city: self.get("sel_city").map(str::to_string),
            street: self.get("sel_street").map(str::to_string),
        });

        Ok(CaptureSnapshot {
            map_ready: self.get("map_ready") == Some("1"),
            fields: self.capture_fields(),
            selection,
            displayed: self.lat_lng("disp")?,
            geolocation_issued: self.get_u64("geo_issued")?.unwrap_or(0),
            geolocation_pending: self.get_u64("geo_pending")?,
        })
    }

    fn parse_field<T: std::str::FromStr>(&self, key: &str) -> Result<Option<T>, ServerError> {
        match self.get(key).map(str::trim).filter(|v| !v.is_empty()) {
            None => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| ServerError::BadRequest(format!("Invalid {key}: {raw}"))),
        }
    }
}
