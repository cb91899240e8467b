mod geocode_error;
mod google;
mod models;

pub use geocode_error::GeocodeError;
pub use google::GoogleGeocoder;

use crate::domain::LatLng;

/// Best reverse-geocode candidate for a point.
#[derive(Debug, Clone, PartialEq)]
pub struct ReverseMatch {
    pub formatted_address: String,
    pub place_id: String,
    pub state: Option<String>,
    pub city: Option<String>,
    pub street: Option<String>,
}

/// Address <-> coordinate resolver.
///
/// `Ok(None)` means the provider answered but found nothing.
pub trait Geocoder {
    fn reverse(&self, point: LatLng) -> Result<Option<ReverseMatch>, GeocodeError>;

    fn forward(&self, address: &str) -> Result<Option<LatLng>, GeocodeError>;
}
