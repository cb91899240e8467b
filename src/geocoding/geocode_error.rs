use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeocodeError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Geocoder returned {status}: {message}")]
    Status { status: String, message: String },
    #[error("JSON parse error: {0}")]
    JsonParse(String),
    #[error("Geocoder misconfigured: {0}")]
    Config(String),
}
