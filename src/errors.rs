// errors.rs
use crate::workflows::ListingError;
use thiserror::Error;

/// Errors originating from either the server logic
/// (routing, missing resources, etc.) or downstream layers (DB).
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Not Found")]
    NotFound,
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("Database Error: {0}")]
    DbError(String),
    #[error("Internal Server Error")]
    InternalError,
}

impl From<rusqlite::Error> for ServerError {
    fn from(e: rusqlite::Error) -> Self {
        ServerError::DbError(e.to_string())
    }
}

impl From<ListingError> for ServerError {
    fn from(e: ListingError) -> Self {
        match e {
            ListingError::UnknownRecord(_) => ServerError::NotFound,
            ListingError::LoadFailed(msg) => ServerError::DbError(msg),
            ListingError::NoValidCoordinates => ServerError::BadRequest(e.to_string()),
            ListingError::NotLoaded => ServerError::InternalError,
        }
    }
}
