// responses/assets.rs
use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};
use mime::Mime;

/// Bundled static file (scripts, stylesheet).
pub fn asset_response(source: &'static str, content_type: Mime) -> ResultResp {
    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", content_type.as_ref())
        .header("Cache-Control", "no-cache")
        .body(Body::from(source))
        .map_err(|_| ServerError::InternalError)
}

pub fn json_response(json: String) -> ResultResp {
    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", mime::APPLICATION_JSON.as_ref())
        .body(Body::from(json))
        .map_err(|_| ServerError::InternalError)
}
