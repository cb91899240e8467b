use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, Response, ResponseBuilder};
use maud::Markup;

pub fn html_response(markup: Markup) -> ResultResp {
    ResponseBuilder::new()
        .status(200)
        .header("Content-Type", mime::TEXT_HTML_UTF_8.as_ref())
        .body(Body::from(markup.into_string()))
        .map_err(|_| ServerError::InternalError)
}

/// Plain form posts get a 303 to `location`.
pub fn redirect(location: &str) -> ResultResp {
    ResponseBuilder::new()
        .status(303)
        .header("Location", location)
        .body(Body::empty())
        .map_err(|_| ServerError::InternalError)
}

/// htmx requests follow `HX-Redirect` with a full page load.
pub fn htmx_redirect(location: &str) -> ResultResp {
    ResponseBuilder::new()
        .status(200)
        .header("HX-Redirect", location)
        .body(Body::empty())
        .map_err(|_| ServerError::InternalError)
}

/// Attach an `HX-Trigger` event (JSON) to an existing response.
pub fn with_trigger(mut resp: Response, event_json: &str) -> ResultResp {
    let value = event_json
        .parse()
        .map_err(|_| ServerError::InternalError)?;
    resp.headers_mut().insert("HX-Trigger", value);
    Ok(resp)
}
