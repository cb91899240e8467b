use crate::config::ConfigError;
use crate::db::Database;
use crate::domain::{LatLng, ScreenPoint, Viewport};
use crate::errors::ServerError;
use crate::forms::FormData;
use crate::geocoding::Geocoder;
use crate::map::{ScriptedMap, DEFAULT_ZOOM, MAP_LOAD_FAILED};
use crate::responses::{
    asset_response, html_response, htmx_redirect, json_response, redirect, with_trigger,
    ResultResp,
};
use crate::templates::{components, pages};
use crate::workflows::capture::{ClipboardSink, GeolocationError};
use crate::workflows::{CaptureWorkflow, ListingSnapshots, ListingWorkflow, Ticket};
use astra::Request;
use maud::html;
use serde_json::json;
use tracing::{debug, info, warn};

/// Everything a request handler needs. Shared by every astra worker.
pub struct App {
    pub db: Database,
    pub geocoder: Option<Box<dyn Geocoder + Send + Sync>>,
    pub maps_api_key: Option<String>,
    pub viewport: Viewport,
    pub snapshots: ListingSnapshots,
}

pub fn handle(mut req: Request, app: &App) -> ResultResp {
    let method = req.method().as_str().to_owned();
    let path = req.uri().path().to_owned();
    let htmx = req.headers().contains_key("HX-Request");
    debug!("{method} {path}");

    match (method.as_str(), path.as_str()) {
        ("GET", "/") => capture_screen(app),
        ("POST", action) if action.starts_with("/capture/") => {
            let form = FormData::from_body(&mut req)?;
            capture_action(action, &form, app, htmx)
        }

        ("GET", "/show") => listing_screen(app),
        ("GET", "/show/search") => listing_search(&FormData::from_query(&req), app),
        ("GET", "/show/hover") => listing_hover(&FormData::from_query(&req), app),
        ("GET", "/show/focus") => listing_focus(&FormData::from_query(&req), app),
        ("GET", "/show/info") => listing_info(&FormData::from_query(&req), app),
        ("POST", "/show/close") => listing_close(&FormData::from_query(&req), app),
        ("GET", "/maps/failed") => map_load_failed(),

        ("GET", "/static/capture.js") => asset_response(
            include_str!("../static/capture.js"),
            mime::APPLICATION_JAVASCRIPT_UTF_8,
        ),
        ("GET", "/static/listing.js") => asset_response(
            include_str!("../static/listing.js"),
            mime::APPLICATION_JAVASCRIPT_UTF_8,
        ),
        ("GET", "/static/main.css") => {
            asset_response(include_str!("../static/main.css"), mime::TEXT_CSS_UTF_8)
        }

        _ => Err(ServerError::NotFound),
    }
}

fn capture_screen(app: &App) -> ResultResp {
    match app.maps_api_key.as_deref() {
        Some(key) => html_response(pages::capture_page(&CaptureWorkflow::new(), key)),
        None => html_response(pages::capture_unconfigured(
            &ConfigError::MissingApiKey.to_string(),
        )),
    }
}

/// Collects the text the workflow wants on the clipboard; the browser
/// receives it through an `HX-Trigger` event.
#[derive(Default)]
struct TriggerClipboard {
    text: Option<String>,
}

impl ClipboardSink for TriggerClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), String> {
        self.text = Some(text.to_string());
        Ok(())
    }
}

/// Restore the workflow from the posted form, apply one transition and
/// re-render the panel. Recoverable errors live in the workflow and are
/// rendered as an alert, so their `Result`s are not propagated here.
fn capture_action(action: &str, form: &FormData, app: &App, htmx: bool) -> ResultResp {
    let Some(geocoder) = app.geocoder.as_deref() else {
        return html_response(pages::capture_unconfigured(
            &ConfigError::MissingApiKey.to_string(),
        ));
    };
    let mut wf = CaptureWorkflow::restore(form.capture_snapshot()?);

    match action {
        "/capture/ready" => wf.map_ready(),
        "/capture/point" => {
            let (lat, lng) = (form.require_f64("lat")?, form.require_f64("lng")?);
            let _ = wf.resolve_point(lat, lng, geocoder);
        }
        "/capture/address" => {
            let _ = wf.update_from_address(geocoder);
        }
        "/capture/locate/start" => {
            if let Ok(ticket) = wf.begin_geolocation() {
                let panel = html_response(pages::capture_panel(&wf))?;
                let event = json!({ "capture:locate": { "ticket": ticket.0 } });
                return with_trigger(panel, &event.to_string());
            }
        }
        "/capture/locate" => {
            let ticket = form
                .get_u64("ticket")?
                .map(Ticket)
                .ok_or_else(|| ServerError::BadRequest("Missing field: ticket".into()))?;
            let outcome = match form.get("error") {
                Some(code) => Err(GeolocationError::from_code(code)),
                None => Ok((form.require_f64("lat")?, form.require_f64("lng")?)),
            };
            let _ = wf.complete_geolocation(ticket, outcome, geocoder);
        }
        "/capture/dismiss" => wf.dismiss_error(),
        "/capture/copy" => {
            let mut sink = TriggerClipboard::default();
            wf.copy_coordinates(&mut sink);
            let resp = html_response(html! {})?;
            return match sink.text {
                Some(text) => {
                    let event = json!({ "capture:copy": { "text": text } });
                    with_trigger(resp, &event.to_string())
                }
                None => Ok(resp),
            };
        }
        "/capture/submit" => {
            if wf.submit(&app.db).is_ok() {
                return if htmx {
                    htmx_redirect("/show")
                } else {
                    redirect("/show")
                };
            }
        }
        _ => return Err(ServerError::NotFound),
    }

    html_response(pages::capture_panel(&wf))
}

/// Canvas standing in for the browser's map widget.
fn scripted_canvas(app: &App) -> ScriptedMap {
    ScriptedMap::new(app.viewport, LatLng::ORIGIN, DEFAULT_ZOOM)
}

/// Loads the records once for this page visit and keeps them under a token.
fn listing_screen(app: &App) -> ResultResp {
    let Some(key) = app.maps_api_key.as_deref() else {
        return html_response(pages::listing_unconfigured(
            &ConfigError::MissingApiKey.to_string(),
        ));
    };

    let mut wf = ListingWorkflow::new();
    let snapshot = match wf.load(&app.db) {
        Ok(()) => Some(app.snapshots.open(wf.records().to_vec())),
        Err(_) => None,
    };
    wf.attach_map(scripted_canvas(app));

    let commands = match wf.map() {
        Some(map) => map
            .canvas()
            .to_json()
            .map_err(|_| ServerError::InternalError)?,
        None => "[]".to_string(),
    };
    html_response(pages::listing_page(&wf, key, &commands, snapshot))
}

fn snapshot_token(query: &FormData) -> Result<u64, ServerError> {
    query
        .get_u64("snap")?
        .ok_or_else(|| ServerError::BadRequest("Missing field: snap".into()))
}

/// Workflow over the records the page loaded. An expired or unknown token
/// is a 404; the store is never read here.
fn snapshot_listing(
    query: &FormData,
    app: &App,
    with_map: bool,
) -> Result<ListingWorkflow<ScriptedMap>, ServerError> {
    let token = snapshot_token(query)?;
    let records = app.snapshots.get(token).ok_or(ServerError::NotFound)?;

    let mut wf = ListingWorkflow::from_snapshot(records.as_ref().clone());
    if with_map {
        wf.attach_map(scripted_canvas(app));
    }
    Ok(wf)
}

fn listing_search(query: &FormData, app: &App) -> ResultResp {
    let mut wf = snapshot_listing(query, app, false)?;
    wf.filter(query.get("q").unwrap_or_default());
    html_response(pages::sidebar(&wf))
}

/// With an `id`, the preview for that record; without one, the pointer left.
fn listing_hover(query: &FormData, app: &App) -> ResultResp {
    let id = query.get_i64("id")?;
    let mut wf = snapshot_listing(query, app, id.is_some())?;
    let Some(id) = id else {
        wf.leave();
        return html_response(pages::hover_card(wf.hovered()));
    };

    // without a pointer position, anchor the popup on the marker itself
    let pointer = match (query.get_f64("x")?, query.get_f64("y")?) {
        (Some(x), Some(y)) => ScreenPoint { x, y },
        _ => match (wf.focus_target(id)?, wf.map()) {
            (Some(point), Some(map)) => map.screen_position(point),
            _ => ScreenPoint { x: 0.0, y: 0.0 },
        },
    };

    wf.hover(id, pointer)?;
    html_response(pages::hover_card(wf.hovered()))
}

/// Map commands that centre and zoom on one record, as JSON.
fn listing_focus(query: &FormData, app: &App) -> ResultResp {
    let id = query
        .get_i64("id")?
        .ok_or_else(|| ServerError::BadRequest("Missing field: id".into()))?;

    let mut wf = snapshot_listing(query, app, true)?;
    let before = wf.map().map_or(0, |m| m.canvas().commands().len());
    wf.focus(id)?;

    let issued = match wf.map() {
        Some(map) => map
            .canvas()
            .json_since(before)
            .map_err(|_| ServerError::InternalError)?,
        None => "[]".to_string(),
    };
    json_response(issued)
}

/// Info window markup for a clicked marker.
fn listing_info(query: &FormData, app: &App) -> ResultResp {
    let id = query
        .get_i64("id")?
        .ok_or_else(|| ServerError::BadRequest("Missing field: id".into()))?;

    let wf = snapshot_listing(query, app, false)?;
    html_response(components::info_window(wf.details(id)?))
}

/// The page is going away: release its snapshot and tear the markers down.
/// Returns the teardown commands as JSON.
fn listing_close(query: &FormData, app: &App) -> ResultResp {
    let token = snapshot_token(query)?;
    let records = app.snapshots.close(token).ok_or(ServerError::NotFound)?;

    let mut wf = ListingWorkflow::from_snapshot(records.as_ref().clone());
    wf.attach_map(scripted_canvas(app));
    let before = wf.map().map_or(0, |m| m.canvas().commands().len());

    let teardown = match wf.unmount() {
        Some(canvas) => canvas
            .json_since(before)
            .map_err(|_| ServerError::InternalError)?,
        None => "[]".to_string(),
    };
    info!("🧹 Listing page {token} closed");
    json_response(teardown)
}

fn map_load_failed() -> ResultResp {
    warn!("⚠️ Browser reported a Google Maps load failure");
    html_response(components::map_unavailable(MAP_LOAD_FAILED))
}
