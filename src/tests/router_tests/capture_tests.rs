// src/tests/router_tests/capture_tests.rs

use crate::errors::ServerError;
use crate::tests::utils::{
    body_string, count_rows, db_in, get, header, init_test_db, post_form, test_app,
    unconfigured_app,
};

const READY: &str = "map_ready=1&disp_lat=28.6139&disp_lng=77.209&geo_issued=0";

/// State after a point at (12.9, 77.6) resolved to MG Road.
const RESOLVED: &str = "map_ready=1&disp_lat=12.9&disp_lng=77.6&geo_issued=0\
    &sel_address=MG+Road&sel_place_id=fake-place&sel_lat=12.9&sel_lng=77.6\
    &sel_city=Bengaluru&city=Bengaluru&state=Karnataka&street=MG+Road";

#[test]
fn capture_page_waits_for_the_map() {
    let (_dir, db) = init_test_db();
    let app = test_app(db);
    let resp = get(&app, "/").unwrap();
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Location Selector"));
    assert!(body.contains(r#"data-phase="awaiting-map-ready""#));
    assert!(body.contains(r#"data-maps-key="test-key""#));
    assert!(body.contains("/static/capture.js"));
    assert!(body.contains("<fieldset disabled>"));
}

#[test]
fn missing_api_key_blocks_both_screens() {
    let (_dir, db) = init_test_db();
    let app = unconfigured_app(db);

    let body = body_string(get(&app, "/").unwrap());
    assert!(body.contains("Google Maps API key is required"));
    assert!(!body.contains("capture-form"));

    let body = body_string(get(&app, "/show").unwrap());
    assert!(body.contains("Google Maps API key is required"));

    let body = body_string(post_form(&app, "/capture/point", "lat=1&lng=1").unwrap());
    assert!(body.contains("Google Maps API key is required"));
}

#[test]
fn ready_enables_interaction() {
    let (_dir, db) = init_test_db();
    let app = test_app(db);
    let body = body_string(post_form(&app, "/capture/ready", "").unwrap());

    assert!(body.contains(r#"data-phase="idle-no-selection""#));
    assert!(body.contains(r#"name="map_ready" value="1""#));
    assert!(body.contains("28.613900"));
    assert!(!body.contains("<fieldset disabled>"));
    assert!(body.contains("No location selected yet"));
}

#[test]
fn point_before_ready_is_refused() {
    let (_dir, db) = init_test_db();
    let app = test_app(db);
    let body = body_string(post_form(&app, "/capture/point", "lat=12.9&lng=77.6").unwrap());

    assert!(body.contains("The map is still loading."));
    assert!(!body.contains("sel_lat"));
}

#[test]
fn point_selection_fills_the_address() {
    let (_dir, db) = init_test_db();
    let app = test_app(db);
    let form = format!("{READY}&lat=12.9&lng=77.6");
    let body = body_string(post_form(&app, "/capture/point", &form).unwrap());

    assert!(body.contains(r#"data-phase="selection-resolved""#));
    assert!(body.contains("MG Road, Bengaluru, Karnataka, India"));
    assert!(body.contains(r#"name="sel_lat" value="12.9""#));
    assert!(body.contains(r#"id="city" name="city" type="text" placeholder="Enter city" value="Bengaluru""#));
    assert!(body.contains("12.900000"));
}

#[test]
fn point_without_address_keeps_previous_selection() {
    let (_dir, db) = init_test_db();
    let app = test_app(db);
    let form = format!("{RESOLVED}&lat=-10&lng=20");
    let body = body_string(post_form(&app, "/capture/point", &form).unwrap());

    assert!(body.contains("No address found for this location."));
    assert!(body.contains(r#"name="sel_lat" value="12.9""#));
    assert!(body.contains(r#"name="disp_lat" value="12.9""#));
}

#[test]
fn malformed_coordinates_are_a_bad_request() {
    let (_dir, db) = init_test_db();
    let app = test_app(db);
    let form = format!("{READY}&lat=north&lng=77.6");
    let err = post_form(&app, "/capture/point", &form).unwrap_err();
    assert!(matches!(err, ServerError::BadRequest(_)));
}

#[test]
fn address_update_moves_the_point() {
    let (_dir, db) = init_test_db();
    let app = test_app(db);
    let form = format!("{READY}&street=MG+Road&city=Bengaluru&state=Karnataka");
    let body = body_string(post_form(&app, "/capture/address", &form).unwrap());
    assert!(body.contains(r#"name="sel_lat" value="12.9756""#));

    let form = format!("{READY}&street=Nowhere&city=X&state=Y");
    let body = body_string(post_form(&app, "/capture/address", &form).unwrap());
    assert!(body.contains("Could not find the specified address."));
    assert!(body.contains(r#"name="disp_lat" value="28.6139""#));
}

#[test]
fn geolocation_ticket_round_trip() {
    let (_dir, db) = init_test_db();
    let app = test_app(db);

    let resp = post_form(&app, "/capture/locate/start", READY).unwrap();
    let trigger = header(&resp, "HX-Trigger");
    assert!(trigger.contains("capture:locate"));
    assert!(trigger.contains(r#""ticket":1"#));
    let body = body_string(resp);
    assert!(body.contains(r#"name="geo_pending" value="1""#));
    assert!(body.contains("Locating..."));

    // a second click superseded ticket 1
    let stale = "map_ready=1&disp_lat=28.6139&disp_lng=77.209&geo_issued=2&geo_pending=2\
        &ticket=1&lat=12.9&lng=77.6";
    let body = body_string(post_form(&app, "/capture/locate", stale).unwrap());
    assert!(!body.contains("sel_lat"));
    assert!(body.contains(r#"name="geo_pending" value="2""#));

    let current = "map_ready=1&disp_lat=28.6139&disp_lng=77.209&geo_issued=2&geo_pending=2\
        &ticket=2&lat=12.9&lng=77.6";
    let body = body_string(post_form(&app, "/capture/locate", current).unwrap());
    assert!(body.contains(r#"name="sel_lat" value="12.9""#));
    assert!(!body.contains("geo_pending"));
}

#[test]
fn geolocation_denied_shows_permission_message() {
    let (_dir, db) = init_test_db();
    let app = test_app(db);
    let form = format!("{READY}&geo_pending=1&ticket=1&error=1");
    let body = body_string(post_form(&app, "/capture/locate", &form).unwrap());
    assert!(body.contains("Could not access your location. Please check browser permissions."));
}

#[test]
fn dismiss_clears_the_alert() {
    let (_dir, db) = init_test_db();
    let app = test_app(db);
    let body = body_string(post_form(&app, "/capture/dismiss", READY).unwrap());
    assert!(!body.contains(r#"role="alert""#));
    assert!(body.contains(r#"data-phase="idle-no-selection""#));
}

#[test]
fn copy_sends_coordinates_to_the_browser() {
    let (_dir, db) = init_test_db();
    let app = test_app(db);
    let resp = post_form(&app, "/capture/copy", RESOLVED).unwrap();
    assert!(header(&resp, "HX-Trigger").contains("12.9, 77.6"));

    // the panel carries the live region the confirmation is written into
    let panel = body_string(post_form(&app, "/capture/dismiss", RESOLVED).unwrap());
    assert!(panel.contains(r#"id="copy-status""#));
    assert!(panel.contains(r#"aria-live="polite""#));
}

#[test]
fn submit_requires_a_selection() {
    let (_dir, db) = init_test_db();
    let app = test_app(db.clone());
    let body = body_string(post_form(&app, "/capture/submit", READY).unwrap());

    assert!(body.contains("Please select a location"));
    assert_eq!(count_rows(&db), 0);
}

#[test]
fn submit_rejects_unparseable_price() {
    let (_dir, db) = init_test_db();
    let app = test_app(db.clone());
    let form = format!("{RESOLVED}&price=lots");
    let body = body_string(post_form(&app, "/capture/submit", &form).unwrap());

    assert!(body.contains("Invalid price must be a number"));
    assert_eq!(count_rows(&db), 0);
}

#[test]
fn submit_saves_once_and_redirects_to_listing() {
    let (_dir, db) = init_test_db();
    let app = test_app(db.clone());
    let form = format!("{RESOLVED}&broker=Asha+Realty&price=2500000&acres=3");

    let resp = post_form(&app, "/capture/submit", &form).unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(header(&resp, "HX-Redirect"), "/show");
    assert_eq!(count_rows(&db), 1);

    let body = body_string(get(&app, "/show").unwrap());
    assert!(body.contains("Property #1"));
    assert!(body.contains("Asha Realty"));
    assert!(body.contains("$2,500,000"));
}

#[test]
fn plain_form_submit_gets_303() {
    let (_dir, db) = init_test_db();
    let app = test_app(db.clone());

    let mut req = astra::Request::new(astra::Body::from(RESOLVED.to_string()));
    *req.method_mut() = http::Method::POST;
    *req.uri_mut() = "/capture/submit".parse().unwrap();
    let resp = crate::router::handle(req, &app).unwrap();

    assert_eq!(resp.status(), 303);
    assert_eq!(header(&resp, "Location"), "/show");
    assert_eq!(count_rows(&db), 1);
}

#[test]
fn save_failure_is_recoverable() {
    // no schema: the insert fails
    let dir = tempfile::tempdir().unwrap();
    let db = db_in(&dir);
    let app = test_app(db);
    let body = body_string(post_form(&app, "/capture/submit", RESOLVED).unwrap());

    assert!(body.contains("Failed to save location data. Please try again."));
    assert!(body.contains(r#"data-phase="selection-resolved""#));
}
