// src/tests/router_tests/listing_tests.rs

use crate::errors::ServerError;
use crate::router::App;
use crate::tests::utils::{
    body_string, count_rows, db_in, get, header, init_test_db, post_form, seed, snapshot_token,
    test_app,
};
use tempfile::{tempdir, TempDir};

/// Two mapped records in Bangalore plus one without coordinates.
fn seeded() -> (TempDir, App) {
    let (dir, db) = init_test_db();
    seed(&db, "Asha Realty", "Bangalore", 2_500_000.0, 12.9, 77.6);
    seed(&db, "Kiran Homes", "Bangalore", 1_200_000.0, 13.0, 77.7);
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO properties (broker, city) VALUES ('Ravi', 'Mysore')",
            [],
        )?;
        Ok(())
    })
    .unwrap();
    (dir, test_app(db))
}

/// Opens the listing page and returns its snapshot token.
fn open_page(app: &App) -> u64 {
    snapshot_token(&body_string(get(app, "/show").unwrap()))
}

#[test]
fn listing_page_renders_markers_for_mapped_records_only() {
    let (_dir, app) = seeded();
    let resp = get(&app, "/show").unwrap();
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("Property Explorer"));
    assert!(body.contains(r#"data-phase="ready""#));
    assert_eq!(body.matches(r#""op":"add_marker""#).count(), 2);
    assert!(body.contains(r#""op":"fit_bounds""#));
    // the unmapped record is still listed
    assert!(body.contains("Property #3"));
    assert!(body.contains("Mysore"));
    assert!(body.contains("N/A"));
}

#[test]
fn listing_page_shows_count_toggle_and_loading_state() {
    let (_dir, app) = seeded();
    let body = body_string(get(&app, "/show").unwrap());

    assert!(body.contains("3 listings"));
    assert!(body.contains("Hide List"));
    assert!(body.contains(r#"aria-controls="sidebar""#));
    assert!(body.contains("Loading Google Maps..."));
    assert!(body.contains(r#"id="map-loading""#));
    assert!(snapshot_token(&body) > 0);
}

#[test]
fn empty_database_reports_no_coordinates() {
    let (_dir, db) = init_test_db();
    let app = test_app(db);
    let body = body_string(get(&app, "/show").unwrap());

    assert!(body.contains("No valid property coordinates found"));
    assert!(body.contains(r#"data-phase="map-failed""#));
    assert!(!body.contains("map-commands"));
    assert!(body.contains("0 listings"));
}

#[test]
fn read_failure_is_not_an_empty_list() {
    let dir = tempdir().unwrap();
    let app = test_app(db_in(&dir));
    let body = body_string(get(&app, "/show").unwrap());

    assert!(body.contains("Failed to load properties data"));
    assert!(body.contains(r#"data-phase="load-failed""#));
    assert!(!body.contains("No properties match your search criteria"));
    // nothing loaded, nothing to search
    assert!(!body.contains("data-snapshot"));
    assert!(!body.contains(r#"hx-get="/show/search""#));
}

#[test]
fn search_swaps_only_the_sidebar() {
    let (_dir, app) = seeded();
    let snap = open_page(&app);
    let body = body_string(get(&app, &format!("/show/search?q=kiran&snap={snap}")).unwrap());

    assert!(!body.contains("<html"));
    assert!(!body.contains("add_marker"));
    assert!(body.starts_with(r#"<aside id="sidebar""#));
    assert!(body.contains("Kiran Homes"));
    assert!(!body.contains("Asha Realty"));
    assert!(body.contains("Showing 1 of 3 properties"));
}

#[test]
fn search_uses_the_records_the_page_loaded() {
    let (_dir, app) = seeded();
    let snap = open_page(&app);
    seed(&app.db, "Late Broker", "Bangalore", 900_000.0, 12.8, 77.5);
    assert_eq!(count_rows(&app.db), 4);

    let body = body_string(get(&app, &format!("/show/search?q=bangalore&snap={snap}")).unwrap());
    assert_eq!(body.matches("property-row").count(), 2);
    assert!(!body.contains("Late Broker"));
    assert!(body.contains("Showing 2 of 3 properties"));

    // a new visit sees the new row
    let fresh = open_page(&app);
    assert_ne!(fresh, snap);
    let body = body_string(get(&app, &format!("/show/search?q=late&snap={fresh}")).unwrap());
    assert!(body.contains("Late Broker"));
}

#[test]
fn search_without_hits_says_so() {
    let (_dir, app) = seeded();
    let snap = open_page(&app);
    let body = body_string(get(&app, &format!("/show/search?q=chennai&snap={snap}")).unwrap());
    assert!(body.contains("No properties match your search criteria"));

    // coordinates are not searchable
    let body = body_string(get(&app, &format!("/show/search?q=77&snap={snap}")).unwrap());
    assert!(body.contains("No properties match your search criteria"));
}

#[test]
fn id_query_returns_exactly_that_record() {
    let (_dir, app) = seeded();
    let snap = open_page(&app);
    let body = body_string(get(&app, &format!("/show/search?q=2&snap={snap}")).unwrap());

    assert_eq!(body.matches("property-row").count(), 1);
    assert!(body.contains("Property #2"));
    assert!(body.contains("Showing 1 of 3 properties"));
}

#[test]
fn query_whitespace_is_part_of_the_search() {
    let (_dir, app) = seeded();
    let snap = open_page(&app);
    let body = body_string(get(&app, &format!("/show/search?q=%20kiran&snap={snap}")).unwrap());
    assert!(body.contains("No properties match your search criteria"));
}

#[test]
fn filtering_leaves_the_markers_alone() {
    let (_dir, app) = seeded();
    let snap = open_page(&app);

    let body = body_string(get(&app, &format!("/show/search?q=mysore&snap={snap}")).unwrap());
    assert!(!body.contains("add_marker"));
    assert!(!body.contains("remove_marker"));

    // both markers are still up when the page goes away
    let resp = post_form(&app, &format!("/show/close?snap={snap}"), "").unwrap();
    let commands: serde_json::Value = serde_json::from_str(&body_string(resp)).unwrap();
    let removed = commands
        .as_array()
        .unwrap()
        .iter()
        .filter(|c| c["op"] == "remove_marker")
        .count();
    assert_eq!(removed, 2);
}

#[test]
fn empty_search_restores_everything() {
    let (_dir, app) = seeded();
    let snap = open_page(&app);
    let body = body_string(get(&app, &format!("/show/search?q=&snap={snap}")).unwrap());
    assert_eq!(body.matches("property-row").count(), 3);
    assert!(!body.contains("Showing"));
}

#[test]
fn follow_up_requests_need_a_snapshot() {
    let (_dir, app) = seeded();
    let err = get(&app, "/show/search?q=kiran").unwrap_err();
    assert!(matches!(err, ServerError::BadRequest(_)));

    let err = get(&app, "/show/search?q=kiran&snap=999").unwrap_err();
    assert!(matches!(err, ServerError::NotFound));
}

#[test]
fn hover_card_is_offset_from_the_pointer() {
    let (_dir, app) = seeded();
    let snap = open_page(&app);
    let body = body_string(get(&app, &format!("/show/hover?id=1&x=100&y=40&snap={snap}")).unwrap());

    assert!(body.contains("left: 110px; top: 50px;"));
    assert!(body.contains("Property #1"));
    assert!(body.contains("$2,500,000"));
    assert!(body.contains("2.5 acres"));
}

#[test]
fn hover_without_pointer_anchors_on_the_marker() {
    let (_dir, app) = seeded();
    let snap = open_page(&app);
    let body = body_string(get(&app, &format!("/show/hover?id=2&snap={snap}")).unwrap());
    assert!(body.contains(r#"style="left: "#));
    assert!(body.contains("Kiran Homes"));
}

#[test]
fn hover_without_id_hides_the_card() {
    let (_dir, app) = seeded();
    let snap = open_page(&app);
    let body = body_string(get(&app, &format!("/show/hover?snap={snap}")).unwrap());
    assert!(body.contains(r#"id="hover-card""#));
    assert!(body.contains("hidden"));
    assert!(!body.contains("Property #"));
}

#[test]
fn hover_on_unknown_record_is_404() {
    let (_dir, app) = seeded();
    let snap = open_page(&app);
    let err = get(&app, &format!("/show/hover?id=99&x=1&y=1&snap={snap}")).unwrap_err();
    assert!(matches!(err, ServerError::NotFound));
}

#[test]
fn focus_returns_centre_and_zoom_commands() {
    let (_dir, app) = seeded();
    let snap = open_page(&app);
    let resp = get(&app, &format!("/show/focus?id=2&snap={snap}")).unwrap();
    assert!(header(&resp, "Content-Type").starts_with("application/json"));

    let commands: serde_json::Value = serde_json::from_str(&body_string(resp)).unwrap();
    assert_eq!(commands[0]["op"], "set_center");
    assert_eq!(commands[0]["center"]["lat"], 13.0);
    assert_eq!(commands[1]["op"], "set_zoom");
    assert_eq!(commands[1]["zoom"], 16);

    // no coordinates, nothing to do
    let body = body_string(get(&app, &format!("/show/focus?id=3&snap={snap}")).unwrap());
    assert_eq!(body, "[]");
}

#[test]
fn marker_click_info_window_lists_the_record() {
    let (_dir, app) = seeded();
    let snap = open_page(&app);
    let body = body_string(get(&app, &format!("/show/info?id=1&snap={snap}")).unwrap());

    assert!(body.contains(r#"class="info-window""#));
    assert!(body.contains("Property #1"));
    assert!(body.contains("Broker: Asha Realty"));
    assert!(body.contains("Price: $2,500,000"));
    assert!(body.contains("Acres: 2.5"));
    assert!(body.contains("City: Bangalore"));

    let err = get(&app, &format!("/show/info?snap={snap}")).unwrap_err();
    assert!(matches!(err, ServerError::BadRequest(_)));
}

#[test]
fn closing_the_page_releases_its_snapshot() {
    let (_dir, app) = seeded();
    let snap = open_page(&app);
    assert_eq!(app.snapshots.open_pages(), 1);

    let resp = post_form(&app, &format!("/show/close?snap={snap}"), "").unwrap();
    assert!(header(&resp, "Content-Type").starts_with("application/json"));
    assert_eq!(app.snapshots.open_pages(), 0);

    let again = post_form(&app, &format!("/show/close?snap={snap}"), "");
    assert!(matches!(again, Err(ServerError::NotFound)));
    let search = get(&app, &format!("/show/search?q=&snap={snap}"));
    assert!(matches!(search, Err(ServerError::NotFound)));
}

#[test]
fn map_load_failure_is_a_blocking_message() {
    let (_dir, app) = seeded();
    let body = body_string(get(&app, "/maps/failed").unwrap());

    assert!(body.contains("blocking-screen"));
    assert!(body.contains("Failed to load Google Maps. Please check your API key."));
    assert!(!body.contains("<html"));
}

#[test]
fn static_scripts_are_served() {
    let (_dir, db) = init_test_db();
    let app = test_app(db);
    let resp = get(&app, "/static/listing.js").unwrap();
    assert!(header(&resp, "Content-Type").starts_with("application/javascript"));
    let listing = body_string(resp);
    assert!(listing.contains("fit_bounds"));
    assert!(listing.contains("gm_authFailure"));
    assert!(listing.contains("/show/close"));

    let resp = get(&app, "/static/capture.js").unwrap();
    let capture = body_string(resp);
    assert!(capture.contains("/capture/ready"));
    assert!(capture.contains("Coordinates copied to clipboard!"));
}

#[test]
fn unknown_route_is_404() {
    let (_dir, db) = init_test_db();
    let app = test_app(db);
    assert!(matches!(get(&app, "/nope"), Err(ServerError::NotFound)));
}
