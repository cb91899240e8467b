// src/tests/utils.rs
use crate::db::{init_db, Database, PropertyStore};
use crate::domain::{LatLng, NewProperty, Viewport};
use crate::errors::ServerError;
use crate::geocoding::{GeocodeError, Geocoder, ReverseMatch};
use crate::router::{handle, App};
use crate::workflows::ListingSnapshots;
use astra::{Body, Request, Response};
use http::Method;
use std::io::Read;
use tempfile::{tempdir, TempDir};

pub const TEST_KEY: &str = "test-key";

/// Database file inside `dir`; nothing is created until the first connection.
pub fn db_in(dir: &TempDir) -> Database {
    Database::new(dir.path().join("properties.sqlite").to_string_lossy().into_owned())
}

/// Fresh test DB using the production schema. The file goes away with the `TempDir`.
pub fn init_test_db() -> (TempDir, Database) {
    let dir = tempdir().expect("Failed to create temp dir");
    let db = db_in(&dir);
    init_db(&db, "sql/schema.sql")
        .unwrap_or_else(|e| panic!("Database initialization failed: {e}"));
    (dir, db)
}

/// Knows one place: anything north of the equator reverse-geocodes to MG Road,
/// and only "MG Road, Bengaluru, Karnataka" forward-geocodes.
pub struct FakeGeocoder;

impl Geocoder for FakeGeocoder {
    fn reverse(&self, point: LatLng) -> Result<Option<ReverseMatch>, GeocodeError> {
        if point.lat() <= 0.0 {
            return Ok(None);
        }
        Ok(Some(ReverseMatch {
            formatted_address: "MG Road, Bengaluru, Karnataka, India".into(),
            place_id: "fake-place".into(),
            state: Some("Karnataka".into()),
            city: Some("Bengaluru".into()),
            street: Some("MG Road".into()),
        }))
    }

    fn forward(&self, address: &str) -> Result<Option<LatLng>, GeocodeError> {
        if address == "MG Road, Bengaluru, Karnataka" {
            Ok(Some(LatLng::new(12.9756, 77.6066).unwrap()))
        } else {
            Ok(None)
        }
    }
}

pub fn test_app(db: Database) -> App {
    App {
        db,
        geocoder: Some(Box::new(FakeGeocoder)),
        maps_api_key: Some(TEST_KEY.to_string()),
        viewport: Viewport::default(),
        snapshots: ListingSnapshots::default(),
    }
}

pub fn unconfigured_app(db: Database) -> App {
    App {
        db,
        geocoder: None,
        maps_api_key: None,
        viewport: Viewport::default(),
        snapshots: ListingSnapshots::default(),
    }
}

pub fn get(app: &App, uri: &str) -> Result<Response, ServerError> {
    let mut req = Request::new(Body::empty());
    *req.method_mut() = Method::GET;
    *req.uri_mut() = uri.parse().unwrap();
    handle(req, app)
}

/// Form post as htmx sends it.
pub fn post_form(app: &App, uri: &str, form: &str) -> Result<Response, ServerError> {
    let mut req = Request::new(Body::from(form.to_string()));
    *req.method_mut() = Method::POST;
    *req.uri_mut() = uri.parse().unwrap();
    req.headers_mut()
        .insert("Content-Type", "application/x-www-form-urlencoded".parse().unwrap());
    req.headers_mut().insert("HX-Request", "true".parse().unwrap());
    handle(req, app)
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn header(resp: &Response, name: &str) -> String {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string()
}

pub fn seed(db: &Database, broker: &str, city: &str, price: f64, lat: f64, lng: f64) -> i64 {
    db.create_record(&NewProperty {
        broker: Some(broker.into()),
        price: Some(price),
        acres: Some(2.5),
        position: LatLng::new(lat, lng).unwrap(),
        city: Some(city.into()),
    })
    .unwrap()
}

pub fn count_rows(db: &Database) -> i64 {
    db.with_conn(|conn| {
        conn.query_row("SELECT COUNT(*) FROM properties", [], |r| r.get(0))
            .map_err(ServerError::from)
    })
    .unwrap()
}

/// Token of the records a listing page loaded, read from `data-snapshot`.
pub fn snapshot_token(page: &str) -> u64 {
    let start = page.find(r#"data-snapshot=""#).expect("page has no snapshot") + 15;
    let end = page[start..].find('"').unwrap() + start;
    page[start..end].parse().unwrap()
}
