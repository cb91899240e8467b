use crate::config::AppConfig;
use crate::db::{init_db, Database};
use crate::domain::Viewport;
use crate::geocoding::{Geocoder, GoogleGeocoder};
use crate::responses::error_response;
use crate::router::{handle, App};
use crate::workflows::ListingSnapshots;
use astra::Server;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod config;
mod db;
mod domain;
mod errors;
mod forms;
mod geocoding;
mod map;
mod responses;
mod router;
mod templates;
mod workflows;

#[cfg(test)]
mod tests;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // 1️⃣ Configuration from the environment
    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("❌ Configuration error: {e}");
            std::process::exit(1);
        }
    };

    // 2️⃣ Database handle + schema
    let db = Database::new(config.database_path.clone());
    if let Err(e) = init_db(&db, &config.schema_path) {
        error!("❌ Database initialization failed: {e}");
        std::process::exit(1);
    }

    // 3️⃣ Geocoding collaborator, only with a credential
    let geocoder: Option<Box<dyn Geocoder + Send + Sync>> = match config.require_api_key() {
        Ok(key) => match GoogleGeocoder::new(key, config.geocode_timeout) {
            Ok(g) => Some(Box::new(g)),
            Err(e) => {
                error!("❌ Geocoder setup failed: {e}");
                None
            }
        },
        Err(e) => {
            warn!("⚠️ {e}; map screens will show a configuration error");
            None
        }
    };

    let app = App {
        db,
        geocoder,
        maps_api_key: config.maps_api_key.clone(),
        viewport: Viewport::default(),
        snapshots: ListingSnapshots::default(),
    };

    // 4️⃣ Serve
    info!("Starting server at http://{}", config.bind_addr);
    let server = Server::bind(&config.bind_addr).max_workers(config.max_workers);

    let result = server.serve(move |req, _info| match handle(req, &app) {
        Ok(resp) => resp,
        Err(err) => error_response(err),
    });

    if let Err(e) = result {
        error!("Server ended with error: {e}");
    }

    info!("Server shut down cleanly.");
}
