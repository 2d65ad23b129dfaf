#[macro_use]
extern crate rocket;

use std::sync::Arc;

use rocket::fairing::AdHoc;
use rocket::figment::Figment;
use rocket::fs::{FileServer, Options};
use rocket::http::Status;
use rocket::request::Request;
use rocket::serde::json::{Json, Value, json};
use rocket::{Build, Rocket};

pub mod access;
pub mod api;
pub mod config;
pub mod error;
pub mod logged_json;
pub mod models;
pub mod orm;
pub mod repository;
pub mod responders;
pub mod schema;
pub mod store;
pub mod testing;

#[cfg(test)]
pub mod generate_types;

use config::{BoardConfig, StoreBackend};
use orm::StatusDb;
use store::{MemoryKv, SharedKvStore};

/// JSON body for every error status a route did not answer itself:
/// unmatched paths, guard failures and panics.
#[catch(default)]
fn json_catcher(status: Status, req: &Request) -> Json<Value> {
    Json(json!({
        "error": status.reason().unwrap_or("Unknown Error"),
        "path": req.uri().path().to_string(),
        "status": status.code
    }))
}

pub fn mount_api_routes(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket
        .mount("/api", api::routes())
        .mount("/", api::public_routes())
}

fn log_rocket_info(rocket: &Rocket<Build>, board: &BoardConfig) {
    let figment = rocket.figment();

    if let Ok(address) = figment.extract_inner::<String>("address") {
        info!("Rocket is running at: {}", address);
    }

    if let Ok(port) = figment.extract_inner::<u16>("port") {
        info!("Rocket is listening on port: {}", port);
    }

    info!("Status store: {:?} (key '{}')", board.store, board.status_key);
    if board.store == StoreBackend::Sqlite {
        match figment.extract_inner::<String>("databases.status_db.url") {
            Ok(url) => info!("Database URL: {}", url),
            Err(e) => warn!("Failed to extract database configuration: {}", e),
        }
    }
    info!("Static files: {}", board.static_dir);
}

/// Assembles the service around an explicit store binding.
///
/// `store` is managed as the binding every status request uses. With
/// `None` no store is managed here; requests then fall back to the SQLite
/// pool if one is attached, and otherwise answer with a missing-binding
/// error.
pub fn assemble_rocket(figment: Figment, store: Option<SharedKvStore>) -> Rocket<Build> {
    let board = BoardConfig::from_figment(&figment);

    let mut rocket = rocket::custom(figment)
        .attach(AdHoc::config::<BoardConfig>())
        .register("/", catchers![json_catcher]);

    if let Some(store) = store {
        rocket = rocket.manage(store);
    }

    log_rocket_info(&rocket, &board);

    let static_files = FileServer::new(&board.static_dir, Options::Index | Options::Missing);
    mount_api_routes(rocket).mount("/", static_files.rank(10))
}

/// Builds the service with the store backend named in the configuration.
pub fn build_rocket(figment: Figment) -> Rocket<Build> {
    match BoardConfig::from_figment(&figment).store {
        StoreBackend::Sqlite => assemble_rocket(figment, None)
            .attach(StatusDb::fairing())
            .attach(orm::run_migrations_fairing()),
        StoreBackend::Memory => {
            let store: SharedKvStore = Arc::new(MemoryKv::new());
            assemble_rocket(figment, Some(store))
        }
    }
}

/// The production rocket, configured from `Rocket.toml` and the
/// environment. Tests build theirs through [`testing`].
pub fn rocket() -> Rocket<Build> {
    build_rocket(config::figment())
}
