//! Health check endpoint for monitoring the service itself, independent
//! of the status it publishes.

use rocket::Route;
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub built: String,
    pub git_commit: Option<String>,
}

/// Health Status endpoint.
///
/// - **URL:** `/api/health`
/// - **Method:** `GET`
/// - **Authentication:** None required
///
/// Always reports `running` while the process serves requests; it does not
/// touch the status store.
///
/// ```json
/// {
///   "status": "running",
///   "version": "0.1.0",
///   "built": "Wed, 20 Aug 2025 18:13:43 +0000",
///   "git_commit": null
/// }
/// ```
#[get("/health")]
pub fn health_status() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        built: built_info::BUILT_TIME_UTC.to_string(),
        git_commit: built_info::GIT_COMMIT_HASH.map(str::to_string),
    })
}

pub fn routes() -> Vec<Route> {
    routes![health_status]
}
