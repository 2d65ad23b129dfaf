//! Status endpoints.
//!
//! Reads are public. Writes are expected to arrive through an access
//! gateway that has already authenticated the caller; nothing here checks
//! credentials.

use std::io::ErrorKind;

use rocket::State;
use rocket::serde::json::{self, Json};
use rocket::Route;
use rocket::http::Method;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::access::AccessAssertion;
use crate::config::BoardConfig;
use crate::error::ApiError;
use crate::logged_json::LoggedJson;
use crate::models::{StatusRecord, StatusUpdate};
use crate::responders::{MethodNotAllowed, NoStore};
use crate::store::StoreBinding;

/// Body of a successful update.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateResponse {
    pub success: bool,
    pub message: String,
}

impl UpdateResponse {
    fn updated() -> Self {
        Self {
            success: true,
            message: "Status updated".to_string(),
        }
    }
}

/// Read Status endpoint.
///
/// - **URL:** `/api/status`
/// - **Method:** `GET`
/// - **Purpose:** Returns the current status record
/// - **Authentication:** None required
///
/// Before the first update this returns the unset record:
///
/// ```json
/// { "status": "unknown", "message": "Status has not been published yet. ..." }
/// ```
///
/// The response is marked `Cache-Control: no-cache, no-store, must-revalidate`.
///
/// # Errors
/// **HTTP 500** with `{ "error": ..., "details": ... }` when the store is
/// unreachable, not bound, or holds a value that is not a status record.
#[get("/status")]
pub async fn read_status(
    binding: StoreBinding,
    config: &State<BoardConfig>,
) -> NoStore<Result<Json<StatusRecord>, ApiError>> {
    NoStore(read_current(binding, config).await.map(Json))
}

pub(crate) async fn read_current(
    binding: StoreBinding,
    config: &BoardConfig,
) -> Result<StatusRecord, ApiError> {
    let repo = binding.repository(config)?;
    let record = repo.get_status().await?;
    debug!("Read status '{}' from key '{}'", record.status, repo.key());
    Ok(record)
}

/// Update Status endpoint.
///
/// - **URL:** `/api/status`
/// - **Method:** `POST`
/// - **Purpose:** Replaces the status record
/// - **Authentication:** Delegated to the upstream access gateway
///
/// # Request Format
///
/// ```json
/// { "status": "ONLINE", "message": "All systems operational" }
/// ```
///
/// `status` must be `ONLINE`, `OFFLINE` or `UNKNOWN` (any case) and is
/// stored as sent. `message` must be non-blank.
///
/// # Response
///
/// **Success (HTTP 200 OK):**
/// ```json
/// { "success": true, "message": "Status updated" }
/// ```
///
/// **HTTP 400** for a body that is not a JSON object, lacks a field, or
/// names an unknown status. **HTTP 413** for a body over the `json` limit.
/// **HTTP 500** when the body cannot be read or the store write fails. In every failure case the stored record is left as it was.
#[post("/status", data = "<body>")]
pub async fn write_status(
    binding: StoreBinding,
    config: &State<BoardConfig>,
    access: AccessAssertion,
    body: Result<LoggedJson<StatusUpdate>, json::Error<'_>>,
) -> Result<Json<UpdateResponse>, ApiError> {
    let update = match body {
        Ok(update) => update.into_inner(),
        Err(json::Error::Parse(_, e)) => return Err(ApiError::MalformedBody(e.to_string())),
        // Rocket reports a body cut off at the `json` limit as an EOF.
        Err(json::Error::Io(e)) if e.kind() == ErrorKind::UnexpectedEof => {
            return Err(ApiError::PayloadTooLarge(e.to_string()));
        }
        Err(json::Error::Io(e)) => return Err(ApiError::BodyRead(e.to_string())),
    };
    let record = update.validate()?;

    let repo = binding.repository(config)?;
    repo.set_status(&record).await?;

    info!(
        "Status set to '{}' by {} (key '{}')",
        record.status,
        access.describe(),
        repo.key()
    );
    Ok(Json(UpdateResponse::updated()))
}

#[put("/status")]
pub fn put_status() -> MethodNotAllowed {
    MethodNotAllowed::get_post()
}

#[delete("/status")]
pub fn delete_status() -> MethodNotAllowed {
    MethodNotAllowed::get_post()
}

#[patch("/status")]
pub fn patch_status() -> MethodNotAllowed {
    MethodNotAllowed::get_post()
}

#[head("/status")]
pub fn head_status() -> MethodNotAllowed {
    MethodNotAllowed::get_post()
}

#[options("/status")]
pub fn options_status() -> MethodNotAllowed {
    MethodNotAllowed::get_post()
}

pub fn trace_status() -> MethodNotAllowed {
    MethodNotAllowed::get_post()
}

// rocket_codegen 0.5 rejects TRACE in `#[route]`, so this route is built by hand.
fn trace_status_handler<'r>(req: &'r rocket::Request<'_>, _data: rocket::Data<'r>) -> rocket::route::BoxFuture<'r> {
    rocket::route::Outcome::from(req, trace_status()).pin()
}

pub fn routes() -> Vec<Route> {
    routes![
        read_status,
        write_status,
        put_status,
        delete_status,
        patch_status,
        head_status,
        options_status
    ]
    .into_iter()
    .chain(std::iter::once(Route::new(Method::Trace, "/status", trace_status_handler)))
    .collect()
}
