//! Public read-only status page data at `/status-public`.
//!
//! Same contract as `GET /api/status`, but reachable outside the `/api`
//! prefix and with the error shape the status page script expects: a
//! record whose `status` is `api_error`.

use rocket::State;
use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Responder, status};
use rocket::serde::json::Json;
use rocket::Route;
use rocket::http::Method;

use crate::api::status::read_current;
use crate::config::BoardConfig;
use crate::error::ApiError;
use crate::models::StatusRecord;
use crate::responders::{MethodNotAllowed, NoStore};
use crate::store::StoreBinding;

pub const API_ERROR_TOKEN: &str = "api_error";

/// Renders an [`ApiError`] as a status record the page can display.
#[derive(Debug)]
pub struct PublicError(pub ApiError);

impl PublicError {
    fn message(&self) -> String {
        match &self.0 {
            ApiError::MissingBinding => {
                "Internal error: status store binding is missing.".to_string()
            }
            _ => "Internal error: the status could not be read.".to_string(),
        }
    }
}

impl<'r> Responder<'r, 'static> for PublicError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        error!(
            "{} {} failed: {} ({})",
            req.method(),
            req.uri().path(),
            self.0,
            self.0.details().unwrap_or_default()
        );
        let body = StatusRecord {
            status: API_ERROR_TOKEN.to_string(),
            message: self.message(),
        };
        status::Custom(Status::InternalServerError, Json(body)).respond_to(req)
    }
}

/// Public Status endpoint.
///
/// - **URL:** `/status-public`
/// - **Method:** `GET`
/// - **Authentication:** None required
///
/// **Failure (HTTP 500):**
/// ```json
/// { "status": "api_error", "message": "Internal error: the status could not be read." }
/// ```
#[get("/status-public")]
pub async fn public_status(
    binding: StoreBinding,
    config: &State<BoardConfig>,
) -> NoStore<Result<Json<StatusRecord>, PublicError>> {
    NoStore(read_current(binding, config).await.map(Json).map_err(PublicError))
}

#[post("/status-public")]
pub fn post_public_status() -> MethodNotAllowed {
    MethodNotAllowed::get_only()
}

#[put("/status-public")]
pub fn put_public_status() -> MethodNotAllowed {
    MethodNotAllowed::get_only()
}

#[delete("/status-public")]
pub fn delete_public_status() -> MethodNotAllowed {
    MethodNotAllowed::get_only()
}

#[patch("/status-public")]
pub fn patch_public_status() -> MethodNotAllowed {
    MethodNotAllowed::get_only()
}

#[head("/status-public")]
pub fn head_public_status() -> MethodNotAllowed {
    MethodNotAllowed::get_only()
}

#[options("/status-public")]
pub fn options_public_status() -> MethodNotAllowed {
    MethodNotAllowed::get_only()
}

pub fn trace_public_status() -> MethodNotAllowed {
    MethodNotAllowed::get_only()
}

// rocket_codegen 0.5 rejects TRACE in `#[route]`, so this route is built by hand.
fn trace_public_status_handler<'r>(req: &'r rocket::Request<'_>, _data: rocket::Data<'r>) -> rocket::route::BoxFuture<'r> {
    rocket::route::Outcome::from(req, trace_public_status()).pin()
}

pub fn routes() -> Vec<Route> {
    routes![
        public_status,
        post_public_status,
        put_public_status,
        delete_public_status,
        patch_public_status,
        head_public_status,
        options_public_status
    ]
    .into_iter()
    .chain(std::iter::once(Route::new(Method::Trace, "/status-public", trace_public_status_handler)))
    .collect()
}
