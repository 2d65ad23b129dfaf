//! Errors surfaced by the status endpoints and their HTTP rendering.

use rocket::http::Status;
use rocket::request::Request;
use rocket::response::{self, Responder, status};
use rocket::serde::json::Json;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::ValidationError;
use crate::store::StoreError;

/// Error body returned by the status API.
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub details: Option<String>,
}

/// Every way a status request can fail. Each one ends the request; none is
/// retried.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid data format")]
    Validation(#[from] ValidationError),
    #[error("Invalid JSON body")]
    MalformedBody(String),
    #[error("Request body too large")]
    PayloadTooLarge(String),
    #[error("Processing error")]
    BodyRead(String),
    #[error("Status store failure")]
    Store(#[from] StoreError),
    #[error("Configuration error: status store binding missing")]
    MissingBinding,
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            Self::Validation(_) | Self::MalformedBody(_) => Status::BadRequest,
            Self::PayloadTooLarge(_) => Status::PayloadTooLarge,
            Self::BodyRead(_) | Self::Store(_) | Self::MissingBinding => {
                Status::InternalServerError
            }
        }
    }

    pub fn details(&self) -> Option<String> {
        match self {
            Self::Validation(e) => Some(e.to_string()),
            Self::MalformedBody(msg) | Self::PayloadTooLarge(msg) | Self::BodyRead(msg) => {
                Some(msg.clone())
            }
            Self::Store(e) => Some(e.to_string()),
            Self::MissingBinding => None,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
            details: self.details(),
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let code = self.status();
        if code == Status::InternalServerError {
            error!(
                "{} {} failed: {} ({})",
                req.method(),
                req.uri().path(),
                self,
                self.details().unwrap_or_default()
            );
        } else {
            info!("{} {} rejected: {}", req.method(), req.uri().path(), self);
        }

        status::Custom(code, Json(self.to_response())).respond_to(req)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_are_client_errors() {
        let err = ApiError::from(ValidationError::MissingFields(vec!["message"]));
        assert_eq!(err.status(), Status::BadRequest);

        let body = err.to_response();
        assert_eq!(body.error, "Invalid data format");
        assert_eq!(body.details.as_deref(), Some("missing required field(s): message"));
    }

    #[test]
    fn oversized_body_is_a_client_error() {
        let err = ApiError::PayloadTooLarge("data limit exceeded".to_string());
        assert_eq!(err.status(), Status::PayloadTooLarge);
        assert_eq!(err.to_response().error, "Request body too large");
    }

    #[test]
    fn store_and_binding_errors_are_server_errors() {
        let err = ApiError::from(StoreError::Unavailable("down".to_string()));
        assert_eq!(err.status(), Status::InternalServerError);
        assert_eq!(err.to_response().details.as_deref(), Some("store unavailable: down"));

        let err = ApiError::MissingBinding;
        assert_eq!(err.status(), Status::InternalServerError);
        assert!(err.to_response().error.contains("binding missing"));
    }
}
