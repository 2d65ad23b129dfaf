//! JSON data guard that logs what it parsed.
//!
//! Status updates are rare and operator-driven, so every accepted body is
//! worth a log line. Use `LoggedJson<T>` wherever `Json<T>` would be used;
//! wrap it in `Result<_, json::Error>` to handle parse failures in the
//! handler.

use rocket::data::{self, FromData};
use rocket::serde::json::Json;
use rocket::{Data, Request};
use serde::{Deserialize, Serialize};

/// Longest body excerpt written to the log.
const MAX_LOGGED_BODY: usize = 512;

pub struct LoggedJson<T>(pub T);

impl<T> LoggedJson<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for LoggedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for LoggedJson<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Cuts `body` to at most [`MAX_LOGGED_BODY`] bytes on a char boundary.
fn excerpt(body: &str) -> String {
    if body.len() <= MAX_LOGGED_BODY {
        return body.to_string();
    }
    let mut end = MAX_LOGGED_BODY;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... ({} bytes)", &body[..end], body.len())
}

#[rocket::async_trait]
impl<'r, T: Deserialize<'r> + Serialize> FromData<'r> for LoggedJson<T> {
    type Error = rocket::serde::json::Error<'r>;

    async fn from_data(req: &'r Request<'_>, data: Data<'r>) -> data::Outcome<'r, Self> {
        match Json::<T>::from_data(req, data).await {
            data::Outcome::Success(json) => {
                let body = serde_json::to_string(&json.0)
                    .map(|s| excerpt(&s))
                    .unwrap_or_else(|_| "<failed to serialize>".to_string());
                info!(
                    "API Request Body: {} {} | Data: {}",
                    req.method().as_str(),
                    req.uri().path(),
                    body
                );
                data::Outcome::Success(LoggedJson(json.into_inner()))
            }
            data::Outcome::Error(e) => data::Outcome::Error(e),
            data::Outcome::Forward(f) => data::Outcome::Forward(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_bodies_are_logged_whole() {
        assert_eq!(excerpt(r#"{"status":"ONLINE"}"#), r#"{"status":"ONLINE"}"#);
    }

    #[test]
    fn long_bodies_are_cut_on_a_char_boundary() {
        let body = "é".repeat(400);
        let cut = excerpt(&body);
        assert!(cut.ends_with("... (800 bytes)"));
        assert!(cut.len() < body.len());
    }
}
