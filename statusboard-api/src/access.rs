//! Identity asserted by the access gateway in front of the service.
//!
//! Authentication happens before requests reach this service. The gateway
//! forwards the authenticated identity in a header; that header cannot be
//! verified here, so it is recorded for the logs and never used to allow
//! or deny a request.

use rocket::outcome::Outcome;
use rocket::request::{self, FromRequest, Request};

use crate::config::{BoardConfig, DEFAULT_ACCESS_HEADER};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessAssertion(Option<String>);

impl AccessAssertion {
    pub fn identity(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Short description for log lines.
    pub fn describe(&self) -> &str {
        self.identity().unwrap_or("<no gateway assertion>")
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AccessAssertion {
    type Error = std::convert::Infallible;

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let header = request
            .rocket()
            .state::<BoardConfig>()
            .map(|config| config.access_header.as_str())
            .unwrap_or(DEFAULT_ACCESS_HEADER);

        let identity = request
            .headers()
            .get_one(header)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        Outcome::Success(AccessAssertion(identity))
    }
}
