use rocket::http::{Header, Status};
use rocket::request::Request;
use rocket::response::{self, Responder, Response};

pub const NO_STORE: &str = "no-cache, no-store, must-revalidate";

/// Wraps a responder so neither browsers nor intermediaries cache it.
///
/// The status is live data; a cached read would show a stale state after
/// an admin update.
#[derive(Debug)]
pub struct NoStore<R>(pub R);

impl<'r, 'o: 'r, R: Responder<'r, 'o>> Responder<'r, 'o> for NoStore<R> {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'o> {
        let mut response = self.0.respond_to(req)?;
        response.set_header(Header::new("Cache-Control", NO_STORE));
        Ok(response)
    }
}

/// 405 answer for methods a path does not support.
#[derive(Debug, Clone, Copy)]
pub struct MethodNotAllowed {
    allow: &'static str,
    body: &'static str,
}

impl MethodNotAllowed {
    pub fn get_post() -> Self {
        Self {
            allow: "GET, POST",
            body: "Method Not Allowed",
        }
    }

    pub fn get_only() -> Self {
        Self {
            allow: "GET",
            body: "Method Not Allowed. Only GET is permitted.",
        }
    }
}

impl<'r> Responder<'r, 'static> for MethodNotAllowed {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        info!("{} {} rejected: method not allowed", req.method(), req.uri().path());
        Response::build_from(self.body.respond_to(req)?)
            .status(Status::MethodNotAllowed)
            .raw_header("Allow", self.allow)
            .ok()
    }
}
