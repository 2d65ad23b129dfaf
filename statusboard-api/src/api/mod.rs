pub mod health;
pub mod public;
pub mod status;

use rocket::Route;

/// Routes mounted under `/api`.
pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(health::routes());
    routes.extend(status::routes());
    routes
}

/// Routes mounted at the root, ahead of the static file server.
pub fn public_routes() -> Vec<Route> {
    public::routes()
}
