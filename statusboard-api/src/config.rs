//! Service configuration.
//!
//! Settings come from Rocket's figment: `Rocket.toml` (profile-nested),
//! then `ROCKET_*` environment variables, then the few dedicated variables
//! below. Every board setting has a default, so an empty configuration
//! still yields a working service backed by `status.sqlite`.

use rocket::figment::providers::{Env, Format, Toml};
use rocket::figment::Figment;
use serde::{Deserialize, Serialize};

/// Overrides `databases.status_db.url`.
pub const DATABASE_URL_ENV: &str = "STATUS_DATABASE_URL";
/// Overrides `static_dir`.
pub const STATIC_DIR_ENV: &str = "STATUSBOARD_STATIC_DIR";

pub const DEFAULT_DATABASE_URL: &str = "status.sqlite";
pub const DEFAULT_STATUS_KEY: &str = "current_server_status";
pub const DEFAULT_MESSAGE: &str =
    "Status has not been published yet. An administrator needs to post the first update.";
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_ACCESS_HEADER: &str = "Cf-Access-Authenticated-User-Email";

/// Which key-value backend holds the status record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// `kv_entries` table in the `status_db` SQLite database.
    #[default]
    Sqlite,
    /// Process memory; nothing survives a restart.
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BoardConfig {
    /// Key the status record is stored under.
    #[serde(default = "default_status_key")]
    pub status_key: String,
    /// Message of the record reported before anything has been stored.
    #[serde(default = "default_message")]
    pub default_message: String,
    #[serde(default)]
    pub store: StoreBackend,
    /// Directory served for every path the API does not handle.
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// Header in which the upstream access gateway asserts the caller's
    /// identity. Only ever logged.
    #[serde(default = "default_access_header")]
    pub access_header: String,
}

fn default_status_key() -> String {
    DEFAULT_STATUS_KEY.to_string()
}

fn default_message() -> String {
    DEFAULT_MESSAGE.to_string()
}

fn default_static_dir() -> String {
    DEFAULT_STATIC_DIR.to_string()
}

fn default_access_header() -> String {
    DEFAULT_ACCESS_HEADER.to_string()
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            status_key: default_status_key(),
            default_message: default_message(),
            store: StoreBackend::default(),
            static_dir: default_static_dir(),
            access_header: default_access_header(),
        }
    }
}

impl BoardConfig {
    /// Reads the board settings out of a figment, falling back to defaults
    /// when the figment holds invalid values. Invalid values still abort
    /// launch later through the config fairing.
    pub fn from_figment(figment: &Figment) -> Self {
        figment.extract().unwrap_or_else(|e| {
            warn!("Invalid status board configuration, using defaults: {}", e);
            Self::default()
        })
    }
}

/// Builds the figment the service launches with.
pub fn figment() -> Figment {
    dotenvy::dotenv().ok();

    let mut figment = Figment::from(rocket::Config::default())
        .merge(Toml::file("Rocket.toml").nested())
        .merge(Env::prefixed("ROCKET_").global());

    if let Ok(database_url) = std::env::var(DATABASE_URL_ENV) {
        figment = figment.merge(("databases.status_db.url", database_url));
    }
    if let Ok(static_dir) = std::env::var(STATIC_DIR_ENV) {
        figment = figment.merge(("static_dir", static_dir));
    }

    figment.join(("databases.status_db.url", DEFAULT_DATABASE_URL))
}
