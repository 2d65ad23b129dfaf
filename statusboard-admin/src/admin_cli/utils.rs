use rocket::figment::Figment;
use statusboard_api::config::{self, BoardConfig, DEFAULT_DATABASE_URL};
use tracing_subscriber::EnvFilter;

/// Settings shared with the service, so both report the same record for
/// the same database.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub database_url: String,
    pub board: BoardConfig,
}

impl ServiceSettings {
    /// Reads the service's own configuration (`Rocket.toml` in the working
    /// directory, `ROCKET_*`, `STATUS_DATABASE_URL`, `.env`). An explicit
    /// database URL wins over all of it.
    pub fn load(database: Option<String>) -> Self {
        Self::from_figment(&config::figment(), database)
    }

    pub fn from_figment(figment: &Figment, database: Option<String>) -> Self {
        let database_url = database
            .or_else(|| figment.extract_inner::<String>("databases.status_db.url").ok())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        ServiceSettings {
            database_url,
            board: BoardConfig::from_figment(figment),
        }
    }
}

/// Logs go to stderr so command output on stdout stays scriptable.
pub fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Joins a service base URL and an absolute path without doubling slashes.
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    use rocket::figment::util::map;

    fn service_figment() -> Figment {
        Figment::new()
            .merge(("default_message", "Board not published"))
            .merge(("status_key", "board_status"))
            .merge(("databases", map!["status_db" => map!["url" => "service.sqlite"]]))
    }

    #[test]
    fn settings_follow_service_configuration() {
        let settings = ServiceSettings::from_figment(&service_figment(), None);
        assert_eq!(settings.database_url, "service.sqlite");
        assert_eq!(settings.board.status_key, "board_status");
        assert_eq!(settings.board.default_message, "Board not published");
    }

    #[test]
    fn explicit_database_url_wins() {
        let settings = ServiceSettings::from_figment(&service_figment(), Some("x.sqlite".into()));
        assert_eq!(settings.database_url, "x.sqlite");
    }

    #[test]
    fn empty_configuration_uses_service_defaults() {
        let settings = ServiceSettings::from_figment(&Figment::new(), None);
        assert_eq!(settings.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(settings.board, BoardConfig::default());
    }

    #[test]
    fn endpoint_handles_trailing_slashes() {
        assert_eq!(endpoint("http://host:8000/", "/api/status"), "http://host:8000/api/status");
        assert_eq!(endpoint("http://host", "api/status"), "http://host/api/status");
    }
}
