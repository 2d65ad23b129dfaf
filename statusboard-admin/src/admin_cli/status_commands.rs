use chrono::NaiveDateTime;
use clap::Subcommand;
use diesel::sqlite::SqliteConnection;
use statusboard_api::config::BoardConfig;
use statusboard_api::models::{StatusRecord, StatusUpdate};
use statusboard_api::orm::kv;

#[derive(Subcommand)]
pub enum StatusAction {
    #[command(about = "Show the stored status record")]
    Show {
        #[arg(short, long, help = "Key the record is stored under (defaults to the service's status_key)")]
        key: Option<String>,
        #[arg(long, help = "Print the record as JSON")]
        json: bool,
    },
    #[command(about = "Replace the stored status record")]
    Set {
        #[arg(short, long, help = "New status: ONLINE, OFFLINE or UNKNOWN (any case)")]
        status: String,
        #[arg(short, long, help = "Message shown next to the status")]
        message: String,
        #[arg(short, long, help = "Key the record is stored under (defaults to the service's status_key)")]
        key: Option<String>,
    },
}

/// What the database holds for a status key.
#[derive(Debug)]
pub struct StoredStatus {
    pub record: StatusRecord,
    /// `None` when nothing has been written yet and the default is shown.
    pub updated_at: Option<NaiveDateTime>,
}

/// `board` supplies the key and default message the service is configured
/// with, so `show` reports what the service would serve.
pub fn handle_status_command_with_conn(
    conn: &mut SqliteConnection,
    action: StatusAction,
    board: &BoardConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        StatusAction::Show { key, json } => {
            let key = key.as_deref().unwrap_or(board.status_key.as_str());
            status_show_impl(conn, key, &board.default_message, json)?;
        }
        StatusAction::Set {
            status,
            message,
            key,
        } => {
            let key = key.as_deref().unwrap_or(board.status_key.as_str());
            status_set_impl(conn, key, status, message)?;
        }
    }
    Ok(())
}

/// Reads the record stored under `key`, or the unset record carrying
/// `default_message`.
pub fn read_stored_status(
    conn: &mut SqliteConnection,
    key: &str,
    default_message: &str,
) -> Result<StoredStatus, Box<dyn std::error::Error>> {
    match kv::get_entry(conn, key)? {
        Some(entry) if !entry.value.is_empty() => {
            let record = StatusRecord::from_stored(&entry.value)
                .map_err(|e| format!("Value stored under '{}' is not a status record: {}", key, e))?;
            Ok(StoredStatus {
                record,
                updated_at: Some(entry.updated_at),
            })
        }
        _ => Ok(StoredStatus {
            record: StatusRecord::unset(default_message),
            updated_at: None,
        }),
    }
}

/// Validates and stores a new record under `key`. Nothing is written when
/// validation fails.
pub fn write_status(
    conn: &mut SqliteConnection,
    key: &str,
    status: String,
    message: String,
) -> Result<StatusRecord, Box<dyn std::error::Error>> {
    let record = StatusUpdate {
        status: Some(status),
        message: Some(message),
    }
    .validate()?;

    kv::put_value(conn, key, &record.to_stored()?)?;
    Ok(record)
}

pub fn status_show_impl(
    conn: &mut SqliteConnection,
    key: &str,
    default_message: &str,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let stored = read_stored_status(conn, key, default_message)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stored.record)?);
        return Ok(());
    }

    println!("Status:  {}", stored.record.status);
    println!("Message: {}", stored.record.message);
    match stored.updated_at {
        Some(at) => println!("Updated: {} UTC", at.format("%Y-%m-%d %H:%M:%S")),
        None => println!("Updated: never (default record)"),
    }
    Ok(())
}

pub fn status_set_impl(
    conn: &mut SqliteConnection,
    key: &str,
    status: String,
    message: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let record = write_status(conn, key, status, message)?;

    tracing::info!(status = %record.status, key, "status written");
    println!("Status set to {}: {}", record.status, record.message);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use statusboard_api::config::{DEFAULT_MESSAGE, DEFAULT_STATUS_KEY};
    use statusboard_api::orm::establish_connection;

    fn temp_connection() -> SqliteConnection {
        let path = std::env::temp_dir()
            .join(format!("statusboard_admin_{}.sqlite", uuid::Uuid::new_v4()));
        establish_connection(&path.display().to_string()).expect("database connection")
    }

    #[test]
    fn unset_database_shows_default() {
        let mut conn = temp_connection();
        let stored = read_stored_status(&mut conn, DEFAULT_STATUS_KEY, DEFAULT_MESSAGE).unwrap();
        assert_eq!(stored.record.status, "unknown");
        assert_eq!(stored.record.message, DEFAULT_MESSAGE);
        assert!(stored.updated_at.is_none());
    }

    #[test]
    fn written_status_is_read_back() {
        let mut conn = temp_connection();
        write_status(&mut conn, DEFAULT_STATUS_KEY, "Online".into(), "up".into()).unwrap();

        let stored = read_stored_status(&mut conn, DEFAULT_STATUS_KEY, DEFAULT_MESSAGE).unwrap();
        assert_eq!(stored.record.status, "Online");
        assert_eq!(stored.record.message, "up");
        assert!(stored.updated_at.is_some());
    }

    #[test]
    fn invalid_status_is_not_written() {
        let mut conn = temp_connection();
        assert!(write_status(&mut conn, DEFAULT_STATUS_KEY, "BROKEN".into(), "x".into()).is_err());
        assert!(write_status(&mut conn, DEFAULT_STATUS_KEY, "ONLINE".into(), " ".into()).is_err());
        assert!(kv::get_value(&mut conn, DEFAULT_STATUS_KEY).unwrap().is_none());
    }

    #[test]
    fn corrupt_value_is_reported() {
        let mut conn = temp_connection();
        kv::put_value(&mut conn, DEFAULT_STATUS_KEY, "not json").unwrap();
        let err = read_stored_status(&mut conn, DEFAULT_STATUS_KEY, DEFAULT_MESSAGE).unwrap_err();
        assert!(err.to_string().contains("not a status record"));
    }

    #[test]
    fn configured_board_settings_are_used() {
        let mut conn = temp_connection();
        let board = BoardConfig {
            status_key: "board_status".to_string(),
            default_message: "Board not published".to_string(),
            ..BoardConfig::default()
        };

        let stored = read_stored_status(&mut conn, &board.status_key, &board.default_message).unwrap();
        assert_eq!(stored.record.message, "Board not published");

        let set = StatusAction::Set {
            status: "OFFLINE".into(),
            message: "down for maintenance".into(),
            key: None,
        };
        handle_status_command_with_conn(&mut conn, set, &board).unwrap();

        assert!(kv::get_value(&mut conn, DEFAULT_STATUS_KEY).unwrap().is_none());
        let stored = read_stored_status(&mut conn, "board_status", &board.default_message).unwrap();
        assert_eq!(stored.record.status, "OFFLINE");
    }
}
