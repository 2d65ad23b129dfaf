use std::error::Error;

use diesel::Connection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use rocket::fairing::AdHoc;
use rocket_sync_db_pools::database;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Pooled connection to the SQLite database backing the status store.
#[database("status_db")]
pub struct StatusDb(diesel::SqliteConnection);

/// Runs all pending database migrations on the provided connection.
///
/// # Arguments
/// * `conn` - A mutable reference to a SQLite database connection
pub fn run_pending_migrations(
    conn: &mut diesel::SqliteConnection,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    conn.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

/// Opens a standalone connection outside of Rocket and brings its schema
/// up to date. Used by the admin CLI.
pub fn establish_connection(
    database_url: &str,
) -> Result<diesel::SqliteConnection, Box<dyn Error + Send + Sync>> {
    let mut conn = diesel::SqliteConnection::establish(database_url)?;
    run_pending_migrations(&mut conn)?;
    Ok(conn)
}

/// Creates a Rocket fairing that runs database migrations on ignition.
///
/// Ignition is aborted if no connection can be obtained or a migration
/// fails, so the service never starts against a half-built schema.
pub fn run_migrations_fairing() -> AdHoc {
    AdHoc::try_on_ignite("Diesel Migrations", |rocket| async {
        let conn = match StatusDb::get_one(&rocket).await {
            Some(conn) => conn,
            None => {
                error!("[migrations] ERROR: Could not get DB connection.");
                return Err(rocket);
            }
        };

        match conn.run(|c| run_pending_migrations(c)).await {
            Ok(()) => Ok(rocket),
            Err(e) => {
                error!("[migrations] ERROR: Failed to run pending migrations: {}", e);
                Err(rocket)
            }
        }
    })
}
