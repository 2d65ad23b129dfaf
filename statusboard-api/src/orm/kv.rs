use chrono::Utc;
use diesel::prelude::*;

use crate::models::{KvEntry, NewKvEntry};

/// Gets the raw value stored under `entry_key`, if any.
pub fn get_value(
    conn: &mut SqliteConnection,
    entry_key: &str,
) -> Result<Option<String>, diesel::result::Error> {
    use crate::schema::kv_entries::dsl::*;
    kv_entries
        .filter(key.eq(entry_key))
        .select(value)
        .first::<String>(conn)
        .optional()
}

/// Gets the full entry, including when it was last written.
pub fn get_entry(
    conn: &mut SqliteConnection,
    entry_key: &str,
) -> Result<Option<KvEntry>, diesel::result::Error> {
    use crate::schema::kv_entries::dsl::*;
    kv_entries
        .filter(key.eq(entry_key))
        .select(KvEntry::as_select())
        .first(conn)
        .optional()
}

/// Stores `entry_value` under `entry_key`, replacing whatever was there.
///
/// A single `REPLACE` statement, so concurrent writers race and the last
/// one to reach the database wins.
pub fn put_value(
    conn: &mut SqliteConnection,
    entry_key: &str,
    entry_value: &str,
) -> Result<(), diesel::result::Error> {
    use crate::schema::kv_entries::dsl::*;

    let entry = NewKvEntry {
        key: entry_key,
        value: entry_value,
        updated_at: Utc::now().naive_utc(),
    };

    diesel::replace_into(kv_entries).values(&entry).execute(conn)?;
    Ok(())
}
