//! Key-value storage behind the status board.
//!
//! The service only ever needs two operations on its store, reading and
//! replacing one string value, so the backend is abstracted as
//! [`KvStore`]. The production backend is a SQLite table reached through
//! Rocket's connection pool; [`MemoryKv`] serves development setups and
//! tests.

mod binding;
mod memory;
mod sqlite;

pub use binding::StoreBinding;
pub use memory::MemoryKv;

use std::sync::Arc;

/// A shared, type-erased store handle as managed by Rocket.
pub type SharedKvStore = Arc<dyn KvStore>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("stored status is not a valid record: {0}")]
    Corrupt(#[source] serde_json::Error),
    #[error("could not encode status record: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Minimal key-value contract: fetch one value, replace one value.
///
/// Implementations must treat `put` as a wholesale overwrite. Any failure
/// is reported as a [`StoreError`]; callers never retry.
#[rocket::async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn put(&self, key: &str, value: String) -> Result<(), StoreError>;
}
