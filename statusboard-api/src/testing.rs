//! Helpers for building test rockets and injecting store faults.
//!
//! Integration tests under `tests/` build their rocket here instead of
//! through [`crate::rocket`], which reads `Rocket.toml` and the
//! environment.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use rocket::figment::{
    Figment,
    util::map,
    value::{Map, Value},
};
use rocket::{Build, Rocket};
use uuid::Uuid;

use crate::config::StoreBackend;
use crate::store::{KvStore, MemoryKv, SharedKvStore, StoreError};
use crate::{assemble_rocket, build_rocket};

/// Debug-profile figment with the given backend and the crate's own
/// `static/` directory.
pub fn test_figment(store: StoreBackend) -> Figment {
    Figment::from(rocket::Config::debug_default())
        .merge(("store", store))
        .merge(("static_dir", concat!(env!("CARGO_MANIFEST_DIR"), "/static")))
}

/// A rocket backed by a fresh in-memory store.
pub fn test_rocket() -> Rocket<Build> {
    build_rocket(test_figment(StoreBackend::Memory))
}

/// A rocket whose status requests all go to `store`.
pub fn test_rocket_with_store(store: SharedKvStore) -> Rocket<Build> {
    assemble_rocket(test_figment(StoreBackend::Memory), Some(store))
}

/// A rocket with no store bound at all, as when the deployment forgot to
/// configure one.
pub fn test_rocket_without_store() -> Rocket<Build> {
    assemble_rocket(test_figment(StoreBackend::Sqlite), None)
}

/// URL of a SQLite file in the temp directory that no other test uses.
pub fn temp_database_url() -> String {
    std::env::temp_dir()
        .join(format!("statusboard_test_{}.sqlite", Uuid::new_v4()))
        .display()
        .to_string()
}

/// A rocket backed by the SQLite database at `database_url`, migrated on
/// ignition.
pub fn test_rocket_with_sqlite(database_url: &str) -> Rocket<Build> {
    let db_config: Map<_, Value> = map! {
        "url" => database_url.into(),
        "pool_size" => 2.into(),
        "timeout" => 5.into(),
    };

    let figment = test_figment(StoreBackend::Sqlite)
        .merge(("databases", map!["status_db" => db_config]));

    build_rocket(figment)
}

/// Store wrapper that fails a chosen number of upcoming calls.
///
/// Each armed failure is consumed by one call; after that calls reach the
/// wrapped [`MemoryKv`] again.
#[derive(Debug, Default)]
pub struct FaultyKv {
    inner: MemoryKv,
    failing_reads: AtomicUsize,
    failing_writes: AtomicUsize,
}

impl FaultyKv {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inner(inner: MemoryKv) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }

    pub fn fail_next_reads(&self, count: usize) {
        self.failing_reads.store(count, Ordering::SeqCst);
    }

    pub fn fail_next_writes(&self, count: usize) {
        self.failing_writes.store(count, Ordering::SeqCst);
    }

    /// The wrapped store, bypassing fault injection.
    pub fn inner(&self) -> &MemoryKv {
        &self.inner
    }

    pub fn into_shared(self: Arc<Self>) -> SharedKvStore {
        self
    }

    fn take(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[rocket::async_trait]
impl KvStore for FaultyKv {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        if Self::take(&self.failing_reads) {
            return Err(StoreError::Unavailable("injected read failure".to_string()));
        }
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        if Self::take(&self.failing_writes) {
            return Err(StoreError::Unavailable("injected write failure".to_string()));
        }
        self.inner.put(key, value).await
    }
}
