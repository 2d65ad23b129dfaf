//! Read and replace the one status record.

use crate::config::BoardConfig;
use crate::models::StatusRecord;
use crate::store::{SharedKvStore, StoreError};

/// The status record as seen through an injected key-value store.
///
/// Holds no state of its own beyond the store handle and the key, so a
/// fresh repository per request is cheap and requests never coordinate.
#[derive(Clone)]
pub struct StatusRepository {
    store: SharedKvStore,
    key: String,
    default_message: String,
}

impl StatusRepository {
    pub fn new(
        store: SharedKvStore,
        key: impl Into<String>,
        default_message: impl Into<String>,
    ) -> Self {
        Self {
            store,
            key: key.into(),
            default_message: default_message.into(),
        }
    }

    pub fn from_config(store: SharedKvStore, config: &BoardConfig) -> Self {
        Self::new(store, &config.status_key, &config.default_message)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current record, or the unset record when nothing has been stored.
    ///
    /// An empty stored value counts as nothing stored.
    pub async fn get_status(&self) -> Result<StatusRecord, StoreError> {
        match self.store.get(&self.key).await? {
            Some(raw) if !raw.is_empty() => {
                StatusRecord::from_stored(&raw).map_err(StoreError::Corrupt)
            }
            _ => Ok(StatusRecord::unset(self.default_message.as_str())),
        }
    }

    /// Replaces the stored record. The record is encoded before the store is
    /// touched, so an encoding failure leaves the old value in place.
    pub async fn set_status(&self, record: &StatusRecord) -> Result<(), StoreError> {
        let raw = record.to_stored().map_err(StoreError::Serialize)?;
        self.store.put(&self.key, raw).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::models::ServerStatus;
    use crate::store::{KvStore, MemoryKv};

    struct BrokenKv;

    #[rocket::async_trait]
    impl KvStore for BrokenKv {
        async fn get(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(StoreError::Unavailable("read refused".to_string()))
        }

        async fn put(&self, _key: &str, _value: String) -> Result<(), StoreError> {
            Err(StoreError::Unavailable("write refused".to_string()))
        }
    }

    fn repository(store: SharedKvStore) -> StatusRepository {
        StatusRepository::new(store, "status", "nothing yet")
    }

    #[rocket::async_test]
    async fn empty_store_reads_as_unset() {
        let repo = repository(Arc::new(MemoryKv::new()));
        let record = repo.get_status().await.unwrap();
        assert_eq!(record, StatusRecord::unset("nothing yet"));
    }

    #[rocket::async_test]
    async fn empty_stored_value_reads_as_unset() {
        let repo = repository(Arc::new(MemoryKv::with_entry("status", "")));
        assert_eq!(repo.get_status().await.unwrap().status, "unknown");
    }

    #[rocket::async_test]
    async fn set_then_get_round_trips() {
        let repo = repository(Arc::new(MemoryKv::new()));
        let record = StatusRecord::new(ServerStatus::Online, "all good");

        repo.set_status(&record).await.unwrap();
        assert_eq!(repo.get_status().await.unwrap(), record);
    }

    #[rocket::async_test]
    async fn writes_go_to_the_configured_key() {
        let kv = Arc::new(MemoryKv::new());
        let repo = repository(kv.clone());
        repo.set_status(&StatusRecord::new(ServerStatus::Offline, "down"))
            .await
            .unwrap();

        let raw = kv.get("status").await.unwrap().expect("stored under key");
        assert_eq!(raw, r#"{"status":"OFFLINE","message":"down"}"#);
        assert_eq!(kv.get("other").await.unwrap(), None);
    }

    #[rocket::async_test]
    async fn unparsable_stored_value_is_corrupt() {
        let repo = repository(Arc::new(MemoryKv::with_entry("status", "{not json")));
        assert!(matches!(repo.get_status().await, Err(StoreError::Corrupt(_))));
    }

    #[rocket::async_test]
    async fn store_failures_propagate() {
        let repo = repository(Arc::new(BrokenKv));
        assert!(matches!(repo.get_status().await, Err(StoreError::Unavailable(_))));
        let record = StatusRecord::new(ServerStatus::Online, "x");
        assert!(matches!(repo.set_status(&record).await, Err(StoreError::Unavailable(_))));
    }
}
