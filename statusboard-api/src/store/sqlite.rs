use super::{KvStore, StoreError};
use crate::orm::{StatusDb, kv};

#[rocket::async_trait]
impl KvStore for StatusDb {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let key = key.to_string();
        self.run(move |conn| kv::get_value(conn, &key))
            .await
            .map_err(StoreError::from)
    }

    async fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        let key = key.to_string();
        self.run(move |conn| kv::put_value(conn, &key, &value))
            .await
            .map_err(StoreError::from)
    }
}
