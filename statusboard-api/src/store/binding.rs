use std::sync::Arc;

use rocket::http::Status;
use rocket::outcome::Outcome;
use rocket::request::{self, FromRequest, Request};

use super::SharedKvStore;
use crate::config::{BoardConfig, StoreBackend};
use crate::error::ApiError;
use crate::orm::StatusDb;
use crate::repository::StatusRepository;
use crate::store::StoreError;

/// Request guard resolving the key-value store for the current request.
///
/// An explicitly managed [`SharedKvStore`] always wins. Otherwise, when the
/// configured backend is SQLite, a pooled [`StatusDb`] connection is
/// checked out. The guard itself never fails: a missing or unusable
/// binding is carried to the handler so it can answer with a proper error
/// body instead of a bare catcher response.
pub struct StoreBinding(Result<SharedKvStore, ApiError>);

impl StoreBinding {
    pub fn into_store(self) -> Result<SharedKvStore, ApiError> {
        self.0
    }

    /// Wraps the resolved store in a repository configured for this board.
    pub fn repository(self, config: &BoardConfig) -> Result<StatusRepository, ApiError> {
        self.into_store()
            .map(|store| StatusRepository::from_config(store, config))
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for StoreBinding {
    type Error = std::convert::Infallible;

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        if let Some(store) = request.rocket().state::<SharedKvStore>() {
            return Outcome::Success(StoreBinding(Ok(store.clone())));
        }

        let backend = request
            .rocket()
            .state::<BoardConfig>()
            .map(|config| config.store)
            .unwrap_or_default();

        if backend != StoreBackend::Sqlite {
            warn!("No {:?} store is bound to this service", backend);
            return Outcome::Success(StoreBinding(Err(ApiError::MissingBinding)));
        }

        let binding = match request.guard::<StatusDb>().await {
            Outcome::Success(db) => Ok(Arc::new(db) as SharedKvStore),
            Outcome::Error((status, ())) if status == Status::ServiceUnavailable => Err(ApiError::Store(
                StoreError::Unavailable("no database connection available".to_string()),
            )),
            _ => Err(ApiError::MissingBinding),
        };

        Outcome::Success(StoreBinding(binding))
    }
}
