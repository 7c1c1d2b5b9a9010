//! Persistence abstraction over OAuth2 application records.
//!
//! Implementations enforce client id uniqueness and resolve ownership through
//! [`guard::visible_to`](crate::guard::visible_to), so a record owned by
//! someone else is reported as [`RepositoryError::NotFound`].

use async_trait::async_trait;

use crate::entity::oauth2_application;
use crate::error::RepositoryError;
use crate::guard::Caller;

mod database;
mod memory;

pub use database::SeaOrmApplicationRepository;
pub use memory::MemoryApplicationRepository;

/// A validated application ready to be persisted.
#[derive(Clone, Debug)]
pub struct NewApplication {
    pub owner_id: String,
    pub name: String,
    pub client_id: String,
    pub client_secret_hash: String,
    pub redirect_uris: Vec<String>,
}

/// Partial update. `None` leaves the field untouched.
#[derive(Clone, Debug, Default)]
pub struct ApplicationMutation {
    pub name: Option<String>,
    pub redirect_uris: Option<Vec<String>>,
}

impl ApplicationMutation {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.redirect_uris.is_none()
    }
}

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Insert a new record. Fails with [`RepositoryError::Conflict`] if the
    /// client id was ever issued before, even to a since-deleted record.
    async fn create(
        &self,
        application: NewApplication,
    ) -> Result<oauth2_application::Model, RepositoryError>;

    /// All records owned by `owner_id`, oldest first.
    async fn list_by_owner(
        &self,
        owner_id: &str,
    ) -> Result<Vec<oauth2_application::Model>, RepositoryError>;

    async fn get_by_id_and_owner(
        &self,
        id: i64,
        caller: &Caller,
    ) -> Result<oauth2_application::Model, RepositoryError>;

    /// Atomically apply `mutation` to a record the caller owns.
    async fn update(
        &self,
        id: i64,
        caller: &Caller,
        mutation: ApplicationMutation,
    ) -> Result<oauth2_application::Model, RepositoryError>;

    /// Atomically remove a record the caller owns.
    async fn delete_by_id_and_owner(&self, id: i64, caller: &Caller)
    -> Result<(), RepositoryError>;
}
