//! In-process application repository.
//!
//! Mirrors the database semantics (issued client id ledger, ownership hiding,
//! creation ordering) without a store. Used by tests and local tooling.

use std::collections::{BTreeMap, HashSet};

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use super::{ApplicationMutation, ApplicationRepository, NewApplication};
use crate::entity::oauth2_application;
use crate::error::RepositoryError;
use crate::guard::{self, Caller};

#[derive(Default)]
struct State {
    last_id: i64,
    records: BTreeMap<i64, oauth2_application::Model>,
    issued_client_ids: HashSet<String>,
}

#[derive(Default)]
pub struct MemoryApplicationRepository {
    state: Mutex<State>,
}

impl MemoryApplicationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records across all owners.
    pub async fn len(&self) -> usize {
        self.state.lock().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Mark a client id as issued without creating a record.
    pub async fn reserve_client_id(&self, client_id: impl Into<String>) {
        self.state
            .lock()
            .await
            .issued_client_ids
            .insert(client_id.into());
    }
}

#[async_trait]
impl ApplicationRepository for MemoryApplicationRepository {
    async fn create(
        &self,
        application: NewApplication,
    ) -> Result<oauth2_application::Model, RepositoryError> {
        let redirect_uris = oauth2_application::encode_redirect_uris(&application.redirect_uris)?;
        let mut state = self.state.lock().await;

        if !state
            .issued_client_ids
            .insert(application.client_id.clone())
        {
            return Err(RepositoryError::Conflict);
        }

        state.last_id += 1;
        let now = OffsetDateTime::now_utc();
        let record = oauth2_application::Model {
            id: state.last_id,
            owner_id: application.owner_id,
            name: application.name,
            client_id: application.client_id,
            client_secret_hash: application.client_secret_hash,
            redirect_uris,
            created_at: now,
            updated_at: now,
        };
        state.records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn list_by_owner(
        &self,
        owner_id: &str,
    ) -> Result<Vec<oauth2_application::Model>, RepositoryError> {
        let state = self.state.lock().await;
        let mut records: Vec<_> = state
            .records
            .values()
            .filter(|record| record.owner_id == owner_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(records)
    }

    async fn get_by_id_and_owner(
        &self,
        id: i64,
        caller: &Caller,
    ) -> Result<oauth2_application::Model, RepositoryError> {
        let state = self.state.lock().await;
        guard::visible_to(caller, state.records.get(&id).cloned()).ok_or(RepositoryError::NotFound)
    }

    async fn update(
        &self,
        id: i64,
        caller: &Caller,
        mutation: ApplicationMutation,
    ) -> Result<oauth2_application::Model, RepositoryError> {
        let redirect_uris = mutation
            .redirect_uris
            .as_deref()
            .map(oauth2_application::encode_redirect_uris)
            .transpose()?;

        let mut state = self.state.lock().await;
        let mut record = guard::visible_to(caller, state.records.get(&id).cloned())
            .ok_or(RepositoryError::NotFound)?;

        if let Some(name) = mutation.name {
            record.name = name;
        }
        if let Some(redirect_uris) = redirect_uris {
            record.redirect_uris = redirect_uris;
        }
        record.updated_at = OffsetDateTime::now_utc();

        state.records.insert(id, record.clone());
        Ok(record)
    }

    async fn delete_by_id_and_owner(
        &self,
        id: i64,
        caller: &Caller,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().await;
        guard::visible_to(caller, state.records.get(&id).cloned())
            .ok_or(RepositoryError::NotFound)?;
        state.records.remove(&id);
        Ok(())
    }
}
