//! SeaORM-backed application repository.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, SqlErr, TransactionTrait,
};
use time::OffsetDateTime;

use super::{ApplicationMutation, ApplicationRepository, NewApplication};
use crate::entity::{oauth2_application, oauth2_issued_client_id};
use crate::error::RepositoryError;
use crate::guard::{self, Caller};

#[derive(Clone)]
pub struct SeaOrmApplicationRepository {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmApplicationRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

/// Unique index violations mean another writer issued the same client id first.
fn conflict_or_database(err: DbErr) -> RepositoryError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => RepositoryError::Conflict,
        _ => RepositoryError::Database(err),
    }
}

/// The row vanished between the ownership check and the write.
fn not_found_if_gone(err: DbErr) -> RepositoryError {
    match err {
        DbErr::RecordNotUpdated => RepositoryError::NotFound,
        other => RepositoryError::Database(other),
    }
}

#[async_trait]
impl ApplicationRepository for SeaOrmApplicationRepository {
    #[tracing::instrument(skip(self, application), fields(owner_id = %application.owner_id, client_id = %application.client_id))]
    async fn create(
        &self,
        application: NewApplication,
    ) -> Result<oauth2_application::Model, RepositoryError> {
        let redirect_uris = oauth2_application::encode_redirect_uris(&application.redirect_uris)?;
        let txn = self.db.begin().await?;

        let already_issued = oauth2_issued_client_id::Entity::find_by_id(
            application.client_id.clone(),
        )
        .one(&txn)
        .await?
        .is_some();
        if already_issued {
            // Dropping the transaction rolls it back
            return Err(RepositoryError::Conflict);
        }

        let now = OffsetDateTime::now_utc();
        oauth2_issued_client_id::ActiveModel {
            client_id: Set(application.client_id.clone()),
            issued_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(conflict_or_database)?;

        let record = oauth2_application::ActiveModel {
            owner_id: Set(application.owner_id),
            name: Set(application.name),
            client_id: Set(application.client_id),
            client_secret_hash: Set(application.client_secret_hash),
            redirect_uris: Set(redirect_uris),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(conflict_or_database)?;

        txn.commit().await?;
        Ok(record)
    }

    async fn list_by_owner(
        &self,
        owner_id: &str,
    ) -> Result<Vec<oauth2_application::Model>, RepositoryError> {
        let records = oauth2_application::Entity::find()
            .filter(oauth2_application::Column::OwnerId.eq(owner_id))
            .order_by_asc(oauth2_application::Column::CreatedAt)
            .order_by_asc(oauth2_application::Column::Id)
            .all(self.db.as_ref())
            .await?;
        Ok(records)
    }

    async fn get_by_id_and_owner(
        &self,
        id: i64,
        caller: &Caller,
    ) -> Result<oauth2_application::Model, RepositoryError> {
        let found = oauth2_application::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;
        guard::visible_to(caller, found).ok_or(RepositoryError::NotFound)
    }

    #[tracing::instrument(skip(self, caller, mutation), fields(owner_id = %caller.owner_id))]
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

        let txn = self.db.begin().await?;
        let found = oauth2_application::Entity::find_by_id(id).one(&txn).await?;
        let current = guard::visible_to(caller, found).ok_or(RepositoryError::NotFound)?;

        let mut active: oauth2_application::ActiveModel = current.into();
        if let Some(name) = mutation.name {
            active.name = Set(name);
        }
        if let Some(redirect_uris) = redirect_uris {
            active.redirect_uris = Set(redirect_uris);
        }
        active.updated_at = Set(OffsetDateTime::now_utc());

        let updated = active.update(&txn).await.map_err(not_found_if_gone)?;
        txn.commit().await?;
        Ok(updated)
    }

    #[tracing::instrument(skip(self, caller), fields(owner_id = %caller.owner_id))]
    async fn delete_by_id_and_owner(
        &self,
        id: i64,
        caller: &Caller,
    ) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;
        let found = oauth2_application::Entity::find_by_id(id).one(&txn).await?;
        guard::visible_to(caller, found).ok_or(RepositoryError::NotFound)?;

        let result = oauth2_application::Entity::delete_by_id(id)
            .exec(&txn)
            .await?;
        if result.rows_affected != 1 {
            return Err(RepositoryError::NotFound);
        }

        txn.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concurrently_deleted_row_is_not_found() {
        assert!(matches!(
            not_found_if_gone(DbErr::RecordNotUpdated),
            RepositoryError::NotFound
        ));
        assert!(matches!(
            not_found_if_gone(DbErr::Custom("connection reset".into())),
            RepositoryError::Database(_)
        ));
    }

    #[test]
    fn other_database_errors_are_not_conflicts() {
        assert!(matches!(
            conflict_or_database(DbErr::Custom("connection reset".into())),
            RepositoryError::Database(_)
        ));
    }
}
