use sea_orm::DbErr;
use thiserror::Error;

use crate::validation::ValidationError;

/// Failures reported by an [`ApplicationRepository`](crate::repository::ApplicationRepository).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Client id has already been issued")]
    Conflict,
    #[error("Application not found")]
    NotFound,
    #[error("Failed to encode redirect URIs: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Secure random source unavailable: {0}")]
    Random(String),
    #[error("Failed to hash client secret: {0}")]
    Hash(String),
}

/// Errors surfaced by the application service.
///
/// `NotFound` covers both a missing record and one owned by another account.
#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Application not found")]
    NotFound,
    #[error("No unique client id could be issued after {attempts} attempts")]
    Exhausted { attempts: u32 },
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Whether the caller can fix the request and try again.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ApplicationError::Validation(_) | ApplicationError::NotFound
        )
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ApplicationError::NotFound,
            other => ApplicationError::Internal(other.to_string()),
        }
    }
}

impl From<CredentialError> for ApplicationError {
    fn from(err: CredentialError) -> Self {
        ApplicationError::Internal(err.to_string())
    }
}
