//! OAuth2 client application registry.
//!
//! Lets an authenticated account register OAuth2 client applications, list and
//! inspect them, replace their name and redirect URIs, and revoke them. Client
//! secrets are generated here, stored only as Argon2id hashes, and revealed
//! exactly once in the creation response.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::credentials::SecureCredentialGenerator;
use crate::repository::SeaOrmApplicationRepository;
use crate::service::ApplicationService;

pub mod api;
pub mod config;
pub mod credentials;
pub mod dto;
pub mod entity;
pub mod error;
pub mod guard;
pub mod repository;
pub mod service;
pub mod validation;

#[derive(Clone)]
pub struct AppResources {
    pub applications: Arc<ApplicationService>,
    pub config: Arc<AppConfig>,
}

impl AppResources {
    /// Wires the database-backed repository and the secure generator into a service.
    pub fn new(db: Arc<DatabaseConnection>, config: Arc<AppConfig>) -> Self {
        let applications = ApplicationService::new(
            Arc::new(SeaOrmApplicationRepository::new(db)),
            Arc::new(SecureCredentialGenerator),
            config.applications.max_client_id_attempts,
        );
        Self {
            applications: Arc::new(applications),
            config,
        }
    }
}
