//! Request bodies and the two response shapes of the applications API.
//!
//! [`CreatedApplication`] is only ever built by a successful create and is the
//! one place a plaintext client secret appears. Every other operation returns
//! [`ApplicationView`], which has no secret field at all.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;

use crate::entity::oauth2_application;

/// Request to register a new application.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct CreateApplicationOptions {
    /// Human-readable application name
    pub name: String,
    /// Allowed redirect targets, kept in the given order
    pub redirect_uris: Vec<String>,
}

/// Request to change an application.
///
/// `client_id`, `client_secret` and `created_at` are immutable. They may be
/// echoed back unchanged, but a differing value rejects the whole request.
#[derive(Clone, Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateApplicationOptions {
    /// New name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Replacement for the whole redirect URI list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_uris: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub created_at: Option<OffsetDateTime>,
}

/// Application as returned by list, get and update. Carries no secret.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct ApplicationView {
    pub id: i64,
    pub name: String,
    pub client_id: String,
    pub redirect_uris: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<oauth2_application::Model> for ApplicationView {
    fn from(record: oauth2_application::Model) -> Self {
        Self {
            id: record.id,
            redirect_uris: record.redirect_uris_list(),
            name: record.name,
            client_id: record.client_id,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Application as returned by create, including the one-time plaintext secret.
#[derive(Clone, Debug, Deserialize, Serialize, ToSchema)]
pub struct CreatedApplication {
    pub id: i64,
    pub name: String,
    pub client_id: String,
    /// Plaintext client secret. Shown only in this response.
    pub client_secret: String,
    pub redirect_uris: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl CreatedApplication {
    pub fn new(record: oauth2_application::Model, client_secret: String) -> Self {
        let view = ApplicationView::from(record);
        Self {
            id: view.id,
            name: view.name,
            client_id: view.client_id,
            client_secret,
            redirect_uris: view.redirect_uris,
            created_at: view.created_at,
            updated_at: view.updated_at,
        }
    }
}
