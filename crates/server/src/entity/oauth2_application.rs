//! OAuth2 client application entity.

use sea_orm::entity::prelude::*;
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "oauth2_application")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Account that registered the application; never changes.
    pub owner_id: String,
    pub name: String,
    #[sea_orm(unique)]
    pub client_id: String,
    /// Argon2id PHC string of the client secret. The plaintext is never stored.
    pub client_secret_hash: String,
    /// JSON array of redirect URIs in submission order
    #[sea_orm(column_type = "Text")]
    pub redirect_uris: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Parse redirect URIs from JSON string
    ///
    /// An undecodable column reads as an empty list and is logged.
    pub fn redirect_uris_list(&self) -> Vec<String> {
        match serde_json::from_str(&self.redirect_uris) {
            Ok(uris) => uris,
            Err(e) => {
                tracing::warn!(
                    application_id = self.id,
                    error = %e,
                    "Stored redirect URIs are not a JSON string array"
                );
                Vec::new()
            }
        }
    }
}

/// Encode redirect URIs for the `redirect_uris` column, keeping their order.
pub fn encode_redirect_uris(uris: &[String]) -> Result<String, serde_json::Error> {
    serde_json::to_string(uris)
}
