//! Creates the tables backing OAuth2 client application registration.
//!
//! - oauth2_application: one row per registered application (hard-deleted)
//! - oauth2_issued_client_id: every client id ever issued, never pruned

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OAuth2Application::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OAuth2Application::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(OAuth2Application::OwnerId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(OAuth2Application::Name).string().not_null())
                    .col(
                        ColumnDef::new(OAuth2Application::ClientId)
                            .string_len(36)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(OAuth2Application::ClientSecretHash)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OAuth2Application::RedirectUris)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OAuth2Application::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OAuth2Application::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Rows here outlive the application row so a deleted client id is never reissued
        manager
            .create_table(
                Table::create()
                    .table(OAuth2IssuedClientId::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OAuth2IssuedClientId::ClientId)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(OAuth2IssuedClientId::IssuedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_oauth2_application_owner_created")
                    .table(OAuth2Application::Table)
                    .col(OAuth2Application::OwnerId)
                    .col(OAuth2Application::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_oauth2_application_owner_created")
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(OAuth2IssuedClientId::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(OAuth2Application::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum OAuth2Application {
    #[sea_orm(iden = "oauth2_application")]
    Table,
    Id,
    OwnerId,
    Name,
    ClientId,
    ClientSecretHash,
    RedirectUris,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum OAuth2IssuedClientId {
    #[sea_orm(iden = "oauth2_issued_client_id")]
    Table,
    ClientId,
    IssuedAt,
}
