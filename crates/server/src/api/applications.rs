//! OAuth2 application management endpoints.
//!
//! - `GET /api/v1/user/applications/oauth2` - List the caller's applications
//! - `POST /api/v1/user/applications/oauth2` - Register an application
//! - `GET /api/v1/user/applications/oauth2/{id}` - Fetch one application
//! - `PATCH /api/v1/user/applications/oauth2/{id}` - Change name and redirect URIs
//! - `DELETE /api/v1/user/applications/oauth2/{id}` - Delete an application
//!
//! Applications owned by another account answer exactly like missing ones.

use crate::AppResources;
use crate::api::auth::Authenticated;
use crate::api::error::ApiError;
use crate::api::json::ValidatedJson;
use crate::dto::{
    ApplicationView, CreateApplicationOptions, CreatedApplication, UpdateApplicationOptions,
};
use axum::{Extension, Json, extract::Path, http::StatusCode};
use utoipa_axum::{router::OpenApiRouter, routes};

/// Tag for OpenAPI documentation.
pub const APPLICATIONS_TAG: &str = "OAuth2 Applications";

/// Creates the applications router.
pub fn router() -> OpenApiRouter {
    OpenApiRouter::new()
        .routes(routes!(list_applications, create_application))
        .routes(routes!(
            get_application,
            update_application,
            delete_application
        ))
}

/// List all applications owned by the caller.
#[tracing::instrument(skip(resources, caller), fields(owner_id = %caller.owner_id))]
#[utoipa::path(
    get,
    path = "/api/v1/user/applications/oauth2",
    tag = APPLICATIONS_TAG,
    operation_id = "List OAuth2 Applications",
    summary = "List the caller's OAuth2 applications",
    description = "Returns every application registered by the caller, oldest first.\n\n\
                   Client secrets are never included.",
    responses(
        (status = 200, description = "List of applications", body = Vec<ApplicationView>),
        (status = 401, description = "Missing caller identity", body = ApiError),
    )
)]
async fn list_applications(
    Extension(resources): Extension<AppResources>,
    Authenticated(caller): Authenticated,
) -> Result<Json<Vec<ApplicationView>>, ApiError> {
    let applications = resources.applications.list(&caller).await?;
    Ok(Json(applications))
}

/// Register a new application.
#[tracing::instrument(skip(resources, caller, payload), fields(owner_id = %caller.owner_id))]
#[utoipa::path(
    post,
    path = "/api/v1/user/applications/oauth2",
    tag = APPLICATIONS_TAG,
    operation_id = "Create OAuth2 Application",
    summary = "Register a new OAuth2 application",
    description = "Creates an application with a fresh client id and client secret.\n\n\
                   **The client secret is only returned in this response.** It is stored as a \
                   one-way hash and cannot be retrieved later.",
    request_body(content = CreateApplicationOptions, description = "Application details"),
    responses(
        (status = 201, description = "Application created", body = CreatedApplication),
        (status = 400, description = "Invalid name or redirect URIs", body = ApiError),
        (status = 401, description = "Missing caller identity", body = ApiError),
    )
)]
async fn create_application(
    Extension(resources): Extension<AppResources>,
    Authenticated(caller): Authenticated,
    ValidatedJson(payload): ValidatedJson<CreateApplicationOptions>,
) -> Result<(StatusCode, Json<CreatedApplication>), ApiError> {
    let created = resources.applications.create(&caller, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Fetch a single application.
#[tracing::instrument(skip(resources, caller), fields(owner_id = %caller.owner_id))]
#[utoipa::path(
    get,
    path = "/api/v1/user/applications/oauth2/{id}",
    tag = APPLICATIONS_TAG,
    operation_id = "Get OAuth2 Application",
    summary = "Get one of the caller's OAuth2 applications",
    params(("id" = i64, Path, description = "Application ID")),
    responses(
        (status = 200, description = "The application", body = ApplicationView),
        (status = 401, description = "Missing caller identity", body = ApiError),
        (status = 404, description = "Application not found", body = ApiError),
    )
)]
async fn get_application(
    Extension(resources): Extension<AppResources>,
    Authenticated(caller): Authenticated,
    Path(id): Path<i64>,
) -> Result<Json<ApplicationView>, ApiError> {
    let application = resources.applications.get(&caller, id).await?;
    Ok(Json(application))
}

/// Change an application's name and/or redirect URIs.
#[tracing::instrument(skip(resources, caller, payload), fields(owner_id = %caller.owner_id))]
#[utoipa::path(
    patch,
    path = "/api/v1/user/applications/oauth2/{id}",
    tag = APPLICATIONS_TAG,
    operation_id = "Update OAuth2 Application",
    summary = "Update an OAuth2 application",
    description = "Replaces the name and/or the entire redirect URI list.\n\n\
                   `client_id`, `client_secret` and `created_at` cannot be changed. They may be \
                   sent back unchanged, but a different value rejects the request with 400.",
    params(("id" = i64, Path, description = "Application ID")),
    request_body(content = UpdateApplicationOptions, description = "Fields to change"),
    responses(
        (status = 200, description = "The updated application", body = ApplicationView),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Missing caller identity", body = ApiError),
        (status = 404, description = "Application not found", body = ApiError),
    )
)]
async fn update_application(
    Extension(resources): Extension<AppResources>,
    Authenticated(caller): Authenticated,
    Path(id): Path<i64>,
    ValidatedJson(payload): ValidatedJson<UpdateApplicationOptions>,
) -> Result<Json<ApplicationView>, ApiError> {
    let application = resources.applications.update(&caller, id, payload).await?;
    Ok(Json(application))
}

/// Delete an application.
#[tracing::instrument(skip(resources, caller), fields(owner_id = %caller.owner_id))]
#[utoipa::path(
    delete,
    path = "/api/v1/user/applications/oauth2/{id}",
    tag = APPLICATIONS_TAG,
    operation_id = "Delete OAuth2 Application",
    summary = "Delete an OAuth2 application",
    description = "Permanently deletes the application. Its client id is never issued again.\n\n\
                   Deleting the same application twice answers 404 the second time.",
    params(("id" = i64, Path, description = "Application ID")),
    responses(
        (status = 204, description = "Application deleted"),
        (status = 401, description = "Missing caller identity", body = ApiError),
        (status = 404, description = "Application not found", body = ApiError),
    )
)]
async fn delete_application(
    Extension(resources): Extension<AppResources>,
    Authenticated(caller): Authenticated,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    resources.applications.delete(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
