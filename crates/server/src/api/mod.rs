//! HTTP surface of the registry.
//!
//! - `applications` - OAuth2 application endpoints (/api/v1/user/applications/oauth2)
//! - `auth` - caller identity extractor
//! - `error` - JSON error body
//! - `health` - Health check endpoint (/healthz)
//! - `json` - JSON body extractor with API-shaped rejections
//! - `openapi` - OpenAPI/Utoipa configuration

pub mod applications;
pub mod auth;
pub mod error;
pub mod health;
pub mod json;
pub mod openapi;

pub use applications::APPLICATIONS_TAG;
pub use health::MISC_TAG;

use crate::AppResources;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_redoc::{Redoc, Servable};

/// Builds the full router with documentation and middleware attached.
pub fn router(app_resources: AppResources) -> axum::Router {
    let (router, api) = OpenApiRouter::with_openapi(openapi::ApiDoc::openapi())
        .merge(applications::router())
        .routes(routes!(health::health))
        .layer(axum::Extension(app_resources))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .split_for_parts();

    router.merge(Redoc::with_url("/api-docs", api))
}

/// Starts the web server with all configured routes.
#[tracing::instrument(skip(app_resources))]
pub async fn start_webserver(app_resources: AppResources) -> color_eyre::Result<()> {
    let addr = app_resources.config.listen_addr;
    let router = router(app_resources);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Server running");
    axum::serve(listener, router)
        .await
        .map_err(|e| color_eyre::Report::msg(format!("Failed to start server: {e}")))?;

    Ok(())
}
