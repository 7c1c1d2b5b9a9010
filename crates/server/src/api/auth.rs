//! Caller identity extractor.
//!
//! Authentication happens upstream. The proxy in front of this service puts the
//! authenticated account id into a trusted request header, whose name comes
//! from `auth.owner_header` in the configuration.

use crate::AppResources;
use crate::api::error::ApiError;
use crate::guard::Caller;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Axum extractor resolving the calling account.
///
/// # Example
///
/// ```ignore
/// async fn handler(Authenticated(caller): Authenticated) -> impl IntoResponse {
///     format!("Hello, {}", caller.owner_id)
/// }
/// ```
pub struct Authenticated(pub Caller);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let resources = parts
            .extensions
            .get::<AppResources>()
            .cloned()
            .ok_or_else(|| {
                tracing::error!("AppResources not found in extensions");
                ApiError::server_error()
            })?;

        let owner_id = parts
            .headers
            .get(resources.config.auth.owner_header.as_str())
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ApiError::unauthenticated("Missing caller identity"))?;

        Ok(Authenticated(Caller::new(owner_id)))
    }
}
