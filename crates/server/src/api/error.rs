//! JSON error body shared by all API handlers.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApplicationError;
use crate::validation::ValidationError;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Error code (e.g., "validation_failed", "not_found")
    pub error: String,
    /// Human-readable error description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,
    /// Offending request field, for validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Offending list entry, for validation errors on lists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

impl ApiError {
    fn new(error: &str, description: Option<String>) -> Self {
        Self {
            error: error.to_string(),
            error_description: description,
            field: None,
            index: None,
        }
    }

    pub fn unauthenticated(description: impl Into<String>) -> Self {
        Self::new("unauthenticated", Some(description.into()))
    }

    pub fn not_found(description: impl Into<String>) -> Self {
        Self::new("not_found", Some(description.into()))
    }

    pub fn validation(err: &ValidationError) -> Self {
        Self {
            field: Some(err.field.to_string()),
            index: err.index,
            ..Self::new("validation_failed", Some(err.message.clone()))
        }
    }

    pub fn server_error() -> Self {
        Self::new("server_error", None)
    }

    pub fn status(&self) -> StatusCode {
        match self.error.as_str() {
            "unauthenticated" => StatusCode::UNAUTHORIZED,
            "not_found" => StatusCode::NOT_FOUND,
            "validation_failed" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Validation(e) => ApiError::validation(&e),
            ApplicationError::NotFound => ApiError::not_found("Application not found"),
            ApplicationError::Exhausted { .. } | ApplicationError::Internal(_) => {
                // Storage details stay in the logs
                tracing::error!("Application operation failed: {}", err);
                ApiError::server_error()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_status_codes() {
        let response = ApiError::unauthenticated("test").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = ApiError::not_found("test").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = ApiError::validation(&ValidationError::new("name", "test")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::server_error().into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_application_error_mapping() {
        let err: ApiError = ApplicationError::NotFound.into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: ApiError =
            ApplicationError::Validation(ValidationError::at("redirect_uris", 2, "bad")).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.field.as_deref(), Some("redirect_uris"));
        assert_eq!(err.index, Some(2));

        let err: ApiError = ApplicationError::Internal("connection refused on db-1".into()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.error_description.is_none());

        let err: ApiError = ApplicationError::Exhausted { attempts: 3 }.into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
