//! JSON body extractor answering malformed bodies with the API error shape.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;

use crate::api::error::ApiError;
use crate::validation::ValidationError;

/// Field reported when the request body itself cannot be read.
pub const BODY_FIELD: &str = "body";

/// Like [`Json`], but a missing content type, broken JSON or a missing or
/// mistyped field is rejected with `400 validation_failed`. The description
/// carries the deserializer's message, which names the offending field.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ValidatedJson(value)),
            Err(rejection) => Err(reject(rejection)),
        }
    }
}

fn reject(rejection: JsonRejection) -> ApiError {
    tracing::debug!(status = %rejection.status(), "Rejected request body: {}", rejection.body_text());
    ApiError::validation(&ValidationError::new(BODY_FIELD, rejection.body_text()))
}
