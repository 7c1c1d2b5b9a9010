//! Request validation for application names and redirect URIs.

use serde::Serialize;
use thiserror::Error;

pub mod application_name;
pub mod redirect_uri;

pub use application_name::validate_name;
pub use redirect_uri::validate_redirect_uris;

/// A rejected request field, optionally pointing at one entry of a list.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
#[error("Invalid {field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            index: None,
            message: message.into(),
        }
    }

    pub fn at(field: &'static str, index: usize, message: impl Into<String>) -> Self {
        Self {
            field,
            index: Some(index),
            message: message.into(),
        }
    }
}
