use super::ValidationError;
use url::Url;

pub const REDIRECT_URIS_FIELD: &str = "redirect_uris";

/// Checks that every redirect URI is absolute with a scheme and host.
///
/// The list is returned exactly as submitted: same order, duplicates kept,
/// no normalization. Downstream redirect matching compares strings verbatim.
pub fn validate_redirect_uris(uris: &[String]) -> Result<Vec<String>, ValidationError> {
    if uris.is_empty() {
        return Err(ValidationError::new(
            REDIRECT_URIS_FIELD,
            "at least one redirect URI is required",
        ));
    }

    for (index, uri) in uris.iter().enumerate() {
        // Url::parse silently strips surrounding whitespace, which would make the stored value differ
        if uri.trim() != uri {
            return Err(ValidationError::at(
                REDIRECT_URIS_FIELD,
                index,
                format!("redirect URI at index {index} has surrounding whitespace"),
            ));
        }

        let parsed = Url::parse(uri).map_err(|e| {
            ValidationError::at(
                REDIRECT_URIS_FIELD,
                index,
                format!("redirect URI at index {index} is not an absolute URI: {e}"),
            )
        })?;

        if parsed.host_str().is_none_or(str::is_empty) {
            return Err(ValidationError::at(
                REDIRECT_URIS_FIELD,
                index,
                format!("redirect URI at index {index} has no host"),
            ));
        }
    }

    Ok(uris.to_vec())
}
