use super::ValidationError;

pub const NAME_FIELD: &str = "name";
pub const MAX_NAME_CHARS: usize = 255;

/// Returns the trimmed name, rejecting blank or overly long labels.
pub fn validate_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::new(NAME_FIELD, "name is required"));
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(ValidationError::new(
            NAME_FIELD,
            format!("name must be at most {MAX_NAME_CHARS} characters"),
        ));
    }
    if name.chars().any(char::is_control) {
        return Err(ValidationError::new(
            NAME_FIELD,
            "name must not contain control characters",
        ));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(validate_name("  test-app-1 ").unwrap(), "test-app-1");
    }

    #[test]
    fn rejects_blank() {
        let err = validate_name("   ").unwrap_err();
        assert_eq!(err.field, NAME_FIELD);
        assert_eq!(err.index, None);
    }

    #[test]
    fn length_limit_counts_characters() {
        assert!(validate_name(&"é".repeat(MAX_NAME_CHARS)).is_ok());
        assert!(validate_name(&"a".repeat(MAX_NAME_CHARS + 1)).is_err());
    }

    #[test]
    fn rejects_control_characters() {
        assert!(validate_name("bad\nname").is_err());
    }
}
