use crate::error::{CoreError, CoreResult};

/// Generate a new external identifier.
pub fn generate_uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Validate an external identifier and return it in canonical hyphenated form.
pub fn validate_uuid(value: &str) -> CoreResult<String> {
    let parsed = uuid::Uuid::parse_str(value.trim())
        .map_err(|e| CoreError::invalid_id(format!("'{value}': {e}")))?;
    Ok(parsed.hyphenated().to_string())
}

/// Returns `true` if `value` is a non-empty run of ASCII digits, i.e. looks
/// like a numeric primary key rather than a uuid.
pub fn is_numeric_id(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}
