//! Input validation for secret names.

use crate::error::ValidationError;

/// Validate a secret name.
///
/// Secret names become shell variables, so they must be valid
/// environment variable names:
/// - Only A-Z, a-z, 0-9, and underscore
/// - Cannot start with a digit
/// - Cannot be empty
///
/// # Errors
///
/// Returns `ValidationError` if the name is invalid.
pub fn validate_key(key: &str) -> Result<(), ValidationError> {
    let Some(first) = key.chars().next() else {
        return Err(ValidationError::EmptyKey);
    };

    if first.is_ascii_digit() {
        return Err(ValidationError::InvalidKey {
            key: key.to_string(),
            reason: "cannot start with a digit".to_string(),
        });
    }

    for (i, ch) in key.chars().enumerate() {
        if !ch.is_ascii_alphanumeric() && ch != '_' {
            return Err(ValidationError::InvalidKey {
                key: key.to_string(),
                reason: format!(
                    "invalid character '{}' at position {}. Only letters, digits, and underscore are allowed",
                    ch,
                    i + 1
                ),
            });
        }
    }

    Ok(())
}
