//! Input validation shared by the handlers

use crate::error::ApiError;

/// Minimum length of usernames, full names, passwords and post text
pub const MIN_FIELD_LENGTH: usize = 6;
/// Maximum allowed password length (prevent DoS with very large passwords)
pub const MAX_PASSWORD_LENGTH: usize = 256;

/// Require at least `min` characters
pub fn validate_min_length(field: &str, value: &str, min: usize) -> Result<(), ApiError> {
    if value.chars().count() < min {
        return Err(ApiError::BadRequest(format!(
            "{} must be at least {} characters long",
            field, min
        )));
    }
    Ok(())
}

/// Require a non-blank value
pub fn validate_required(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{} is required", field)));
    }
    Ok(())
}

/// Validate username length; any characters are allowed
pub fn validate_username(username: &str) -> Result<(), ApiError> {
    validate_min_length("username", username, MIN_FIELD_LENGTH)
}

/// Validate password length
///
/// Passwords are taken verbatim: whitespace counts like any other character.
pub fn validate_password(password: &str, min: usize) -> Result<(), ApiError> {
    if password.is_empty() {
        return Err(ApiError::BadRequest("password is required".to_string()));
    }
    validate_min_length("password", password, min)?;
    if password.chars().count() > MAX_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Password exceeds maximum length of {} characters",
            MAX_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

/// Validate the shape `local@domain.tld`
pub fn validate_email(email: &str) -> Result<(), ApiError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(ApiError::BadRequest(format!("Invalid email address: {}", email)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_rules() {
        assert!(validate_username("john_doe").is_ok());
        assert!(validate_username("john.doe").is_ok());
        assert!(validate_username("john doe").is_ok());
        assert!(validate_username("john@doe").is_ok());
        assert!(validate_username(&"a".repeat(200)).is_ok());
        assert!(validate_username("short").is_err());
    }

    #[test]
    fn test_min_length_counts_characters() {
        assert!(validate_min_length("fullName", "John Doe", MIN_FIELD_LENGTH).is_ok());
        assert!(validate_min_length("fullName", "Jo", MIN_FIELD_LENGTH).is_err());
        // six characters, twelve bytes
        assert!(validate_min_length("fullName", "ééééé", MIN_FIELD_LENGTH).is_err());
        assert!(validate_min_length("fullName", "éééééé", MIN_FIELD_LENGTH).is_ok());
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password("x", 1).is_ok());
        assert!(validate_password("", 1).is_err());
        assert!(validate_password("12345", MIN_FIELD_LENGTH).is_err());
        assert!(validate_password("password123", MIN_FIELD_LENGTH).is_ok());
        assert!(validate_password(&"p".repeat(MAX_PASSWORD_LENGTH + 1), 1).is_err());
        // limit counts characters, not bytes
        assert!(validate_password(&"é".repeat(MAX_PASSWORD_LENGTH), 1).is_ok());
        // whitespace is part of the password
        assert!(validate_password(" ", 1).is_ok());
        assert!(validate_password("      ", MIN_FIELD_LENGTH).is_ok());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("john@example.com").is_ok());
        assert!(validate_email("john.doe+tag@mail.example.org").is_ok());
        assert!(validate_email("john").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("john@example").is_err());
        assert!(validate_email("john@.com").is_err());
        assert!(validate_email("john@@example.com").is_err());
        assert!(validate_email("john doe@example.com").is_err());
    }
}
