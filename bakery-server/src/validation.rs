//! Input validation helpers
//!
//! Text length limits and small numeric checks shared by the services.

use rust_decimal::Decimal;
use shared::error::AppError;

// ── Text length limits ──

/// Names: customers, menus, ingredients, units
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions and reservation notes
pub const MAX_NOTE_LEN: usize = 500;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;
pub const MIN_PASSWORD_LEN: usize = 8;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Delivery addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Short labels: menu category, ingredient unit
pub const MAX_SHORT_TEXT_LEN: usize = 100;

// ── Helpers ──

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(
            AppError::validation(format!("{field} must not be empty")).with_detail("field", field),
        );
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), AppError> {
    validate_required_text(email, "email", MAX_EMAIL_LEN)?;
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(
            AppError::validation("email is not a valid address").with_detail("field", "email"),
        );
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < MIN_PASSWORD_LEN || password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be {MIN_PASSWORD_LEN}-{MAX_PASSWORD_LEN} characters"
        ))
        .with_detail("field", "password"));
    }
    Ok(())
}

/// `value >= min`
pub fn validate_min_i32(value: i32, field: &str, min: i32) -> Result<(), AppError> {
    if value < min {
        return Err(AppError::validation(format!("{field} must be at least {min}"))
            .with_detail("field", field));
    }
    Ok(())
}

pub fn validate_non_negative(value: Decimal, field: &str) -> Result<(), AppError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(AppError::validation(format!("{field} must not be negative"))
            .with_detail("field", field));
    }
    Ok(())
}

pub fn validate_rating(rating: f64) -> Result<(), AppError> {
    if !(0.0..=5.0).contains(&rating) {
        return Err(
            AppError::validation("rating must be between 0 and 5").with_detail("field", "rating"),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    #[test]
    fn test_required_text() {
        assert!(
            validate_required_text("Jl. Sudirman 1", "delivery_address", MAX_ADDRESS_LEN).is_ok()
        );
        let err = validate_required_text("   ", "delivery_address", MAX_ADDRESS_LEN).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(validate_required_text(&"x".repeat(11), "name", 10).is_err());
    }

    #[test]
    fn test_optional_text() {
        assert!(validate_optional_text(&None, "notes", 5).is_ok());
        assert!(validate_optional_text(&Some("abcdef".into()), "notes", 5).is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("baker@example.com").is_ok());
        assert!(validate_email("baker@example").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("no-at-sign").is_err());
    }

    #[test]
    fn test_numeric_bounds() {
        assert!(validate_min_i32(1, "quantity", 1).is_ok());
        assert!(validate_min_i32(0, "quantity", 1).is_err());
        assert!(validate_non_negative(Decimal::ZERO, "price").is_ok());
        assert!(validate_non_negative(Decimal::new(-1, 2), "price").is_err());
        assert!(validate_rating(4.5).is_ok());
        assert!(validate_rating(5.1).is_err());
        assert!(validate_password("short").is_err());
        assert!(validate_password("long-enough").is_ok());
    }
}
