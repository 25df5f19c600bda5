//! Validation utilities for the Agrinfo dashboard
//!
//! Presence and range checks only; anything richer belongs to the upstream
//! data sources.

use rust_decimal::Decimal;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 64;
pub const PASSWORD_MIN_LEN: usize = 6;

/// Validate a login name
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    let len = username.trim().chars().count();
    if len < USERNAME_MIN_LEN || len > USERNAME_MAX_LEN {
        return Err("Username must be between 3 and 64 characters");
    }
    if username.chars().any(char::is_whitespace) {
        return Err("Username cannot contain spaces");
    }
    Ok(())
}

/// Validate a password
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err("Password must be at least 6 characters");
    }
    Ok(())
}

/// Validate an inventory quantity or price
pub fn validate_non_negative(value: Decimal) -> Result<(), &'static str> {
    if value < Decimal::ZERO {
        return Err("Value cannot be negative");
    }
    Ok(())
}

/// Validate that a free-text field is present
pub fn validate_present(value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err("Value is required");
    }
    Ok(())
}
