//! Argument validation shared by every public store operation.

use crate::error::{Result, StoreError};

/// Shortest phone number the store accepts, counted in digits.
pub const PHONE_MIN_DIGITS: usize = 3;
/// Longest phone number the store accepts, counted in digits.
pub const PHONE_MAX_DIGITS: usize = 15;

/// Rejects strings that are empty or contain nothing but whitespace.
pub fn ensure_string_valid(value: &str, what: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(StoreError::invalid(what, "must not be blank"));
    }
    Ok(())
}

/// Validates phone number syntax: an optional leading `+` followed by
/// 3 to 15 ASCII digits. No separators or extensions.
pub fn ensure_phone_number_valid(number: &str, what: &str) -> Result<()> {
    ensure_string_valid(number, what)?;
    let digits = number.strip_prefix('+').unwrap_or(number);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(StoreError::invalid(what, "malformed phone number"));
    }
    if !(PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits.len()) {
        return Err(StoreError::invalid(what, "phone number length out of range"));
    }
    Ok(())
}
