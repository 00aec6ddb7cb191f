//! Shape validation for operator input. All checks are local; nothing here
//! touches the network.

use thiserror::Error;

/// Expected length of a coupon code after sanitizing.
pub const CODE_LEN: usize = 6;

/// Expected length of a mobile number.
pub const MOBILE_LEN: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("coupon code must be exactly {CODE_LEN} digits")]
    Code,

    #[error("mobile number must be exactly {MOBILE_LEN} digits")]
    Mobile,

    #[error("name must contain only letters and spaces")]
    Name,
}

/// Checks that `code` is exactly six ASCII digits.
///
/// # Errors
///
/// Returns [`FormatError::Code`] otherwise.
pub fn validate_code(code: &str) -> Result<(), FormatError> {
    if code.len() == CODE_LEN && code.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(FormatError::Code)
    }
}

/// Checks that `mobile` is exactly ten ASCII digits.
///
/// # Errors
///
/// Returns [`FormatError::Mobile`] otherwise.
pub fn validate_mobile(mobile: &str) -> Result<(), FormatError> {
    if mobile.len() == MOBILE_LEN && mobile.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(FormatError::Mobile)
    }
}

/// Checks that `name`, when non-empty, contains only letters and spaces.
/// The name field is optional; an empty string passes.
///
/// # Errors
///
/// Returns [`FormatError::Name`] otherwise.
pub fn validate_name(name: &str) -> Result<(), FormatError> {
    if name.chars().all(|c| c.is_ascii_alphabetic() || c == ' ') {
        Ok(())
    } else {
        Err(FormatError::Name)
    }
}

/// Reduces a decoded scan payload to the digits a coupon code may contain,
/// truncated to [`CODE_LEN`]. The result may still be too short; callers
/// run [`validate_code`] on it before use.
#[must_use]
pub fn sanitize_decoded(payload: &str) -> String {
    payload
        .chars()
        .filter(char::is_ascii_digit)
        .take(CODE_LEN)
        .collect()
}
