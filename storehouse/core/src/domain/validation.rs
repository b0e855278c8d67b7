// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0
//! Validation Rules
//!
//! Pure format, range and strength checks shared by every aggregate. None of
//! these functions touch storage; application services call them before any
//! repository round-trip.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9\s\-()]{7,20}$").expect("phone pattern is valid"));

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}$").expect("email pattern is valid")
});

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Money columns are `NUMERIC(15, 2)`.
pub const AMOUNT_SCALE: u32 = 2;

/// `local_share` is stored as `NUMERIC(5, 4)`.
pub const LOCAL_SHARE_SCALE: u32 = 4;

/// Input rejected before it reaches the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid account type: '{0}'")]
    InvalidAccountType(String),

    #[error("invalid transaction type: '{0}'")]
    InvalidTransactionType(String),

    #[error("invalid user role: '{0}'")]
    InvalidRole(String),

    #[error("invalid phone number format: '{0}'")]
    InvalidPhone(String),

    #[error("invalid email format: '{0}'")]
    InvalidEmail(String),

    #[error("{0}")]
    WeakPassword(PasswordRule),

    #[error("amount must be greater than zero (got {0})")]
    InvalidAmount(Decimal),

    #[error("amount must have at most 2 decimal places (got {0})")]
    AmountPrecision(Decimal),

    #[error("local share must be a fraction between 0 and 1 with at most 4 decimal places (got {0})")]
    InvalidLocalShare(Decimal),

    #[error("malformed request: {0}")]
    MalformedRequest(String),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("{field} must be at most {max} characters")]
    FieldTooLong { field: &'static str, max: usize },

    #[error("invalid {field}: '{value}'")]
    InvalidId { field: &'static str, value: String },

    #[error("invalid {field}: '{value}' (expected RFC 3339)")]
    InvalidTimestamp { field: &'static str, value: String },

    #[error("invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: String, end: String },
}

/// The password-strength rule that a candidate failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordRule {
    TooShort,
    MissingUppercase,
    MissingLowercase,
    MissingDigit,
}

impl fmt::Display for PasswordRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PasswordRule::TooShort => write!(
                f,
                "password must be at least {} characters long",
                MIN_PASSWORD_LENGTH
            ),
            PasswordRule::MissingUppercase => {
                write!(f, "password must contain at least one uppercase letter")
            }
            PasswordRule::MissingLowercase => {
                write!(f, "password must contain at least one lowercase letter")
            }
            PasswordRule::MissingDigit => write!(f, "password must contain at least one digit"),
        }
    }
}

/// Optional leading `+`, then 7 to 20 digits, spaces, hyphens or parentheses.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if PHONE_PATTERN.is_match(phone) {
        Ok(())
    } else {
        Err(ValidationError::InvalidPhone(phone.to_string()))
    }
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if EMAIL_PATTERN.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail(email.to_string()))
    }
}

/// Rules are checked in order; the first failure is reported.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let rule = if password.chars().count() < MIN_PASSWORD_LENGTH {
        Some(PasswordRule::TooShort)
    } else if !password.chars().any(|c| c.is_ascii_uppercase()) {
        Some(PasswordRule::MissingUppercase)
    } else if !password.chars().any(|c| c.is_ascii_lowercase()) {
        Some(PasswordRule::MissingLowercase)
    } else if !password.chars().any(|c| c.is_ascii_digit()) {
        Some(PasswordRule::MissingDigit)
    } else {
        None
    };

    match rule {
        Some(rule) => Err(ValidationError::WeakPassword(rule)),
        None => Ok(()),
    }
}

/// Positive, with no more than [`AMOUNT_SCALE`] significant decimal places.
pub fn validate_amount(amount: Decimal) -> Result<(), ValidationError> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::InvalidAmount(amount));
    }
    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err(ValidationError::AmountPrecision(amount));
    }
    Ok(())
}

/// A fraction in `0..=1`.
pub fn validate_local_share(share: Decimal) -> Result<(), ValidationError> {
    if share < Decimal::ZERO || share > Decimal::ONE || share.normalize().scale() > LOCAL_SHARE_SCALE {
        return Err(ValidationError::InvalidLocalShare(share));
    }
    Ok(())
}

pub fn validate_required(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

/// Length is measured in characters, matching `VARCHAR(n)` semantics.
pub fn validate_length(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        Err(ValidationError::FieldTooLong { field, max })
    } else {
        Ok(())
    }
}

/// Parse a client-supplied identifier.
pub fn parse_id<T: FromStr>(field: &'static str, raw: &str) -> Result<T, ValidationError> {
    raw.trim().parse().map_err(|_| ValidationError::InvalidId {
        field,
        value: raw.to_string(),
    })
}
