//! Validation errors shared by every form and state transition.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised when user input or a requested state change is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(String),

    #[error("{field}: {reason}")]
    Invalid { field: String, reason: String },

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Cannot change status from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}

impl ValidationError {
    pub(crate) fn required(field: &str) -> Self {
        Self::Required(field.to_string())
    }

    pub(crate) fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn transition(from: impl std::fmt::Display, to: impl std::fmt::Display) -> Self {
        Self::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// Trim a form value and fail if nothing is left.
pub(crate) fn required(field: &str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::required(field))
    } else {
        Ok(trimmed.to_string())
    }
}

/// Parse an optional `YYYY-MM-DD` form value, as produced by `<input type="date">`.
pub(crate) fn optional_date(
    field: &str,
    value: &str,
) -> Result<Option<chrono::NaiveDate>, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ValidationError::invalid(field, "expected a date like 2026-02-20"))
}

/// Loose email check: a single `@` with text on both sides.
pub(crate) fn plausible_email(value: &str) -> bool {
    match value.trim().split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::disallowed_methods)]

    use super::*;

    #[test]
    fn email_check_accepts_common_addresses() {
        assert!(plausible_email("juan.delacruz@example.com"));
        assert!(plausible_email("  ana@corp.example.ph "));
        assert!(!plausible_email("no-at-sign"));
        assert!(!plausible_email("@example.com"));
        assert!(!plausible_email("a@b@c.com"));
        assert!(!plausible_email("juan@"));
        assert!(plausible_email("juan@localhost"));
    }

    #[test]
    fn optional_date_parses_html_date_values() {
        assert_eq!(optional_date("Date", "").unwrap(), None);
        assert_eq!(
            optional_date("Date", "2026-02-20").unwrap(),
            chrono::NaiveDate::from_ymd_opt(2026, 2, 20)
        );
        assert!(optional_date("Date", "20/02/2026").is_err());
    }
}
