//! Input validation primitives.
//!
//! Small helpers that replace verbose `ok_or_else` +
//! `Error::validation_invalid_argument` chains.

use crate::error::{Error, Result};

/// Require an Option to contain a value.
pub fn require<T>(opt: Option<T>, field: &str, message: &str) -> Result<T> {
    opt.ok_or_else(|| Error::validation_invalid_argument(field, message, None, None))
}

/// Require a string to be non-empty after trimming.
///
/// Returns a reference to the trimmed string on success.
pub fn require_non_empty<'a>(value: &'a str, field: &str, message: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(Error::validation_invalid_argument(field, message, None, None))
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_returns_value_when_some() {
        let result = require(Some("value"), "field", "msg");
        assert_eq!(result.unwrap(), "value");
    }

    #[test]
    fn require_returns_error_when_none() {
        let result: Result<&str> = require(None, "field", "Missing field");
        assert!(result.is_err());
    }

    #[test]
    fn require_non_empty_trims_whitespace() {
        let result = require_non_empty("  My App  ", "label", "msg");
        assert_eq!(result.unwrap(), "My App");
    }

    #[test]
    fn require_non_empty_fails_for_whitespace() {
        let err = require_non_empty("   ", "label", "Label cannot be empty").unwrap_err();
        assert_eq!(err.details["field"], "label");
    }
}
