//! Validation utilities.

use crate::FinmarkError;
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `FinmarkError` on failure.
    fn validate_request(&self) -> Result<(), FinmarkError> {
        self.validate().map_err(validation_errors_to_finmark_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Converts `validator::ValidationErrors` to `FinmarkError`.
///
/// Field errors are flattened into a single, field-sorted message so the
/// output is stable across runs.
#[must_use]
pub fn validation_errors_to_finmark_error(errors: ValidationErrors) -> FinmarkError {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), ToString::to_string);
                format!("{}: {}", field, message)
            })
        })
        .collect();
    messages.sort();

    FinmarkError::Validation(messages.join("; "))
}

/// Common validation functions.
pub mod rules {
    use validator::ValidationError;

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::rules::*;
    use super::*;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 1, message = "must not be empty"))]
        name: String,
        #[validate(range(min = 0.0))]
        price: f64,
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("hello").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("").is_err());
    }

    #[test]
    fn test_validate_request_ok() {
        let probe = Probe { name: "x".into(), price: 1.0 };
        assert!(probe.validate_request().is_ok());
    }

    #[test]
    fn test_validate_request_collects_fields() {
        let probe = Probe { name: String::new(), price: -1.0 };
        match probe.validate_request() {
            Err(FinmarkError::Validation(msg)) => {
                assert!(msg.contains("name: must not be empty"));
                assert!(msg.contains("price: range"));
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }
}
