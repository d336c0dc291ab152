//! Field-level validation errors collected by domain validators.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// A single rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Dotted property path, e.g. `drug.concept`.
    pub field: String,
    /// Message code describing the failure.
    pub code: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
        }
    }
}

/// Errors accumulated while validating one object.
#[derive(Debug, Clone, Default)]
pub struct ValidationErrors {
    object: String,
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new(object: impl Into<String>) -> Self {
        Self {
            object: object.into(),
            errors: Vec::new(),
        }
    }

    /// Record a rejected field.
    pub fn reject_value(&mut self, field: impl Into<String>, code: impl Into<String>) {
        self.errors.push(FieldError::new(field, code));
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_field_errors(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Convert into `Ok(())` when empty, otherwise a [`CoreError::Validation`].
    pub fn into_result(self) -> CoreResult<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation {
                object: self.object,
                errors: self.errors,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_errors_is_ok() {
        let errors = ValidationErrors::new("order");
        assert!(!errors.has_errors());
        assert!(errors.into_result().is_ok());
    }

    #[test]
    fn test_field_errors_are_exact_matches() {
        let mut errors = ValidationErrors::new("order");
        errors.reject_value("drug.concept", "error.null");

        assert!(errors.has_errors());
        assert!(errors.has_field_errors("drug.concept"));
        assert!(!errors.has_field_errors("drug"));
        assert!(matches!(
            errors.into_result(),
            Err(CoreError::Validation { .. })
        ));
    }
}
