use thiserror::Error;

use crate::validation::FieldError;

/// Core error types for medrec domain operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    #[error("Invalid date/time: {0}")]
    InvalidDateTime(String),

    #[error("Invalid time zone offset: {0}")]
    InvalidTimeZone(String),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Time parsing error: {0}")]
    TimeError(#[from] time::error::Parse),

    #[error("UUID error: {0}")]
    UuidError(#[from] uuid::Error),

    #[error("Object not found: {object_type}/{id}")]
    NotFound { object_type: String, id: String },

    #[error("Validation failed for {object}: {}", format_field_errors(.errors))]
    Validation {
        object: String,
        errors: Vec<FieldError>,
    },
}

fn format_field_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{} ({})", e.field, e.code))
        .collect::<Vec<_>>()
        .join(", ")
}

impl CoreError {
    /// Create a new InvalidId error
    pub fn invalid_id(id: impl Into<String>) -> Self {
        Self::InvalidId(id.into())
    }

    /// Create a new InvalidDateTime error
    pub fn invalid_date_time(datetime: impl Into<String>) -> Self {
        Self::InvalidDateTime(datetime.into())
    }

    /// Create a new InvalidTimeZone error
    pub fn invalid_time_zone(offset: impl Into<String>) -> Self {
        Self::InvalidTimeZone(offset.into())
    }

    /// Create a new NotFound error
    pub fn not_found(object_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            object_type: object_type.into(),
            id: id.into(),
        }
    }

    /// Check if this error is a client error (bad input from the caller)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidId(_)
                | Self::InvalidDateTime(_)
                | Self::NotFound { .. }
                | Self::Validation { .. }
                | Self::JsonError(_)
        )
    }

    /// Check if this error is a server error
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidTimeZone(_) | Self::TimeError(_) | Self::UuidError(_)
        )
    }
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::not_found("VisitType", "7");
        assert_eq!(err.to_string(), "Object not found: VisitType/7");

        let err = CoreError::Validation {
            object: "order".into(),
            errors: vec![
                FieldError::new("drug", "error.null"),
                FieldError::new("doseUnits", "DrugOrder.error.doseUnitsRequired"),
            ],
        };
        assert_eq!(
            err.to_string(),
            "Validation failed for order: drug (error.null), doseUnits (DrugOrder.error.doseUnitsRequired)"
        );
    }

    #[test]
    fn test_error_classification() {
        assert!(CoreError::invalid_id("abc").is_client_error());
        assert!(!CoreError::invalid_id("abc").is_server_error());
        assert!(CoreError::invalid_time_zone("+99:00").is_server_error());
    }
}
