//! Global property change events broadcast to subscribers.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Operation type for global property changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyOperation {
    /// Property was created or its value replaced
    Set,
    /// Property was deleted
    Delete,
}

impl std::fmt::Display for PropertyOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Set => write!(f, "set"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Event representing a global property change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyChangeEvent {
    /// Name of the property that changed
    pub property: String,
    /// Operation type
    pub operation: PropertyOperation,
    /// Timestamp of the change
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// New value, absent for deletes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,
}

impl PropertyChangeEvent {
    pub fn set(property: impl Into<String>, new_value: Option<String>) -> Self {
        Self {
            property: property.into(),
            operation: PropertyOperation::Set,
            timestamp: OffsetDateTime::now_utc(),
            new_value,
        }
    }

    pub fn delete(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            operation: PropertyOperation::Delete,
            timestamp: OffsetDateTime::now_utc(),
            new_value: None,
        }
    }
}
