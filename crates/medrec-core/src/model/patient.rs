use serde::{Deserialize, Serialize};

use crate::id::generate_uuid;

/// A person receiving care.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Patient {
    pub patient_id: i32,
    #[serde(default = "generate_uuid")]
    pub uuid: String,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
}

impl Patient {
    pub fn new(patient_id: i32) -> Self {
        Self {
            patient_id,
            uuid: generate_uuid(),
            given_name: None,
            family_name: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, given: impl Into<String>, family: impl Into<String>) -> Self {
        self.given_name = Some(given.into());
        self.family_name = Some(family.into());
        self
    }
}

/// A physical place where care is delivered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub location_id: i32,
    #[serde(default = "generate_uuid")]
    pub uuid: String,
    pub name: String,
}

impl Location {
    pub fn new(location_id: i32, name: impl Into<String>) -> Self {
        Self {
            location_id,
            uuid: generate_uuid(),
            name: name.into(),
        }
    }
}
