use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::patient::{Location, Patient};
use crate::id::generate_uuid;

/// Classification of a visit (e.g. outpatient, inpatient).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VisitType {
    pub visit_type_id: i32,
    #[serde(default = "generate_uuid")]
    pub uuid: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl VisitType {
    pub fn new(visit_type_id: i32, name: impl Into<String>) -> Self {
        Self {
            visit_type_id,
            uuid: generate_uuid(),
            name: name.into(),
            description: None,
        }
    }

    #[must_use]
    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = uuid.into();
        self
    }
}

/// A container grouping a patient's encounters over an interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Visit {
    /// `None` until the visit has been persisted.
    pub visit_id: Option<i32>,
    pub uuid: String,
    pub patient: Patient,
    pub visit_type: VisitType,
    #[serde(with = "time::serde::rfc3339")]
    pub start_datetime: OffsetDateTime,
    /// `None` for a visit that is still open.
    #[serde(with = "time::serde::rfc3339::option")]
    pub stop_datetime: Option<OffsetDateTime>,
    pub location: Option<Location>,
}

impl Visit {
    pub fn new(patient: Patient, visit_type: VisitType, start_datetime: OffsetDateTime) -> Self {
        Self {
            visit_id: None,
            uuid: generate_uuid(),
            patient,
            visit_type,
            start_datetime,
            stop_datetime: None,
            location: None,
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: Option<Location>) -> Self {
        self.location = location;
        self
    }

    #[must_use]
    pub fn with_stop_datetime(mut self, stop: OffsetDateTime) -> Self {
        self.stop_datetime = Some(stop);
        self
    }

    pub fn is_persisted(&self) -> bool {
        self.visit_id.is_some()
    }

    /// Whether `at` falls inside this visit's interval. Open visits have no
    /// upper bound.
    pub fn contains(&self, at: OffsetDateTime) -> bool {
        if at < self.start_datetime {
            return false;
        }
        match self.stop_datetime {
            Some(stop) => at <= stop,
            None => true,
        }
    }
}
