use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::patient::{Location, Patient};
use super::visit::Visit;
use crate::id::generate_uuid;

/// Kind of clinical encounter (e.g. adult initial, return visit, lab).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EncounterType {
    pub encounter_type_id: i32,
    #[serde(default = "generate_uuid")]
    pub uuid: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EncounterType {
    pub fn new(encounter_type_id: i32, name: impl Into<String>) -> Self {
        Self {
            encounter_type_id,
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

/// A clinical event for one patient at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Encounter {
    /// `None` until the encounter has been persisted.
    pub encounter_id: Option<i32>,
    pub uuid: String,
    pub encounter_type: EncounterType,
    pub patient: Patient,
    pub location: Option<Location>,
    #[serde(with = "time::serde::rfc3339")]
    pub encounter_datetime: OffsetDateTime,
    pub visit: Option<Visit>,
}

impl Encounter {
    pub fn new(
        patient: Patient,
        encounter_type: EncounterType,
        encounter_datetime: OffsetDateTime,
    ) -> Self {
        Self {
            encounter_id: None,
            uuid: generate_uuid(),
            encounter_type,
            patient,
            location: None,
            encounter_datetime,
            visit: None,
        }
    }

    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    #[must_use]
    pub fn with_visit(mut self, visit: Visit) -> Self {
        self.visit = Some(visit);
        self
    }

    pub fn is_persisted(&self) -> bool {
        self.encounter_id.is_some()
    }

    pub fn has_visit(&self) -> bool {
        self.visit.is_some()
    }

    /// Attach `visit` if the encounter has none yet. Returns `false` and
    /// leaves the existing visit in place otherwise.
    pub fn attach_visit(&mut self, visit: Visit) -> bool {
        if self.visit.is_some() {
            return false;
        }
        self.visit = Some(visit);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VisitType;
    use time::macros::datetime;

    #[test]
    fn test_attach_visit_only_once() {
        let at = datetime!(2024-03-01 10:15:00 UTC);
        let patient = Patient::new(2);
        let mut encounter = Encounter::new(patient.clone(), EncounterType::new(5, "Return"), at);

        let first = Visit::new(patient.clone(), VisitType::new(2, "Return TB Clinic"), at);
        let first_uuid = first.uuid.clone();
        assert!(encounter.attach_visit(first));

        let second = Visit::new(patient, VisitType::new(4, "Other"), at);
        assert!(!encounter.attach_visit(second));
        assert_eq!(encounter.visit.unwrap().uuid, first_uuid);
    }
}
