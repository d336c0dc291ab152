//! Read-only lookups for visit and encounter types.

use std::sync::RwLock;

use async_trait::async_trait;
use medrec_core::{EncounterType, VisitType};

use crate::ServiceResult;

#[async_trait]
pub trait VisitTypeDirectory: Send + Sync {
    async fn visit_type(&self, visit_type_id: i32) -> ServiceResult<Option<VisitType>>;

    async fn visit_type_by_uuid(&self, uuid: &str) -> ServiceResult<Option<VisitType>>;

    /// All visit types in store order.
    async fn all_visit_types(&self) -> ServiceResult<Vec<VisitType>>;
}

#[async_trait]
pub trait EncounterTypeDirectory: Send + Sync {
    async fn encounter_type(&self, encounter_type_id: i32) -> ServiceResult<Option<EncounterType>>;

    async fn encounter_type_by_uuid(&self, uuid: &str) -> ServiceResult<Option<EncounterType>>;

    async fn all_encounter_types(&self) -> ServiceResult<Vec<EncounterType>>;
}

/// In-memory visit and encounter type lookups, kept in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    visit_types: RwLock<Vec<VisitType>>,
    encounter_types: RwLock<Vec<EncounterType>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_types(
        visit_types: impl IntoIterator<Item = VisitType>,
        encounter_types: impl IntoIterator<Item = EncounterType>,
    ) -> Self {
        Self {
            visit_types: RwLock::new(visit_types.into_iter().collect()),
            encounter_types: RwLock::new(encounter_types.into_iter().collect()),
        }
    }

    /// Add a visit type, replacing one with the same id in place.
    pub fn add_visit_type(&self, visit_type: VisitType) {
        let mut visit_types = self
            .visit_types
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match visit_types
            .iter_mut()
            .find(|vt| vt.visit_type_id == visit_type.visit_type_id)
        {
            Some(existing) => *existing = visit_type,
            None => visit_types.push(visit_type),
        }
    }

    pub fn add_encounter_type(&self, encounter_type: EncounterType) {
        let mut encounter_types = self
            .encounter_types
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        match encounter_types
            .iter_mut()
            .find(|et| et.encounter_type_id == encounter_type.encounter_type_id)
        {
            Some(existing) => *existing = encounter_type,
            None => encounter_types.push(encounter_type),
        }
    }

    fn find_visit_type(&self, predicate: impl Fn(&VisitType) -> bool) -> Option<VisitType> {
        self.visit_types
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .find(|vt| predicate(vt))
            .cloned()
    }

    fn find_encounter_type(
        &self,
        predicate: impl Fn(&EncounterType) -> bool,
    ) -> Option<EncounterType> {
        self.encounter_types
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .find(|et| predicate(et))
            .cloned()
    }
}

#[async_trait]
impl VisitTypeDirectory for InMemoryDirectory {
    async fn visit_type(&self, visit_type_id: i32) -> ServiceResult<Option<VisitType>> {
        Ok(self.find_visit_type(|vt| vt.visit_type_id == visit_type_id))
    }

    async fn visit_type_by_uuid(&self, uuid: &str) -> ServiceResult<Option<VisitType>> {
        Ok(self.find_visit_type(|vt| vt.uuid == uuid))
    }

    async fn all_visit_types(&self) -> ServiceResult<Vec<VisitType>> {
        Ok(self
            .visit_types
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }
}

#[async_trait]
impl EncounterTypeDirectory for InMemoryDirectory {
    async fn encounter_type(&self, encounter_type_id: i32) -> ServiceResult<Option<EncounterType>> {
        Ok(self.find_encounter_type(|et| et.encounter_type_id == encounter_type_id))
    }

    async fn encounter_type_by_uuid(&self, uuid: &str) -> ServiceResult<Option<EncounterType>> {
        Ok(self.find_encounter_type(|et| et.uuid == uuid))
    }

    async fn all_encounter_types(&self) -> ServiceResult<Vec<EncounterType>> {
        Ok(self
            .encounter_types
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::block_on;

    #[tokio::test]
    async fn test_visit_type_lookups() {
        let directory = InMemoryDirectory::new();
        directory.add_visit_type(VisitType::new(2, "Return").with_uuid("vt-2"));
        directory.add_visit_type(VisitType::new(1, "Initial"));

        assert_eq!(directory.visit_type(2).await.unwrap().unwrap().name, "Return");
        assert_eq!(
            directory.visit_type_by_uuid("vt-2").await.unwrap().unwrap().visit_type_id,
            2
        );
        assert!(directory.visit_type(9).await.unwrap().is_none());

        let ids: Vec<_> = directory
            .all_visit_types()
            .await
            .unwrap()
            .into_iter()
            .map(|vt| vt.visit_type_id)
            .collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_add_replaces_in_place() {
        let directory = InMemoryDirectory::with_types(
            [VisitType::new(1, "A"), VisitType::new(2, "B")],
            [EncounterType::new(5, "Return")],
        );
        directory.add_visit_type(VisitType::new(1, "A2"));

        block_on(async {
            let all = directory.all_visit_types().await.unwrap();
            assert_eq!(all[0].name, "A2");
            assert_eq!(all.len(), 2);

            assert_eq!(
                directory.encounter_type(5).await.unwrap().unwrap().name,
                "Return"
            );
        });
    }
}
