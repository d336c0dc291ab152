//! Persistence seams for visits, encounters and orders.

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use medrec_core::{DrugOrder, Encounter, Visit};

use crate::ServiceResult;

#[async_trait]
pub trait VisitStore: Send + Sync {
    async fn get_visit(&self, visit_id: i32) -> ServiceResult<Option<Visit>>;

    /// Visits of a patient ordered by start time.
    async fn visits_for_patient(&self, patient_id: i32) -> ServiceResult<Vec<Visit>>;

    /// Insert or update. New visits are assigned an id.
    async fn save_visit(&self, visit: Visit) -> ServiceResult<Visit>;
}

#[async_trait]
pub trait EncounterStore: Send + Sync {
    async fn get_encounter(&self, encounter_id: i32) -> ServiceResult<Option<Encounter>>;

    async fn save_encounter(&self, encounter: Encounter) -> ServiceResult<Encounter>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn get_drug_order(&self, order_id: i32) -> ServiceResult<Option<DrugOrder>>;

    async fn save_drug_order(&self, order: DrugOrder) -> ServiceResult<DrugOrder>;
}

/// Id sequence starting at 1.
#[derive(Debug)]
struct Sequence(AtomicI32);

impl Default for Sequence {
    fn default() -> Self {
        Self(AtomicI32::new(1))
    }
}

impl Sequence {
    fn next(&self) -> i32 {
        self.0.fetch_add(1, Ordering::Relaxed)
    }
}

/// In-memory implementation of every store trait.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    visits: DashMap<i32, Visit>,
    encounters: DashMap<i32, Encounter>,
    orders: DashMap<i32, DrugOrder>,
    visit_ids: Sequence,
    encounter_ids: Sequence,
    order_ids: Sequence,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visit_count(&self) -> usize {
        self.visits.len()
    }

    pub fn encounter_count(&self) -> usize {
        self.encounters.len()
    }
}

#[async_trait]
impl VisitStore for InMemoryStore {
    async fn get_visit(&self, visit_id: i32) -> ServiceResult<Option<Visit>> {
        Ok(self.visits.get(&visit_id).map(|v| v.value().clone()))
    }

    async fn visits_for_patient(&self, patient_id: i32) -> ServiceResult<Vec<Visit>> {
        let mut visits: Vec<Visit> = self
            .visits
            .iter()
            .filter(|entry| entry.value().patient.patient_id == patient_id)
            .map(|entry| entry.value().clone())
            .collect();
        visits.sort_by_key(|v| v.start_datetime);
        Ok(visits)
    }

    async fn save_visit(&self, mut visit: Visit) -> ServiceResult<Visit> {
        let visit_id = match visit.visit_id {
            Some(id) => id,
            None => self.visit_ids.next(),
        };
        visit.visit_id = Some(visit_id);
        self.visits.insert(visit_id, visit.clone());
        Ok(visit)
    }
}

#[async_trait]
impl EncounterStore for InMemoryStore {
    async fn get_encounter(&self, encounter_id: i32) -> ServiceResult<Option<Encounter>> {
        Ok(self.encounters.get(&encounter_id).map(|e| e.value().clone()))
    }

    async fn save_encounter(&self, mut encounter: Encounter) -> ServiceResult<Encounter> {
        let encounter_id = match encounter.encounter_id {
            Some(id) => id,
            None => self.encounter_ids.next(),
        };
        encounter.encounter_id = Some(encounter_id);
        self.encounters.insert(encounter_id, encounter.clone());
        Ok(encounter)
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn get_drug_order(&self, order_id: i32) -> ServiceResult<Option<DrugOrder>> {
        Ok(self.orders.get(&order_id).map(|o| o.value().clone()))
    }

    async fn save_drug_order(&self, mut order: DrugOrder) -> ServiceResult<DrugOrder> {
        let order_id = match order.order.order_id {
            Some(id) => id,
            None => self.order_ids.next(),
        };
        order.order.order_id = Some(order_id);
        self.orders.insert(order_id, order.clone());
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medrec_core::{EncounterType, Patient, VisitType};
    use time::macros::datetime;

    #[tokio::test]
    async fn test_save_assigns_ids() {
        let store = InMemoryStore::new();
        let patient = Patient::new(1);
        let visit = Visit::new(
            patient.clone(),
            VisitType::new(1, "Outpatient"),
            datetime!(2024-03-01 09:00 UTC),
        );

        let first = store.save_visit(visit.clone()).await.unwrap();
        let second = store.save_visit(visit).await.unwrap();
        assert_eq!(first.visit_id, Some(1));
        assert_eq!(second.visit_id, Some(2));

        let resaved = store.save_visit(first.clone()).await.unwrap();
        assert_eq!(resaved.visit_id, Some(1));
        assert_eq!(store.visit_count(), 2);

        let encounter = Encounter::new(
            patient,
            EncounterType::new(1, "Initial"),
            datetime!(2024-03-01 09:30 UTC),
        );
        let saved = store.save_encounter(encounter).await.unwrap();
        assert_eq!(saved.encounter_id, Some(1));
        assert!(store.get_encounter(1).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_visits_for_patient_sorted_by_start() {
        let store = InMemoryStore::new();
        let vt = VisitType::new(1, "Outpatient");
        for (patient_id, start) in [
            (1, datetime!(2024-03-02 09:00 UTC)),
            (2, datetime!(2024-03-01 09:00 UTC)),
            (1, datetime!(2024-03-01 09:00 UTC)),
        ] {
            store
                .save_visit(Visit::new(Patient::new(patient_id), vt.clone(), start))
                .await
                .unwrap();
        }

        let visits = store.visits_for_patient(1).await.unwrap();
        assert_eq!(visits.len(), 2);
        assert!(visits[0].start_datetime < visits[1].start_datetime);
    }
}
