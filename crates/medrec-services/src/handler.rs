//! Visit assignment for newly created encounters.
//!
//! Before a new encounter is stored, the active [`EncounterVisitHandler`]
//! gets a chance to attach it to a visit:
//!
//! - `none`: leave the encounter alone
//! - `existing`: attach to a visit of the patient that covers the encounter
//! - `existing-or-new`: as `existing`, otherwise create a visit that ends at
//!   the last moment of the encounter's day

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use medrec_config::names::GP_VISIT_ASSIGNMENT_HANDLER;
use medrec_config::{GlobalProperties, GlobalPropertyListener};
use medrec_core::{Encounter, Visit, last_moment_of_day};
use time::UtcOffset;
use tracing::debug;

use crate::cache::EncounterVisitMappingCache;
use crate::directory::VisitTypeDirectory;
use crate::store::VisitStore;
use crate::{ServiceError, ServiceResult};

pub const NO_VISIT_HANDLER: &str = "none";
pub const EXISTING_VISIT_HANDLER: &str = "existing";
pub const EXISTING_OR_NEW_VISIT_HANDLER: &str = "existing-or-new";

#[async_trait]
pub trait EncounterVisitHandler: Send + Sync {
    /// Name used to select this handler.
    fn name(&self) -> &'static str;

    fn display_name(&self) -> &'static str;

    /// Called for encounters that have not been stored yet.
    async fn before_create_encounter(&self, encounter: &mut Encounter) -> ServiceResult<()>;
}

/// Never assigns a visit.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoVisitAssignmentHandler;

#[async_trait]
impl EncounterVisitHandler for NoVisitAssignmentHandler {
    fn name(&self) -> &'static str {
        NO_VISIT_HANDLER
    }

    fn display_name(&self) -> &'static str {
        "Do not assign encounters to visits"
    }

    async fn before_create_encounter(&self, _encounter: &mut Encounter) -> ServiceResult<()> {
        Ok(())
    }
}

/// Attaches the encounter to one of the patient's visits whose interval
/// contains the encounter datetime and whose location is unset or matches.
pub struct ExistingVisitAssignmentHandler {
    visits: Arc<dyn VisitStore>,
}

impl ExistingVisitAssignmentHandler {
    pub fn new(visits: Arc<dyn VisitStore>) -> Self {
        Self { visits }
    }

    async fn find_existing(&self, encounter: &Encounter) -> ServiceResult<Option<Visit>> {
        let visits = self
            .visits
            .visits_for_patient(encounter.patient.patient_id)
            .await?;
        Ok(visits.into_iter().find(|visit| {
            visit.contains(encounter.encounter_datetime)
                && match (&visit.location, &encounter.location) {
                    (None, _) => true,
                    (Some(visit_location), Some(encounter_location)) => {
                        visit_location.location_id == encounter_location.location_id
                    }
                    (Some(_), None) => false,
                }
        }))
    }
}

#[async_trait]
impl EncounterVisitHandler for ExistingVisitAssignmentHandler {
    fn name(&self) -> &'static str {
        EXISTING_VISIT_HANDLER
    }

    fn display_name(&self) -> &'static str {
        "Assign encounters to an existing visit"
    }

    async fn before_create_encounter(&self, encounter: &mut Encounter) -> ServiceResult<()> {
        if encounter.has_visit() {
            return Ok(());
        }
        if let Some(visit) = self.find_existing(encounter).await? {
            debug!(visit = %visit.uuid, encounter = %encounter.uuid, "Assigned encounter to existing visit");
            encounter.attach_visit(visit);
        }
        Ok(())
    }
}

/// Attaches to an existing visit if one matches, otherwise creates a new
/// visit typed by the encounter type mapping.
///
/// The mapping cache is created here and registered with the global
/// properties so mapping changes invalidate it. Dropping the handler
/// unregisters the cache.
pub struct ExistingOrNewVisitAssignmentHandler {
    existing: ExistingVisitAssignmentHandler,
    cache: Arc<EncounterVisitMappingCache>,
    properties: Arc<GlobalProperties>,
    offset: UtcOffset,
}

impl ExistingOrNewVisitAssignmentHandler {
    pub fn new(
        visits: Arc<dyn VisitStore>,
        visit_types: Arc<dyn VisitTypeDirectory>,
        properties: Arc<GlobalProperties>,
        offset: UtcOffset,
    ) -> Self {
        let cache = Arc::new(EncounterVisitMappingCache::new(
            properties.clone(),
            visit_types,
        ));
        properties.add_listener(cache.clone());
        Self {
            existing: ExistingVisitAssignmentHandler::new(visits),
            cache,
            properties,
            offset,
        }
    }

    pub fn cache(&self) -> &Arc<EncounterVisitMappingCache> {
        &self.cache
    }
}

impl Drop for ExistingOrNewVisitAssignmentHandler {
    fn drop(&mut self) {
        let listener: Arc<dyn GlobalPropertyListener> = self.cache.clone();
        self.properties.remove_listener(&listener);
    }
}

#[async_trait]
impl EncounterVisitHandler for ExistingOrNewVisitAssignmentHandler {
    fn name(&self) -> &'static str {
        EXISTING_OR_NEW_VISIT_HANDLER
    }

    fn display_name(&self) -> &'static str {
        "Assign encounters to an existing visit or create a new one"
    }

    async fn before_create_encounter(&self, encounter: &mut Encounter) -> ServiceResult<()> {
        self.existing.before_create_encounter(encounter).await?;
        if encounter.has_visit() {
            return Ok(());
        }

        let visit_type = self.cache.get(&encounter.encounter_type).await?;
        let visit = Visit::new(
            encounter.patient.clone(),
            visit_type,
            encounter.encounter_datetime,
        )
        .with_location(encounter.location.clone())
        .with_stop_datetime(last_moment_of_day(encounter.encounter_datetime, self.offset));

        debug!(
            visit_type = %visit.visit_type.name,
            encounter = %encounter.uuid,
            "Created new visit for encounter"
        );
        encounter.attach_visit(visit);
        Ok(())
    }
}

/// Registered handlers, selected by the `visits.assignmentHandler` global
/// property with a configured fallback name.
pub struct VisitAssignmentHandlers {
    handlers: HashMap<&'static str, Arc<dyn EncounterVisitHandler>>,
    default_handler: String,
    properties: Arc<GlobalProperties>,
}

impl VisitAssignmentHandlers {
    pub fn new(properties: Arc<GlobalProperties>, default_handler: impl Into<String>) -> Self {
        Self {
            handlers: HashMap::new(),
            default_handler: default_handler.into(),
            properties,
        }
    }

    pub fn register(&mut self, handler: Arc<dyn EncounterVisitHandler>) {
        self.handlers.insert(handler.name(), handler);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn EncounterVisitHandler>> {
        self.handlers.get(name).cloned()
    }

    /// Registered handler names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// The handler currently selected.
    pub async fn active(&self) -> ServiceResult<Arc<dyn EncounterVisitHandler>> {
        let name = self
            .properties
            .get_value(GP_VISIT_ASSIGNMENT_HANDLER, &self.default_handler)
            .await?;
        let name = name.trim();
        self.get(name)
            .ok_or_else(|| ServiceError::unknown_handler(name))
    }
}
