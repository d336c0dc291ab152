use std::sync::Arc;

use medrec_auth::privileges::{ADD_ENCOUNTERS, EDIT_ENCOUNTERS, VIEW_ENCOUNTERS};
use medrec_auth::{AuthorizationGate, Invocation, OperationDescriptor, OperationProvider, UserContext};
use medrec_core::Encounter;
use tracing::info;

use crate::ServiceResult;
use crate::handler::VisitAssignmentHandlers;
use crate::store::{EncounterStore, VisitStore};

pub mod operations {
    pub const CREATE: &str = "encounter.create";
    pub const UPDATE: &str = "encounter.update";
    pub const GET: &str = "encounter.get";
}

const SERVICE: &str = "EncounterService";

pub struct EncounterService {
    gate: Arc<AuthorizationGate>,
    handlers: Arc<VisitAssignmentHandlers>,
    encounters: Arc<dyn EncounterStore>,
    visits: Arc<dyn VisitStore>,
}

impl EncounterService {
    pub fn new(
        gate: Arc<AuthorizationGate>,
        handlers: Arc<VisitAssignmentHandlers>,
        encounters: Arc<dyn EncounterStore>,
        visits: Arc<dyn VisitStore>,
    ) -> Self {
        Self {
            gate,
            handlers,
            encounters,
            visits,
        }
    }

    /// Save an encounter.
    ///
    /// New encounters first go through the active visit assignment handler.
    /// A visit created by the handler is stored before the encounter.
    pub async fn save_encounter(
        &self,
        ctx: &UserContext,
        mut encounter: Encounter,
    ) -> ServiceResult<Encounter> {
        let is_new = !encounter.is_persisted();
        let operation = if is_new {
            operations::CREATE
        } else {
            operations::UPDATE
        };
        self.gate.before(ctx, &Invocation::new(SERVICE, operation))?;

        if is_new {
            let handler = self.handlers.active().await?;
            handler.before_create_encounter(&mut encounter).await?;
        }

        if let Some(visit) = encounter.visit.as_ref().filter(|v| !v.is_persisted()) {
            let saved = self.visits.save_visit(visit.clone()).await?;
            info!(visit_id = ?saved.visit_id, visit_type = %saved.visit_type.name, "Saved new visit");
            encounter.visit = Some(saved);
        }

        let saved = self.encounters.save_encounter(encounter).await?;
        info!(encounter_id = ?saved.encounter_id, "Saved encounter");
        Ok(saved)
    }

    pub async fn get_encounter(
        &self,
        ctx: &UserContext,
        encounter_id: i32,
    ) -> ServiceResult<Option<Encounter>> {
        self.gate.before(ctx, &Invocation::new(SERVICE, operations::GET))?;
        self.encounters.get_encounter(encounter_id).await
    }
}

/// Operations guarded by [`EncounterService`].
pub struct EncounterOperations;

impl OperationProvider for EncounterOperations {
    fn operations(&self) -> Vec<OperationDescriptor> {
        vec![
            OperationDescriptor::any_of(operations::CREATE, [ADD_ENCOUNTERS])
                .with_description("Create an encounter"),
            OperationDescriptor::any_of(operations::UPDATE, [EDIT_ENCOUNTERS])
                .with_description("Update an encounter"),
            OperationDescriptor::any_of(operations::GET, [VIEW_ENCOUNTERS])
                .with_description("Read an encounter"),
        ]
        .into_iter()
        .map(|op| op.with_module(self.module_id()))
        .collect()
    }

    fn module_id(&self) -> &str {
        "encounters"
    }
}
