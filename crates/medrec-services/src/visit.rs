use std::sync::Arc;

use medrec_auth::privileges::{ADD_VISITS, EDIT_VISITS, VIEW_VISIT_TYPES, VIEW_VISITS};
use medrec_auth::{AuthorizationGate, Invocation, OperationDescriptor, OperationProvider, UserContext};
use medrec_core::{Visit, VisitType};

use crate::ServiceResult;
use crate::directory::VisitTypeDirectory;
use crate::store::VisitStore;

pub mod operations {
    pub const LIST_VISIT_TYPES: &str = "visit_type.list";
    pub const LIST_VISITS: &str = "visit.list";
    pub const CREATE: &str = "visit.create";
    pub const UPDATE: &str = "visit.update";
}

const SERVICE: &str = "VisitService";

pub struct VisitService {
    gate: Arc<AuthorizationGate>,
    visit_types: Arc<dyn VisitTypeDirectory>,
    visits: Arc<dyn VisitStore>,
}

impl VisitService {
    pub fn new(
        gate: Arc<AuthorizationGate>,
        visit_types: Arc<dyn VisitTypeDirectory>,
        visits: Arc<dyn VisitStore>,
    ) -> Self {
        Self {
            gate,
            visit_types,
            visits,
        }
    }

    pub async fn all_visit_types(&self, ctx: &UserContext) -> ServiceResult<Vec<VisitType>> {
        self.gate
            .before(ctx, &Invocation::new(SERVICE, operations::LIST_VISIT_TYPES))?;
        self.visit_types.all_visit_types().await
    }

    pub async fn visits_for_patient(
        &self,
        ctx: &UserContext,
        patient_id: i32,
    ) -> ServiceResult<Vec<Visit>> {
        self.gate
            .before(ctx, &Invocation::new(SERVICE, operations::LIST_VISITS))?;
        self.visits.visits_for_patient(patient_id).await
    }

    pub async fn save_visit(&self, ctx: &UserContext, visit: Visit) -> ServiceResult<Visit> {
        let operation = if visit.is_persisted() {
            operations::UPDATE
        } else {
            operations::CREATE
        };
        self.gate.before(ctx, &Invocation::new(SERVICE, operation))?;
        self.visits.save_visit(visit).await
    }
}

pub struct VisitOperations;

impl OperationProvider for VisitOperations {
    fn operations(&self) -> Vec<OperationDescriptor> {
        vec![
            OperationDescriptor::any_of(operations::LIST_VISIT_TYPES, [VIEW_VISIT_TYPES]),
            OperationDescriptor::any_of(operations::LIST_VISITS, [VIEW_VISITS]),
            OperationDescriptor::any_of(operations::CREATE, [ADD_VISITS]),
            OperationDescriptor::any_of(operations::UPDATE, [EDIT_VISITS]),
        ]
        .into_iter()
        .map(|op| op.with_module(self.module_id()))
        .collect()
    }

    fn module_id(&self) -> &str {
        "visits"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::InMemoryDirectory;
    use crate::store::InMemoryStore;
    use medrec_auth::{AuthError, OperationRegistry, Role, RoleDirectory, User};
    use medrec_core::{EncounterType, Patient};
    use time::macros::datetime;

    fn service() -> (VisitService, Arc<RoleDirectory>) {
        let registry = Arc::new(OperationRegistry::new());
        registry.register_provider(&VisitOperations);
        let gate = Arc::new(AuthorizationGate::new(registry));
        let directory = Arc::new(InMemoryDirectory::with_types(
            [VisitType::new(1, "Outpatient")],
            Vec::<EncounterType>::new(),
        ));
        let roles = Arc::new(RoleDirectory::with_roles([
            Role::new("Clerk").with_privileges([VIEW_VISITS, ADD_VISITS]),
        ]));
        let service = VisitService::new(gate, directory, Arc::new(InMemoryStore::new()));
        (service, roles)
    }

    fn visit_at(start: time::OffsetDateTime) -> Visit {
        Visit::new(Patient::new(4), VisitType::new(1, "Outpatient"), start)
    }

    #[tokio::test]
    async fn test_save_and_list_visits() {
        let (service, roles) = service();
        let clerk = UserContext::for_user(roles, User::new(1, "clerk").with_role("Clerk"));

        let later = visit_at(datetime!(2024-03-02 09:00 UTC));
        let earlier = visit_at(datetime!(2024-03-01 09:00 UTC));
        let saved = service.save_visit(&clerk, later).await.unwrap();
        assert!(saved.is_persisted());
        service.save_visit(&clerk, earlier).await.unwrap();

        let visits = service.visits_for_patient(&clerk, 4).await.unwrap();
        assert_eq!(visits.len(), 2);
        assert!(visits[0].start_datetime < visits[1].start_datetime);
    }

    #[tokio::test]
    async fn test_update_and_visit_types_require_their_privileges() {
        let (service, roles) = service();
        let clerk = UserContext::for_user(roles, User::new(1, "clerk").with_role("Clerk"));

        let visit = visit_at(datetime!(2024-03-01 09:00 UTC));
        let saved = service.save_visit(&clerk, visit).await.unwrap();

        let err = service.save_visit(&clerk, saved).await.unwrap_err();
        assert!(matches!(
            err,
            crate::ServiceError::Auth(AuthError::PrivilegesRequired { .. })
        ));
        assert_eq!(err.to_string(), "Privileges required: Edit Visits");

        let err = service.all_visit_types(&clerk).await.unwrap_err();
        assert_eq!(err.to_string(), "Privileges required: View Visit Types");
    }
}
