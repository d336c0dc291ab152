//! Wires the in-memory system together from [`AppConfig`].

use std::collections::HashMap;
use std::sync::Arc;

use medrec_auth::privileges::{ANONYMOUS_ROLE, AUTHENTICATED_ROLE, SUPERUSER_ROLE};
use medrec_auth::{
    AuthError, AuthorizationGate, OperationDescriptor, OperationProvider, OperationRegistry, Role,
    RoleDirectory, TracingPrivilegeListener, User, UserContext,
};
use medrec_config::{AppConfig, GlobalProperties, InMemoryGlobalPropertyStore};
use medrec_core::{CoreError, EncounterType, Location, is_numeric_id};
use tracing::info;

use crate::ServiceResult;
use crate::administration::{AdministrationOperations, AdministrationService};
use crate::cache::EncounterVisitMappingCache;
use crate::directory::{EncounterTypeDirectory, InMemoryDirectory};
use crate::encounter::{EncounterOperations, EncounterService};
use crate::handler::{
    ExistingOrNewVisitAssignmentHandler, ExistingVisitAssignmentHandler, NoVisitAssignmentHandler,
    VisitAssignmentHandlers,
};
use crate::order::{OrderNumberGenerator, OrderOperations, OrderSaveHandler, OrderService};
use crate::store::InMemoryStore;
use crate::visit::{VisitOperations, VisitService};

/// A fully wired set of services over in-memory storage.
pub struct MedrecSystem {
    pub properties: Arc<GlobalProperties>,
    pub roles: Arc<RoleDirectory>,
    pub registry: Arc<OperationRegistry>,
    pub gate: Arc<AuthorizationGate>,
    pub directory: Arc<InMemoryDirectory>,
    pub store: Arc<InMemoryStore>,
    pub handlers: Arc<VisitAssignmentHandlers>,
    pub mapping_cache: Arc<EncounterVisitMappingCache>,
    pub encounters: EncounterService,
    pub visits: VisitService,
    pub administration: AdministrationService,
    pub orders: OrderService,
    users: HashMap<String, User>,
    locations: HashMap<i32, Location>,
}

impl MedrecSystem {
    pub fn bootstrap(config: &AppConfig) -> ServiceResult<Self> {
        let offset = config.visits.utc_offset()?;

        let roles = Arc::new(build_roles(config)?);
        let users = build_users(config, &roles)?;

        let properties = Arc::new(GlobalProperties::new(Arc::new(
            InMemoryGlobalPropertyStore::with_properties(config.global_properties.iter().cloned()),
        )));

        let registry = Arc::new(OperationRegistry::new());
        let providers: [&dyn OperationProvider; 4] = [
            &AdministrationOperations,
            &EncounterOperations,
            &OrderOperations,
            &VisitOperations,
        ];
        for provider in providers {
            registry.register_provider(provider);
        }

        let gate = Arc::new(AuthorizationGate::new(registry.clone()));
        gate.add_listener(Arc::new(TracingPrivilegeListener));

        let directory = Arc::new(InMemoryDirectory::with_types(
            config.visit_types.iter().cloned(),
            config.encounter_types.iter().cloned(),
        ));
        let store = Arc::new(InMemoryStore::new());

        let existing_or_new = ExistingOrNewVisitAssignmentHandler::new(
            store.clone(),
            directory.clone(),
            properties.clone(),
            offset,
        );
        let mapping_cache = existing_or_new.cache().clone();

        let mut handlers =
            VisitAssignmentHandlers::new(properties.clone(), config.visits.assignment_handler.clone());
        handlers.register(Arc::new(NoVisitAssignmentHandler));
        handlers.register(Arc::new(ExistingVisitAssignmentHandler::new(store.clone())));
        handlers.register(Arc::new(existing_or_new));
        let handlers = Arc::new(handlers);

        let encounters = EncounterService::new(
            gate.clone(),
            handlers.clone(),
            store.clone(),
            store.clone(),
        );
        let visits = VisitService::new(gate.clone(), directory.clone(), store.clone());
        let administration = AdministrationService::new(gate.clone(), properties.clone());
        let orders = OrderService::new(
            gate.clone(),
            OrderSaveHandler::new(Arc::new(OrderNumberGenerator::new(properties.clone()))),
            store.clone(),
        );

        let locations = config
            .locations
            .iter()
            .map(|l| (l.location_id, l.clone()))
            .collect();

        info!(
            operations = registry.len(),
            roles = roles.len(),
            users = users.len(),
            visit_types = config.visit_types.len(),
            "Medrec services initialized"
        );

        Ok(Self {
            properties,
            roles,
            registry,
            gate,
            directory,
            store,
            handlers,
            mapping_cache,
            encounters,
            visits,
            administration,
            orders,
            users,
            locations,
        })
    }

    pub fn anonymous_context(&self) -> UserContext {
        UserContext::anonymous(self.roles.clone())
    }

    /// A context authenticated as `username`.
    pub fn context_for(&self, username: &str) -> ServiceResult<UserContext> {
        let user = self
            .users
            .get(username)
            .cloned()
            .ok_or_else(|| AuthError::unknown_user(username))?;
        Ok(UserContext::for_user(self.roles.clone(), user))
    }

    pub fn location(&self, location_id: i32) -> Option<Location> {
        self.locations.get(&location_id).cloned()
    }

    pub fn operations(&self) -> Vec<OperationDescriptor> {
        self.registry.list()
    }

    /// Look up an encounter type by id, uuid or name.
    pub async fn find_encounter_type(&self, key: &str) -> ServiceResult<EncounterType> {
        if is_numeric_id(key) {
            if let Ok(id) = key.parse() {
                if let Some(found) = self.directory.encounter_type(id).await? {
                    return Ok(found);
                }
            }
        }
        if let Some(found) = self.directory.encounter_type_by_uuid(key).await? {
            return Ok(found);
        }
        self.directory
            .all_encounter_types()
            .await?
            .into_iter()
            .find(|et| et.name.eq_ignore_ascii_case(key))
            .ok_or_else(|| CoreError::not_found("EncounterType", key).into())
    }
}

fn build_roles(config: &AppConfig) -> ServiceResult<RoleDirectory> {
    let directory = RoleDirectory::with_roles(config.roles.iter().map(|settings| {
        Role::new(settings.name.clone())
            .with_privileges(settings.privileges.iter().cloned())
            .inheriting_all(settings.inherited_roles.iter().cloned())
    }));

    for builtin in [ANONYMOUS_ROLE, AUTHENTICATED_ROLE, SUPERUSER_ROLE] {
        if !directory.contains(builtin) {
            directory.insert(Role::new(builtin));
        }
    }

    for settings in &config.roles {
        for inherited in &settings.inherited_roles {
            if !directory.contains(inherited) {
                return Err(AuthError::unknown_role(inherited.clone()).into());
            }
        }
    }
    Ok(directory)
}

fn build_users(config: &AppConfig, roles: &RoleDirectory) -> ServiceResult<HashMap<String, User>> {
    let mut users = HashMap::new();
    for settings in &config.users {
        let mut user = User::new(settings.user_id, settings.username.clone());
        for role in &settings.roles {
            if !roles.contains(role) {
                return Err(AuthError::unknown_role(role.clone()).into());
            }
            user = user.with_role(role.clone());
        }
        users.insert(user.username.clone(), user);
    }
    Ok(users)
}

#[cfg(test)]
mod tests {
    use super::*;
    use medrec_auth::privileges::ADD_ENCOUNTERS;
    use medrec_config::{RoleSettings, UserSettings};

    fn config() -> AppConfig {
        AppConfig {
            encounter_types: vec![
                EncounterType::new(5, "Return").with_uuid("et-return"),
            ],
            roles: vec![RoleSettings {
                name: "Clinician".into(),
                privileges: vec![ADD_ENCOUNTERS.into()],
                inherited_roles: vec![],
            }],
            users: vec![UserSettings {
                user_id: 1,
                username: "nurse".into(),
                roles: vec!["Clinician".into()],
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_bootstrap_registers_operations_and_builtin_roles() {
        let system = MedrecSystem::bootstrap(&config()).unwrap();
        assert!(system.registry.contains(crate::encounter::operations::CREATE));
        assert!(system.registry.contains(crate::order::operations::CREATE));
        assert!(system.roles.contains(ANONYMOUS_ROLE));
        assert!(system.roles.contains(SUPERUSER_ROLE));
        assert_eq!(system.properties.listener_count(), 1);
    }

    #[test]
    fn test_context_for_known_and_unknown_users() {
        let system = MedrecSystem::bootstrap(&config()).unwrap();
        let ctx = system.context_for("nurse").unwrap();
        assert!(ctx.has_privilege(ADD_ENCOUNTERS));

        let err = system.context_for("ghost").err().unwrap();
        assert_eq!(err.to_string(), "Unknown user: ghost");
    }

    #[test]
    fn test_user_with_undefined_role_is_rejected() {
        let mut config = config();
        config.users[0].roles.push("Ghost".into());
        let err = MedrecSystem::bootstrap(&config).err().unwrap();
        assert_eq!(err.to_string(), "Unknown role: Ghost");
    }

    #[tokio::test]
    async fn test_find_encounter_type() {
        let system = MedrecSystem::bootstrap(&config()).unwrap();
        assert_eq!(system.find_encounter_type("5").await.unwrap().name, "Return");
        assert_eq!(
            system.find_encounter_type("et-return").await.unwrap().encounter_type_id,
            5
        );
        assert_eq!(
            system.find_encounter_type("return").await.unwrap().encounter_type_id,
            5
        );
        assert!(system.find_encounter_type("9").await.is_err());
    }
}
