//! Guarded access to global properties.

use std::sync::Arc;

use medrec_auth::privileges::{MANAGE_GLOBAL_PROPERTIES, VIEW_GLOBAL_PROPERTIES};
use medrec_auth::{AuthorizationGate, Invocation, OperationDescriptor, OperationProvider, UserContext};
use medrec_config::{GlobalProperties, GlobalProperty};

use crate::ServiceResult;

pub mod operations {
    pub const GET: &str = "global_property.get";
    pub const LIST: &str = "global_property.list";
    pub const SAVE: &str = "global_property.save";
    pub const PURGE: &str = "global_property.purge";
}

const SERVICE: &str = "AdministrationService";

pub struct AdministrationService {
    gate: Arc<AuthorizationGate>,
    properties: Arc<GlobalProperties>,
}

impl AdministrationService {
    pub fn new(gate: Arc<AuthorizationGate>, properties: Arc<GlobalProperties>) -> Self {
        Self { gate, properties }
    }

    pub async fn get_global_property(
        &self,
        ctx: &UserContext,
        property: &str,
    ) -> ServiceResult<Option<GlobalProperty>> {
        self.gate.before(ctx, &Invocation::new(SERVICE, operations::GET))?;
        Ok(self.properties.get(property).await?)
    }

    pub async fn get_global_property_value(
        &self,
        ctx: &UserContext,
        property: &str,
        default: &str,
    ) -> ServiceResult<String> {
        self.gate.before(ctx, &Invocation::new(SERVICE, operations::GET))?;
        Ok(self.properties.get_value(property, default).await?)
    }

    pub async fn all_global_properties(
        &self,
        ctx: &UserContext,
    ) -> ServiceResult<Vec<GlobalProperty>> {
        self.gate.before(ctx, &Invocation::new(SERVICE, operations::LIST))?;
        Ok(self.properties.all().await?)
    }

    pub async fn save_global_property(
        &self,
        ctx: &UserContext,
        property: GlobalProperty,
    ) -> ServiceResult<GlobalProperty> {
        self.gate.before(ctx, &Invocation::new(SERVICE, operations::SAVE))?;
        Ok(self.properties.save(property).await?)
    }

    pub async fn set_global_property_value(
        &self,
        ctx: &UserContext,
        property: &str,
        value: &str,
    ) -> ServiceResult<GlobalProperty> {
        self.gate.before(ctx, &Invocation::new(SERVICE, operations::SAVE))?;
        Ok(self.properties.set_value(property, value).await?)
    }

    /// Delete a property. Returns `true` if it existed.
    pub async fn purge_global_property(
        &self,
        ctx: &UserContext,
        property: &str,
    ) -> ServiceResult<bool> {
        self.gate.before(ctx, &Invocation::new(SERVICE, operations::PURGE))?;
        Ok(self.properties.purge(property).await?)
    }
}

pub struct AdministrationOperations;

impl OperationProvider for AdministrationOperations {
    fn operations(&self) -> Vec<OperationDescriptor> {
        vec![
            OperationDescriptor::any_of(operations::GET, [VIEW_GLOBAL_PROPERTIES]),
            OperationDescriptor::any_of(operations::LIST, [VIEW_GLOBAL_PROPERTIES]),
            OperationDescriptor::any_of(operations::SAVE, [MANAGE_GLOBAL_PROPERTIES]),
            OperationDescriptor::any_of(operations::PURGE, [MANAGE_GLOBAL_PROPERTIES]),
        ]
        .into_iter()
        .map(|op| op.with_module(self.module_id()))
        .collect()
    }

    fn module_id(&self) -> &str {
        "administration"
    }
}
