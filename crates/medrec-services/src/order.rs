//! Drug orders: numbering, validation and guarded persistence.

use std::sync::Arc;

use medrec_auth::privileges::{ADD_ORDERS, EDIT_ORDERS, VIEW_ORDERS};
use medrec_auth::{AuthorizationGate, Invocation, OperationDescriptor, OperationProvider, UserContext};
use medrec_config::GlobalProperties;
use medrec_config::names::GP_NEXT_ORDER_NUMBER_SEED;
use medrec_core::{DrugOrder, Order, ValidationErrors};
use tokio::sync::Mutex;
use tracing::debug;

use crate::store::OrderStore;
use crate::{ServiceError, ServiceResult};

pub const ORDER_NUMBER_PREFIX: &str = "ORD-";

pub mod operations {
    pub const CREATE: &str = "order.create";
    pub const UPDATE: &str = "order.update";
    pub const GET: &str = "order.get";
}

const SERVICE: &str = "OrderService";

/// Issues order numbers from the `order.nextOrderNumberSeed` global property.
pub struct OrderNumberGenerator {
    properties: Arc<GlobalProperties>,
    // Serializes read-increment-write of the seed property.
    lock: Mutex<()>,
}

impl OrderNumberGenerator {
    pub fn new(properties: Arc<GlobalProperties>) -> Self {
        Self {
            properties,
            lock: Mutex::new(()),
        }
    }

    pub async fn next_order_number(&self) -> ServiceResult<String> {
        let _guard = self.lock.lock().await;

        let raw = self
            .properties
            .get_value(GP_NEXT_ORDER_NUMBER_SEED, "1")
            .await?;
        let seed: i64 = raw.trim().parse().map_err(|_| {
            ServiceError::configuration(format!(
                "Global property {GP_NEXT_ORDER_NUMBER_SEED} is not a number: {raw}"
            ))
        })?;
        let next = seed.checked_add(1).ok_or_else(|| {
            ServiceError::configuration(format!(
                "Global property {GP_NEXT_ORDER_NUMBER_SEED} is exhausted: {seed}"
            ))
        })?;

        self.properties
            .set_value(GP_NEXT_ORDER_NUMBER_SEED, next.to_string())
            .await?;

        Ok(format!("{ORDER_NUMBER_PREFIX}{seed}"))
    }
}

/// Fills in order fields that are set on save.
pub struct OrderSaveHandler {
    generator: Arc<OrderNumberGenerator>,
}

impl OrderSaveHandler {
    pub fn new(generator: Arc<OrderNumberGenerator>) -> Self {
        Self { generator }
    }

    /// Assign an order number unless the order already has one.
    pub async fn handle(&self, order: &mut Order) -> ServiceResult<()> {
        if order.order_number.is_none() {
            let number = self.generator.next_order_number().await?;
            debug!(order_number = %number, "Assigned order number");
            order.order_number = Some(number);
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DrugOrderValidator;

impl DrugOrderValidator {
    pub fn validate(&self, order: &DrugOrder) -> ValidationErrors {
        let mut errors = ValidationErrors::new("order");

        match &order.drug {
            None => errors.reject_value("drug", "error.null"),
            Some(drug) if drug.concept.is_none() => {
                errors.reject_value("drug.concept", "error.null");
            }
            Some(_) => {}
        }

        if order.dose.is_some() && order.dose_units.is_none() {
            errors.reject_value("doseUnits", "DrugOrder.error.doseUnitsRequired");
        }
        if order.quantity.is_some() && order.quantity_units.is_none() {
            errors.reject_value("quantityUnits", "DrugOrder.error.quantityUnitsRequired");
        }

        errors
    }
}

pub struct OrderService {
    gate: Arc<AuthorizationGate>,
    validator: DrugOrderValidator,
    save_handler: OrderSaveHandler,
    orders: Arc<dyn OrderStore>,
}

impl OrderService {
    pub fn new(
        gate: Arc<AuthorizationGate>,
        save_handler: OrderSaveHandler,
        orders: Arc<dyn OrderStore>,
    ) -> Self {
        Self {
            gate,
            validator: DrugOrderValidator,
            save_handler,
            orders,
        }
    }

    /// Validate, number and store a drug order.
    pub async fn save_drug_order(
        &self,
        ctx: &UserContext,
        mut order: DrugOrder,
    ) -> ServiceResult<DrugOrder> {
        let operation = if order.order.order_id.is_some() {
            operations::UPDATE
        } else {
            operations::CREATE
        };
        self.gate.before(ctx, &Invocation::new(SERVICE, operation))?;

        self.validator.validate(&order).into_result()?;
        self.save_handler.handle(&mut order.order).await?;
        self.orders.save_drug_order(order).await
    }

    pub async fn get_drug_order(
        &self,
        ctx: &UserContext,
        order_id: i32,
    ) -> ServiceResult<Option<DrugOrder>> {
        self.gate.before(ctx, &Invocation::new(SERVICE, operations::GET))?;
        self.orders.get_drug_order(order_id).await
    }
}

pub struct OrderOperations;

impl OperationProvider for OrderOperations {
    fn operations(&self) -> Vec<OperationDescriptor> {
        vec![
            OperationDescriptor::any_of(operations::CREATE, [ADD_ORDERS]),
            OperationDescriptor::any_of(operations::UPDATE, [EDIT_ORDERS]),
            OperationDescriptor::any_of(operations::GET, [VIEW_ORDERS]),
        ]
        .into_iter()
        .map(|op| op.with_module(self.module_id()))
        .collect()
    }

    fn module_id(&self) -> &str {
        "orders"
    }
}
