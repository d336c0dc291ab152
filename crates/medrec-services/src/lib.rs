//! Guarded medrec services.
//!
//! Every public service method runs the [`AuthorizationGate`] first. New
//! encounters are routed through the active visit assignment handler, which
//! may attach them to an existing visit or create one typed by the
//! `visits.encounterTypeToVisitTypeMapping` global property.
//!
//! [`AuthorizationGate`]: medrec_auth::AuthorizationGate

pub mod administration;
pub mod bootstrap;
pub mod cache;
pub mod directory;
pub mod encounter;
pub mod error;
pub mod handler;
pub mod mapping;
pub mod order;
pub mod store;
pub mod visit;

pub use administration::AdministrationService;
pub use bootstrap::MedrecSystem;
pub use cache::EncounterVisitMappingCache;
pub use directory::{EncounterTypeDirectory, InMemoryDirectory, VisitTypeDirectory};
pub use encounter::EncounterService;
pub use error::{ServiceError, ServiceResult};
pub use handler::{
    EncounterVisitHandler, ExistingOrNewVisitAssignmentHandler, ExistingVisitAssignmentHandler,
    NoVisitAssignmentHandler, VisitAssignmentHandlers,
};
pub use order::{DrugOrderValidator, OrderNumberGenerator, OrderSaveHandler, OrderService};
pub use store::{EncounterStore, InMemoryStore, OrderStore, VisitStore};
pub use visit::VisitService;
