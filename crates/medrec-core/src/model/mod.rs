//! Clinical domain model: patients, locations, encounters, visits and orders.

pub mod encounter;
pub mod order;
pub mod patient;
pub mod visit;

pub use encounter::{Encounter, EncounterType};
pub use order::{Concept, Drug, DrugOrder, Order};
pub use patient::{Location, Patient};
pub use visit::{Visit, VisitType};
