//! Core domain types and utilities shared by the medrec crates.

pub mod error;
pub mod id;
pub mod model;
pub mod time;
pub mod validation;

pub use error::{CoreError, CoreResult};
pub use id::{generate_uuid, is_numeric_id, validate_uuid};
pub use model::{
    Concept, Drug, DrugOrder, Encounter, EncounterType, Location, Order, Patient, Visit, VisitType,
};
pub use crate::time::{last_moment_of_day, now_utc, parse_utc_offset, start_of_day};
pub use validation::{FieldError, ValidationErrors};
