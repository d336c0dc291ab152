use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::patient::Patient;
use crate::id::generate_uuid;

/// A coded clinical concept.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Concept {
    pub concept_id: i32,
    #[serde(default = "generate_uuid")]
    pub uuid: String,
    pub name: String,
}

impl Concept {
    pub fn new(concept_id: i32, name: impl Into<String>) -> Self {
        Self {
            concept_id,
            uuid: generate_uuid(),
            name: name.into(),
        }
    }
}

/// A formulation of a drug concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drug {
    pub drug_id: i32,
    #[serde(default = "generate_uuid")]
    pub uuid: String,
    pub name: String,
    pub concept: Option<Concept>,
}

impl Drug {
    pub fn new(drug_id: i32, name: impl Into<String>, concept: Option<Concept>) -> Self {
        Self {
            drug_id,
            uuid: generate_uuid(),
            name: name.into(),
            concept,
        }
    }
}

/// A clinical order placed for a patient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: Option<i32>,
    #[serde(default = "generate_uuid")]
    pub uuid: String,
    pub order_number: Option<String>,
    pub concept: Option<Concept>,
    pub patient: Option<Patient>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub start_date: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub auto_expire_date: Option<OffsetDateTime>,
}

impl Order {
    pub fn new() -> Self {
        Self {
            uuid: generate_uuid(),
            ..Default::default()
        }
    }
}

/// An order for a specific drug, with optional dosing and dispensing details.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrugOrder {
    #[serde(flatten)]
    pub order: Order,
    pub drug: Option<Drug>,
    pub dose: Option<f64>,
    pub dose_units: Option<String>,
    pub quantity: Option<i32>,
    pub quantity_units: Option<String>,
}

impl DrugOrder {
    pub fn new() -> Self {
        Self {
            order: Order::new(),
            ..Default::default()
        }
    }
}
