//! Well-known global property names.

/// Comma separated `encounterType:visitType` pairs (ids or uuids) used when a
/// new visit has to be created for an encounter.
pub const GP_ENCOUNTER_TYPE_TO_VISIT_TYPE_MAPPING: &str = "visits.encounterTypeToVisitTypeMapping";

/// Name of the visit assignment handler run before an encounter is created.
pub const GP_VISIT_ASSIGNMENT_HANDLER: &str = "visits.assignmentHandler";

/// Next number handed out by the order number generator.
pub const GP_NEXT_ORDER_NUMBER_SEED: &str = "order.nextOrderNumberSeed";

/// Log filter applied at runtime (e.g. `info`, `medrec_services=debug`).
pub const GP_LOG_LEVEL: &str = "log.level";
