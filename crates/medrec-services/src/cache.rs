//! Cache of resolved encounter type to visit type mappings.

use std::sync::Arc;

use arc_swap::ArcSwap;
use dashmap::DashMap;
use medrec_config::names::GP_ENCOUNTER_TYPE_TO_VISIT_TYPE_MAPPING;
use medrec_config::{GlobalProperties, GlobalProperty, GlobalPropertyListener};
use medrec_core::{EncounterType, VisitType};
use tracing::{debug, info};

use crate::directory::VisitTypeDirectory;
use crate::mapping::resolve_visit_type;
use crate::{ServiceError, ServiceResult};

/// Resolved visit types keyed by encounter type id.
///
/// Entries are loaded on first use from the mapping global property and
/// dropped wholesale when that property changes. Invalidation swaps in a
/// fresh map; a load that races with it writes into the discarded map.
pub struct EncounterVisitMappingCache {
    entries: ArcSwap<DashMap<i32, VisitType>>,
    properties: Arc<GlobalProperties>,
    visit_types: Arc<dyn VisitTypeDirectory>,
}

impl EncounterVisitMappingCache {
    pub fn new(
        properties: Arc<GlobalProperties>,
        visit_types: Arc<dyn VisitTypeDirectory>,
    ) -> Self {
        Self {
            entries: ArcSwap::from_pointee(DashMap::new()),
            properties,
            visit_types,
        }
    }

    /// Visit type mapped to `encounter_type`, loading it on a miss.
    pub async fn get(&self, encounter_type: &EncounterType) -> ServiceResult<VisitType> {
        let generation = self.entries.load_full();
        if let Some(hit) = generation.get(&encounter_type.encounter_type_id) {
            debug!(encounter_type = %encounter_type.name, "Visit type mapping cache hit");
            return Ok(hit.value().clone());
        }

        debug!(encounter_type = %encounter_type.name, "Visit type mapping cache miss");
        let visit_type = self.load(encounter_type).await.map_err(|err| match err {
            ServiceError::Configuration { .. } => err,
            other => ServiceError::configuration(format!(
                "Error getting mapping encounter type - visit type from cache: {other}"
            )),
        })?;
        generation.insert(encounter_type.encounter_type_id, visit_type.clone());
        Ok(visit_type)
    }

    /// Drop every cached entry.
    pub fn invalidate_all(&self) {
        self.entries.store(Arc::new(DashMap::new()));
        info!("Visit type mapping cache invalidated");
    }

    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.load().is_empty()
    }

    async fn load(&self, encounter_type: &EncounterType) -> ServiceResult<VisitType> {
        let mapping = self
            .properties
            .get_value(GP_ENCOUNTER_TYPE_TO_VISIT_TYPE_MAPPING, "")
            .await?;
        resolve_visit_type(&mapping, encounter_type, self.visit_types.as_ref()).await
    }
}

impl GlobalPropertyListener for EncounterVisitMappingCache {
    fn supports_property_name(&self, property_name: &str) -> bool {
        property_name == GP_ENCOUNTER_TYPE_TO_VISIT_TYPE_MAPPING
    }

    fn global_property_changed(&self, _property: &GlobalProperty) {
        self.invalidate_all();
    }

    fn global_property_deleted(&self, _property_name: &str) {
        self.invalidate_all();
    }
}
