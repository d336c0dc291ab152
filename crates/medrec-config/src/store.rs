//! Global property persistence.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::ConfigResult;
use crate::properties::GlobalProperty;

/// Storage backend for global properties.
#[async_trait]
pub trait GlobalPropertyStore: Send + Sync {
    /// Get a property by name.
    async fn get(&self, property: &str) -> ConfigResult<Option<GlobalProperty>>;

    /// Insert or replace a property.
    async fn save(&self, property: &GlobalProperty) -> ConfigResult<()>;

    /// Delete a property. Returns `true` if it existed.
    async fn delete(&self, property: &str) -> ConfigResult<bool>;

    /// List all properties ordered by name.
    async fn list(&self) -> ConfigResult<Vec<GlobalProperty>>;
}

/// In-memory [`GlobalPropertyStore`] backed by a concurrent map.
#[derive(Debug, Default)]
pub struct InMemoryGlobalPropertyStore {
    properties: DashMap<String, GlobalProperty>,
}

impl InMemoryGlobalPropertyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `properties`.
    pub fn with_properties(properties: impl IntoIterator<Item = GlobalProperty>) -> Self {
        let store = Self::new();
        for property in properties {
            store.properties.insert(property.property.clone(), property);
        }
        store
    }
}

#[async_trait]
impl GlobalPropertyStore for InMemoryGlobalPropertyStore {
    async fn get(&self, property: &str) -> ConfigResult<Option<GlobalProperty>> {
        Ok(self.properties.get(property).map(|p| p.value().clone()))
    }

    async fn save(&self, property: &GlobalProperty) -> ConfigResult<()> {
        self.properties
            .insert(property.property.clone(), property.clone());
        Ok(())
    }

    async fn delete(&self, property: &str) -> ConfigResult<bool> {
        Ok(self.properties.remove(property).is_some())
    }

    async fn list(&self) -> ConfigResult<Vec<GlobalProperty>> {
        let mut all: Vec<GlobalProperty> = self
            .properties
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        all.sort_by(|a, b| a.property.cmp(&b.property));
        Ok(all)
    }
}
