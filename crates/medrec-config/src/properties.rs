//! Global property administration with change notification.

use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::info;

use crate::ConfigResult;
use crate::events::PropertyChangeEvent;
use crate::listener::GlobalPropertyListener;
use crate::store::GlobalPropertyStore;

/// An administrator-editable configuration value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalProperty {
    pub property: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl GlobalProperty {
    pub fn new(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            value: Some(value.into()),
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Global property service.
///
/// Reads go straight to the store. Writes go to the store first, then to
/// every registered listener that supports the property name, then to the
/// broadcast channel.
pub struct GlobalProperties {
    store: Arc<dyn GlobalPropertyStore>,
    listeners: RwLock<Vec<Arc<dyn GlobalPropertyListener>>>,
    event_bus: broadcast::Sender<PropertyChangeEvent>,
}

impl GlobalProperties {
    pub fn new(store: Arc<dyn GlobalPropertyStore>) -> Self {
        let (event_bus, _) = broadcast::channel(100);
        Self {
            store,
            listeners: RwLock::new(Vec::new()),
            event_bus,
        }
    }

    /// Get a property by name.
    pub async fn get(&self, property: &str) -> ConfigResult<Option<GlobalProperty>> {
        self.store.get(property).await
    }

    /// Get a property's value, or `default` if the property is missing or
    /// has no value.
    pub async fn get_value(&self, property: &str, default: &str) -> ConfigResult<String> {
        Ok(self
            .store
            .get(property)
            .await?
            .and_then(|p| p.value)
            .unwrap_or_else(|| default.to_string()))
    }

    /// All properties ordered by name.
    pub async fn all(&self) -> ConfigResult<Vec<GlobalProperty>> {
        self.store.list().await
    }

    /// Save a property and notify listeners.
    pub async fn save(&self, property: GlobalProperty) -> ConfigResult<GlobalProperty> {
        self.store.save(&property).await?;

        for listener in self.listeners_for(&property.property) {
            listener.global_property_changed(&property);
        }

        let _ = self.event_bus.send(PropertyChangeEvent::set(
            property.property.clone(),
            property.value.clone(),
        ));

        info!(property = %property.property, "Global property saved");
        Ok(property)
    }

    /// Shorthand for saving a property with just a name and value.
    ///
    /// An existing description is kept.
    pub async fn set_value(
        &self,
        property: &str,
        value: impl Into<String>,
    ) -> ConfigResult<GlobalProperty> {
        let description = self.store.get(property).await?.and_then(|p| p.description);
        let mut updated = GlobalProperty::new(property, value);
        updated.description = description;
        self.save(updated).await
    }

    /// Delete a property and notify listeners.
    ///
    /// Listeners are notified even if the property did not exist.
    pub async fn purge(&self, property: &str) -> ConfigResult<bool> {
        let existed = self.store.delete(property).await?;

        for listener in self.listeners_for(property) {
            listener.global_property_deleted(property);
        }

        let _ = self.event_bus.send(PropertyChangeEvent::delete(property));

        info!(property = %property, existed, "Global property purged");
        Ok(existed)
    }

    /// Register a listener.
    pub fn add_listener(&self, listener: Arc<dyn GlobalPropertyListener>) {
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        listeners.push(listener);
        info!(count = listeners.len(), "Registered global property listener");
    }

    /// Remove a previously registered listener. Returns `true` if it was
    /// registered.
    pub fn remove_listener(&self, listener: &Arc<dyn GlobalPropertyListener>) -> bool {
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = listeners.len();
        listeners.retain(|l| !Arc::ptr_eq(l, listener));
        listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Subscribe to property change events.
    pub fn subscribe(&self) -> broadcast::Receiver<PropertyChangeEvent> {
        self.event_bus.subscribe()
    }

    // Snapshot so callbacks run without holding the registry lock.
    fn listeners_for(&self, property: &str) -> Vec<Arc<dyn GlobalPropertyListener>> {
        self.listeners
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .filter(|l| l.supports_property_name(property))
            .cloned()
            .collect()
    }
}
