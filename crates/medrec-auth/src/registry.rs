//! Operation registry.
//!
//! Maps operation IDs to their authorization requirements. Populated at
//! startup from every service's [`OperationProvider`].

use dashmap::DashMap;
use tracing::{debug, info, warn};

use crate::descriptor::{OperationDescriptor, OperationProvider};

#[derive(Debug, Default)]
pub struct OperationRegistry {
    operations: DashMap<String, OperationDescriptor>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one operation, replacing any previous descriptor with the
    /// same ID.
    pub fn register(&self, descriptor: OperationDescriptor) {
        debug!(operation = %descriptor.id, "Registering operation");
        if let Some(previous) = self.operations.insert(descriptor.id.clone(), descriptor) {
            warn!(operation = %previous.id, "Replaced existing operation descriptor");
        }
    }

    /// Register every operation exposed by `provider`. Returns how many
    /// were registered.
    pub fn register_provider(&self, provider: &dyn OperationProvider) -> usize {
        let operations = provider.operations();
        let count = operations.len();
        for descriptor in operations {
            self.register(descriptor);
        }
        info!(module = %provider.module_id(), count, "Collected operations from provider");
        count
    }

    pub fn get(&self, id: &str) -> Option<OperationDescriptor> {
        self.operations.get(id).map(|d| d.value().clone())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.operations.contains_key(id)
    }

    /// All descriptors ordered by ID.
    pub fn list(&self) -> Vec<OperationDescriptor> {
        let mut all: Vec<_> = self
            .operations
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestProvider;

    impl OperationProvider for TestProvider {
        fn operations(&self) -> Vec<OperationDescriptor> {
            vec![
                OperationDescriptor::any_of("b.save", ["Edit B"]).with_module("test"),
                OperationDescriptor::authenticated("a.list").with_module("test"),
            ]
        }

        fn module_id(&self) -> &str {
            "test"
        }
    }

    #[test]
    fn test_register_provider() {
        let registry = OperationRegistry::new();
        assert!(registry.is_empty());

        assert_eq!(registry.register_provider(&TestProvider), 2);
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("a.list"));

        let ids: Vec<_> = registry.list().into_iter().map(|d| d.id).collect();
        assert_eq!(ids, vec!["a.list", "b.save"]);
    }

    #[test]
    fn test_register_replaces() {
        let registry = OperationRegistry::new();
        registry.register(OperationDescriptor::any_of("x", ["One"]));
        registry.register(OperationDescriptor::any_of("x", ["Two"]));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("x").unwrap().privileges, vec!["Two"]);
        assert!(registry.get("y").is_none());
    }
}
