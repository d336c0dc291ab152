use crate::properties::GlobalProperty;

/// Receives in-line notifications about changes to selected global
/// properties.
///
/// Callbacks run on the caller's thread while the save or purge is still in
/// progress, so they must be quick and must not call back into
/// [`GlobalProperties`](crate::GlobalProperties).
pub trait GlobalPropertyListener: Send + Sync {
    /// Whether this listener wants events for `property_name`.
    fn supports_property_name(&self, property_name: &str) -> bool;

    /// Called after a supported property was saved.
    fn global_property_changed(&self, property: &GlobalProperty);

    /// Called after a supported property was purged.
    fn global_property_deleted(&self, property_name: &str);
}
