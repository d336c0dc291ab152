// Tracing initialization with a log level that can be changed at runtime.
use std::sync::OnceLock;

use medrec_config::names::GP_LOG_LEVEL;
use medrec_config::{PropertyChangeEvent, PropertyOperation};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

static LOG_RELOAD_HANDLE: OnceLock<reload::Handle<EnvFilter, tracing_subscriber::Registry>> =
    OnceLock::new();

pub fn init_tracing_with_level(level: &str) {
    // RUST_LOG overrides the configured level.
    let base_filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|_| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(level));

    let (reload_layer, handle) = reload::Layer::new(base_filter);
    let _ = LOG_RELOAD_HANDLE.set(handle);

    let _ = tracing_subscriber::registry()
        .with(reload_layer)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Swap the active filter. No-op before `init_tracing_with_level`.
pub fn apply_logging_level(level: &str) {
    if let Some(handle) = LOG_RELOAD_HANDLE.get() {
        let _ = handle.modify(|f| {
            *f = EnvFilter::new(level);
        });
    }
}

/// Level a property change event selects, if the event is about
/// `log.level`. Deleting or blanking the property restores the configured
/// level.
pub fn level_for_event(event: &PropertyChangeEvent, configured_level: &str) -> Option<String> {
    if event.property != GP_LOG_LEVEL {
        return None;
    }
    let level = match event.operation {
        PropertyOperation::Set => event
            .new_value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(configured_level),
        PropertyOperation::Delete => configured_level,
    };
    Some(level.to_string())
}

/// Spawn a task applying `log.level` changes from the property change bus.
///
/// The task ends when the bus closes.
pub fn start_log_level_watcher(
    mut rx: broadcast::Receiver<PropertyChangeEvent>,
    configured_level: String,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        debug!("Log level watcher started");
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if let Some(level) = level_for_event(&event, &configured_level) {
                        apply_logging_level(&level);
                        info!(level = %level, operation = %event.operation, "Logging level changed");
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Log level watcher lagged behind property changes");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        debug!("Log level watcher stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use medrec_config::{GlobalProperties, InMemoryGlobalPropertyStore};

    #[test]
    fn test_level_for_event() {
        let set = PropertyChangeEvent::set(GP_LOG_LEVEL, Some(" debug ".into()));
        assert_eq!(level_for_event(&set, "info").as_deref(), Some("debug"));

        let blank = PropertyChangeEvent::set(GP_LOG_LEVEL, Some("  ".into()));
        assert_eq!(level_for_event(&blank, "info").as_deref(), Some("info"));

        let deleted = PropertyChangeEvent::delete(GP_LOG_LEVEL);
        assert_eq!(level_for_event(&deleted, "warn").as_deref(), Some("warn"));

        let other = PropertyChangeEvent::set("visits.assignmentHandler", Some("none".into()));
        assert_eq!(level_for_event(&other, "info"), None);
    }

    #[tokio::test]
    async fn test_watcher_stops_when_properties_are_dropped() {
        let properties = GlobalProperties::new(Arc::new(InMemoryGlobalPropertyStore::new()));
        let watcher = start_log_level_watcher(properties.subscribe(), "info".to_string());

        properties.set_value(GP_LOG_LEVEL, "debug").await.unwrap();
        drop(properties);

        watcher.await.unwrap();
    }
}
