//! The persisted key/value store behind the reactive settings.

use parking_lot::Mutex;
use spacebar_core::Disposer;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, trace};

use super::errors::SettingsError;
use super::value::{SettingKind, SettingValue};

/// Invoked with the key whose value changed.
pub type ChangeHandler = Arc<dyn Fn(&str) + Send + Sync + 'static>;

/// A key/value settings backend with per-key change notification.
///
/// Implementations must not hold internal locks while invoking change handlers:
/// handlers routinely read the store again.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Option<SettingValue>;

    fn set(&self, key: &str, value: SettingValue) -> Result<(), SettingsError>;

    /// Restores the schema default of `key`.
    fn reset(&self, key: &str) -> Result<(), SettingsError>;

    fn connect_changed(&self, key: &str, handler: ChangeHandler) -> Disposer;
}

struct StoreInner {
    defaults: HashMap<String, SettingValue>,
    values: Mutex<HashMap<String, SettingValue>>,
    handlers: Mutex<HashMap<String, Vec<(u64, ChangeHandler)>>>,
    next_handler_id: AtomicU64,
}

impl StoreInner {
    fn emit_changed(&self, key: &str) {
        let handlers: Vec<ChangeHandler> = self
            .handlers
            .lock()
            .get(key)
            .map(|entries| entries.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default();
        trace!(key, handlers = handlers.len(), "Setting changed");
        for handler in handlers {
            handler(key);
        }
    }

    fn disconnect(&self, key: &str, id: u64) {
        if let Some(entries) = self.handlers.lock().get_mut(key) {
            entries.retain(|(entry_id, _)| *entry_id != id);
        }
    }
}

/// An in-process [`SettingsStore`] with a fixed schema of keys and defaults.
///
/// Writing a value equal to the current one does not emit a change.
#[derive(Clone)]
pub struct InMemorySettingsStore {
    inner: Arc<StoreInner>,
}

impl InMemorySettingsStore {
    pub fn with_defaults<I, K>(defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, SettingValue)>,
        K: Into<String>,
    {
        Self {
            inner: Arc::new(StoreInner {
                defaults: defaults.into_iter().map(|(k, v)| (k.into(), v)).collect(),
                values: Mutex::new(HashMap::new()),
                handlers: Mutex::new(HashMap::new()),
                next_handler_id: AtomicU64::new(1),
            }),
        }
    }

    /// Number of live change handlers for `key`.
    pub fn handler_count(&self, key: &str) -> usize {
        self.inner.handlers.lock().get(key).map_or(0, Vec::len)
    }

    fn check_key(&self, key: &str) -> Result<&SettingValue, SettingsError> {
        self.inner
            .defaults
            .get(key)
            .ok_or_else(|| SettingsError::UnknownKey(key.to_string()))
    }
}

impl SettingsStore for InMemorySettingsStore {
    fn get(&self, key: &str) -> Option<SettingValue> {
        let default = self.inner.defaults.get(key)?;
        Some(
            self.inner
                .values
                .lock()
                .get(key)
                .cloned()
                .unwrap_or_else(|| default.clone()),
        )
    }

    fn set(&self, key: &str, value: SettingValue) -> Result<(), SettingsError> {
        let default = self.check_key(key)?;
        if !default.same_representation(&value) {
            return Err(SettingsError::TypeMismatch {
                key: key.to_string(),
                expected: match default {
                    SettingValue::Boolean(_) => SettingKind::Boolean,
                    SettingValue::String(_) => SettingKind::String,
                    SettingValue::StringArray(_) => SettingKind::StringArray,
                },
                details: format!("cannot store a {} value", value.kind_name()),
            });
        }
        let changed = {
            let mut values = self.inner.values.lock();
            let current = values.get(key).unwrap_or(default);
            if *current == value {
                false
            } else {
                values.insert(key.to_string(), value);
                true
            }
        };
        if changed {
            debug!(key, "Setting written");
            self.inner.emit_changed(key);
        }
        Ok(())
    }

    fn reset(&self, key: &str) -> Result<(), SettingsError> {
        let default = self.check_key(key)?.clone();
        self.set(key, default)?;
        self.inner.values.lock().remove(key);
        Ok(())
    }

    fn connect_changed(&self, key: &str, handler: ChangeHandler) -> Disposer {
        let id = self.inner.next_handler_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .handlers
            .lock()
            .entry(key.to_string())
            .or_default()
            .push((id, handler));
        let weak: Weak<StoreInner> = Arc::downgrade(&self.inner);
        let key = key.to_string();
        Disposer::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.disconnect(&key, id);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn store() -> InMemorySettingsStore {
        InMemorySettingsStore::with_defaults([
            ("show-empty-workspaces", SettingValue::Boolean(false)),
            ("workspace-names", SettingValue::StringArray(vec![])),
        ])
    }

    fn count_changes(store: &InMemorySettingsStore, key: &str) -> (Arc<AtomicUsize>, Disposer) {
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        let disposer = store.connect_changed(
            key,
            Arc::new(move |_| {
                count_clone.fetch_add(1, Ordering::SeqCst);
            }),
        );
        (count, disposer)
    }

    #[test]
    fn test_get_returns_default_until_set() {
        let store = store();
        assert_eq!(store.get("show-empty-workspaces"), Some(SettingValue::Boolean(false)));
        store.set("show-empty-workspaces", SettingValue::Boolean(true)).unwrap();
        assert_eq!(store.get("show-empty-workspaces"), Some(SettingValue::Boolean(true)));
        assert_eq!(store.get("missing"), None);
    }

    #[test]
    fn test_set_emits_only_on_change() {
        let store = store();
        let (count, _disposer) = count_changes(&store, "show-empty-workspaces");

        store.set("show-empty-workspaces", SettingValue::Boolean(false)).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 0);
        store.set("show-empty-workspaces", SettingValue::Boolean(true)).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_set_rejects_unknown_key_and_wrong_type() {
        let store = store();
        assert_eq!(
            store.set("nope", SettingValue::Boolean(true)),
            Err(SettingsError::UnknownKey("nope".into()))
        );
        assert!(matches!(
            store.set("workspace-names", SettingValue::Boolean(true)),
            Err(SettingsError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_disposer_disconnects_handler() {
        let store = store();
        let (count, disposer) = count_changes(&store, "workspace-names");
        assert_eq!(store.handler_count("workspace-names"), 1);

        disposer.dispose();
        store.set("workspace-names", SettingValue::StringArray(vec!["Work".into()])).unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert_eq!(store.handler_count("workspace-names"), 0);
    }

    #[test]
    fn test_reset_restores_default() {
        let store = store();
        store.set("show-empty-workspaces", SettingValue::Boolean(true)).unwrap();
        let (count, _disposer) = count_changes(&store, "show-empty-workspaces");

        store.reset("show-empty-workspaces").unwrap();

        assert_eq!(store.get("show-empty-workspaces"), Some(SettingValue::Boolean(false)));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handler_may_read_store_reentrantly() {
        let store = store();
        let seen = Arc::new(Mutex::new(None));
        let (store_clone, seen_clone) = (store.clone(), seen.clone());
        let _disposer = store.connect_changed(
            "workspace-names",
            Arc::new(move |key| {
                *seen_clone.lock() = store_clone.get(key);
            }),
        );

        store.set("workspace-names", SettingValue::StringArray(vec!["Play".into()])).unwrap();

        assert_eq!(*seen.lock(), Some(SettingValue::StringArray(vec!["Play".into()])));
    }
}
