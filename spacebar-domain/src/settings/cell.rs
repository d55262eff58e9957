//! Typed reactive views over single settings keys.

use parking_lot::Mutex;
use spacebar_core::Disposer;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::{error, trace};

use super::errors::SettingsError;
use super::store::SettingsStore;
use super::value::SettingType;

/// Listener invoked with the new value of an [`Observable`].
pub type ValueCallback<T> = Arc<dyn Fn(&T) + Send + Sync + 'static>;

/// A value that can be read, written and observed.
pub trait Observable<T>: Send + Sync {
    fn value(&self) -> T;

    fn set_value(&self, value: T);

    /// Registers `callback` for future changes. With `emit_current_value` the
    /// callback is also invoked once right away with the current value.
    fn subscribe(&self, callback: ValueCallback<T>, emit_current_value: bool) -> Disposer;
}

struct CellInner<T> {
    store: Arc<dyn SettingsStore>,
    key: String,
    value: Mutex<T>,
    subscribers: Mutex<Vec<(u64, ValueCallback<T>)>>,
    next_subscriber_id: AtomicU64,
    store_connection: Mutex<Option<Disposer>>,
}

impl<T: SettingType> CellInner<T> {
    fn read(store: &dyn SettingsStore, key: &str) -> Result<T, SettingsError> {
        let raw = store
            .get(key)
            .ok_or_else(|| SettingsError::UnknownKey(key.to_string()))?;
        T::from_setting(&raw).map_err(|details| SettingsError::TypeMismatch {
            key: key.to_string(),
            expected: T::KIND,
            details,
        })
    }

    fn on_store_changed(&self) {
        let value = match Self::read(self.store.as_ref(), &self.key) {
            Ok(value) => value,
            // A stored value the declared cell type cannot hold means the
            // settings schema and the code disagree.
            Err(err) => panic!("settings schema mismatch: {}", err),
        };
        *self.value.lock() = value.clone();
        let subscribers: Vec<ValueCallback<T>> =
            self.subscribers.lock().iter().map(|(_, cb)| cb.clone()).collect();
        trace!(key = %self.key, subscribers = subscribers.len(), "Notifying setting subscribers");
        for subscriber in subscribers {
            subscriber(&value);
        }
    }
}

/// A [`SettingType`] value bound to one key of a [`SettingsStore`].
///
/// The current value is cached and refreshed whenever the store reports a
/// change to the key, after which every subscriber receives the new value.
pub struct ReactiveSetting<T: SettingType> {
    inner: Arc<CellInner<T>>,
}

impl<T: SettingType> Clone for ReactiveSetting<T> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<T: SettingType> ReactiveSetting<T> {
    /// Reads the current value of `key` and starts following its changes.
    ///
    /// # Errors
    ///
    /// [`SettingsError::UnknownKey`] if the store has no such key and
    /// [`SettingsError::TypeMismatch`] if its value cannot be read as `T`.
    pub fn bind(store: Arc<dyn SettingsStore>, key: &str) -> Result<Self, SettingsError> {
        let initial = CellInner::<T>::read(store.as_ref(), key)?;
        let inner = Arc::new(CellInner {
            store: store.clone(),
            key: key.to_string(),
            value: Mutex::new(initial),
            subscribers: Mutex::new(Vec::new()),
            next_subscriber_id: AtomicU64::new(1),
            store_connection: Mutex::new(None),
        });
        let weak: Weak<CellInner<T>> = Arc::downgrade(&inner);
        let connection = store.connect_changed(
            key,
            Arc::new(move |_| {
                if let Some(inner) = weak.upgrade() {
                    inner.on_store_changed();
                }
            }),
        );
        *inner.store_connection.lock() = Some(connection);
        Ok(Self { inner })
    }

    pub fn key(&self) -> &str {
        &self.inner.key
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().len()
    }

    /// Stops following the store and drops all subscribers. Idempotent.
    pub fn destroy(&self) {
        if let Some(connection) = self.inner.store_connection.lock().take() {
            connection.dispose();
        }
        self.inner.subscribers.lock().clear();
    }
}

impl<T: SettingType> Observable<T> for ReactiveSetting<T> {
    fn value(&self) -> T {
        self.inner.value.lock().clone()
    }

    fn set_value(&self, value: T) {
        let raw = match value.to_setting() {
            Ok(raw) => raw,
            Err(details) => {
                error!(
                    "{}",
                    SettingsError::Serialization { key: self.inner.key.clone(), details }
                );
                return;
            }
        };
        *self.inner.value.lock() = value;
        if let Err(err) = self.inner.store.set(&self.inner.key, raw) {
            error!(key = %self.inner.key, "Failed to write setting: {}", err);
        }
    }

    fn subscribe(&self, callback: ValueCallback<T>, emit_current_value: bool) -> Disposer {
        let id = self.inner.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
        self.inner.subscribers.lock().push((id, callback.clone()));
        if emit_current_value {
            let current = self.value();
            callback(&current);
        }
        let weak: Weak<CellInner<T>> = Arc::downgrade(&self.inner);
        Disposer::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.subscribers.lock().retain(|(sub_id, _)| *sub_id != id);
            }
        })
    }
}

impl<T: SettingType + fmt::Debug> fmt::Debug for ReactiveSetting<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveSetting")
            .field("key", &self.inner.key)
            .field("value", &*self.inner.value.lock())
            .finish()
    }
}
