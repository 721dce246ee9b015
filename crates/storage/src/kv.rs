use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{Receiver, Sender, channel};
use std::sync::{Arc, Mutex, Weak};
use thiserror::Error;

/// Errors surfaced by key-value store adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("store backend error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// String key-value store contract, shaped after the browser's synchronous
/// storage surface: reads and writes complete before the caller resumes.
pub trait KeyValueStore: Send + Sync {
    /// Fetch the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value stored under `key`. Removing a missing key is fine.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Change notification delivered to store watchers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreChange {
    pub key: String,
}

type WatcherList = Arc<Mutex<Vec<(u64, Sender<StoreChange>)>>>;

/// In-memory store for tests and embedding.
///
/// Clones share the same underlying map, which is how two "tabs" over the
/// same persisted state are simulated. Every `set`/`remove` notifies all
/// registered watchers, including one held by the writing context; the
/// session layer tolerates that echo.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    watchers: WatcherList,
    next_watcher: Arc<AtomicU64>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a change watcher. Dropping the returned handle unregisters
    /// it; a dead watcher never blocks the store.
    #[must_use]
    pub fn watch(&self) -> StoreWatcher {
        let (tx, rx) = channel();
        let id = self.next_watcher.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut watchers) = self.watchers.lock() {
            watchers.push((id, tx));
        }
        StoreWatcher {
            id,
            rx,
            watchers: Arc::downgrade(&self.watchers),
        }
    }

    fn notify(&self, key: &str) {
        if let Ok(mut watchers) = self.watchers.lock() {
            watchers.retain(|(_, tx)| {
                tx.send(StoreChange {
                    key: key.to_owned(),
                })
                .is_ok()
            });
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        {
            let mut entries = self
                .entries
                .lock()
                .map_err(|e| StorageError::Backend(e.to_string()))?;
            entries.insert(key.to_owned(), value.to_owned());
        }
        self.notify(key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let removed = {
            let mut entries = self
                .entries
                .lock()
                .map_err(|e| StorageError::Backend(e.to_string()))?;
            entries.remove(key).is_some()
        };
        if removed {
            self.notify(key);
        }
        Ok(())
    }
}

/// Scoped subscription to store changes; unregisters itself on drop.
pub struct StoreWatcher {
    id: u64,
    rx: Receiver<StoreChange>,
    watchers: Weak<Mutex<Vec<(u64, Sender<StoreChange>)>>>,
}

impl StoreWatcher {
    /// Drain the next pending change, if any.
    #[must_use]
    pub fn try_next(&self) -> Option<StoreChange> {
        self.rx.try_recv().ok()
    }
}

impl Drop for StoreWatcher {
    fn drop(&mut self) {
        if let Some(watchers) = self.watchers.upgrade() {
            if let Ok(mut watchers) = watchers.lock() {
                watchers.retain(|(id, _)| *id != self.id);
            }
        }
    }
}
