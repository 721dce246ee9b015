use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::kv::{KeyValueStore, StorageError};

/// Key holding the serialized session snapshot.
pub const SESSION_KEY: &str = "yomiage.session";
/// Key holding the decoy ("fake card") mode preference.
pub const FAKE_MODE_KEY: &str = "yomiage.fakeMode";
/// Key holding the intro mode preference (play from offset zero).
pub const INTRO_MODE_KEY: &str = "yomiage.introMode";

//
// ─── PERSISTED RECORDS ─────────────────────────────────────────────────────────
//

/// Persisted shape of one playlist entry. Wire names match the historical
/// browser payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemRecord {
    pub media_id: String,
    pub is_fake: bool,
}

/// Persisted session snapshot: the shuffled ordering plus the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub shuffled_playlist_items: Vec<PlaylistItemRecord>,
    pub current_index: i64,
}

//
// ─── ADAPTER ───────────────────────────────────────────────────────────────────
//

/// Adapter between the session subsystem and the raw string store.
///
/// Serializes the session record as JSON under [`SESSION_KEY`] and exposes
/// the two boolean preferences as `"true"`/`"false"` strings. Absent or
/// unreadable preferences default to off.
#[derive(Clone)]
pub struct SessionStore {
    store: Arc<dyn KeyValueStore>,
}

impl SessionStore {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// The key a cross-context change notification must carry to concern
    /// this session.
    #[must_use]
    pub fn session_key(&self) -> &'static str {
        SESSION_KEY
    }

    /// Load the persisted session snapshot, if any.
    ///
    /// A malformed value is logged and reported as absent so the caller
    /// regenerates a fresh round; it is never surfaced.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only for backend read failures.
    pub fn load_session(&self) -> Result<Option<SessionRecord>, StorageError> {
        let Some(raw) = self.store.get(SESSION_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(record) => Ok(Some(record)),
            Err(err) => {
                log::warn!("discarding malformed session state: {err}");
                Ok(None)
            }
        }
    }

    /// Persist the session snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if serialization or the backend write fails.
    pub fn save_session(&self, record: &SessionRecord) -> Result<(), StorageError> {
        let raw = serde_json::to_string(record)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.store.set(SESSION_KEY, &raw)
    }

    /// Remove the persisted session snapshot.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend write fails.
    pub fn clear_session(&self) -> Result<(), StorageError> {
        self.store.remove(SESSION_KEY)
    }

    /// Whether decoy cards are injected on the next shuffle.
    #[must_use]
    pub fn fake_mode(&self) -> bool {
        self.read_flag(FAKE_MODE_KEY)
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the backend write fails.
    pub fn set_fake_mode(&self, enabled: bool) -> Result<(), StorageError> {
        self.write_flag(FAKE_MODE_KEY, enabled)
    }

    /// Whether cards load from offset zero instead of their configured
    /// start offset.
    #[must_use]
    pub fn intro_mode(&self) -> bool {
        self.read_flag(INTRO_MODE_KEY)
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the backend write fails.
    pub fn set_intro_mode(&self, enabled: bool) -> Result<(), StorageError> {
        self.write_flag(INTRO_MODE_KEY, enabled)
    }

    fn read_flag(&self, key: &str) -> bool {
        matches!(self.store.get(key), Ok(Some(value)) if value == "true")
    }

    fn write_flag(&self, key: &str, enabled: bool) -> Result<(), StorageError> {
        self.store.set(key, if enabled { "true" } else { "false" })
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
