#![forbid(unsafe_code)]

pub mod deck_source;
pub mod kv;
pub mod session_store;

pub use deck_source::{DeckSourceError, deck_from_json, deck_from_path};
pub use kv::{KeyValueStore, MemoryStore, StorageError, StoreChange, StoreWatcher};
pub use session_store::{PlaylistItemRecord, SessionRecord, SessionStore};
