//! Key-value persistence for maps, notes and small preferences.
//!
//! Every write replaces the whole value under its key; the last write wins.

use std::collections::HashMap;

use crate::error::StorageError;
use crate::model::{MindMap, NoteData};

#[cfg(not(target_arch = "wasm32"))]
mod file;
#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use web::LocalStorage;

/// Key under which all notes are kept as one JSON object.
pub const NOTES_KEY: &str = "mind_map_notes";
/// Key of the persisted colour theme.
pub const THEME_KEY: &str = "theme";
/// Map id used when none is configured.
pub const DEFAULT_MAP_ID: &str = "my-first-map";

pub fn map_key(map_id: &str) -> String {
    format!("map_{map_id}")
}

/// String key-value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }
}

/// Volatile store, useful for tests and as a fallback when no backend is available.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

pub fn save_map(
    store: &mut impl KeyValueStore,
    map_id: &str,
    map: &MindMap,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(map)?;
    store.set(&map_key(map_id), &json).inspect_err(|e| {
        log::error!("saving map {map_id} failed: {e}");
    })?;
    log::info!(
        "saved map {map_id}: {} nodes, {} connections",
        map.nodes.len(),
        map.connections.len()
    );
    Ok(())
}

/// Loads a saved map; `None` if nothing was saved under `map_id` yet.
pub fn load_map(store: &impl KeyValueStore, map_id: &str) -> Result<Option<MindMap>, StorageError> {
    let Some(json) = store.get(&map_key(map_id))? else {
        return Ok(None);
    };
    let map = serde_json::from_str(&json).inspect_err(|e| {
        log::error!("saved map {map_id} is corrupt: {e}");
    })?;
    Ok(Some(map))
}

fn read_notes(store: &impl KeyValueStore) -> Result<NoteData, StorageError> {
    match store.get(NOTES_KEY)? {
        Some(json) => Ok(serde_json::from_str(&json)?),
        None => Ok(NoteData::new()),
    }
}

/// Stores the note of one node, keeping every other note.
pub fn save_note(
    store: &mut impl KeyValueStore,
    node_id: &str,
    content: &str,
) -> Result<(), StorageError> {
    let mut notes = read_notes(store)?;
    notes.insert(node_id.to_owned(), content.to_owned());
    store.set(NOTES_KEY, &serde_json::to_string(&notes)?)?;
    log::debug!("saved note for {node_id} ({} bytes)", content.len());
    Ok(())
}

/// Note of one node; empty when it has none.
pub fn load_note(store: &impl KeyValueStore, node_id: &str) -> Result<String, StorageError> {
    Ok(read_notes(store)?.remove(node_id).unwrap_or_default())
}

/// Every stored note. Failures are logged and yield an empty set.
pub fn load_all_notes(store: &impl KeyValueStore) -> NoteData {
    read_notes(store).unwrap_or_else(|e| {
        log::error!("loading notes failed: {e}");
        NoteData::new()
    })
}

pub fn load_dark_mode(store: &impl KeyValueStore) -> Option<bool> {
    match store.get(THEME_KEY) {
        Ok(Some(v)) => Some(v == "dark"),
        Ok(None) => None,
        Err(e) => {
            log::warn!("reading theme failed: {e}");
            None
        }
    }
}

pub fn save_dark_mode(store: &mut impl KeyValueStore, dark: bool) -> Result<(), StorageError> {
    store.set(THEME_KEY, if dark { "dark" } else { "light" })
}
