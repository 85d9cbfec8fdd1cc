use std::path::PathBuf;
use std::time::Duration;

use egui_mindmap::notes::AUTOSAVE_DELAY;
use egui_mindmap::storage::{KeyValueStore, MemoryStore, DEFAULT_MAP_ID};

pub const ENV_MAP_ID: &str = "MINDMAP_MAP_ID";
pub const ENV_DATA_DIR: &str = "MINDMAP_DATA_DIR";

/// Application settings fixed at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Which saved map to open and save to.
    pub map_id: String,
    /// Native storage directory. Unused on the web.
    pub data_dir: Option<PathBuf>,
    pub autosave_delay: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            map_id: DEFAULT_MAP_ID.to_owned(),
            data_dir: default_data_dir(),
            autosave_delay: AUTOSAVE_DELAY,
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("egui_mindmap"))
}

#[cfg(target_arch = "wasm32")]
fn default_data_dir() -> Option<PathBuf> {
    None
}

impl AppConfig {
    /// Defaults with `MINDMAP_MAP_ID` and `MINDMAP_DATA_DIR` applied.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Self {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    #[cfg(target_arch = "wasm32")]
    pub fn from_env() -> Self {
        Self::default()
    }

    /// Applies overrides from `lookup`; blank values are ignored.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(id) = value(ENV_MAP_ID) {
            self.map_id = id.trim().to_owned();
        }
        if let Some(dir) = value(ENV_DATA_DIR) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        self
    }
}

/// Opens the platform store. Falls back to memory, returning the reason, when it is unavailable.
#[cfg(not(target_arch = "wasm32"))]
pub fn open_store(config: &AppConfig) -> (Box<dyn KeyValueStore>, Option<String>) {
    use egui_mindmap::storage::FileStore;

    let Some(dir) = &config.data_dir else {
        return (
            Box::new(MemoryStore::new()),
            Some("no data directory; changes will not be kept".to_owned()),
        );
    };
    match FileStore::open(dir) {
        Ok(store) => (Box::new(store), None),
        Err(e) => {
            log::error!("opening storage at {} failed: {e}", dir.display());
            (Box::new(MemoryStore::new()), Some(e.to_string()))
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub fn open_store(_config: &AppConfig) -> (Box<dyn KeyValueStore>, Option<String>) {
    use egui_mindmap::storage::LocalStorage;

    match LocalStorage::open() {
        Ok(store) => (Box::new(store), None),
        Err(e) => {
            log::error!("opening local storage failed: {e}");
            (Box::new(MemoryStore::new()), Some(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_defaults() {
        let config = AppConfig::default().with_overrides(|key| match key {
            ENV_MAP_ID => Some(" work ".into()),
            ENV_DATA_DIR => Some("/tmp/maps".into()),
            _ => None,
        });
        assert_eq!(config.map_id, "work");
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/maps")));
        assert_eq!(config.autosave_delay, Duration::from_millis(1500));
    }

    #[test]
    fn blank_overrides_are_ignored() {
        let config = AppConfig::default().with_overrides(|_| Some("  ".into()));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.map_id, "my-first-map");
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn store_opens_in_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            data_dir: Some(dir.path().join("maps")),
            ..Default::default()
        };
        let (mut store, warning) = open_store(&config);
        assert!(warning.is_none());
        store.set("theme", "dark").unwrap();
        assert!(dir.path().join("maps").join("theme.json").exists());

        let (_, warning) = open_store(&AppConfig {
            data_dir: None,
            ..Default::default()
        });
        assert!(warning.is_some());
    }
}
