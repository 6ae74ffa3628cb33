//! Per-URL reading-progress store.
//!
//! progress.json in the data directory:
//! ```json
//! {
//!   "pages": {
//!     "https://example.com/article": {
//!       "scrollPosition": 1240.0,
//!       "totalHeight": 9800.0,
//!       "lastRead": "2024-01-01T12:00:00Z"
//!     }
//!   }
//! }
//! ```
//! Updates only mark the store dirty; the main loop flushes on a debounce
//! after the last scroll event.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub scroll_position: f64,
    pub total_height: f64,
    pub last_read: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressData {
    #[serde(default)]
    pub pages: HashMap<String, ProgressEntry>,
}

/// File-backed progress map with an explicit dirty flag.
#[derive(Debug)]
pub struct ProgressStore {
    path: PathBuf,
    data: ProgressData,
    dirty: bool,
}

impl ProgressStore {
    /// Load the store from disk; a missing or corrupt file yields an empty
    /// store.
    pub fn load(path: &Path) -> Self {
        let data = match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(data) => data,
                Err(e) => {
                    warn!("Failed to parse {}: {}", path.display(), e);
                    ProgressData::default()
                }
            },
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!("Failed to read {}: {}", path.display(), e);
                }
                ProgressData::default()
            }
        };
        Self {
            path: path.to_path_buf(),
            data,
            dirty: false,
        }
    }

    /// Saved position for a URL, if any.
    pub fn get(&self, url: &str) -> Option<&ProgressEntry> {
        self.data.pages.get(url)
    }

    /// Upsert the position for a URL and stamp it with the current time.
    pub fn update(&mut self, url: &str, scroll_position: f64, total_height: f64) {
        self.data.pages.insert(
            url.to_string(),
            ProgressEntry {
                scroll_position,
                total_height,
                last_read: Utc::now(),
            },
        );
        self.dirty = true;
    }

    /// Drop all saved progress and persist the empty store.
    pub fn reset(&mut self) {
        self.data.pages.clear();
        self.dirty = true;
        if let Err(e) = self.flush() {
            warn!("Failed to persist progress reset: {}", e);
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Write the store to disk if dirty.
    pub fn flush(&mut self) -> anyhow::Result<()> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.data)?;
        std::fs::write(&self.path, json)?;
        self.dirty = false;
        debug!(pages = self.data.pages.len(), "Reading progress flushed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("reading-core-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn missing_file_yields_empty_store() {
        let store = ProgressStore::load(Path::new("/nonexistent/progress.json"));
        assert!(store.get("https://example.com").is_none());
        assert!(!store.is_dirty());
    }

    #[test]
    fn update_then_get() {
        let mut store = ProgressStore::load(&temp_path("update"));
        store.update("https://example.com/a", 120.0, 4000.0);
        let entry = store.get("https://example.com/a").unwrap();
        assert_eq!(entry.scroll_position, 120.0);
        assert_eq!(entry.total_height, 4000.0);
        assert!(store.is_dirty());
    }

    #[test]
    fn flush_and_reload_roundtrip() {
        let path = temp_path("roundtrip");
        let mut store = ProgressStore::load(&path);
        store.update("https://example.com/b", 55.5, 900.0);
        store.flush().unwrap();
        assert!(!store.is_dirty());

        let reloaded = ProgressStore::load(&path);
        let entry = reloaded.get("https://example.com/b").unwrap();
        assert_eq!(entry.scroll_position, 55.5);

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn reset_clears_all_entries() {
        let path = temp_path("reset");
        let mut store = ProgressStore::load(&path);
        store.update("https://example.com/c", 10.0, 100.0);
        store.update("https://example.com/d", 20.0, 200.0);
        store.reset();
        assert!(store.get("https://example.com/c").is_none());
        assert!(store.get("https://example.com/d").is_none());

        let _ = std::fs::remove_file(&path);
    }
}
