use anyhow::{anyhow, Result};
use reel_models::MovieRecord;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Named-blob persistence for the tracked lists.
///
/// Loads must never fail: absent or unreadable data degrades to the empty
/// list so a corrupted blob cannot take the session down with it.
pub trait ListStorage: Send {
    fn load(&self, key: &str) -> Vec<MovieRecord>;
    fn save(&self, key: &str, records: &[MovieRecord]) -> Result<()>;
}

/// One pretty-printed `<key>.json` file per list under the data directory.
pub struct FileStorage {
    data_dir: PathBuf,
}

impl FileStorage {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }
}

impl ListStorage for FileStorage {
    fn load(&self, key: &str) -> Vec<MovieRecord> {
        let path = self.blob_path(key);

        if !path.exists() {
            debug!("No stored blob for '{}', starting empty", key);
            return Vec::new();
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read stored blob for '{}': {}. Starting empty.", key, e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<MovieRecord>>(&content) {
            Ok(records) => {
                debug!("Loaded {} record(s) for '{}'", records.len(), key);
                records
            }
            Err(e) => {
                warn!(
                    "Stored blob for '{}' is malformed: {}. Starting empty.",
                    key, e
                );
                Vec::new()
            }
        }
    }

    fn save(&self, key: &str, records: &[MovieRecord]) -> Result<()> {
        std::fs::create_dir_all(&self.data_dir)
            .map_err(|e| anyhow!("failed to create data directory: {}", e))?;

        let json = serde_json::to_string_pretty(records)
            .map_err(|e| anyhow!("failed to serialize '{}': {}", key, e))?;

        // Write to a temp file, then rename, so a crash never leaves a torn blob
        let path = self.blob_path(key);
        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, json)
            .map_err(|e| anyhow!("failed to write '{}': {}", key, e))?;
        std::fs::rename(&temp_path, &path)
            .map_err(|e| anyhow!("failed to replace '{}': {}", key, e))?;

        debug!("Saved {} record(s) for '{}'", records.len(), key);
        Ok(())
    }
}

/// HashMap-backed storage for tests and dry runs. Clones share the same
/// underlying map, so one instance can observe another's writes.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    blobs: Arc<Mutex<HashMap<String, Vec<MovieRecord>>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ListStorage for MemoryStorage {
    fn load(&self, key: &str) -> Vec<MovieRecord> {
        self.blobs
            .lock()
            .expect("storage lock poisoned")
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    fn save(&self, key: &str, records: &[MovieRecord]) -> Result<()> {
        self.blobs
            .lock()
            .expect("storage lock poisoned")
            .insert(key.to_string(), records.to_vec());
        Ok(())
    }
}
