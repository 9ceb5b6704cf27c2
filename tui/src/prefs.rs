//! Client-local persisted preferences.
//!
//! Pinning and recency for prompt templates live outside the backend, in a
//! small key-value store. The store is injected rather than ambient so tests
//! can run against an in-memory map, and so the lifecycle is explicit: values
//! are read once at construction time and written back on every mutation.
//!
//! Storage is best-effort by contract. A corrupt or missing value reads as
//! empty, and write failures (full disk, read-only home) are logged and
//! otherwise ignored; losing a recency list must never take the composer
//! down.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

pub trait PrefsStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// Decode a JSON-encoded list of string ids. Anything that is not a JSON
/// array of strings is treated as empty.
pub(crate) fn read_id_list(store: &dyn PrefsStore, key: &str) -> Vec<String> {
    let Some(raw) = store.get(key) else {
        return Vec::new();
    };
    serde_json::from_str::<Vec<String>>(&raw).unwrap_or_default()
}

pub(crate) fn write_id_list(store: &dyn PrefsStore, key: &str, ids: &[String]) {
    match serde_json::to_string(ids) {
        Ok(raw) => store.set(key, &raw),
        Err(err) => tracing::warn!("failed to encode pref list {key}: {err}"),
    }
}

/// In-memory store used by tests and by sessions with storage disabled.
#[derive(Default)]
pub struct MemoryPrefs {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PrefsStore for MemoryPrefs {
    fn get(&self, key: &str) -> Option<String> {
        match self.values.lock() {
            Ok(values) => values.get(key).cloned(),
            Err(_) => None,
        }
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_string(), value.to_string());
        }
    }
}

/// One file per key under a preferences directory.
pub struct FilePrefs {
    dir: PathBuf,
}

impl FilePrefs {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl PrefsStore for FilePrefs {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(err) = std::fs::create_dir_all(&self.dir)
            .and_then(|()| std::fs::write(self.path_for(key), value))
        {
            tracing::warn!("failed to persist pref {key}: {err}");
        }
    }
}
