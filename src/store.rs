//! Best-effort key/value cache for the last drawing and prediction.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{ScopeError, ScopeResult};

/// Key under which the last submitted payload (data URL) is kept.
pub const LAST_IMAGE_KEY: &str = "lastImage";
/// Key under which the last received label (decimal string) is kept.
pub const LAST_PREDICTION_KEY: &str = "lastPrediction";

/// String-to-string persistence.
///
/// Callers treat every error as non-fatal; implementations should still report them so they can
/// be logged.
pub trait KeyValueStore {
    /// Value stored under `key`.
    fn get(&self, key: &str) -> ScopeResult<Option<String>>;
    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> ScopeResult<()>;
    /// Forget `key`. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> ScopeResult<()>;
}

/// Process-local store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> ScopeResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> ScopeResult<()> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> ScopeResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store persisted as one flat JSON object on disk.
///
/// The file is read on every access and rewritten through a temporary sibling on every change,
/// so a crash never leaves a half-written file behind. A missing file reads as empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> ScopeResult<BTreeMap<String, String>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(ScopeError::store(format!(
                    "read '{}': {e}",
                    self.path.display()
                )));
            }
        };
        serde_json::from_slice(&bytes).map_err(|e| {
            ScopeError::store(format!("parse '{}': {e}", self.path.display()))
        })
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> ScopeResult<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create store directory '{}'", parent.display()))?;
        }
        let json = serde_json::to_vec_pretty(entries)
            .map_err(|e| ScopeError::serde(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).with_context(|| format!("write '{}'", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("replace '{}'", self.path.display()))?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> ScopeResult<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> ScopeResult<()> {
        let mut entries = self.load()?;
        entries.insert(key.to_owned(), value.to_owned());
        self.save(&entries)
    }

    fn remove(&mut self, key: &str) -> ScopeResult<()> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/store/store.rs"]
mod tests;
