//! Synchronous, size-limited key -> JSON-string tier.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::debug;

use crate::foundation::error::{FlyerError, FlyerResult};

/// Compact state storage. Calls are synchronous and cheap but the tier has a hard byte quota.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> FlyerResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> FlyerResult<()>;
    fn remove(&self, key: &str) -> FlyerResult<()>;
}

/// In-process settings tier with a byte quota over all keys and values.
#[derive(Debug)]
pub struct MemorySettingsStore {
    items: Mutex<HashMap<String, String>>,
    quota: usize,
}

impl MemorySettingsStore {
    pub fn new(quota: usize) -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
            quota,
        }
    }

    fn lock(&self) -> FlyerResult<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.items
            .lock()
            .map_err(|_| FlyerError::storage("settings store lock poisoned"))
    }

    /// Bytes currently in use.
    pub fn used_bytes(&self) -> FlyerResult<usize> {
        Ok(self.lock()?.iter().map(|(k, v)| k.len() + v.len()).sum())
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, key: &str) -> FlyerResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> FlyerResult<()> {
        let mut items = self.lock()?;
        let others: usize = items
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum();
        let needed = others + key.len() + value.len();
        if needed > self.quota {
            return Err(FlyerError::QuotaExceeded {
                needed,
                quota: self.quota,
            });
        }
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> FlyerResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// Settings tier backed by one file per key in a directory. The quota counts key and value
/// bytes, like [`MemorySettingsStore`].
#[derive(Debug, Clone)]
pub struct FileSettingsStore {
    dir: PathBuf,
    quota: usize,
}

impl FileSettingsStore {
    pub fn open(dir: impl Into<PathBuf>, quota: usize) -> FlyerResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            FlyerError::storage(format!(
                "failed to create settings directory '{}': {e}",
                dir.display()
            ))
        })?;
        debug!(path = %dir.display(), quota, "settings store opened");
        Ok(Self { dir, quota })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> FlyerResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }

    fn used_by_others(&self, except: &Path) -> FlyerResult<usize> {
        let entries = std::fs::read_dir(&self.dir)
            .map_err(|e| FlyerError::storage(format!("failed to list settings: {e}")))?;
        let mut total = 0usize;
        for entry in entries.flatten() {
            let path = entry.path();
            if path == except || path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let key_len = path.file_stem().map_or(0, |stem| stem.len());
            if let Ok(meta) = entry.metadata() {
                total += key_len + meta.len() as usize;
            }
        }
        Ok(total)
    }
}

impl SettingsStore for FileSettingsStore {
    fn get(&self, key: &str) -> FlyerResult<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FlyerError::storage(format!(
                "failed to read setting '{key}': {e}"
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> FlyerResult<()> {
        let path = self.path_for(key)?;
        let needed = self.used_by_others(&path)? + key.len() + value.len();
        if needed > self.quota {
            return Err(FlyerError::QuotaExceeded {
                needed,
                quota: self.quota,
            });
        }

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)
            .and_then(|()| std::fs::rename(&tmp, &path))
            .map_err(|e| FlyerError::storage(format!("failed to write setting '{key}': {e}")))?;
        debug!(key, bytes = value.len(), "setting written");
        Ok(())
    }

    fn remove(&self, key: &str) -> FlyerResult<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FlyerError::storage(format!(
                "failed to remove setting '{key}': {e}"
            ))),
        }
    }
}

/// Keys double as file names, so only a conservative character set is accepted.
pub(crate) fn validate_key(key: &str) -> FlyerResult<()> {
    if key.is_empty() || key.len() > 200 {
        return Err(FlyerError::validation("storage key must be 1..=200 bytes"));
    }
    if key.starts_with('.')
        || !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        return Err(FlyerError::validation(format!(
            "storage key \"{key}\" contains unsupported characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/store/settings.rs"]
mod tests;
