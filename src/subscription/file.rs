//! Subscriber set persisted to a JSON file.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use super::{SubscriptionError, SubscriptionStore};

/// Default location of the subscriber file.
pub const DEFAULT_SUBSCRIBERS_FILE: &str = "subscribers.json";

/// Subscriber store backed by a JSON array of chat ids.
///
/// Every change is written to a temporary file and renamed over the
/// previous one, so a crash leaves either the old or the new set on disk.
#[derive(Debug)]
pub struct JsonFileSubscriptionStore {
    path: PathBuf,
    subscribers: Mutex<BTreeSet<i64>>,
}

impl JsonFileSubscriptionStore {
    /// Open the store, loading existing subscribers. A missing file is an
    /// empty set.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SubscriptionError> {
        let path = path.into();
        let subscribers = Self::load(&path)?;
        tracing::info!(path = %path.display(), count = subscribers.len(), "Loaded subscribers");
        Ok(Self {
            path,
            subscribers: Mutex::new(subscribers),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(path: &Path) -> Result<BTreeSet<i64>, SubscriptionError> {
        if !path.exists() {
            return Ok(BTreeSet::new());
        }
        let content =
            fs::read_to_string(path).map_err(|e| SubscriptionError::Io(e.to_string()))?;
        if content.trim().is_empty() {
            return Ok(BTreeSet::new());
        }
        let ids: Vec<i64> =
            serde_json::from_str(&content).map_err(|e| SubscriptionError::Parse(e.to_string()))?;
        Ok(ids.into_iter().collect())
    }

    fn save(&self, subscribers: &BTreeSet<i64>) -> Result<(), SubscriptionError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SubscriptionError::Io(e.to_string()))?;
        }

        let ids: Vec<i64> = subscribers.iter().copied().collect();
        let content = serde_json::to_string(&ids)
            .map_err(|e| SubscriptionError::Parse(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(|e| SubscriptionError::Io(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| SubscriptionError::Io(e.to_string()))
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeSet<i64>>, SubscriptionError> {
        self.subscribers
            .lock()
            .map_err(|e| SubscriptionError::Backend(e.to_string()))
    }

    /// Apply `change` and persist the result. The in-memory set is only
    /// updated once the file write succeeded.
    fn update<F>(&self, change: F) -> Result<bool, SubscriptionError>
    where
        F: FnOnce(&mut BTreeSet<i64>) -> bool,
    {
        let mut subscribers = self.lock()?;
        let mut next = subscribers.clone();
        let changed = change(&mut next);
        if changed {
            self.save(&next)?;
            *subscribers = next;
        }
        Ok(changed)
    }
}

impl SubscriptionStore for JsonFileSubscriptionStore {
    fn add(&self, chat_id: i64) -> Result<bool, SubscriptionError> {
        self.update(|set| set.insert(chat_id))
    }

    fn remove(&self, chat_id: i64) -> Result<bool, SubscriptionError> {
        self.update(|set| set.remove(&chat_id))
    }

    fn list_all(&self) -> Result<Vec<i64>, SubscriptionError> {
        Ok(self.lock()?.iter().copied().collect())
    }

    fn contains(&self, chat_id: i64) -> Result<bool, SubscriptionError> {
        Ok(self.lock()?.contains(&chat_id))
    }

    fn toggle(&self, chat_id: i64) -> Result<bool, SubscriptionError> {
        let mut subscribed = false;
        self.update(|set| {
            if !set.remove(&chat_id) {
                set.insert(chat_id);
                subscribed = true;
            }
            true
        })?;
        Ok(subscribed)
    }
}
