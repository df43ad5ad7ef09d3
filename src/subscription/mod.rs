//! Subscriber storage for the daily broadcast.
//!
//! The broadcast only sees the narrow [`SubscriptionStore`] interface, so the
//! backing storage can change without touching the bot.

use std::collections::BTreeSet;
use std::sync::Mutex;

use thiserror::Error;

mod file;

pub use file::{JsonFileSubscriptionStore, DEFAULT_SUBSCRIBERS_FILE};

/// Subscription storage errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubscriptionError {
    #[error("Subscription backend error: {0}")]
    Backend(String),
    #[error("Subscriber file I/O error: {0}")]
    Io(String),
    #[error("Subscriber file is malformed: {0}")]
    Parse(String),
}

/// Set of chat ids subscribed to the daily broadcast.
pub trait SubscriptionStore: Send + Sync {
    /// Add a subscriber. Returns `true` if it was not present.
    fn add(&self, chat_id: i64) -> Result<bool, SubscriptionError>;

    /// Remove a subscriber. Returns `true` if it was present.
    fn remove(&self, chat_id: i64) -> Result<bool, SubscriptionError>;

    /// All subscribers in ascending order.
    fn list_all(&self) -> Result<Vec<i64>, SubscriptionError>;

    fn contains(&self, chat_id: i64) -> Result<bool, SubscriptionError> {
        Ok(self.list_all()?.contains(&chat_id))
    }

    /// Flip the subscription and return the new state.
    fn toggle(&self, chat_id: i64) -> Result<bool, SubscriptionError> {
        if self.contains(chat_id)? {
            self.remove(chat_id)?;
            Ok(false)
        } else {
            self.add(chat_id)?;
            Ok(true)
        }
    }
}

/// Process-local subscriber set.
#[derive(Debug, Default)]
pub struct MemorySubscriptionStore {
    subscribers: Mutex<BTreeSet<i64>>,
}

impl MemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the given chat ids.
    pub fn with_subscribers(ids: impl IntoIterator<Item = i64>) -> Self {
        Self {
            subscribers: Mutex::new(ids.into_iter().collect()),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeSet<i64>>, SubscriptionError> {
        self.subscribers
            .lock()
            .map_err(|e| SubscriptionError::Backend(e.to_string()))
    }
}

impl SubscriptionStore for MemorySubscriptionStore {
    fn add(&self, chat_id: i64) -> Result<bool, SubscriptionError> {
        Ok(self.lock()?.insert(chat_id))
    }

    fn remove(&self, chat_id: i64) -> Result<bool, SubscriptionError> {
        Ok(self.lock()?.remove(&chat_id))
    }

    fn list_all(&self) -> Result<Vec<i64>, SubscriptionError> {
        Ok(self.lock()?.iter().copied().collect())
    }

    fn contains(&self, chat_id: i64) -> Result<bool, SubscriptionError> {
        Ok(self.lock()?.contains(&chat_id))
    }

    fn toggle(&self, chat_id: i64) -> Result<bool, SubscriptionError> {
        let mut subscribers = self.lock()?;
        if subscribers.remove(&chat_id) {
            Ok(false)
        } else {
            subscribers.insert(chat_id);
            Ok(true)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_add_remove() {
        let store = MemorySubscriptionStore::new();
        assert!(store.add(5).unwrap());
        assert!(!store.add(5).unwrap());
        assert!(store.contains(5).unwrap());
        assert!(store.remove(5).unwrap());
        assert!(!store.remove(5).unwrap());
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_list_all_sorted() {
        let store = MemorySubscriptionStore::with_subscribers([30, -7, 12]);
        assert_eq!(store.list_all().unwrap(), vec![-7, 12, 30]);
    }

    #[test]
    fn test_toggle() {
        let store = MemorySubscriptionStore::new();
        assert!(store.toggle(1).unwrap());
        assert!(store.contains(1).unwrap());
        assert!(!store.toggle(1).unwrap());
        assert!(!store.contains(1).unwrap());
    }

    /// A store that only implements the required methods.
    struct VecStore(Mutex<Vec<i64>>);

    impl SubscriptionStore for VecStore {
        fn add(&self, chat_id: i64) -> Result<bool, SubscriptionError> {
            let mut v = self.0.lock().unwrap();
            if v.contains(&chat_id) {
                return Ok(false);
            }
            v.push(chat_id);
            Ok(true)
        }

        fn remove(&self, chat_id: i64) -> Result<bool, SubscriptionError> {
            let mut v = self.0.lock().unwrap();
            let before = v.len();
            v.retain(|id| *id != chat_id);
            Ok(v.len() != before)
        }

        fn list_all(&self) -> Result<Vec<i64>, SubscriptionError> {
            Ok(self.0.lock().unwrap().clone())
        }
    }

    #[test]
    fn test_provided_toggle() {
        let store = VecStore(Mutex::new(vec![]));
        assert!(store.toggle(9).unwrap());
        assert_eq!(store.list_all().unwrap(), vec![9]);
        assert!(!store.toggle(9).unwrap());
        assert!(store.list_all().unwrap().is_empty());
    }

    #[test]
    fn test_shared_across_threads() {
        let store: Arc<dyn SubscriptionStore> = Arc::new(MemorySubscriptionStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || store.add(i).unwrap())
            })
            .collect();
        for h in handles {
            assert!(h.join().unwrap());
        }
        assert_eq!(store.list_all().unwrap().len(), 8);
    }
}
