use std::collections::HashMap;
use std::path::PathBuf;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::models::{SuggestionEntry, SuggestionKey};
use crate::state::{load_ai_cache, save_ai_cache};

/// Result of resolving a cache miss.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// Stored and persisted, including errors from the remote call.
    Cacheable(SuggestionEntry),

    /// Returned to the caller only; no remote call was made.
    Uncached(SuggestionEntry),
}

struct Inner {
    /// Bumped on every reset so late writers from a previous date are dropped.
    epoch: u64,
    path: PathBuf,
    entries: HashMap<SuggestionKey, SuggestionEntry>,
}

/// Date-scoped key to suggestion cache backed by a JSON snapshot.
///
/// One lock guards both the entries and the snapshot path. It is never held
/// across a remote call.
pub struct SuggestionCache {
    inner: Mutex<Inner>,
}

impl SuggestionCache {
    /// Open the cache, seeding it from the snapshot at `path` if present.
    pub fn open(path: PathBuf) -> Self {
        let entries = load_ai_cache(&path).entries.into_iter().collect();
        Self {
            inner: Mutex::new(Inner {
                epoch: 0,
                path,
                entries,
            }),
        }
    }

    /// Drop every entry and switch to the snapshot at `path`.
    pub fn reset(&self, path: PathBuf) {
        let entries = load_ai_cache(&path).entries.into_iter().collect();
        let mut inner = self.inner.lock();
        inner.epoch += 1;
        inner.path = path;
        inner.entries = entries;
    }

    pub fn epoch(&self) -> u64 {
        self.inner.lock().epoch
    }

    pub fn get(&self, key: &SuggestionKey) -> Option<SuggestionEntry> {
        self.inner.lock().entries.get(key).cloned()
    }

    pub fn contains(&self, key: &SuggestionKey) -> bool {
        self.inner.lock().entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the cached entry, or resolve and store it.
    ///
    /// A `Loading` placeholder is returned as is. The lock is released while
    /// `resolve` runs, so concurrent misses on one key may each resolve it;
    /// the last store wins. A result that straddles a reset is returned but
    /// not stored.
    pub fn get_or_resolve<F>(&self, key: &SuggestionKey, resolve: F) -> SuggestionEntry
    where
        F: FnOnce(&SuggestionKey) -> Resolved,
    {
        let epoch = {
            let inner = self.inner.lock();
            if let Some(hit) = inner.entries.get(key) {
                debug!(key = %key, "suggestion cache hit");
                return hit.clone();
            }
            inner.epoch
        };

        match resolve(key) {
            Resolved::Cacheable(entry) => {
                let mut inner = self.inner.lock();
                if inner.epoch == epoch {
                    inner.entries.insert(key.clone(), entry.clone());
                    Self::write(&inner);
                }
                entry
            }
            Resolved::Uncached(entry) => entry,
        }
    }

    /// Store an entry computed under `epoch`, unless the cache was reset since.
    ///
    /// Does not persist. Returns whether the entry was kept.
    pub fn fill(&self, epoch: u64, key: SuggestionKey, entry: SuggestionEntry) -> bool {
        let mut inner = self.inner.lock();
        if inner.epoch != epoch {
            return false;
        }
        inner.entries.insert(key, entry);
        true
    }

    /// Mark every key not yet present as `Loading`.
    ///
    /// Returns the epoch the placeholders belong to and the keys marked.
    pub fn mark_loading<I>(&self, keys: I) -> (u64, Vec<SuggestionKey>)
    where
        I: IntoIterator<Item = SuggestionKey>,
    {
        let mut inner = self.inner.lock();
        let mut marked = Vec::new();
        for key in keys {
            if !inner.entries.contains_key(&key) {
                inner.entries.insert(key.clone(), SuggestionEntry::Loading);
                marked.push(key);
            }
        }
        (inner.epoch, marked)
    }

    /// Remove `key` if it still holds a `Loading` placeholder set under `epoch`.
    pub fn clear_loading(&self, epoch: u64, key: &SuggestionKey) {
        let mut inner = self.inner.lock();
        if inner.epoch == epoch && inner.entries.get(key).is_some_and(SuggestionEntry::is_loading) {
            inner.entries.remove(key);
        }
    }

    /// Write the snapshot to disk.
    pub fn persist(&self) {
        Self::write(&self.inner.lock());
    }

    fn write(inner: &Inner) {
        if let Err(e) = save_ai_cache(&inner.path, &inner.entries) {
            warn!(path = %inner.path.display(), error = %e, "could not write AI cache");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MacroTarget, Suggestion};
    use std::cell::Cell;
    use tempfile::TempDir;

    fn ready() -> SuggestionEntry {
        SuggestionEntry::Ready {
            suggestion: Suggestion::Targets {
                target: MacroTarget::new(30.0, 40.0, 10.0),
                explanation: String::new(),
            },
        }
    }

    #[test]
    fn test_second_lookup_hits_cache() {
        let dir = TempDir::new().unwrap();
        let cache = SuggestionCache::open(dir.path().join("ai_cache.json"));
        let calls = Cell::new(0);

        for _ in 0..2 {
            let entry = cache.get_or_resolve(&SuggestionKey::goal("Lean Bulk"), |_| {
                calls.set(calls.get() + 1);
                Resolved::Cacheable(ready())
            });
            assert_eq!(entry, ready());
        }
        let entry = cache.get_or_resolve(&SuggestionKey::goal("  lean bulk"), |_| {
            calls.set(calls.get() + 1);
            Resolved::Cacheable(ready())
        });
        assert_eq!(entry, ready());
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_uncached_results_are_not_stored() {
        let dir = TempDir::new().unwrap();
        let cache = SuggestionCache::open(dir.path().join("ai_cache.json"));
        let failed = SuggestionEntry::Failed {
            message: "not configured".to_string(),
        };

        let entry = cache.get_or_resolve(&SuggestionKey::goal("cut"), |_| {
            Resolved::Uncached(failed.clone())
        });
        assert_eq!(entry, failed);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_loading_placeholder_is_returned() {
        let dir = TempDir::new().unwrap();
        let cache = SuggestionCache::open(dir.path().join("ai_cache.json"));
        let key = SuggestionKey::meal("Ford", "Lunch");

        assert_eq!(cache.mark_loading([key.clone()]), (0, vec![key.clone()]));
        assert!(cache.mark_loading([key.clone()]).1.is_empty());

        let entry = cache.get_or_resolve(&key, |_| panic!("placeholder must count as present"));
        assert!(entry.is_loading());

        cache.clear_loading(cache.epoch() + 1, &key);
        assert!(cache.contains(&key));

        cache.clear_loading(cache.epoch(), &key);
        assert!(!cache.contains(&key));
    }

    #[test]
    fn test_snapshot_survives_reopen_and_reset_clears() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ai_cache_2024-09-02.json");
        {
            let cache = SuggestionCache::open(path.clone());
            cache.get_or_resolve(&SuggestionKey::goal("cut"), |_| Resolved::Cacheable(ready()));
        }

        let cache = SuggestionCache::open(path);
        assert_eq!(cache.get(&SuggestionKey::goal("cut")), Some(ready()));

        let epoch = cache.epoch();
        cache.reset(dir.path().join("ai_cache_2024-09-03.json"));
        assert!(cache.is_empty());

        assert!(!cache.fill(epoch, SuggestionKey::goal("cut"), ready()));
        assert!(cache.fill(cache.epoch(), SuggestionKey::goal("bulk"), ready()));
        assert_eq!(cache.len(), 1);
    }
}
