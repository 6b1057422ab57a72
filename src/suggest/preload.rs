use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::{SuggestionEntry, SuggestionKey};
use crate::state::ItemStore;
use crate::suggest::cache::{Resolved, SuggestionCache};
use crate::suggest::resolve::resolve_suggestion;
use crate::suggest::retry::RetryPolicy;
use crate::suggest::source::SuggestionSource;

/// Removes whatever placeholders are still `Loading` when a preload ends,
/// including by panic.
struct Placeholders<'a> {
    cache: &'a SuggestionCache,
    epoch: u64,
    keys: Vec<SuggestionKey>,
}

impl Drop for Placeholders<'_> {
    fn drop(&mut self) {
        for key in &self.keys {
            self.cache.clear_loading(self.epoch, key);
        }
    }
}

/// Populate meal suggestions for every (location, meal period) pair in `store`.
///
/// Missing pairs are marked `Loading` before any remote call, then filled on
/// `workers` threads. `cancel` is checked before each pair; a skipped pair
/// loses its placeholder. The snapshot is written once at the end. Returns the
/// number of pairs filled.
pub fn preload_suggestions(
    cache: &SuggestionCache,
    store: &ItemStore,
    source: &dyn SuggestionSource,
    policy: &RetryPolicy,
    workers: usize,
    cancel: &AtomicBool,
) -> Result<usize> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()?;

    let (epoch, keys) = cache.mark_loading(
        store
            .meal_pairs()
            .iter()
            .map(|(location, meal_period)| SuggestionKey::meal(location, meal_period)),
    );
    let pending = Placeholders { cache, epoch, keys };
    if pending.keys.is_empty() {
        debug!("no suggestions to preload");
        return Ok(0);
    }
    info!(pairs = pending.keys.len(), "preloading meal suggestions");

    let filled = pool.install(|| {
        pending
            .keys
            .par_iter()
            .filter(|key| {
                if cancel.load(Ordering::Relaxed) {
                    return false;
                }
                match resolve_suggestion(key, Some(store), Some(source), policy) {
                    Resolved::Cacheable(entry) => cache.fill(epoch, (*key).clone(), entry),
                    Resolved::Uncached(_) => false,
                }
            })
            .count()
    });
    drop(pending);

    if cache.epoch() == epoch {
        cache.persist();
    }
    info!(filled, "suggestion preload finished");
    Ok(filled)
}

/// Whether every pair in `store` already has a non-placeholder entry.
pub fn is_fully_preloaded(cache: &SuggestionCache, store: &ItemStore) -> bool {
    store.meal_pairs().iter().all(|(location, meal_period)| {
        matches!(
            cache.get(&SuggestionKey::meal(location, meal_period)),
            Some(SuggestionEntry::Ready { .. } | SuggestionEntry::Failed { .. })
        )
    })
}
