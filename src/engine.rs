use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::JoinHandle;

use chrono::{Local, NaiveDate};
use parking_lot::{Mutex, RwLock};
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::menu::{load_store, GraphQlMenuClient, MenuSource};
use crate::models::{ProteinDenseItem, Solution, SuggestionEntry, SuggestionKey};
use crate::planner::constants::{AI_CACHE_PREFIX, MENU_CACHE_PREFIX};
use crate::planner::{find_best_across_locations, top_protein_dense, MealRequest};
use crate::state::{cleanup_stale_caches, dated_cache_path, ItemStore};
use crate::suggest::{
    is_fully_preloaded, preload_suggestions, resolve_suggestion, GeminiClient, SuggestionCache,
    SuggestionSource,
};

/// Source of "today" for date-scoped state.
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Owns the day's item store, the suggestion cache and the background loaders.
///
/// All state is scoped to one calendar date. The first call on a new date
/// drops the store and the suggestion cache before doing anything else.
pub struct MealEngine {
    config: EngineConfig,
    menu_source: Box<dyn MenuSource>,
    ai_source: Option<Box<dyn SuggestionSource>>,
    clock: Clock,
    as_of: Mutex<NaiveDate>,
    store: RwLock<Option<Arc<ItemStore>>>,
    /// Serializes menu loads and date rollovers.
    load_lock: Mutex<()>,
    suggestions: SuggestionCache,
    cancel: AtomicBool,
    started: AtomicBool,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

/// Assembles a [`MealEngine`], with network clients built from the config
/// unless replaced.
pub struct EngineBuilder {
    config: EngineConfig,
    menu_source: Option<Box<dyn MenuSource>>,
    ai_source: Option<Box<dyn SuggestionSource>>,
    clock: Option<Clock>,
}

impl EngineBuilder {
    pub fn menu_source(mut self, source: impl MenuSource + 'static) -> Self {
        let source: Box<dyn MenuSource> = Box::new(source);
        self.menu_source = Some(source);
        self
    }

    pub fn suggestion_source(mut self, source: impl SuggestionSource + 'static) -> Self {
        let source: Box<dyn SuggestionSource> = Box::new(source);
        self.ai_source = Some(source);
        self
    }

    pub fn clock(mut self, clock: impl Fn() -> NaiveDate + Send + Sync + 'static) -> Self {
        let clock: Clock = Arc::new(clock);
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> MealEngine {
        let config = self.config;
        let menu_source = self.menu_source.unwrap_or_else(|| {
            Box::new(GraphQlMenuClient::new(
                config.menu_api_url.clone(),
                config.request_timeout,
            )) as Box<dyn MenuSource>
        });
        let ai_source = self.ai_source.or_else(|| {
            config.api_key.as_ref().map(|key| {
                Box::new(GeminiClient::new(
                    key.clone(),
                    config.ai_model.clone(),
                    config.request_timeout,
                )) as Box<dyn SuggestionSource>
            })
        });
        let clock = self.clock.unwrap_or_else(|| Arc::new(local_today) as Clock);

        let today = clock();
        let suggestions =
            SuggestionCache::open(dated_cache_path(&config.cache_dir, AI_CACHE_PREFIX, today));

        MealEngine {
            config,
            menu_source,
            ai_source,
            clock,
            as_of: Mutex::new(today),
            store: RwLock::new(None),
            load_lock: Mutex::new(()),
            suggestions,
            cancel: AtomicBool::new(false),
            started: AtomicBool::new(false),
            workers: Mutex::new(Vec::new()),
        }
    }
}

impl MealEngine {
    pub fn builder(config: EngineConfig) -> EngineBuilder {
        EngineBuilder {
            config,
            menu_source: None,
            ai_source: None,
            clock: None,
        }
    }

    pub fn new(config: EngineConfig) -> Self {
        Self::builder(config).build()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn suggestions(&self) -> &SuggestionCache {
        &self.suggestions
    }

    fn menu_cache_path(&self, date: NaiveDate) -> PathBuf {
        dated_cache_path(&self.config.cache_dir, MENU_CACHE_PREFIX, date)
    }

    /// Roll all date-scoped state over if the clock moved past `as_of`.
    ///
    /// Returns the current date.
    pub fn ensure_current_date(&self) -> NaiveDate {
        let today = (self.clock)();
        if *self.as_of.lock() == today {
            return today;
        }

        let _guard = self.load_lock.lock();
        let mut as_of = self.as_of.lock();
        if *as_of != today {
            let previous = *as_of;
            info!(from = %previous, to = %today, "date changed; dropping menu and suggestions");
            *self.store.write() = None;
            self.suggestions
                .reset(dated_cache_path(&self.config.cache_dir, AI_CACHE_PREFIX, today));
            *as_of = today;
        }
        today
    }

    /// The store for today, loading it on first use.
    ///
    /// Concurrent first callers block on one load. An empty result is handed
    /// back but not kept, so the next call tries again.
    pub fn ensure_loaded(&self) -> Arc<ItemStore> {
        let today = self.ensure_current_date();
        if let Some(store) = self.store.read().clone() {
            return store;
        }

        let _guard = self.load_lock.lock();
        if let Some(store) = self.store.read().clone() {
            return store;
        }

        let loaded = load_store(
            &*self.menu_source,
            &self.config.locations,
            &self.menu_cache_path(today),
            today,
            self.config.menu_workers,
            &self.cancel,
        )
        .unwrap_or_else(|e| {
            warn!(error = %e, "menu load failed");
            ItemStore::default()
        });
        let store = Arc::new(loaded);

        if store.is_empty() {
            warn!(date = %today, "no menu items loaded");
        } else if *self.as_of.lock() == today {
            info!(date = %today, items = store.len(), "menu data loaded");
            *self.store.write() = Some(Arc::clone(&store));
        }
        store
    }

    /// Whether today's store has been loaded. Never triggers a load.
    pub fn is_data_loaded(&self) -> bool {
        let current = *self.as_of.lock() == (self.clock)();
        current && self.store.read().is_some()
    }

    /// Best plan across all locations, or `None` when nothing fits.
    ///
    /// Runs without holding any lock; a date change mid-request does not
    /// affect the store snapshot already taken.
    pub fn find_best_meal(&self, request: &MealRequest) -> Option<Solution> {
        let store = self.ensure_loaded();
        let solution = find_best_across_locations(
            &store,
            request,
            &self.config.scoring,
            &self.config.schedule,
            &mut rand::thread_rng(),
        );
        if solution.is_none() {
            info!(periods = ?request.meal_periods, "no meal plan found");
        }
        solution
    }

    /// Cached suggestion for `key`, resolving it on a miss.
    ///
    /// A `Loading` entry means a preload is filling this key.
    pub fn get_ai_suggestion(&self, key: &SuggestionKey) -> SuggestionEntry {
        self.ensure_current_date();
        let store = match key {
            SuggestionKey::Meal { .. } => Some(self.ensure_loaded()),
            SuggestionKey::Goal(_) => None,
        };
        self.suggestions.get_or_resolve(key, |key| {
            resolve_suggestion(key, store.as_deref(), self.ai_source.as_deref(), &self.config.retry)
        })
    }

    /// Items ranked by protein per calorie. Empty until data is loaded.
    pub fn get_top_protein_dense_items(&self, count: usize) -> Vec<ProteinDenseItem> {
        if !self.is_data_loaded() {
            return Vec::new();
        }
        let store = self.store.read().clone();
        match store {
            Some(store) => top_protein_dense(store.items(), count),
            None => Vec::new(),
        }
    }

    /// Whether every meal pair in today's store has a finished suggestion.
    /// False until data is loaded.
    pub fn is_fully_preloaded(&self) -> bool {
        if !self.is_data_loaded() {
            return false;
        }
        let store = self.store.read().clone();
        store.is_some_and(|store| is_fully_preloaded(&self.suggestions, &store))
    }

    /// Fill suggestions for every meal pair in today's store.
    pub fn preload_suggestions(&self) -> usize {
        let Some(source) = self.ai_source.as_deref() else {
            info!("no AI source configured; skipping suggestion preload");
            return 0;
        };
        let store = self.ensure_loaded();
        preload_suggestions(
            &self.suggestions,
            &store,
            source,
            &self.config.retry,
            self.config.ai_workers,
            &self.cancel,
        )
        .unwrap_or_else(|e| {
            warn!(error = %e, "suggestion preload failed");
            0
        })
    }

    /// Start the menu load and suggestion preload in the background.
    ///
    /// Only the first call spawns anything.
    pub fn start_background_loaders(self: &Arc<Self>) {
        if self.started.swap(true, Ordering::SeqCst) {
            return;
        }

        let engine = Arc::clone(self);
        let spawned = std::thread::Builder::new()
            .name("macro-finder-loader".to_string())
            .spawn(move || {
                engine.ensure_loaded();
                if engine.cancel.load(Ordering::Relaxed) {
                    return;
                }
                engine.preload_suggestions();
            });

        match spawned {
            Ok(handle) => self.workers.lock().push(handle),
            Err(e) => {
                warn!(error = %e, "could not start background loader");
                self.started.store(false, Ordering::SeqCst);
            }
        }
    }

    /// Signal background work to stop and wait for it.
    pub fn shutdown(&self) {
        self.cancel.store(true, Ordering::SeqCst);
        self.wait_for_loaders();
    }

    /// Block until background loaders started so far have finished.
    pub fn wait_for_loaders(&self) {
        let handles: Vec<JoinHandle<()>> = self.workers.lock().drain(..).collect();
        for handle in handles {
            if handle.join().is_err() {
                warn!("background loader panicked");
            }
        }
    }

    /// Delete cache files from earlier dates. Returns how many were removed.
    pub fn cleanup_stale_caches(&self) -> usize {
        cleanup_stale_caches(&self.config.cache_dir, (self.clock)())
    }
}

/// Lazily initialized shared engine.
///
/// The first caller builds the engine, clears stale cache files and starts
/// the background loaders. Concurrent first callers wait and share it.
#[derive(Default)]
pub struct EngineSlot {
    engine: OnceLock<Arc<MealEngine>>,
}

impl EngineSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&Arc<MealEngine>> {
        self.engine.get()
    }

    pub fn get_or_init<F>(&self, init: F) -> Arc<MealEngine>
    where
        F: FnOnce() -> MealEngine,
    {
        let engine = self.engine.get_or_init(|| {
            let engine = Arc::new(init());
            let removed = engine.cleanup_stale_caches();
            if removed > 0 {
                info!(removed, "removed stale cache files");
            }
            engine.start_background_loaders();
            engine
        });
        Arc::clone(engine)
    }
}
