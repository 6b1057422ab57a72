use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{NaiveDate, Utc};
use rayon::prelude::*;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::Result;
use crate::menu::parse::parse_menu_payload;
use crate::menu::source::MenuSource;
use crate::models::Item;
use crate::state::{load_menu_cache, save_menu_cache, ItemStore};

/// Raw data for one location and whether it came from the network.
struct LocationFetch {
    location: String,
    raw: Option<Value>,
    fetched: bool,
}

fn fetch_location(
    source: &dyn MenuSource,
    location: &str,
    cached: Option<&Value>,
    date: NaiveDate,
    cancel: &AtomicBool,
) -> LocationFetch {
    if let Some(raw) = cached {
        return LocationFetch {
            location: location.to_string(),
            raw: Some(raw.clone()),
            fetched: false,
        };
    }

    if cancel.load(Ordering::Relaxed) {
        return LocationFetch {
            location: location.to_string(),
            raw: None,
            fetched: false,
        };
    }

    match source.fetch_menu(location, date) {
        Ok(raw) => LocationFetch {
            location: location.to_string(),
            raw: Some(raw),
            fetched: true,
        },
        Err(e) => {
            warn!(location, error = %e, "menu fetch failed; location contributes no items");
            LocationFetch {
                location: location.to_string(),
                raw: None,
                fetched: false,
            }
        }
    }
}

/// Build the item store for `date` from the on-disk cache and the menu source.
///
/// Locations missing from the cache are fetched concurrently on `workers`
/// threads. A location that fails contributes zero items. The cache file is
/// rewritten only when at least one location was freshly fetched.
pub fn load_store(
    source: &dyn MenuSource,
    locations: &[String],
    cache_path: &Path,
    date: NaiveDate,
    workers: usize,
    cancel: &AtomicBool,
) -> Result<ItemStore> {
    let mut snapshot = load_menu_cache(cache_path);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()?;

    let fetches: Vec<LocationFetch> = pool.install(|| {
        locations
            .par_iter()
            .map(|location| {
                fetch_location(source, location, snapshot.data.get(location), date, cancel)
            })
            .collect()
    });

    let mut items: Vec<Item> = Vec::new();
    let mut fetched_any = false;

    for fetch in fetches {
        let raw = match fetch.raw {
            Some(raw) => raw,
            None => continue,
        };

        match parse_menu_payload(&fetch.location, &raw) {
            Ok(parsed) => {
                info!(
                    location = %fetch.location,
                    items = parsed.len(),
                    fetched = fetch.fetched,
                    "menu loaded"
                );
                items.extend(parsed);
            }
            Err(e) => warn!(location = %fetch.location, error = %e, "unusable menu payload"),
        }

        if fetch.fetched {
            snapshot.data.insert(fetch.location, raw);
            fetched_any = true;
        }
    }

    if fetched_any {
        snapshot.timestamp = Some(Utc::now());
        if let Err(e) = save_menu_cache(cache_path, &snapshot) {
            warn!(path = %cache_path.display(), error = %e, "could not write menu cache");
        }
    }

    Ok(ItemStore::new(items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MacroError;
    use serde_json::json;
    use std::sync::atomic::AtomicUsize;
    use tempfile::TempDir;

    struct FakeMenuSource {
        calls: AtomicUsize,
    }

    impl MenuSource for FakeMenuSource {
        fn fetch_menu(&self, location: &str, _date: NaiveDate) -> Result<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if location == "Broken" {
                return Err(MacroError::Http("timed out".to_string()));
            }
            Ok(json!({
                "data": {"diningCourtByName": {"dailyMenu": {"meals": [{
                    "name": "Dinner",
                    "stations": [{"items": [{
                        "displayName": format!("{} Special", location),
                        "item": {"nutritionFacts": [{"name": "Protein", "label": "20g"}]}
                    }]}]
                }]}}}
            }))
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 2).unwrap()
    }

    #[test]
    fn test_failed_location_is_skipped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("menu_cache_2024-09-02.json");
        let source = FakeMenuSource { calls: AtomicUsize::new(0) };
        let locations = vec!["Wiley".to_string(), "Broken".to_string(), "Ford".to_string()];

        let store =
            load_store(&source, &locations, &path, date(), 3, &AtomicBool::new(false)).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
        assert!(path.exists());

        let cached = load_menu_cache(&path);
        assert!(cached.data.contains_key("Wiley"));
        assert!(!cached.data.contains_key("Broken"));
    }

    #[test]
    fn test_cached_locations_not_refetched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("menu_cache_2024-09-02.json");
        let source = FakeMenuSource { calls: AtomicUsize::new(0) };
        let locations = vec!["Wiley".to_string(), "Ford".to_string()];

        load_store(&source, &locations, &path, date(), 2, &AtomicBool::new(false)).unwrap();
        let modified = std::fs::metadata(&path).unwrap().modified().unwrap();

        let store =
            load_store(&source, &locations, &path, date(), 2, &AtomicBool::new(false)).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
        assert_eq!(std::fs::metadata(&path).unwrap().modified().unwrap(), modified);
    }

    #[test]
    fn test_cancelled_load_fetches_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("menu_cache_2024-09-02.json");
        let source = FakeMenuSource { calls: AtomicUsize::new(0) };
        let locations = vec!["Wiley".to_string()];

        let store =
            load_store(&source, &locations, &path, date(), 1, &AtomicBool::new(true)).unwrap();
        assert!(store.is_empty());
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
        assert!(!path.exists());
    }
}
