use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::{SuggestionEntry, SuggestionKey};
use crate::planner::constants::{AI_CACHE_PREFIX, MENU_CACHE_PREFIX};

/// Raw per-location menu payloads fetched on one date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MenuCacheSnapshot {
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,

    /// Location name to the untouched upstream response.
    #[serde(default)]
    pub data: BTreeMap<String, serde_json::Value>,
}

/// Completed AI suggestions for one date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiCacheSnapshot {
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,

    #[serde(default)]
    pub entries: BTreeMap<SuggestionKey, SuggestionEntry>,
}

/// `<dir>/<prefix>YYYY-MM-DD.json`
pub fn dated_cache_path(dir: &Path, prefix: &str, date: NaiveDate) -> PathBuf {
    dir.join(format!("{}{}.json", prefix, date.format("%Y-%m-%d")))
}

fn read_snapshot<T: DeserializeOwned + Default>(path: &Path) -> T {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return T::default(),
    };
    match serde_json::from_str(&content) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring corrupt cache file");
            T::default()
        }
    }
}

fn write_snapshot<T: Serialize>(path: &Path, snapshot: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string(snapshot)?;
    fs::write(path, json)?;
    Ok(())
}

/// Load the menu cache. Missing or corrupt files yield an empty snapshot.
pub fn load_menu_cache<P: AsRef<Path>>(path: P) -> MenuCacheSnapshot {
    read_snapshot(path.as_ref())
}

pub fn save_menu_cache<P: AsRef<Path>>(path: P, snapshot: &MenuCacheSnapshot) -> Result<()> {
    write_snapshot(path.as_ref(), snapshot)?;
    debug!(path = %path.as_ref().display(), locations = snapshot.data.len(), "menu cache written");
    Ok(())
}

/// Load the AI cache. Missing or corrupt files yield an empty snapshot.
pub fn load_ai_cache<P: AsRef<Path>>(path: P) -> AiCacheSnapshot {
    let mut snapshot: AiCacheSnapshot = read_snapshot(path.as_ref());
    snapshot.entries.retain(|_, entry| !entry.is_loading());
    snapshot
}

/// Save AI cache entries. Loading placeholders are never persisted.
pub fn save_ai_cache<'a, P, I>(path: P, entries: I) -> Result<()>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = (&'a SuggestionKey, &'a SuggestionEntry)>,
{
    let snapshot = AiCacheSnapshot {
        timestamp: Some(Utc::now()),
        entries: entries
            .into_iter()
            .filter(|(_, entry)| !entry.is_loading())
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect(),
    };
    write_snapshot(path.as_ref(), &snapshot)?;
    debug!(path = %path.as_ref().display(), entries = snapshot.entries.len(), "AI cache written");
    Ok(())
}

/// Delete cache files from dates other than `today`. Returns how many were removed.
///
/// Removal failures are logged and skipped.
pub fn cleanup_stale_caches(dir: &Path, today: NaiveDate) -> usize {
    let today_str = today.format("%Y-%m-%d").to_string();
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return 0,
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        let is_cache = name.starts_with(MENU_CACHE_PREFIX) || name.starts_with(AI_CACHE_PREFIX);
        if !is_cache || name.contains(&today_str) {
            continue;
        }
        match fs::remove_file(entry.path()) {
            Ok(()) => {
                info!(file = %name, "removed stale cache");
                removed += 1;
            }
            Err(e) => warn!(file = %name, error = %e, "could not remove stale cache"),
        }
    }
    removed
}
