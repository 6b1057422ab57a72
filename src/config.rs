use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{MacroError, Result};
use crate::planner::constants::{
    AI_MODEL, AI_WORKERS, DINING_COURTS, MEAL_PERIODS, MENU_API_URL, MENU_WORKERS,
    REQUEST_TIMEOUT_SECS,
};
use crate::planner::{AnnealingSchedule, ScoringConfig};
use crate::suggest::RetryPolicy;

/// Everything the engine needs to know before its first load.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Dining courts fetched each day.
    pub locations: Vec<String>,
    /// Meal periods accepted in requests.
    pub meal_periods: Vec<String>,
    /// Directory holding the dated menu and AI snapshots.
    pub cache_dir: PathBuf,
    pub menu_api_url: String,
    pub request_timeout: Duration,
    pub menu_workers: usize,
    pub ai_workers: usize,
    pub retry: RetryPolicy,
    pub ai_model: String,
    /// Without a key, AI suggestions resolve to a not-configured error.
    pub api_key: Option<String>,
    pub scoring: ScoringConfig,
    pub schedule: AnnealingSchedule,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            locations: DINING_COURTS.iter().map(|s| s.to_string()).collect(),
            meal_periods: MEAL_PERIODS.iter().map(|s| s.to_string()).collect(),
            cache_dir: default_cache_dir(),
            menu_api_url: MENU_API_URL.to_string(),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            menu_workers: MENU_WORKERS,
            ai_workers: AI_WORKERS,
            retry: RetryPolicy::default(),
            ai_model: AI_MODEL.to_string(),
            api_key: None,
            scoring: ScoringConfig::default(),
            schedule: AnnealingSchedule::default(),
        }
    }
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .map(|dir| dir.join("macro_finder"))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

impl EngineConfig {
    /// Defaults overlaid with `GEMINI_API_KEY`, `MACRO_FINDER_CACHE_DIR`,
    /// `MACRO_FINDER_MENU_URL` and `MACRO_FINDER_AI_MODEL`.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.api_key = non_empty_var("GEMINI_API_KEY");
        if let Some(dir) = non_empty_var("MACRO_FINDER_CACHE_DIR") {
            config.cache_dir = PathBuf::from(dir);
        }
        if let Some(url) = non_empty_var("MACRO_FINDER_MENU_URL") {
            config.menu_api_url = url;
        }
        if let Some(model) = non_empty_var("MACRO_FINDER_AI_MODEL") {
            config.ai_model = model;
        }
        config
    }

    /// Check that `requested` is non-empty and names only known meal periods.
    pub fn validate_meal_periods(&self, requested: &[String]) -> Result<()> {
        if requested.is_empty() {
            return Err(MacroError::InvalidInput(
                "at least one meal period is required".to_string(),
            ));
        }
        for period in requested {
            if !self.meal_periods.iter().any(|known| known == period) {
                return Err(MacroError::InvalidInput(format!(
                    "unknown meal period '{}' (expected one of: {})",
                    period,
                    self.meal_periods.join(", ")
                )));
            }
        }
        Ok(())
    }
}
