use std::collections::{BTreeMap, BTreeSet, HashSet};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Item, MacroTarget, Solution};
use crate::planner::annealing::{optimize, AnnealingSchedule};
use crate::planner::filter::{apply_dietary_filters, DietaryFilters};
use crate::planner::scoring::ScoringConfig;
use crate::state::ItemStore;

/// What the caller wants from one meal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MealRequest {
    pub target: MacroTarget,

    pub meal_periods: Vec<String>,

    /// Item names to leave out.
    #[serde(default)]
    pub exclusions: Vec<String>,

    #[serde(default)]
    pub filters: DietaryFilters,
}

impl MealRequest {
    pub fn new(target: MacroTarget, meal_periods: Vec<String>) -> Self {
        Self {
            target,
            meal_periods,
            ..Default::default()
        }
    }

    /// Exclude the item at `index` (zero-based) of `solution` from later runs.
    ///
    /// Returns the excluded name, or `None` when `index` is out of range.
    pub fn exclude_item(&mut self, solution: &Solution, index: usize) -> Option<String> {
        let name = solution.items.get(index)?.name.clone();
        if !self.exclusions.contains(&name) {
            self.exclusions.push(name.clone());
        }
        Some(name)
    }
}

/// Matching items per location for a request.
///
/// Only locations with at least one matching item appear.
pub fn candidate_pools<'a>(
    store: &'a ItemStore,
    request: &MealRequest,
) -> BTreeMap<&'a str, Vec<&'a Item>> {
    let excluded: HashSet<&str> = request.exclusions.iter().map(String::as_str).collect();
    let periods: BTreeSet<&str> = request.meal_periods.iter().map(String::as_str).collect();
    let mut pools: BTreeMap<&str, Vec<&Item>> = BTreeMap::new();

    for period in periods {
        let kept = store
            .items_for_meal_period(period)
            .filter(|item| !excluded.contains(item.name.as_str()));
        for item in apply_dietary_filters(kept, &request.filters) {
            pools.entry(item.location.as_str()).or_default().push(item);
        }
    }

    pools
}

/// Optimize each eligible location independently and keep the best plan.
///
/// Ties keep the first location found. Returns `None` when no location
/// produces a finite-score plan.
pub fn find_best_across_locations<R: Rng + ?Sized>(
    store: &ItemStore,
    request: &MealRequest,
    scoring: &ScoringConfig,
    schedule: &AnnealingSchedule,
    rng: &mut R,
) -> Option<Solution> {
    let mut best: Option<Solution> = None;

    for (location, pool) in candidate_pools(store, request) {
        match optimize(&pool, &request.target, scoring, schedule, rng) {
            Ok(solution) => {
                debug!(
                    location,
                    score = solution.score,
                    items = solution.items.len(),
                    "location optimized"
                );
                let improves = best
                    .as_ref()
                    .map(|current| solution.score < current.score)
                    .unwrap_or(true);
                if improves {
                    best = Some(solution);
                }
            }
            Err(e) => debug!(location, error = %e, "no plan for location"),
        }
    }

    best
}
