use tracing::{info, warn};

use crate::error::{MacroError, Result};
use crate::models::{Suggestion, SuggestionEntry, SuggestionKey};
use crate::state::ItemStore;
use crate::suggest::cache::Resolved;
use crate::suggest::prompt::{goal_prompt, meal_prompt, parse_goal_response, parse_meal_response};
use crate::suggest::retry::{generate_with_retry, RetryPolicy};
use crate::suggest::source::SuggestionSource;

fn failed(message: impl Into<String>) -> SuggestionEntry {
    SuggestionEntry::Failed {
        message: message.into(),
    }
}

fn ask_goal(goal: &str, source: &dyn SuggestionSource, policy: &RetryPolicy) -> Result<Suggestion> {
    let text = generate_with_retry(source, &goal_prompt(goal), policy)?;
    parse_goal_response(&text)
}

/// Compute the cache value for `key` with one remote call at most.
///
/// Requests that cannot reach the remote (no source configured, no store,
/// no items for the pair) come back `Uncached`. Anything the remote
/// returned, errors included, is `Cacheable`.
pub fn resolve_suggestion(
    key: &SuggestionKey,
    store: Option<&ItemStore>,
    source: Option<&dyn SuggestionSource>,
    policy: &RetryPolicy,
) -> Resolved {
    let Some(source) = source else {
        let e = MacroError::NotConfigured("AI suggestions need GEMINI_API_KEY".to_string());
        return Resolved::Uncached(failed(e.to_string()));
    };

    let result = match key {
        SuggestionKey::Goal(goal) => ask_goal(goal, source, policy),
        SuggestionKey::Meal {
            location,
            meal_period,
        } => {
            let Some(store) = store else {
                return Resolved::Uncached(failed("Menu data is not loaded yet."));
            };
            let items = store.items_for(location, meal_period);
            if items.is_empty() {
                return Resolved::Uncached(failed(
                    "No items found for this dining court and meal.",
                ));
            }
            generate_with_retry(source, &meal_prompt(location, meal_period, &items), policy)
                .and_then(|text| parse_meal_response(&text, location, meal_period, &items))
        }
    };

    match result {
        Ok(suggestion) => {
            info!(key = %key, "suggestion ready");
            Resolved::Cacheable(SuggestionEntry::Ready { suggestion })
        }
        Err(e) => {
            warn!(key = %key, error = %e, "suggestion failed");
            Resolved::Cacheable(failed(e.to_string()))
        }
    }
}
