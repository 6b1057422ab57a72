use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MacroError;
use crate::models::{Item, MacroTarget, MacroTotals};

const GOAL_PREFIX: &str = "goal:";
const MEAL_PREFIX: &str = "meal:";
const PAIR_SEPARATOR: char = '|';

/// Key of the AI suggestion cache.
///
/// Serialized as a canonical string: `goal:<text>` or
/// `meal:<location>|<meal period>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum SuggestionKey {
    /// Free-text nutritional goal, lower-cased and trimmed.
    Goal(String),

    /// Location and meal period pair.
    Meal {
        location: String,
        meal_period: String,
    },
}

impl SuggestionKey {
    pub fn goal(text: &str) -> Self {
        SuggestionKey::Goal(text.trim().to_lowercase())
    }

    pub fn meal(location: &str, meal_period: &str) -> Self {
        SuggestionKey::Meal {
            location: location.trim().to_string(),
            meal_period: meal_period.trim().to_string(),
        }
    }
}

impl fmt::Display for SuggestionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuggestionKey::Goal(text) => write!(f, "{}{}", GOAL_PREFIX, text),
            SuggestionKey::Meal {
                location,
                meal_period,
            } => write!(f, "{}{}{}{}", MEAL_PREFIX, location, PAIR_SEPARATOR, meal_period),
        }
    }
}

impl FromStr for SuggestionKey {
    type Err = MacroError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(text) = s.strip_prefix(GOAL_PREFIX) {
            return Ok(SuggestionKey::goal(text));
        }
        if let Some(pair) = s.strip_prefix(MEAL_PREFIX) {
            if let Some((location, meal_period)) = pair.split_once(PAIR_SEPARATOR) {
                return Ok(SuggestionKey::meal(location, meal_period));
            }
        }
        Err(MacroError::InvalidInput(format!(
            "Unrecognized suggestion key: {}",
            s
        )))
    }
}

impl From<SuggestionKey> for String {
    fn from(key: SuggestionKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for SuggestionKey {
    type Error = MacroError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A completed AI-derived suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Suggestion {
    /// Macro targets derived from a free-text goal.
    Targets {
        target: MacroTarget,
        explanation: String,
    },

    /// A combination of store items for one location and meal period.
    MealPlan {
        location: String,
        meal_period: String,
        items: Vec<Item>,
        totals: MacroTotals,
        calories: f64,
        explanation: String,
    },
}

/// A value held in the AI suggestion cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SuggestionEntry {
    Ready { suggestion: Suggestion },

    Failed { message: String },

    /// Population in progress. Not ready, but distinct from absent.
    Loading,
}

impl SuggestionEntry {
    pub fn is_loading(&self) -> bool {
        matches!(self, SuggestionEntry::Loading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_key_is_normalized() {
        assert_eq!(
            SuggestionKey::goal("  Build MUSCLE "),
            SuggestionKey::Goal("build muscle".to_string())
        );
    }

    #[test]
    fn test_key_string_encoding() {
        let key = SuggestionKey::meal("Wiley", "Late Lunch");
        assert_eq!(key.to_string(), "meal:Wiley|Late Lunch");
        assert_eq!("meal:Wiley|Late Lunch".parse::<SuggestionKey>().unwrap(), key);

        let goal = SuggestionKey::goal("cut");
        assert_eq!(goal.to_string().parse::<SuggestionKey>().unwrap(), goal);

        assert!("Wiley|Lunch".parse::<SuggestionKey>().is_err());
        assert!("meal:Wiley".parse::<SuggestionKey>().is_err());
    }

    #[test]
    fn test_keys_serialize_as_map_keys() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(
            SuggestionKey::meal("Ford", "Dinner"),
            SuggestionEntry::Failed {
                message: "boom".to_string(),
            },
        );
        let json = serde_json::to_string(&map).unwrap();
        assert!(json.contains("\"meal:Ford|Dinner\""));

        let back: std::collections::BTreeMap<SuggestionKey, SuggestionEntry> =
            serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }
}
