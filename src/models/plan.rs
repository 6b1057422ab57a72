use serde::{Deserialize, Serialize};

use crate::models::{Item, MacroTotals};

/// A candidate combination of items with its aggregate macros and score.
///
/// Lower scores are better. An empty solution scores `f64::INFINITY` and is
/// never returned as a final answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    pub items: Vec<Item>,

    pub totals: MacroTotals,

    pub score: f64,
}

impl Solution {
    pub fn new(items: Vec<Item>, totals: MacroTotals, score: f64) -> Self {
        Self {
            items,
            totals,
            score,
        }
    }

    /// Location of the plan, taken from its first item.
    pub fn location(&self) -> Option<&str> {
        self.items.first().map(|item| item.location.as_str())
    }

    /// Meal period of the plan, taken from its first item.
    pub fn meal_period(&self) -> Option<&str> {
        self.items.first().map(|item| item.meal_period.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// An item ranked by protein per 100 estimated kcal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProteinDenseItem {
    #[serde(flatten)]
    pub item: Item,

    pub calories: f64,

    pub protein_density: f64,
}
