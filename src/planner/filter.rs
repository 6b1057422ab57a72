use serde::{Deserialize, Serialize};

use crate::models::Item;

/// Independently toggled dietary restrictions. All active ones must pass.
///
/// Field names on the wire match the labels used by the web client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DietaryFilters {
    #[serde(rename = "Vegetarian", default)]
    pub vegetarian: bool,

    #[serde(rename = "Vegan", default)]
    pub vegan: bool,

    #[serde(rename = "No Gluten", default)]
    pub gluten_free: bool,

    #[serde(rename = "No Nuts", default)]
    pub nut_free: bool,

    #[serde(rename = "No Eggs", default)]
    pub egg_free: bool,
}

impl DietaryFilters {
    pub fn is_empty(&self) -> bool {
        !(self.vegetarian || self.vegan || self.gluten_free || self.nut_free || self.egg_free)
    }

    /// Check a single item against every active restriction.
    pub fn allows(&self, item: &Item) -> bool {
        if self.vegetarian && !item.has_trait("Vegetarian") {
            return false;
        }
        if self.vegan && !item.has_trait("Vegan") {
            return false;
        }
        if self.gluten_free && item.has_trait("Contains Gluten") {
            return false;
        }
        if self.nut_free && (item.has_trait("Tree Nuts") || item.has_trait("Peanuts")) {
            return false;
        }
        if self.egg_free && item.has_trait("Eggs") {
            return false;
        }
        true
    }
}

/// Narrow a collection to items passing every active restriction.
pub fn apply_dietary_filters<'a, I>(items: I, filters: &DietaryFilters) -> Vec<&'a Item>
where
    I: IntoIterator<Item = &'a Item>,
{
    items.into_iter().filter(|item| filters.allows(item)).collect()
}
