use std::collections::BTreeSet;

use crate::models::Item;
use crate::state::ItemIndex;

/// The flat collection of menu items for one date, with its indices.
///
/// Immutable once built. A new date produces a new store.
#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    items: Vec<Item>,
    index: ItemIndex,
}

impl ItemStore {
    /// Build a store, dropping items that carry no macros.
    pub fn new(items: Vec<Item>) -> Self {
        let items: Vec<Item> = items.into_iter().filter(Item::has_signal).collect();
        let index = ItemIndex::build(&items);
        Self { items, index }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn index(&self) -> &ItemIndex {
        &self.index
    }

    pub fn items_at_location<'a>(&'a self, location: &str) -> impl Iterator<Item = &'a Item> + 'a {
        let positions = self.index.location(location);
        positions.iter().map(move |&pos| &self.items[pos])
    }

    pub fn items_for_meal_period<'a>(
        &'a self,
        meal_period: &str,
    ) -> impl Iterator<Item = &'a Item> + 'a {
        let positions = self.index.meal_period(meal_period);
        positions.iter().map(move |&pos| &self.items[pos])
    }

    /// Items served at `location` during `meal_period`.
    pub fn items_for<'a>(&'a self, location: &str, meal_period: &str) -> Vec<&'a Item> {
        self.items_at_location(location)
            .filter(|item| item.meal_period == meal_period)
            .collect()
    }

    /// Every (location, meal period) pair with at least one item.
    pub fn meal_pairs(&self) -> BTreeSet<(String, String)> {
        self.index
            .locations()
            .flat_map(|location| {
                self.items_at_location(location)
                    .map(move |item| (location.to_string(), item.meal_period.clone()))
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
