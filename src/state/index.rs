use std::collections::BTreeMap;

use crate::models::Item;

/// Lookup tables over an item slice, by location and by meal period.
///
/// Values are positions in the slice the index was built from. Always
/// rebuilt in full; never patched.
#[derive(Debug, Clone, Default)]
pub struct ItemIndex {
    by_location: BTreeMap<String, Vec<usize>>,
    by_meal_period: BTreeMap<String, Vec<usize>>,
}

impl ItemIndex {
    pub fn build(items: &[Item]) -> Self {
        let mut index = Self::default();
        for (pos, item) in items.iter().enumerate() {
            index
                .by_location
                .entry(item.location.clone())
                .or_default()
                .push(pos);
            index
                .by_meal_period
                .entry(item.meal_period.clone())
                .or_default()
                .push(pos);
        }
        index
    }

    pub fn location(&self, location: &str) -> &[usize] {
        self.by_location
            .get(location)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn meal_period(&self, meal_period: &str) -> &[usize] {
        self.by_meal_period
            .get(meal_period)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.by_location.keys().map(String::as_str)
    }

    pub fn meal_periods(&self) -> impl Iterator<Item = &str> {
        self.by_meal_period.keys().map(String::as_str)
    }
}
