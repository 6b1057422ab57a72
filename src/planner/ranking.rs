use std::collections::HashMap;

use crate::models::{Item, ProteinDenseItem};
use crate::planner::constants::{PROTEIN_DENSE_MIN_CALORIES, PROTEIN_DENSE_MIN_PROTEIN_G};

/// Rank items by protein per 100 estimated kcal, best first.
///
/// Items sharing name and macros are counted once (the same dish is served
/// at several locations); the last occurrence supplies the location.
/// Low-calorie and low-protein items are skipped.
pub fn top_protein_dense<'a, I>(items: I, count: usize) -> Vec<ProteinDenseItem>
where
    I: IntoIterator<Item = &'a Item>,
{
    let mut slots: HashMap<(&str, u64, u64, u64), usize> = HashMap::new();
    let mut unique: Vec<&Item> = Vec::new();
    for item in items {
        let key = (
            item.name.as_str(),
            item.protein_g.to_bits(),
            item.carb_g.to_bits(),
            item.fat_g.to_bits(),
        );
        match slots.get(&key) {
            Some(&slot) => unique[slot] = item,
            None => {
                slots.insert(key, unique.len());
                unique.push(item);
            }
        }
    }

    let mut ranked: Vec<ProteinDenseItem> = unique
        .into_iter()
        .filter_map(|item| {
            let calories = item.estimated_calories();
            if calories <= PROTEIN_DENSE_MIN_CALORIES
                || item.protein_g <= PROTEIN_DENSE_MIN_PROTEIN_G
            {
                return None;
            }
            Some(ProteinDenseItem {
                item: item.clone(),
                calories,
                protein_density: item.protein_g / calories * 100.0,
            })
        })
        .collect();

    ranked.sort_by(|a, b| {
        b.protein_density
            .partial_cmp(&a.protein_density)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked.truncate(count);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, location: &str, p: f64, c: f64, f: f64) -> Item {
        Item {
            name: name.to_string(),
            protein_g: p,
            carb_g: c,
            fat_g: f,
            location: location.to_string(),
            meal_period: "Dinner".to_string(),
            traits: Default::default(),
            serving_size: String::new(),
        }
    }

    #[test]
    fn test_empty_input() {
        let items: Vec<Item> = Vec::new();
        assert!(top_protein_dense(&items, 10).is_empty());
    }

    #[test]
    fn test_filters_low_calorie() {
        let items = vec![
            item("Low Cal Item", "Wiley", 5.0, 5.0, 0.0),
            item("High Protein", "Wiley", 30.0, 10.0, 5.0),
        ];
        let ranked = top_protein_dense(&items, 10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].item.name, "High Protein");
        assert!((ranked[0].calories - 205.0).abs() < 1e-9);
    }

    #[test]
    fn test_sorted_and_deduplicated() {
        let items = vec![
            item("Pasta", "Ford", 12.0, 60.0, 8.0),
            item("Chicken Breast", "Ford", 35.0, 0.0, 4.0),
            item("Chicken Breast", "Wiley", 35.0, 0.0, 4.0),
            item("Tuna Salad", "Earhart", 20.0, 5.0, 10.0),
        ];
        let ranked = top_protein_dense(&items, 10);
        let names: Vec<&str> = ranked.iter().map(|r| r.item.name.as_str()).collect();
        assert_eq!(names, vec!["Chicken Breast", "Tuna Salad", "Pasta"]);
        assert_eq!(ranked[0].item.location, "Wiley");

        assert_eq!(top_protein_dense(&items, 1).len(), 1);
    }
}
