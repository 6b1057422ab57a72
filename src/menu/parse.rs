use std::collections::BTreeSet;

use serde::Deserialize;
use tracing::debug;

use crate::error::{MacroError, Result};
use crate::models::Item;

const PROTEIN_FACT: &str = "Protein";
const CARB_FACT: &str = "Total Carbohydrate";
const FAT_FACT: &str = "Total fat";
const SERVING_SIZE_FACT: &str = "Serving Size";

#[derive(Debug, Deserialize)]
struct MenuResponse {
    data: Option<MenuData>,
}

#[derive(Debug, Deserialize)]
struct MenuData {
    #[serde(rename = "diningCourtByName")]
    dining_court: Option<DiningCourt>,
}

#[derive(Debug, Deserialize)]
struct DiningCourt {
    #[serde(rename = "dailyMenu")]
    daily_menu: Option<DailyMenu>,
}

#[derive(Debug, Deserialize)]
struct DailyMenu {
    meals: Option<Vec<Meal>>,
}

#[derive(Debug, Deserialize)]
struct Meal {
    name: String,
    stations: Option<Vec<Station>>,
}

#[derive(Debug, Deserialize)]
struct Station {
    /// Kept raw so one malformed appearance does not sink the station.
    items: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct ItemAppearance {
    #[serde(rename = "displayName")]
    display_name: String,
    item: Option<CoreItem>,
}

#[derive(Debug, Deserialize)]
struct CoreItem {
    traits: Option<Vec<Option<Trait>>>,
    #[serde(rename = "nutritionFacts")]
    nutrition_facts: Option<Vec<NutritionFact>>,
}

#[derive(Debug, Deserialize)]
struct Trait {
    name: String,
}

#[derive(Debug, Deserialize)]
struct NutritionFact {
    name: String,
    label: Option<String>,
}

/// Extract the first number from a unit-suffixed label.
///
/// `"15g"` is 15.0, `"20.5g"` is 20.5; empty, absent or number-free labels
/// are 0.0.
pub fn parse_numeric_label(label: Option<&str>) -> f64 {
    let label = match label {
        Some(label) => label,
        None => return 0.0,
    };
    let is_numeric = |c: char| c.is_ascii_digit() || c == '.';
    let start = match label.find(is_numeric) {
        Some(start) => start,
        None => return 0.0,
    };
    let rest = &label[start..];
    let end = rest.find(|c: char| !is_numeric(c)).unwrap_or(rest.len());
    rest[..end].parse().unwrap_or(0.0)
}

fn parse_appearance(location: &str, meal_period: &str, raw: serde_json::Value) -> Option<Item> {
    let appearance: ItemAppearance = match serde_json::from_value(raw) {
        Ok(appearance) => appearance,
        Err(e) => {
            debug!(location, error = %e, "skipping malformed menu item");
            return None;
        }
    };
    let core = appearance.item?;
    let facts = core.nutrition_facts.filter(|facts| !facts.is_empty())?;

    let mut item = Item {
        name: appearance.display_name,
        protein_g: 0.0,
        carb_g: 0.0,
        fat_g: 0.0,
        location: location.to_string(),
        meal_period: meal_period.to_string(),
        traits: BTreeSet::new(),
        serving_size: String::new(),
    };

    for fact in &facts {
        let value = || parse_numeric_label(fact.label.as_deref());
        match fact.name.as_str() {
            PROTEIN_FACT => item.protein_g = value(),
            CARB_FACT => item.carb_g = value(),
            FAT_FACT => item.fat_g = value(),
            SERVING_SIZE_FACT => item.serving_size = fact.label.clone().unwrap_or_default(),
            _ => {}
        }
    }

    if !item.has_signal() {
        return None;
    }

    item.traits = core
        .traits
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .map(|t| t.name)
        .collect();

    Some(item)
}

/// Flatten one location's raw menu payload into items.
///
/// A payload without menu data yields no items. Individual malformed items
/// are skipped; only a payload that is not a menu response at all is an
/// error.
pub fn parse_menu_payload(location: &str, raw: &serde_json::Value) -> Result<Vec<Item>> {
    let response: MenuResponse = serde_json::from_value(raw.clone())
        .map_err(|e| MacroError::MalformedResponse(format!("{}: {}", location, e)))?;

    let meals = response
        .data
        .and_then(|d| d.dining_court)
        .and_then(|c| c.daily_menu)
        .and_then(|m| m.meals)
        .unwrap_or_default();

    let mut items = Vec::new();
    for meal in meals {
        // Suggestion keys use the trimmed period name.
        let meal_period = meal.name.trim();
        for station in meal.stations.unwrap_or_default() {
            for raw_item in station.items.unwrap_or_default() {
                if let Some(item) = parse_appearance(location, meal_period, raw_item) {
                    items.push(item);
                }
            }
        }
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SuggestionKey;
    use serde_json::json;

    #[test]
    fn test_parse_numeric_label() {
        assert_eq!(parse_numeric_label(Some("15g")), 15.0);
        assert_eq!(parse_numeric_label(Some("20.5g")), 20.5);
        assert_eq!(parse_numeric_label(Some("")), 0.0);
        assert_eq!(parse_numeric_label(None), 0.0);
        assert_eq!(parse_numeric_label(Some("N/A")), 0.0);
        assert_eq!(parse_numeric_label(Some("< 1g")), 1.0);
    }

    fn sample_payload() -> serde_json::Value {
        json!({
            "data": {
                "diningCourtByName": {
                    "name": "Wiley",
                    "dailyMenu": {
                        "meals": [{
                            "name": "Lunch",
                            "stations": [{
                                "name": "Grill",
                                "items": [
                                    {
                                        "displayName": "Cheeseburger",
                                        "item": {
                                            "traits": [{"name": "Contains Gluten"}, {"name": "Milk"}, null],
                                            "nutritionFacts": [
                                                {"name": "Serving Size", "label": "1 each"},
                                                {"name": "Protein", "label": "28g"},
                                                {"name": "Total Carbohydrate", "label": "32g"},
                                                {"name": "Total fat", "label": "22.5g"},
                                                {"name": "Sodium", "label": "900mg"}
                                            ]
                                        }
                                    },
                                    {
                                        "displayName": "Diet Soda",
                                        "item": {
                                            "traits": null,
                                            "nutritionFacts": [
                                                {"name": "Protein", "label": "0g"},
                                                {"name": "Total Carbohydrate", "label": "0g"},
                                                {"name": "Total fat", "label": "0g"}
                                            ]
                                        }
                                    },
                                    {"displayName": "Mystery Item", "item": null},
                                    {"item": {"nutritionFacts": []}}
                                ]
                            }]
                        }]
                    }
                }
            }
        })
    }

    #[test]
    fn test_parse_menu_payload() {
        let items = parse_menu_payload("Wiley", &sample_payload()).unwrap();
        assert_eq!(items.len(), 1);

        let burger = &items[0];
        assert_eq!(burger.name, "Cheeseburger");
        assert_eq!(burger.location, "Wiley");
        assert_eq!(burger.meal_period, "Lunch");
        assert_eq!(burger.protein_g, 28.0);
        assert_eq!(burger.carb_g, 32.0);
        assert_eq!(burger.fat_g, 22.5);
        assert_eq!(burger.serving_size, "1 each");
        assert!(burger.has_trait("Contains Gluten"));
        assert_eq!(burger.traits.len(), 2);
    }

    #[test]
    fn test_payload_without_menu_is_empty() {
        let raw = json!({"data": {"diningCourtByName": null}, "errors": [{"message": "closed"}]});
        assert!(parse_menu_payload("Ford", &raw).unwrap().is_empty());

        let raw = json!({"data": {"diningCourtByName": {"dailyMenu": null}}});
        assert!(parse_menu_payload("Ford", &raw).unwrap().is_empty());
    }

    #[test]
    fn test_non_menu_payload_is_error() {
        let raw = json!("not a menu");
        assert!(parse_menu_payload("Ford", &raw).is_err());
    }

    #[test]
    fn test_meal_period_names_are_trimmed() {
        let raw = json!({
            "data": {"diningCourtByName": {"dailyMenu": {"meals": [
                {"name": " Lunch ", "stations": [{"items": [{
                    "displayName": "Chili",
                    "item": {"nutritionFacts": [{"name": "Protein", "label": "18g"}]}
                }]}]}
            ]}}}
        });

        let items = parse_menu_payload("Ford", &raw).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].meal_period, "Lunch");
        assert_eq!(
            SuggestionKey::meal(&items[0].location, &items[0].meal_period),
            SuggestionKey::meal("Ford", "Lunch ")
        );
    }
}
