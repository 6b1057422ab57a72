use serde::Deserialize;
use strsim::jaro_winkler;

use crate::error::{MacroError, Result};
use crate::models::{Item, MacroTarget, MacroTotals, Suggestion};
use crate::planner::constants::NAME_MATCH_THRESHOLD;

/// Prompt asking for macro targets that serve a free-text goal.
pub fn goal_prompt(goal: &str) -> String {
    format!(
        r#"You are a sports nutritionist helping a college student plan one dining-hall meal.
The student's goal is: "{goal}"

Recommend grams of protein, carbohydrate and fat for a single meal that serves this goal.
Each value must be between 0 and 500.

Return ONLY a JSON object of the form:
{{"protein_g": 40, "carb_g": 60, "fat_g": 20, "explanation": "one or two sentences"}}"#
    )
}

/// Prompt asking the model to pick a balanced meal from a location's menu.
pub fn meal_prompt(location: &str, meal_period: &str, items: &[&Item]) -> String {
    let food_list = items
        .iter()
        .map(|item| {
            format!(
                "- {} (P:{}g, C:{}g, F:{}g)",
                item.name, item.protein_g, item.carb_g, item.fat_g
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a university dining hall nutritionist helping a student pick a balanced, healthy {meal_period} at {location}.

Here is the full list of available foods:
{food_list}

From that list, select 3-4 items that make a healthy, balanced meal.
Prioritize a lean protein, a vegetable or fruit, and a whole-grain carb.
Use the exact food names from the list.

Return ONLY a JSON object of the form:
{{"items": ["Grilled Chicken Breast", "Steamed Broccoli", "Brown Rice"], "explanation": "one or two sentences"}}"#
    )
}

#[derive(Debug, Deserialize)]
struct GoalResponse {
    protein_g: f64,
    carb_g: f64,
    fat_g: f64,
    #[serde(default)]
    explanation: String,
}

#[derive(Debug, Deserialize)]
struct MealResponse {
    items: Vec<String>,
    #[serde(default)]
    explanation: String,
}

/// Strip Markdown code fences the model sometimes wraps JSON in.
fn clean_response(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    text.strip_suffix("```").unwrap_or(text).trim()
}

pub fn parse_goal_response(text: &str) -> Result<Suggestion> {
    let response: GoalResponse = serde_json::from_str(clean_response(text))
        .map_err(|e| MacroError::MalformedResponse(e.to_string()))?;
    let target = MacroTarget::new(response.protein_g, response.carb_g, response.fat_g);
    target
        .validate()
        .map_err(|e| MacroError::MalformedResponse(e.to_string()))?;
    Ok(Suggestion::Targets {
        target,
        explanation: response.explanation,
    })
}

/// Find the store item a model-returned name refers to.
///
/// Exact match first, then the closest Jaro-Winkler match above the threshold.
fn resolve_name<'a>(name: &str, items: &[&'a Item]) -> Option<&'a Item> {
    if let Some(item) = items.iter().find(|item| item.name == name) {
        return Some(*item);
    }

    let wanted = name.trim().to_lowercase();
    items
        .iter()
        .map(|item| (*item, jaro_winkler(&item.name.to_lowercase(), &wanted)))
        .filter(|(_, score)| *score >= NAME_MATCH_THRESHOLD)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(item, _)| item)
}

pub fn parse_meal_response(
    text: &str,
    location: &str,
    meal_period: &str,
    items: &[&Item],
) -> Result<Suggestion> {
    let response: MealResponse = serde_json::from_str(clean_response(text))
        .map_err(|e| MacroError::MalformedResponse(e.to_string()))?;

    let chosen: Vec<Item> = response
        .items
        .iter()
        .filter_map(|name| resolve_name(name, items))
        .cloned()
        .collect();

    if chosen.is_empty() {
        return Err(MacroError::MalformedResponse(
            "AI could not find a valid combination".to_string(),
        ));
    }

    let totals = MacroTotals::from_items(&chosen);
    Ok(Suggestion::MealPlan {
        location: location.to_string(),
        meal_period: meal_period.to_string(),
        calories: totals.estimated_calories(),
        items: chosen,
        totals,
        explanation: response.explanation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, p: f64, c: f64, f: f64) -> Item {
        Item {
            name: name.to_string(),
            protein_g: p,
            carb_g: c,
            fat_g: f,
            location: "Hillenbrand".to_string(),
            meal_period: "Dinner".to_string(),
            traits: Default::default(),
            serving_size: String::new(),
        }
    }

    #[test]
    fn test_clean_response_strips_fences() {
        assert_eq!(clean_response("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(clean_response("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn test_meal_prompt_lists_items() {
        let a = item("Grilled Salmon", 30.0, 0.0, 12.0);
        let prompt = meal_prompt("Hillenbrand", "Dinner", &[&a]);
        assert!(prompt.contains("- Grilled Salmon (P:30g, C:0g, F:12g)"));
        assert!(prompt.contains("Dinner at Hillenbrand"));
    }

    #[test]
    fn test_parse_goal_response() {
        let suggestion = parse_goal_response(
            r#"```json
{"protein_g": 45, "carb_g": 50, "fat_g": 15, "explanation": "High protein for recovery."}
```"#,
        )
        .unwrap();
        match suggestion {
            Suggestion::Targets { target, explanation } => {
                assert_eq!(target, MacroTarget::new(45.0, 50.0, 15.0));
                assert_eq!(explanation, "High protein for recovery.");
            }
            other => panic!("unexpected suggestion: {:?}", other),
        }

        assert!(parse_goal_response("Sure! Eat more protein.").is_err());
        assert!(parse_goal_response(r#"{"protein_g": 900, "carb_g": 1, "fat_g": 1}"#).is_err());
    }

    #[test]
    fn test_parse_meal_response_resolves_names() {
        let salmon = item("Grilled Salmon", 30.0, 0.0, 12.0);
        let rice = item("Brown Rice", 4.0, 45.0, 2.0);
        let cake = item("Chocolate Cake", 4.0, 60.0, 20.0);
        let items = vec![&salmon, &rice, &cake];

        let suggestion = parse_meal_response(
            r#"{"items": ["Grilled Salmon", "brown rice", "Unicorn Steak"], "explanation": "Balanced."}"#,
            "Hillenbrand",
            "Dinner",
            &items,
        )
        .unwrap();

        match suggestion {
            Suggestion::MealPlan { items, totals, calories, .. } => {
                let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
                assert_eq!(names, vec!["Grilled Salmon", "Brown Rice"]);
                assert!((totals.protein_g - 34.0).abs() < 1e-9);
                assert!((calories - (34.0 * 4.0 + 45.0 * 4.0 + 14.0 * 9.0)).abs() < 1e-9);
            }
            other => panic!("unexpected suggestion: {:?}", other),
        }
    }

    #[test]
    fn test_parse_meal_response_without_matches() {
        let salmon = item("Grilled Salmon", 30.0, 0.0, 12.0);
        let result =
            parse_meal_response(r#"{"items": ["Pizza"]}"#, "Hillenbrand", "Dinner", &[&salmon]);
        assert!(result.is_err());
    }
}
