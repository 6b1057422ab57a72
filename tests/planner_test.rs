#[macro_use]
extern crate assert_float_eq;

use rand::rngs::StdRng;
use rand::SeedableRng;

use macro_finder::menu::parse_numeric_label;
use macro_finder::models::{Item, MacroTotals};
use macro_finder::planner::{
    apply_dietary_filters, optimize, score_items, score_totals, AnnealingSchedule,
    DietaryFilters, Penalties, ScoringConfig,
};
use macro_finder::{MacroError, MacroTarget};

fn make_item(name: &str, p: f64, c: f64, f: f64, traits: &[&str]) -> Item {
    Item {
        name: name.to_string(),
        protein_g: p,
        carb_g: c,
        fat_g: f,
        location: "Earhart".to_string(),
        meal_period: "Dinner".to_string(),
        traits: traits.iter().map(|t| t.to_string()).collect(),
        serving_size: String::new(),
    }
}

#[test]
fn test_pair_matching_target_scores_zero() {
    let items = [
        make_item("Rice Bowl", 10.0, 20.0, 5.0, &[]),
        make_item("Chicken Wrap", 15.0, 25.0, 8.0, &[]),
    ];
    let target = MacroTarget::new(25.0, 45.0, 13.0);
    let (score, totals) = score_items(&items, &target, &ScoringConfig::default());

    assert_float_absolute_eq!(score, 0.0, 1e-9);
    assert_float_absolute_eq!(totals.carb_g, 45.0, 1e-9);
}

#[test]
fn test_protein_deficit_dominates_score() {
    let target = MacroTarget::new(25.0, 45.0, 13.0);
    let items = [make_item("Pasta", 10.0, 45.0, 13.0, &[])];
    let (score, _) = score_items(&items, &target, &ScoringConfig::default());

    // sqrt(3.0 * (15 * 1.8)^2)
    assert_float_absolute_eq!(score, (3.0_f64 * 27.0 * 27.0).sqrt(), 1e-9);
}

#[test]
fn test_empty_plan_scores_infinity() {
    let items: Vec<Item> = Vec::new();
    let target = MacroTarget::new(1.0, 1.0, 1.0);
    let (score, totals) = score_items(&items, &target, &ScoringConfig::default());
    assert!(score.is_infinite());
    assert_eq!(totals, MacroTotals::default());
}

#[test]
fn test_heavier_protein_penalty_raises_score() {
    let totals = MacroTotals {
        protein_g: 12.0,
        carb_g: 40.0,
        fat_g: 10.0,
    };
    let target = MacroTarget::new(30.0, 40.0, 10.0);

    let mut previous = 0.0;
    for under_protein in [1.0, 1.5, 2.0, 3.0] {
        let config = ScoringConfig {
            penalties: Penalties {
                under_protein,
                ..Penalties::default()
            },
            ..ScoringConfig::default()
        };
        let score = score_totals(&totals, &target, &config);
        assert!(score > previous);
        previous = score;
    }
}

#[test]
fn test_single_item_pool_is_insufficient() {
    let item = make_item("Lonely Soup", 8.0, 20.0, 4.0, &[]);
    let mut rng = StdRng::seed_from_u64(1);
    let result = optimize(
        &[&item],
        &MacroTarget::new(20.0, 20.0, 5.0),
        &ScoringConfig::default(),
        &AnnealingSchedule::default(),
        &mut rng,
    );
    assert!(matches!(
        result,
        Err(MacroError::InsufficientItems {
            available: 1,
            required: 2
        })
    ));
}

#[test]
fn test_dietary_filter_idempotent() {
    let items = vec![
        make_item("Tofu Stir Fry", 18.0, 20.0, 9.0, &["Vegetarian", "Vegan"]),
        make_item("Egg Salad", 12.0, 2.0, 20.0, &["Vegetarian", "Eggs"]),
        make_item("Pad Thai", 14.0, 60.0, 16.0, &["Vegan", "Peanuts", "Contains Gluten"]),
        make_item("Steak", 40.0, 0.0, 18.0, &[]),
    ];
    let filters = DietaryFilters {
        vegetarian: true,
        egg_free: true,
        ..DietaryFilters::default()
    };

    let once = apply_dietary_filters(&items, &filters);
    let twice = apply_dietary_filters(once.iter().copied(), &filters);
    assert_eq!(once, twice);
    assert_eq!(once.len(), 1);
    assert_eq!(once[0].name, "Tofu Stir Fry");

    assert_eq!(apply_dietary_filters(&items, &DietaryFilters::default()).len(), items.len());
}

#[test]
fn test_numeric_labels() {
    assert_float_absolute_eq!(parse_numeric_label(Some("15g")), 15.0, 1e-9);
    assert_float_absolute_eq!(parse_numeric_label(Some("20.5g")), 20.5, 1e-9);
    assert_float_absolute_eq!(parse_numeric_label(Some("")), 0.0, 1e-9);
    assert_float_absolute_eq!(parse_numeric_label(None), 0.0, 1e-9);
    assert_float_absolute_eq!(parse_numeric_label(Some("N/A")), 0.0, 1e-9);
}
