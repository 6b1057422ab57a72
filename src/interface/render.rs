use crate::models::{MacroTarget, ProteinDenseItem, Solution, Suggestion, SuggestionEntry};

/// One "actual / target (difference)" line of the plan summary.
pub fn versus_target(label: &str, actual: f64, target: f64) -> String {
    format!(
        "{:<8} {:>4.0}g / {:.0}g  (Difference: {:+.0}g)",
        format!("{}:", label),
        actual,
        target,
        actual - target
    )
}

/// Display a meal plan as an aligned item table with totals against `target`.
pub fn display_solution(solution: Option<&Solution>, target: &MacroTarget) {
    let Some(solution) = solution.filter(|s| !s.is_empty()) else {
        println!("No meal plan found. Try different targets, meal periods or filters.");
        return;
    };

    println!();
    println!(
        "=== {} ({}) ===",
        solution.location().unwrap_or("?"),
        solution.meal_period().unwrap_or("?")
    );
    println!();

    let width = solution.items.iter().map(|i| i.name.len()).max().unwrap_or(10);
    for (i, item) in solution.items.iter().enumerate() {
        println!(
            "{:>3}. {:<width$}  P:{:>5.1}g  C:{:>5.1}g  F:{:>5.1}g  {}",
            i + 1,
            item.name,
            item.protein_g,
            item.carb_g,
            item.fat_g,
            item.serving_size,
            width = width
        );
    }

    let totals = &solution.totals;
    println!();
    println!("--- Summary ---");
    println!(
        "Totals: P:{:.1}g C:{:.1}g F:{:.1}g (~{:.0} kcal)",
        totals.protein_g,
        totals.carb_g,
        totals.fat_g,
        totals.estimated_calories()
    );
    println!("{}", versus_target("Protein", totals.protein_g, target.protein_g));
    println!("{}", versus_target("Carbs", totals.carb_g, target.carb_g));
    println!("{}", versus_target("Fat", totals.fat_g, target.fat_g));
    println!("Score: {:.2}", solution.score);
    println!();
}

/// Display the protein-density ranking.
pub fn display_top_items(items: &[ProteinDenseItem]) {
    if items.is_empty() {
        println!("No items available (menu data not loaded).");
        return;
    }

    println!();
    println!("=== Top {} protein-dense items ===", items.len());
    println!();

    let width = items.iter().map(|i| i.item.name.len()).max().unwrap_or(10);
    for (i, ranked) in items.iter().enumerate() {
        println!(
            "{:>3}. {:<width$}  {:>5.1} g/100kcal  {:>4.0} kcal  {} ({})",
            i + 1,
            ranked.item.name,
            ranked.protein_density,
            ranked.calories,
            ranked.item.location,
            ranked.item.meal_period,
            width = width
        );
    }
    println!();
}

/// Display a cache entry for a suggestion.
pub fn display_suggestion(entry: &SuggestionEntry) {
    match entry {
        SuggestionEntry::Loading => {
            println!("Suggestion is still being prepared; try again shortly.")
        }
        SuggestionEntry::Failed { message } => println!("Suggestion unavailable: {}", message),
        SuggestionEntry::Ready { suggestion } => match suggestion {
            Suggestion::Targets {
                target,
                explanation,
            } => {
                println!(
                    "Targets: P:{:.0}g C:{:.0}g F:{:.0}g",
                    target.protein_g, target.carb_g, target.fat_g
                );
                println!("{}", explanation);
            }
            Suggestion::MealPlan {
                location,
                meal_period,
                items,
                totals,
                calories,
                explanation,
            } => {
                println!("=== {} ({}) ===", location, meal_period);
                for item in items {
                    println!("  - {}", item.debug_string());
                }
                println!(
                    "Totals: P:{:.1}g C:{:.1}g F:{:.1}g (~{:.0} kcal)",
                    totals.protein_g, totals.carb_g, totals.fat_g, calories
                );
                println!("{}", explanation);
            }
        },
    }
}
