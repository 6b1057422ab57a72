use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use macro_finder::cli::{Cli, Command};
use macro_finder::error::{MacroError, Result};
use macro_finder::interface::{
    display_solution, display_suggestion, display_top_items, prompt_item_to_remove,
};
use macro_finder::{EngineConfig, EngineSlot, MacroTarget, MealEngine, MealRequest, SuggestionKey};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut config = EngineConfig::from_env();
    if let Some(dir) = cli.cache_dir {
        config.cache_dir = dir;
    }
    info!(cache_dir = %config.cache_dir.display(), "starting");

    match cli.command {
        Command::Find {
            protein,
            carbs,
            fat,
            meals,
            exclude,
            diet,
            interactive,
        } => {
            let target = MacroTarget::new(protein, carbs, fat);
            target.validate()?;
            config.validate_meal_periods(&meals)?;

            let engine = MealEngine::new(config);
            engine.cleanup_stale_caches();
            let mut request = MealRequest {
                target,
                meal_periods: meals,
                exclusions: exclude,
                filters: diet.into(),
            };
            loop {
                let solution = engine.find_best_meal(&request);
                display_solution(solution.as_ref(), &request.target);

                let Some(solution) = solution.filter(|s| interactive && !s.is_empty()) else {
                    break;
                };
                let Some(index) = prompt_item_to_remove(&solution)? else {
                    println!("Enjoy your meal!");
                    break;
                };
                if let Some(name) = request.exclude_item(&solution, index) {
                    info!(item = %name, "excluding item and re-planning");
                    println!("Excluding '{}'. Re-planning...", name);
                }
            }
        }
        Command::Top { count } => {
            let engine = MealEngine::new(config);
            engine.ensure_loaded();
            display_top_items(&engine.get_top_protein_dense_items(count));
        }
        Command::Suggest {
            goal,
            location,
            meal,
        } => {
            let key = match (goal, location, meal) {
                (Some(goal), _, _) => SuggestionKey::goal(&goal),
                (None, Some(location), Some(meal)) => {
                    config.validate_meal_periods(std::slice::from_ref(&meal))?;
                    SuggestionKey::meal(&location, &meal)
                }
                _ => {
                    return Err(MacroError::InvalidInput(
                        "pass --goal, or both --location and --meal".to_string(),
                    ));
                }
            };
            let engine = MealEngine::new(config);
            display_suggestion(&engine.get_ai_suggestion(&key));
        }
        Command::Warm => {
            let slot = EngineSlot::new();
            let engine = slot.get_or_init(|| MealEngine::new(config));
            engine.wait_for_loaders();
            println!(
                "Menu loaded: {}; cached suggestions: {}; all pairs preloaded: {}",
                engine.is_data_loaded(),
                engine.suggestions().len(),
                engine.is_fully_preloaded()
            );
        }
    }

    Ok(())
}
