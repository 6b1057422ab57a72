use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::planner::constants::DEFAULT_TOP_PROTEIN_COUNT;
use crate::planner::DietaryFilters;

/// macro-finder: pick dining-hall items that hit a protein/carb/fat target.
#[derive(Parser, Debug)]
#[command(name = "macro-finder")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory for the dated menu and AI caches.
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Log at debug level (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Find the best meal across all dining courts.
    Find {
        /// Protein target in grams.
        protein: f64,

        /// Carbohydrate target in grams.
        carbs: f64,

        /// Fat target in grams.
        fat: f64,

        /// Meal period to draw from; repeat for several.
        #[arg(short, long = "meal", default_value = "Lunch")]
        meals: Vec<String>,

        /// Item name to leave out; repeat for several.
        #[arg(short = 'x', long = "exclude")]
        exclude: Vec<String>,

        #[command(flatten)]
        diet: DietFlags,

        /// Offer to drop items by number and re-plan until accepted.
        #[arg(short, long)]
        interactive: bool,
    },

    /// List today's most protein-dense items.
    Top {
        #[arg(default_value_t = DEFAULT_TOP_PROTEIN_COUNT)]
        count: usize,
    },

    /// Ask for an AI suggestion by goal or by dining court and meal.
    Suggest {
        /// Free-text goal, e.g. "lean bulk".
        #[arg(long, conflicts_with_all = ["location", "meal"])]
        goal: Option<String>,

        #[arg(long, requires = "meal")]
        location: Option<String>,

        #[arg(long, requires = "location")]
        meal: Option<String>,
    },

    /// Load today's menus and preload every meal suggestion.
    Warm,
}

#[derive(Args, Debug, Clone, Copy, Default)]
pub struct DietFlags {
    #[arg(long)]
    pub vegetarian: bool,

    #[arg(long)]
    pub vegan: bool,

    #[arg(long)]
    pub gluten_free: bool,

    #[arg(long)]
    pub nut_free: bool,

    #[arg(long)]
    pub egg_free: bool,
}

impl From<DietFlags> for DietaryFilters {
    fn from(flags: DietFlags) -> Self {
        DietaryFilters {
            vegetarian: flags.vegetarian,
            vegan: flags.vegan,
            gluten_free: flags.gluten_free,
            nut_free: flags.nut_free,
            egg_free: flags.egg_free,
        }
    }
}
