pub mod annealing;
pub mod constants;
pub mod filter;
pub mod ranking;
pub mod scoring;
pub mod selector;

pub use annealing::{optimize, AnnealingSchedule};
pub use constants::*;
pub use filter::{apply_dietary_filters, DietaryFilters};
pub use ranking::top_protein_dense;
pub use scoring::{score_items, score_totals, MacroWeights, Penalties, ScoringConfig};
pub use selector::{candidate_pools, find_best_across_locations, MealRequest};
