pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod interface;
pub mod menu;
pub mod models;
pub mod planner;
pub mod state;
pub mod suggest;

pub use config::EngineConfig;
pub use engine::{EngineSlot, MealEngine};
pub use error::{MacroError, Result};
pub use models::{Item, MacroTarget, Solution, SuggestionEntry, SuggestionKey};
pub use planner::{DietaryFilters, MealRequest};
