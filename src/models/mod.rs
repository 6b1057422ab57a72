mod item;
mod plan;
mod suggestion;

pub use item::{Item, MacroTarget, MacroTotals, MAX_MACRO_TARGET_G};
pub use plan::{ProteinDenseItem, Solution};
pub use suggestion::{Suggestion, SuggestionEntry, SuggestionKey};
