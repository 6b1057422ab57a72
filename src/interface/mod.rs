pub mod prompts;
pub mod render;

pub use prompts::{parse_removal_choice, prompt_item_to_remove};
pub use render::{display_solution, display_suggestion, display_top_items, versus_target};
