mod cache;
mod preload;
mod prompt;
mod resolve;
mod retry;
mod source;

pub use cache::{Resolved, SuggestionCache};
pub use preload::{is_fully_preloaded, preload_suggestions};
pub use prompt::{goal_prompt, meal_prompt, parse_goal_response, parse_meal_response};
pub use resolve::resolve_suggestion;
pub use retry::{generate_with_retry, RetryPolicy};
pub use source::{GeminiClient, SuggestionSource};
