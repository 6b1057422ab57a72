/// Per-macro weights in the deviation score. Protein matters most.
pub const PROTEIN_WEIGHT: f64 = 3.0;
pub const CARB_WEIGHT: f64 = 1.0;
pub const FAT_WEIGHT: f64 = 1.5;

/// Multiplier applied to a protein deficit (never to a surplus).
pub const UNDER_PROTEIN_PENALTY: f64 = 1.8;

/// Multiplier applied to a carbohydrate surplus (never to a deficit).
pub const OVER_CARB_PENALTY: f64 = 1.2;

/// Multiplier applied to a fat surplus (never to a deficit).
pub const OVER_FAT_PENALTY: f64 = 3.0;

// ─────────────────────────────────────────────────────────────────────────────
// Annealing schedule
// ─────────────────────────────────────────────────────────────────────────────

pub const INITIAL_TEMPERATURE: f64 = 10_000.0;

/// Multiplicative cooling per iteration.
pub const COOLING_RATE: f64 = 0.99;

/// The search stops once the temperature reaches this floor.
pub const TEMPERATURE_FLOOR: f64 = 1.0;

pub const MAX_ITERATIONS: usize = 3000;

pub const MIN_ITEMS: usize = 2;
pub const INITIAL_ITEMS: usize = 4;
pub const MAX_ITEMS: usize = 5;

// ─────────────────────────────────────────────────────────────────────────────
// Protein density ranking
// ─────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_TOP_PROTEIN_COUNT: usize = 25;

/// Items at or below this many estimated kcal are not ranked.
pub const PROTEIN_DENSE_MIN_CALORIES: f64 = 50.0;

/// Items at or below this many grams of protein are not ranked.
pub const PROTEIN_DENSE_MIN_PROTEIN_G: f64 = 5.0;

// ─────────────────────────────────────────────────────────────────────────────
// Remote sources
// ─────────────────────────────────────────────────────────────────────────────

pub const MENU_API_URL: &str = "https://api.hfs.purdue.edu/menus/v3/GraphQL";

pub const REQUEST_TIMEOUT_SECS: u64 = 10;

pub const MENU_WORKERS: usize = 5;

pub const AI_WORKERS: usize = 4;

pub const AI_MODEL: &str = "gemini-2.0-flash";

/// Bounds of the randomized delay before the single rate-limit retry.
pub const RETRY_DELAY_MIN_SECS: f64 = 5.0;
pub const RETRY_DELAY_MAX_SECS: f64 = 15.0;

/// Minimum Jaro-Winkler similarity for matching an AI-returned food name.
pub const NAME_MATCH_THRESHOLD: f64 = 0.9;

pub const MENU_CACHE_PREFIX: &str = "menu_cache_";
pub const AI_CACHE_PREFIX: &str = "ai_cache_";

pub const DINING_COURTS: [&str; 5] = ["Wiley", "Earhart", "Windsor", "Ford", "Hillenbrand"];

pub const MEAL_PERIODS: [&str; 5] = ["Breakfast", "Lunch", "Late Lunch", "Dinner", "Late Night"];
