use crate::models::{Item, MacroTarget, MacroTotals};
use crate::planner::constants::*;

/// Per-macro weights in the deviation score.
#[derive(Debug, Clone, Copy)]
pub struct MacroWeights {
    pub protein: f64,
    pub carb: f64,
    pub fat: f64,
}

impl Default for MacroWeights {
    fn default() -> Self {
        Self {
            protein: PROTEIN_WEIGHT,
            carb: CARB_WEIGHT,
            fat: FAT_WEIGHT,
        }
    }
}

/// Asymmetric penalty multipliers.
///
/// Only a protein deficit, a carbohydrate surplus and a fat surplus are
/// penalized; the opposite directions are scored at face value.
#[derive(Debug, Clone, Copy)]
pub struct Penalties {
    pub under_protein: f64,
    pub over_carb: f64,
    pub over_fat: f64,
}

impl Default for Penalties {
    fn default() -> Self {
        Self {
            under_protein: UNDER_PROTEIN_PENALTY,
            over_carb: OVER_CARB_PENALTY,
            over_fat: OVER_FAT_PENALTY,
        }
    }
}

/// Weights and penalties used by the scoring function.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringConfig {
    pub weights: MacroWeights,
    pub penalties: Penalties,
}

/// Score aggregate macros against a target. Lower is better.
///
/// Formula: sqrt(wp * ep^2 + wc * ec^2 + wf * ef^2), where each e is the
/// signed error (actual - target) after the asymmetric penalty.
pub fn score_totals(totals: &MacroTotals, target: &MacroTarget, config: &ScoringConfig) -> f64 {
    let mut protein_err = totals.protein_g - target.protein_g;
    let mut carb_err = totals.carb_g - target.carb_g;
    let mut fat_err = totals.fat_g - target.fat_g;

    if protein_err < 0.0 {
        protein_err *= config.penalties.under_protein;
    }
    if carb_err > 0.0 {
        carb_err *= config.penalties.over_carb;
    }
    if fat_err > 0.0 {
        fat_err *= config.penalties.over_fat;
    }

    let weights = &config.weights;
    (weights.protein * protein_err * protein_err
        + weights.carb * carb_err * carb_err
        + weights.fat * fat_err * fat_err)
        .sqrt()
}

/// Score a set of items. Returns (score, totals).
///
/// An empty set scores `f64::INFINITY`.
pub fn score_items<'a, I>(
    items: I,
    target: &MacroTarget,
    config: &ScoringConfig,
) -> (f64, MacroTotals)
where
    I: IntoIterator<Item = &'a Item>,
{
    let mut items = items.into_iter().peekable();
    if items.peek().is_none() {
        return (f64::INFINITY, MacroTotals::default());
    }
    let totals = MacroTotals::from_items(items);
    (score_totals(&totals, target, config), totals)
}
