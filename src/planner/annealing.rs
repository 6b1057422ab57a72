use rand::seq::{index, SliceRandom};
use rand::Rng;

use crate::error::{MacroError, Result};
use crate::models::{Item, MacroTarget, MacroTotals, Solution};
use crate::planner::constants::*;
use crate::planner::scoring::{score_items, ScoringConfig};

/// Temperature schedule and plan-size bounds for the annealing search.
#[derive(Debug, Clone, Copy)]
pub struct AnnealingSchedule {
    pub initial_temperature: f64,
    pub cooling_rate: f64,
    pub temperature_floor: f64,
    pub max_iterations: usize,
    pub min_items: usize,
    pub initial_items: usize,
    pub max_items: usize,
}

impl Default for AnnealingSchedule {
    fn default() -> Self {
        Self {
            initial_temperature: INITIAL_TEMPERATURE,
            cooling_rate: COOLING_RATE,
            temperature_floor: TEMPERATURE_FLOOR,
            max_iterations: MAX_ITERATIONS,
            min_items: MIN_ITEMS,
            initial_items: INITIAL_ITEMS,
            max_items: MAX_ITEMS,
        }
    }
}

/// Neighborhood moves.
#[derive(Debug, Clone, Copy)]
enum Move {
    /// Replace one slot with any pool item.
    Swap,
    /// Append a pool item not already in the plan.
    Add,
    /// Drop one slot.
    Remove,
}

impl Move {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match rng.gen_range(0..3) {
            0 => Move::Swap,
            1 => Move::Add,
            _ => Move::Remove,
        }
    }
}

/// Build a neighbor of `current` (indices into a pool of `pool_len` items).
///
/// When the chosen move's precondition fails the neighbor equals `current`.
fn perturb<R: Rng + ?Sized>(
    current: &[usize],
    pool_len: usize,
    schedule: &AnnealingSchedule,
    rng: &mut R,
) -> Vec<usize> {
    let mut neighbor = current.to_vec();

    match Move::random(rng) {
        Move::Swap => {
            if !neighbor.is_empty() {
                let slot = rng.gen_range(0..neighbor.len());
                neighbor[slot] = rng.gen_range(0..pool_len);
            }
        }
        Move::Add => {
            if neighbor.len() < schedule.max_items {
                let unused: Vec<usize> = (0..pool_len).filter(|i| !neighbor.contains(i)).collect();
                if let Some(&pick) = unused.choose(rng) {
                    neighbor.push(pick);
                }
            }
        }
        Move::Remove => {
            if neighbor.len() > schedule.min_items {
                let slot = rng.gen_range(0..neighbor.len());
                neighbor.remove(slot);
            }
        }
    }

    neighbor
}

fn score_selection(
    pool: &[&Item],
    selection: &[usize],
    target: &MacroTarget,
    scoring: &ScoringConfig,
) -> (f64, MacroTotals) {
    score_items(selection.iter().map(|&i| pool[i]), target, scoring)
}

/// Metropolis rule: better neighbors always win, worse ones with probability exp(-delta / T).
fn accepts<R: Rng + ?Sized>(current: f64, neighbor: f64, temperature: f64, rng: &mut R) -> bool {
    neighbor < current || rng.gen_range(0.0..1.0) < ((current - neighbor) / temperature).exp()
}

/// Search for a combination of pool items that approximates `target`.
///
/// Simulated annealing with Metropolis acceptance. Best effort: the result is
/// not guaranteed to be optimal and varies between runs unless `rng` is
/// seeded.
pub fn optimize<R: Rng + ?Sized>(
    pool: &[&Item],
    target: &MacroTarget,
    scoring: &ScoringConfig,
    schedule: &AnnealingSchedule,
    rng: &mut R,
) -> Result<Solution> {
    if pool.len() < schedule.min_items {
        return Err(MacroError::InsufficientItems {
            available: pool.len(),
            required: schedule.min_items,
        });
    }

    let initial_size = schedule
        .initial_items
        .clamp(schedule.min_items, schedule.max_items.max(schedule.min_items))
        .min(pool.len());
    let mut current = index::sample(rng, pool.len(), initial_size).into_vec();
    let (mut current_score, current_totals) = score_selection(pool, &current, target, scoring);

    let mut best = current.clone();
    let mut best_score = current_score;
    let mut best_totals = current_totals;

    let mut temperature = schedule.initial_temperature;

    for _ in 0..schedule.max_iterations {
        if temperature <= schedule.temperature_floor {
            break;
        }

        let neighbor = perturb(&current, pool.len(), schedule, rng);
        let (neighbor_score, neighbor_totals) = score_selection(pool, &neighbor, target, scoring);

        let accept = accepts(current_score, neighbor_score, temperature, rng);

        if neighbor_score < best_score {
            best.clone_from(&neighbor);
            best_score = neighbor_score;
            best_totals = neighbor_totals;
        }

        if accept {
            current = neighbor;
            current_score = neighbor_score;
        }

        temperature *= schedule.cooling_rate;
    }

    if !best_score.is_finite() || best.is_empty() {
        return Err(MacroError::NoSolution);
    }

    let items = best.iter().map(|&i| pool[i].clone()).collect();
    Ok(Solution::new(items, best_totals, best_score))
}
