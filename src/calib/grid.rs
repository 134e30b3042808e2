//! Exhaustive grid search over discretized parameter ranges.
//!
//! Each range is split into `num_steps` equally spaced values including both
//! bounds, and the full Cartesian product is evaluated in lexicographic
//! order (last parameter fastest). The best candidate is tracked with a
//! strict comparison, so ties keep the first combination encountered and the
//! result is reproducible regardless of scheduling.

use super::{CalibError, CancelToken, Objective, ParameterRange};

/// Grid search outcome.
#[derive(Debug, Clone)]
pub struct GridOutcome {
    /// Winning value per parameter, in range order.
    pub best_values: Vec<f64>,
    /// Objective (RMSE) of the winner.
    pub best_rmse: f64,
    /// Number of full-year simulations performed.
    pub evaluations: usize,
    /// Whether the search stopped early on a cancellation signal.
    pub cancelled: bool,
}

/// `steps` equally spaced values from `min` to `max`, both endpoints exact.
fn linspace(min: f64, max: f64, steps: usize) -> Vec<f64> {
    debug_assert!(steps >= 2);
    let span = max - min;
    (0..steps)
        .map(|i| {
            if i == steps - 1 {
                max
            } else {
                min + span * i as f64 / (steps - 1) as f64
            }
        })
        .collect()
}

/// Evaluates every combination and returns the lowest-RMSE candidate.
///
/// The combination count is checked against `max_combinations` before any
/// evaluation runs. A cancellation signal is honored between candidates; the
/// best result found so far is still returned.
///
/// # Errors
///
/// Returns `SearchSpaceTooLarge` when the product of all `num_steps` exceeds
/// the ceiling, or propagates an objective failure.
pub(crate) fn search(
    objective: &Objective<'_>,
    ranges: &[ParameterRange],
    max_combinations: usize,
    cancel: Option<&CancelToken>,
) -> Result<GridOutcome, CalibError> {
    let grids: Vec<Vec<f64>> = ranges
        .iter()
        .map(|r| linspace(r.min_value, r.max_value, r.num_steps))
        .collect();

    let combinations = grids
        .iter()
        .try_fold(1_usize, |acc, g| acc.checked_mul(g.len()))
        .unwrap_or(usize::MAX);
    if combinations > max_combinations {
        return Err(CalibError::SearchSpaceTooLarge {
            combinations,
            limit: max_combinations,
        });
    }

    let n = grids.len();
    let mut indices = vec![0_usize; n];
    let mut candidate = vec![0.0_f64; n];

    let mut best_values = Vec::new();
    let mut best_rmse = f64::INFINITY;
    let mut evaluations = 0_usize;
    let mut cancelled = false;

    loop {
        for (slot, (grid, &idx)) in candidate.iter_mut().zip(grids.iter().zip(&indices)) {
            *slot = grid[idx];
        }

        let rmse = objective.rmse(&candidate)?;
        evaluations += 1;

        // Strict comparison: first-encountered combination wins ties
        if rmse < best_rmse {
            best_rmse = rmse;
            best_values = candidate.clone();
        }

        if !advance(&mut indices, &grids) {
            break;
        }
        if cancel.is_some_and(CancelToken::is_cancelled) {
            cancelled = true;
            break;
        }
    }

    Ok(GridOutcome {
        best_values,
        best_rmse,
        evaluations,
        cancelled,
    })
}

/// Odometer increment over the index vector; last parameter varies fastest.
/// Returns false once every combination has been visited.
fn advance(indices: &mut [usize], grids: &[Vec<f64>]) -> bool {
    for i in (0..indices.len()).rev() {
        indices[i] += 1;
        if indices[i] < grids[i].len() {
            return true;
        }
        indices[i] = 0;
    }
    false
}
