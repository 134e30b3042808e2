//! Bounded derivative-free minimization of the calibration objective.
//!
//! Nelder-Mead simplex over box-constrained variables. The simulation model
//! is a black box, so no gradients are available; the simplex starts at the
//! midpoint of each range and every proposed vertex is clamped back into its
//! bounds before the model runs. Exhausting the iteration budget is not a
//! failure — the best vertex found so far is always returned.

use super::{CalibError, Objective, ParameterRange};

/// Standard Nelder-Mead coefficients.
const REFLECTION_COEF: f64 = 1.0;
const EXPANSION_COEF: f64 = 2.0;
const CONTRACTION_COEF: f64 = 0.5;
const SHRINK_COEF: f64 = 0.5;

/// Initial vertex offset as a fraction of each range's span.
const INITIAL_STEP_FRACTION: f64 = 0.1;

/// Optimization outcome.
#[derive(Debug, Clone)]
pub struct OptimizeOutcome {
    /// Best value per parameter, in range order.
    pub best_values: Vec<f64>,
    /// Objective (RMSE) at the best point.
    pub best_rmse: f64,
    /// Number of full-year simulations performed.
    pub evaluations: usize,
    /// Whether the tolerance test passed within the iteration budget.
    pub converged: bool,
}

/// A simplex vertex: parameter vector plus its objective value.
#[derive(Clone)]
struct Vertex {
    values: Vec<f64>,
    rmse: f64,
}

fn clamp_to_bounds(values: &mut [f64], bounds: &[(f64, f64)]) {
    for (val, &(min, max)) in values.iter_mut().zip(bounds) {
        *val = val.clamp(min, max);
    }
}

/// Centroid of all vertices except the worst (last).
fn centroid(simplex: &[Vertex]) -> Vec<f64> {
    let n = simplex[0].values.len();
    let mut center = vec![0.0; n];
    for vertex in simplex.iter().take(simplex.len() - 1) {
        for (c, v) in center.iter_mut().zip(&vertex.values) {
            *c += v;
        }
    }
    let count = (simplex.len() - 1) as f64;
    for c in &mut center {
        *c /= count;
    }
    center
}

/// Point on the line through `point` and `centroid`: `c + coef * (c - p)`.
fn reflect(point: &[f64], centroid: &[f64], coef: f64) -> Vec<f64> {
    point
        .iter()
        .zip(centroid)
        .map(|(p, c)| c + coef * (c - p))
        .collect()
}

/// Minimizes the RMSE objective over the boxed parameter space.
///
/// Terminates when the relative spread between the best and worst vertex
/// falls below `tolerance`, or after `max_iterations` simplex iterations.
///
/// # Errors
///
/// Propagates objective evaluation failures.
pub(crate) fn minimize(
    objective: &Objective<'_>,
    ranges: &[ParameterRange],
    max_iterations: usize,
    tolerance: f64,
) -> Result<OptimizeOutcome, CalibError> {
    let n = ranges.len();
    let bounds: Vec<(f64, f64)> = ranges.iter().map(|r| (r.min_value, r.max_value)).collect();
    let mut evaluations = 0_usize;

    let eval = |values: &[f64], evaluations: &mut usize| -> Result<f64, CalibError> {
        *evaluations += 1;
        objective.rmse(values)
    };

    // Initial simplex: midpoint of the box plus one perturbed vertex per axis
    let midpoint: Vec<f64> = bounds.iter().map(|(min, max)| (min + max) / 2.0).collect();
    let mut simplex = Vec::with_capacity(n + 1);
    let rmse = eval(&midpoint, &mut evaluations)?;
    simplex.push(Vertex {
        values: midpoint.clone(),
        rmse,
    });
    for i in 0..n {
        let mut point = midpoint.clone();
        let (min, max) = bounds[i];
        let step = INITIAL_STEP_FRACTION * (max - min);
        if point[i] + step <= max {
            point[i] += step;
        } else {
            point[i] -= step;
        }
        let rmse = eval(&point, &mut evaluations)?;
        simplex.push(Vertex { values: point, rmse });
    }

    let mut converged = false;
    for _ in 0..max_iterations {
        // Best first, worst last
        simplex.sort_by(|a, b| a.rmse.total_cmp(&b.rmse));

        let best = simplex[0].rmse;
        let worst = simplex[n].rmse;
        if (worst - best).abs() <= tolerance * (best.abs() + tolerance) {
            converged = true;
            break;
        }

        let cent = centroid(&simplex);
        let second_worst = simplex[n - 1].rmse;
        let worst_values = simplex[n].values.clone();

        let mut reflected = reflect(&worst_values, &cent, REFLECTION_COEF);
        clamp_to_bounds(&mut reflected, &bounds);
        let reflected_rmse = eval(&reflected, &mut evaluations)?;

        if reflected_rmse < best {
            // Expand further along the same direction
            let mut expanded = reflect(&worst_values, &cent, EXPANSION_COEF);
            clamp_to_bounds(&mut expanded, &bounds);
            let expanded_rmse = eval(&expanded, &mut evaluations)?;
            simplex[n] = if expanded_rmse < reflected_rmse {
                Vertex {
                    values: expanded,
                    rmse: expanded_rmse,
                }
            } else {
                Vertex {
                    values: reflected,
                    rmse: reflected_rmse,
                }
            };
        } else if reflected_rmse < second_worst {
            simplex[n] = Vertex {
                values: reflected,
                rmse: reflected_rmse,
            };
        } else {
            // Contract toward the better of reflected/worst
            let toward = if reflected_rmse < simplex[n].rmse {
                &reflected
            } else {
                &worst_values
            };
            let mut contracted: Vec<f64> = cent
                .iter()
                .zip(toward)
                .map(|(c, p)| c + CONTRACTION_COEF * (p - c))
                .collect();
            clamp_to_bounds(&mut contracted, &bounds);
            let contracted_rmse = eval(&contracted, &mut evaluations)?;

            if contracted_rmse < simplex[n].rmse {
                simplex[n] = Vertex {
                    values: contracted,
                    rmse: contracted_rmse,
                };
            } else {
                // Shrink everything toward the best vertex
                let best_values = simplex[0].values.clone();
                for vertex in simplex.iter_mut().skip(1) {
                    let mut shrunk: Vec<f64> = best_values
                        .iter()
                        .zip(&vertex.values)
                        .map(|(b, v)| b + SHRINK_COEF * (v - b))
                        .collect();
                    clamp_to_bounds(&mut shrunk, &bounds);
                    let shrunk_rmse = eval(&shrunk, &mut evaluations)?;
                    *vertex = Vertex {
                        values: shrunk,
                        rmse: shrunk_rmse,
                    };
                }
            }
        }
    }

    simplex.sort_by(|a, b| a.rmse.total_cmp(&b.rmse));
    let best = simplex.into_iter().next().unwrap_or(Vertex {
        values: midpoint,
        rmse,
    });

    Ok(OptimizeOutcome {
        best_values: best.values,
        best_rmse: best.rmse,
        evaluations,
        converged,
    })
}
