//! Derivative-free minimisation
//!
//! Nelder–Mead simplex search. The search is fully deterministic: the initial
//! simplex is built from the starting point with a fixed step along each axis.

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

const REFLECTION: f64 = 1.0;
const EXPANSION: f64 = 2.0;
const CONTRACTION: f64 = 0.5;
const SHRINK: f64 = 0.5;

/// Stopping rules for the simplex search
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NelderMeadOptions {
    /// Maximum number of simplex iterations
    pub max_iterations: usize,
    /// Relative spread of objective values at which the search stops
    pub tolerance: f64,
    /// Offset along each axis for the initial simplex vertices
    pub initial_step: f64,
}

impl Default for NelderMeadOptions {
    fn default() -> Self {
        Self {
            max_iterations: 5000,
            tolerance: 1e-10,
            initial_step: 0.1,
        }
    }
}

/// Outcome of a minimisation
#[derive(Debug, Clone, PartialEq)]
pub struct Minimum {
    /// Best point found
    pub point: Vec<f64>,
    /// Objective value at `point`
    pub value: f64,
    /// Iterations performed
    pub iterations: usize,
    /// Whether a stopping tolerance was met before the iteration budget ran out
    pub converged: bool,
}

/// Minimise `objective` starting from `start`
///
/// Non-finite objective values are treated as `+inf`, so the simplex moves
/// away from regions where the objective is undefined. The starting point
/// itself must evaluate to a finite value.
pub fn nelder_mead<F>(objective: F, start: &[f64], options: &NelderMeadOptions) -> Result<Minimum>
where
    F: Fn(&[f64]) -> f64,
{
    let dimension = start.len();
    if dimension == 0 {
        return Err(MathError::InvalidInput(
            "Cannot minimise over zero parameters".to_string(),
        ));
    }
    if !(options.tolerance > 0.0) || !(options.initial_step > 0.0) {
        return Err(MathError::InvalidInput(
            "Tolerance and initial step must be positive".to_string(),
        ));
    }

    let evaluate = |point: &[f64]| {
        let value = objective(point);
        if value.is_finite() {
            value
        } else {
            f64::INFINITY
        }
    };

    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(dimension + 1);
    simplex.push(start.to_vec());
    for axis in 0..dimension {
        let mut vertex = start.to_vec();
        vertex[axis] += options.initial_step;
        simplex.push(vertex);
    }
    let mut values: Vec<f64> = simplex.iter().map(|p| evaluate(p)).collect();

    if !values[0].is_finite() {
        return Err(MathError::CalculationError(
            "Objective is not finite at the starting point".to_string(),
        ));
    }

    let mut iterations = 0;
    let mut converged = false;

    while iterations < options.max_iterations {
        sort_simplex(&mut simplex, &mut values);

        let best = values[0];
        let worst = values[dimension];
        if (worst - best).abs() <= options.tolerance * (1.0 + best.abs())
            || simplex_diameter(&simplex) <= options.tolerance
        {
            converged = true;
            break;
        }
        iterations += 1;

        let centroid = centroid(&simplex[..dimension]);
        let reflected = along(&centroid, &simplex[dimension], -REFLECTION);
        let reflected_value = evaluate(&reflected);

        if reflected_value < values[0] {
            let expanded = along(&centroid, &simplex[dimension], -REFLECTION * EXPANSION);
            let expanded_value = evaluate(&expanded);
            if expanded_value < reflected_value {
                simplex[dimension] = expanded;
                values[dimension] = expanded_value;
            } else {
                simplex[dimension] = reflected;
                values[dimension] = reflected_value;
            }
            continue;
        }

        if reflected_value < values[dimension - 1] {
            simplex[dimension] = reflected;
            values[dimension] = reflected_value;
            continue;
        }

        let (contracted, threshold) = if reflected_value < worst {
            (
                along(&centroid, &simplex[dimension], -REFLECTION * CONTRACTION),
                reflected_value,
            )
        } else {
            (along(&centroid, &simplex[dimension], CONTRACTION), worst)
        };
        let contracted_value = evaluate(&contracted);
        if contracted_value < threshold {
            simplex[dimension] = contracted;
            values[dimension] = contracted_value;
            continue;
        }

        let anchor = simplex[0].clone();
        for i in 1..=dimension {
            simplex[i] = along(&anchor, &simplex[i], SHRINK);
            values[i] = evaluate(&simplex[i]);
        }
    }

    sort_simplex(&mut simplex, &mut values);
    let value = values[0];
    let point = simplex.swap_remove(0);

    Ok(Minimum {
        point,
        value,
        iterations,
        converged,
    })
}

/// `origin + scale * (target - origin)`
fn along(origin: &[f64], target: &[f64], scale: f64) -> Vec<f64> {
    origin
        .iter()
        .zip(target)
        .map(|(o, t)| o + scale * (t - o))
        .collect()
}

fn centroid(points: &[Vec<f64>]) -> Vec<f64> {
    let mut center = vec![0.0; points[0].len()];
    for point in points {
        for (c, x) in center.iter_mut().zip(point) {
            *c += x;
        }
    }
    let n = points.len() as f64;
    center.iter_mut().for_each(|c| *c /= n);
    center
}

fn simplex_diameter(simplex: &[Vec<f64>]) -> f64 {
    let best = &simplex[0];
    simplex[1..]
        .iter()
        .flat_map(|vertex| vertex.iter().zip(best).map(|(a, b)| (a - b).abs()))
        .fold(0.0, f64::max)
}

fn sort_simplex(simplex: &mut Vec<Vec<f64>>, values: &mut Vec<f64>) {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
    *simplex = order.iter().map(|&i| simplex[i].clone()).collect();
    *values = order.iter().map(|&i| values[i]).collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_quadratic_bowl() {
        let objective = |x: &[f64]| (x[0] - 3.0).powi(2) + 2.0 * (x[1] + 1.0).powi(2);
        let minimum = nelder_mead(objective, &[0.0, 0.0], &NelderMeadOptions::default()).unwrap();

        assert!(minimum.converged);
        assert_abs_diff_eq!(minimum.point[0], 3.0, epsilon = 1e-3);
        assert_abs_diff_eq!(minimum.point[1], -1.0, epsilon = 1e-3);
        assert!(minimum.value < 1e-6);
    }

    #[test]
    fn test_rosenbrock() {
        let objective =
            |x: &[f64]| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2);
        let minimum = nelder_mead(objective, &[-1.2, 1.0], &NelderMeadOptions::default()).unwrap();

        assert!(minimum.converged);
        assert_abs_diff_eq!(minimum.point[0], 1.0, epsilon = 1e-2);
        assert_abs_diff_eq!(minimum.point[1], 1.0, epsilon = 1e-2);
    }

    #[test]
    fn test_flat_objective_converges_immediately() {
        let minimum = nelder_mead(|_| 0.0, &[0.0, 0.0, 0.0], &NelderMeadOptions::default()).unwrap();
        assert!(minimum.converged);
        assert_eq!(minimum.iterations, 0);
        assert_eq!(minimum.point, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_iteration_budget_reported() {
        let options = NelderMeadOptions {
            max_iterations: 3,
            ..NelderMeadOptions::default()
        };
        let objective = |x: &[f64]| (x[0] - 50.0).powi(2);
        let minimum = nelder_mead(objective, &[0.0], &options).unwrap();
        assert!(!minimum.converged);
        assert_eq!(minimum.iterations, 3);
    }

    #[test]
    fn test_deterministic() {
        let objective = |x: &[f64]| (x[0] - 0.7).powi(4) + (x[1] * x[0] - 0.2).powi(2);
        let options = NelderMeadOptions::default();
        let first = nelder_mead(objective, &[0.1, 0.1], &options).unwrap();
        let second = nelder_mead(objective, &[0.1, 0.1], &options).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_start() {
        let options = NelderMeadOptions::default();
        assert!(nelder_mead(|_| 1.0, &[], &options).is_err());
        assert!(matches!(
            nelder_mead(|_| f64::NAN, &[0.0], &options),
            Err(MathError::CalculationError(_))
        ));
    }
}
