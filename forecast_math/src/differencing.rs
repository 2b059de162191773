//! Regular and seasonal differencing
//!
//! `difference(data, lag)` applies `(1 - B^lag)` once. Repeated or combined
//! differencing is expressed by chaining calls.

use crate::{MathError, Result};

/// Apply `(1 - B^lag)` to a series
///
/// The result is `lag` values shorter than the input.
pub fn difference(data: &[f64], lag: usize) -> Result<Vec<f64>> {
    if lag == 0 {
        return Err(MathError::InvalidInput(
            "Differencing lag must be greater than zero".to_string(),
        ));
    }
    if data.len() <= lag {
        return Err(MathError::InsufficientData(format!(
            "Differencing at lag {} needs more than {} values, have {}",
            lag,
            lag,
            data.len()
        )));
    }

    Ok(data
        .iter()
        .skip(lag)
        .zip(data.iter())
        .map(|(current, lagged)| current - lagged)
        .collect())
}

/// Apply `(1 - B)^order (1 - B^period)^seasonal_order` to a series
pub fn difference_seasonal(
    data: &[f64],
    order: usize,
    seasonal_order: usize,
    period: usize,
) -> Result<Vec<f64>> {
    let mut result = data.to_vec();
    for _ in 0..order {
        result = difference(&result, 1)?;
    }
    for _ in 0..seasonal_order {
        result = difference(&result, period)?;
    }
    Ok(result)
}
