//! Lag-operator polynomials
//!
//! A polynomial `c0 + c1 B + c2 B^2 + ...` in the backshift operator `B` is
//! stored as its coefficient vector. Autoregressive factors use the
//! `1 - phi B` sign convention, moving-average factors use `1 + theta B`.

use crate::{MathError, Result};

/// Polynomial in the backshift operator
#[derive(Debug, Clone, PartialEq)]
pub struct LagPolynomial {
    coefficients: Vec<f64>,
}

impl LagPolynomial {
    /// The identity polynomial `1`
    pub fn one() -> Self {
        Self {
            coefficients: vec![1.0],
        }
    }

    /// Autoregressive factor `1 - phi_1 B - ... - phi_p B^p`
    pub fn autoregressive(phi: &[f64]) -> Self {
        Self::seasonal_autoregressive(phi, 1)
    }

    /// Moving-average factor `1 + theta_1 B + ... + theta_q B^q`
    pub fn moving_average(theta: &[f64]) -> Self {
        Self::seasonal_moving_average(theta, 1)
    }

    /// Seasonal autoregressive factor `1 - Phi_1 B^s - ... - Phi_P B^{Ps}`
    pub fn seasonal_autoregressive(phi: &[f64], period: usize) -> Self {
        Self::sparse(phi.iter().map(|c| -c), period)
    }

    /// Seasonal moving-average factor `1 + Theta_1 B^s + ... + Theta_Q B^{Qs}`
    pub fn seasonal_moving_average(theta: &[f64], period: usize) -> Self {
        Self::sparse(theta.iter().copied(), period)
    }

    /// Differencing factor `(1 - B^lag)^order`
    pub fn differencing(order: usize, lag: usize) -> Self {
        let step = Self::sparse(std::iter::once(-1.0), lag);
        (0..order).fold(Self::one(), |acc, _| acc.multiply(&step))
    }

    fn sparse(coefficients: impl Iterator<Item = f64>, period: usize) -> Self {
        let coefficients: Vec<f64> = coefficients.collect();
        let period = period.max(1);
        let mut dense = vec![0.0; coefficients.len() * period + 1];
        dense[0] = 1.0;
        for (i, c) in coefficients.into_iter().enumerate() {
            dense[(i + 1) * period] = c;
        }
        Self { coefficients: dense }
    }

    /// Product of two polynomials
    pub fn multiply(&self, other: &Self) -> Self {
        let mut product = vec![0.0; self.coefficients.len() + other.coefficients.len() - 1];
        for (i, a) in self.coefficients.iter().enumerate() {
            if *a == 0.0 {
                continue;
            }
            for (j, b) in other.coefficients.iter().enumerate() {
                product[i + j] += a * b;
            }
        }
        Self {
            coefficients: product,
        }
    }

    /// Highest power of `B` present
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Coefficient of `B^power`, zero beyond the degree
    pub fn coefficient(&self, power: usize) -> f64 {
        self.coefficients.get(power).copied().unwrap_or(0.0)
    }

    /// All coefficients, lowest power first
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// First `count` weights of the expansion `numerator(B) / self(B)`
    ///
    /// With `self` the full autoregressive operator (including any
    /// differencing) and `numerator` the moving-average operator, these are the
    /// psi-weights of the MA(infinity) representation used for forecast error
    /// variances.
    pub fn psi_weights(&self, numerator: &Self, count: usize) -> Result<Vec<f64>> {
        let leading = self.coefficient(0);
        if leading.abs() < f64::EPSILON {
            return Err(MathError::CalculationError(
                "Cannot divide by a polynomial with zero constant term".to_string(),
            ));
        }

        let mut psi = Vec::with_capacity(count);
        for j in 0..count {
            let mut value = numerator.coefficient(j);
            for i in 1..=j.min(self.degree()) {
                value -= self.coefficient(i) * psi[j - i];
            }
            psi.push(value / leading);
        }
        Ok(psi)
    }
}
