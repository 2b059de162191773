//! Seasonal ARIMA models for time series forecasting
//!
//! The model is
//!
//! ```text
//! phi(B) Phi(B^s) (1 - B)^d (1 - B^s)^D y_t = theta(B) Theta(B^s) e_t
//! ```
//!
//! without a constant term. Coefficients are estimated by conditional sum of
//! squares: the series is differenced, innovations before the first full lag
//! window are taken as zero, and the squared innovations are minimised with a
//! Nelder–Mead search. Each coefficient is optimised on an unbounded scale and
//! mapped through `tanh`, which keeps first-order factors stationary and
//! invertible.

use crate::metrics::forecast_accuracy;
use crate::models::{
    FitDiagnostics, FitFailure, ForecastModel, PointForecast, SarimaOrder, TrainedForecastModel,
};
use forecast_math::differencing::difference_seasonal;
use forecast_math::optimize::{nelder_mead, NelderMeadOptions};
use forecast_math::polynomial::LagPolynomial;
use forecast_math::stats;
use serde::Serialize;

/// Estimated coefficients of a seasonal ARIMA model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SarimaCoefficients {
    pub ar: Vec<f64>,
    pub ma: Vec<f64>,
    pub seasonal_ar: Vec<f64>,
    pub seasonal_ma: Vec<f64>,
}

impl SarimaCoefficients {
    /// Split an unconstrained parameter vector into bounded coefficients
    fn from_unconstrained(order: &SarimaOrder, params: &[f64]) -> Self {
        let mut bounded = params.iter().map(|x| x.tanh());
        let mut take = |n: usize| bounded.by_ref().take(n).collect::<Vec<f64>>();
        let ar = take(order.p);
        let ma = take(order.q);
        let seasonal_ar = take(order.seasonal_p);
        let seasonal_ma = take(order.seasonal_q);
        Self {
            ar,
            ma,
            seasonal_ar,
            seasonal_ma,
        }
    }

    /// Combined autoregressive operator `phi(B) Phi(B^s)`
    fn autoregressive(&self, period: usize) -> LagPolynomial {
        LagPolynomial::autoregressive(&self.ar)
            .multiply(&LagPolynomial::seasonal_autoregressive(&self.seasonal_ar, period))
    }

    /// Combined moving-average operator `theta(B) Theta(B^s)`
    fn moving_average(&self, period: usize) -> LagPolynomial {
        LagPolynomial::moving_average(&self.ma)
            .multiply(&LagPolynomial::seasonal_moving_average(&self.seasonal_ma, period))
    }
}

/// Untrained seasonal ARIMA specification
#[derive(Debug, Clone)]
pub struct Sarima {
    order: SarimaOrder,
    options: NelderMeadOptions,
}

/// Seasonal ARIMA fitted to a series
#[derive(Debug, Clone)]
pub struct TrainedSarima {
    order: SarimaOrder,
    coefficients: SarimaCoefficients,
    /// Full autoregressive operator including differencing
    integrated_ar: LagPolynomial,
    moving_average: LagPolynomial,
    sigma2: f64,
    css: f64,
    iterations: usize,
    /// Observed values
    history: Vec<f64>,
    /// Innovations aligned with `history`, zero where conditioned away
    innovations: Vec<f64>,
    /// First index of `history` with an estimated innovation
    first_residual: usize,
}

impl Sarima {
    pub fn new(order: SarimaOrder) -> Self {
        Self {
            order,
            options: NelderMeadOptions::default(),
        }
    }

    pub fn with_options(mut self, options: NelderMeadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn order(&self) -> SarimaOrder {
        self.order
    }
}

impl Default for Sarima {
    fn default() -> Self {
        Self::new(SarimaOrder::default())
    }
}

/// Innovations of an ARMA model on an already differenced series
///
/// Innovations before the autoregressive operator's degree are conditioned to
/// zero and not counted in the sum of squares.
fn conditional_innovations(
    differenced: &[f64],
    autoregressive: &LagPolynomial,
    moving_average: &LagPolynomial,
) -> Vec<f64> {
    let start = autoregressive.degree();
    let mut innovations = vec![0.0; differenced.len()];

    for t in start..differenced.len() {
        let mut e: f64 = autoregressive
            .coefficients()
            .iter()
            .enumerate()
            .map(|(i, c)| c * differenced[t - i])
            .sum();
        for j in 1..=moving_average.degree().min(t) {
            e -= moving_average.coefficient(j) * innovations[t - j];
        }
        innovations[t] = e;
    }

    innovations
}

impl ForecastModel for Sarima {
    type Trained = TrainedSarima;

    fn train(&self, values: &[f64]) -> Result<TrainedSarima, FitFailure> {
        let order = self.order;
        let required = order.min_observations();
        if values.len() < required {
            return Err(FitFailure::InsufficientData {
                required,
                actual: values.len(),
            });
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(FitFailure::NumericalInstability {
                detail: "series contains non-finite values".to_string(),
            });
        }

        let differenced =
            difference_seasonal(values, order.d, order.seasonal_d, order.period).map_err(|e| {
                FitFailure::NumericalInstability {
                    detail: e.to_string(),
                }
            })?;

        let ar_degree = order.p + order.seasonal_p * order.period;
        let effective = differenced.len() - ar_degree;

        let objective = |params: &[f64]| {
            let coefficients = SarimaCoefficients::from_unconstrained(&order, params);
            let innovations = conditional_innovations(
                &differenced,
                &coefficients.autoregressive(order.period),
                &coefficients.moving_average(order.period),
            );
            stats::sum_of_squares(&innovations[ar_degree..])
        };

        let (coefficients, css, iterations) = if order.parameter_count() == 0 {
            let coefficients = SarimaCoefficients::from_unconstrained(&order, &[]);
            (coefficients, objective(&[]), 0)
        } else {
            let start = vec![0.0; order.parameter_count()];
            let minimum = nelder_mead(&objective, &start, &self.options).map_err(|e| {
                FitFailure::NumericalInstability {
                    detail: e.to_string(),
                }
            })?;
            if !minimum.converged {
                return Err(FitFailure::NonConvergence {
                    iterations: minimum.iterations,
                });
            }
            let coefficients = SarimaCoefficients::from_unconstrained(&order, &minimum.point);
            (coefficients, minimum.value, minimum.iterations)
        };

        let sigma2 = css / effective as f64;
        if !css.is_finite() || !sigma2.is_finite() {
            return Err(FitFailure::NumericalInstability {
                detail: "conditional sum of squares is not finite".to_string(),
            });
        }

        let autoregressive = coefficients.autoregressive(order.period);
        let moving_average = coefficients.moving_average(order.period);
        let differenced_innovations =
            conditional_innovations(&differenced, &autoregressive, &moving_average);

        let loss = order.differencing_loss();
        let mut innovations = vec![0.0; loss];
        innovations.extend(differenced_innovations);

        let integrated_ar = autoregressive
            .multiply(&LagPolynomial::differencing(order.d, 1))
            .multiply(&LagPolynomial::differencing(order.seasonal_d, order.period));

        tracing::debug!(
            model = %order,
            sigma2,
            iterations,
            "fitted seasonal ARIMA"
        );

        Ok(TrainedSarima {
            order,
            coefficients,
            integrated_ar,
            moving_average,
            sigma2,
            css,
            iterations,
            history: values.to_vec(),
            innovations,
            first_residual: loss + ar_degree,
        })
    }

    fn name(&self) -> String {
        self.order.to_string()
    }
}

impl TrainedSarima {
    pub fn coefficients(&self) -> &SarimaCoefficients {
        &self.coefficients
    }

    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// One-step-ahead fitted values, from the first estimated innovation on
    pub fn fitted_values(&self) -> Vec<f64> {
        self.history[self.first_residual..]
            .iter()
            .zip(&self.innovations[self.first_residual..])
            .map(|(y, e)| y - e)
            .collect()
    }
}

impl TrainedForecastModel for TrainedSarima {
    fn forecast(&self, horizon: usize) -> Result<PointForecast, FitFailure> {
        let n = self.history.len();
        let mut extended = self.history.clone();
        let mut innovations = self.innovations.clone();

        for _ in 0..horizon {
            let t = extended.len();
            let mut next = 0.0;
            for i in 1..=self.integrated_ar.degree().min(t) {
                next -= self.integrated_ar.coefficient(i) * extended[t - i];
            }
            for j in 1..=self.moving_average.degree().min(t) {
                next += self.moving_average.coefficient(j) * innovations[t - j];
            }
            extended.push(next);
            innovations.push(0.0);
        }

        let values = extended.split_off(n);

        let psi = self
            .integrated_ar
            .psi_weights(&self.moving_average, horizon)
            .map_err(|e| FitFailure::NumericalInstability {
                detail: e.to_string(),
            })?;
        let mut cumulative = 0.0;
        let std_errors: Vec<f64> = psi
            .iter()
            .map(|weight| {
                cumulative += weight * weight;
                (self.sigma2 * cumulative).sqrt()
            })
            .collect();

        if values.iter().chain(&std_errors).any(|v| !v.is_finite()) {
            return Err(FitFailure::NumericalInstability {
                detail: "forecast contains non-finite values".to_string(),
            });
        }

        Ok(PointForecast { values, std_errors })
    }

    fn diagnostics(&self) -> FitDiagnostics {
        let fitted = self.fitted_values();
        let in_sample = forecast_accuracy(&fitted, &self.history[self.first_residual..]).ok();

        FitDiagnostics {
            model: self.order.to_string(),
            coefficients: self.coefficients.clone(),
            sigma2: self.sigma2,
            css: self.css,
            iterations: self.iterations,
            in_sample,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_minimum_observations() {
        assert_eq!(SarimaOrder::default().min_observations(), 27);

        let short: Vec<f64> = vec![0.0; 26];
        let err = Sarima::default().train(&short).unwrap_err();
        assert_eq!(
            err,
            FitFailure::InsufficientData {
                required: 27,
                actual: 26
            }
        );
    }

    #[test]
    fn test_conditional_innovations_of_white_noise() {
        // With all coefficients zero the innovations are the data itself
        let data = [0.5, -1.0, 2.0, 0.25];
        let innovations =
            conditional_innovations(&data, &LagPolynomial::one(), &LagPolynomial::one());
        assert_eq!(innovations, data.to_vec());
    }

    #[test]
    fn test_conditional_innovations_of_ar1() {
        let data = [1.0, 2.0, 4.0];
        let ar = LagPolynomial::autoregressive(&[0.5]);
        let innovations = conditional_innovations(&data, &ar, &LagPolynomial::one());
        assert_eq!(innovations, vec![0.0, 1.5, 3.0]);
    }

    #[test]
    fn test_unconstrained_mapping_is_bounded() {
        let order = SarimaOrder::default();
        let coefficients = SarimaCoefficients::from_unconstrained(&order, &[50.0, -50.0, 0.0, 1.0]);
        assert_eq!(coefficients.ar.len(), 1);
        assert!(coefficients.ar[0] <= 1.0);
        assert!(coefficients.ma[0] >= -1.0);
        assert_eq!(coefficients.seasonal_ar, vec![0.0]);
        assert_abs_diff_eq!(coefficients.seasonal_ma[0], 1.0f64.tanh());
    }

    #[test]
    fn test_linear_trend_continues() {
        let values: Vec<f64> = (0..40).map(|t| 10.0 + 2.0 * t as f64).collect();
        let trained = Sarima::default().train(&values).unwrap();
        let forecast = trained.forecast(3).unwrap();

        assert_abs_diff_eq!(forecast.values[0], 90.0, epsilon = 1e-9);
        assert_abs_diff_eq!(forecast.values[1], 92.0, epsilon = 1e-9);
        assert_abs_diff_eq!(forecast.values[2], 94.0, epsilon = 1e-9);
        assert_eq!(trained.sigma2(), 0.0);
    }
}
