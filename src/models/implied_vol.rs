//! Implied volatility solver
//!
//! Newton-Raphson on the Black-Scholes price, starting from a fixed guess and
//! stepping by `(model - observed) / vega` until the price error falls below
//! the tolerance or the iteration budget runs out.
//!
//! Volatility is not bounded: the iterate may go negative or grow very large.
//! The only bound on runtime is `max_iterations`. Non-finite intermediate
//! values end the run as [`VolatilityEstimate::Diverged`], and a price match
//! at σ ≤ 0 ends it as [`VolatilityEstimate::NonPositive`].

use serde::{Deserialize, Serialize};

use super::black_scholes;
use crate::core::{MoveError, MoveResult, OptionQuote, OptionType};

/// Solver settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Starting volatility guess
    /// Default: 0.5
    pub initial_vol: f64,

    /// Absolute price tolerance for convergence
    /// Default: 1e-6
    pub tolerance: f64,

    /// Newton-Raphson iteration budget
    /// Default: 100
    pub max_iterations: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            initial_vol: 0.5,
            tolerance: 1e-6,
            max_iterations: 100,
        }
    }
}

/// Outcome of an implied volatility solve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum VolatilityEstimate {
    /// Model price matched the observed price within tolerance
    Converged { vol: f64, iterations: usize },
    /// Iteration budget exhausted
    NotConverged { iterations: usize, last_vol: f64 },
    /// Price, vega or volatility became NaN or infinite
    Diverged { iteration: usize },
    /// Price matched within tolerance, but at a volatility that is not positive
    NonPositive { vol: f64, iteration: usize },
}

impl VolatilityEstimate {
    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged { .. })
    }

    /// Converged volatility, or the matching non-convergence error
    pub fn value(&self) -> MoveResult<f64> {
        match *self {
            Self::Converged { vol, .. } => Ok(vol),
            Self::NotConverged { iterations, last_vol } => {
                Err(MoveError::NotConverged { iterations, last_vol })
            }
            Self::Diverged { iteration } => Err(MoveError::Diverged { iteration }),
            Self::NonPositive { vol, iteration } => {
                Err(MoveError::NonPositiveVolatility { vol, iteration })
            }
        }
    }

    /// Converged volatility, if any
    pub fn vol(&self) -> Option<f64> {
        match *self {
            Self::Converged { vol, .. } => Some(vol),
            _ => None,
        }
    }
}

/// Newton-Raphson implied volatility solver
#[derive(Debug, Clone, Copy, Default)]
pub struct ImpliedVolSolver {
    config: SolverConfig,
}

impl ImpliedVolSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Recover the volatility that reproduces `quote.observed_price`
    ///
    /// # Errors
    /// - [`MoveError::InvalidInput`] when spot/strike are not positive or the
    ///   observed price is negative
    /// - [`MoveError::DivisionHazard`] when `vol * sqrt(T)` or vega is zero
    ///
    /// Running out of iterations, hitting NaN/Infinity or matching the price at
    /// σ ≤ 0 is not an error here; it comes back as a non-converged
    /// [`VolatilityEstimate`].
    pub fn solve(&self, quote: &OptionQuote, rate: f64) -> MoveResult<VolatilityEstimate> {
        quote.validate()?;
        if !rate.is_finite() {
            return Err(MoveError::invalid_input(format!("risk-free rate is not finite: {rate}")));
        }

        let spot = quote.underlying_price;
        let strike = quote.strike_price;
        let target = quote.observed_price;
        let option_type = quote.option_type;
        let time = quote.normalized_time();
        let sqrt_t = time.sqrt();

        let mut vol = self.config.initial_vol;

        for iteration in 0..self.config.max_iterations {
            let total_vol = vol * sqrt_t;
            if total_vol == 0.0 {
                return Err(MoveError::division_hazard(format!(
                    "vol * sqrt(T) is zero (vol {vol}, T {time}) at iteration {iteration}"
                )));
            }

            let model = black_scholes::price(spot, strike, rate, vol, time, option_type);
            let vega = black_scholes::vega(spot, strike, rate, vol, time);

            if !model.is_finite() || !vega.is_finite() {
                tracing::debug!(iteration, vol, model, vega, "implied vol diverged");
                return Ok(VolatilityEstimate::Diverged { iteration });
            }

            let diff = model - target;
            if diff.abs() < self.config.tolerance {
                if vol <= 0.0 {
                    tracing::debug!(iteration, vol, %option_type, "implied vol matched at σ <= 0");
                    return Ok(VolatilityEstimate::NonPositive { vol, iteration });
                }
                tracing::debug!(iteration, vol, %option_type, "implied vol converged");
                return Ok(VolatilityEstimate::Converged { vol, iterations: iteration });
            }

            if vega == 0.0 {
                return Err(MoveError::division_hazard(format!(
                    "vega underflowed to zero (vol {vol}) at iteration {iteration}"
                )));
            }

            vol -= diff / vega;

            if !vol.is_finite() {
                tracing::debug!(iteration, "implied vol step left the finite range");
                return Ok(VolatilityEstimate::Diverged { iteration });
            }
        }

        tracing::debug!(
            iterations = self.config.max_iterations,
            last_vol = vol,
            %option_type,
            "implied vol did not converge"
        );
        Ok(VolatilityEstimate::NotConverged {
            iterations: self.config.max_iterations,
            last_vol: vol,
        })
    }
}

/// Solve with the default settings (σ₀ = 0.5, tolerance 1e-6, 100 iterations)
pub fn implied_volatility(
    spot: f64,
    strike: f64,
    time: f64,
    observed_price: f64,
    option_type: OptionType,
    rate: f64,
) -> MoveResult<VolatilityEstimate> {
    let quote = OptionQuote::new(spot, strike, time, observed_price, option_type);
    ImpliedVolSolver::default().solve(&quote, rate)
}
