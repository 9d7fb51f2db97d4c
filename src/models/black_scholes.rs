//! Black-Scholes Model
//!
//! Provides:
//! - Standard normal CDF / PDF
//! - European option pricing (no dividends)
//! - Vega, the Newton-Raphson derivative for the implied volatility solver
//!
//! The functions evaluate the closed form as written. With `vol * sqrt(time) == 0`
//! the results are non-finite; callers that need a hard error check for that first.

use std::f64::consts::{PI, SQRT_2};

use statrs::function::erf::erf;

use crate::core::OptionType;

/// Standard normal CDF, Φ(x) = (1 + erf(x / √2)) / 2
pub fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf(x / SQRT_2))
}

/// Standard normal PDF
pub fn norm_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Black-Scholes d1 parameter
pub fn d1(spot: f64, strike: f64, rate: f64, vol: f64, time: f64) -> f64 {
    ((spot / strike).ln() + (rate + 0.5 * vol * vol) * time) / (vol * time.sqrt())
}

/// Black-Scholes European option price
pub fn price(
    spot: f64,
    strike: f64,
    rate: f64,
    vol: f64,
    time: f64,
    option_type: OptionType,
) -> f64 {
    let d1 = d1(spot, strike, rate, vol, time);
    let d2 = d1 - vol * time.sqrt();
    let df = (-rate * time).exp();

    match option_type {
        OptionType::Call => spot * norm_cdf(d1) - strike * df * norm_cdf(d2),
        OptionType::Put => strike * df * norm_cdf(-d2) - spot * norm_cdf(-d1),
    }
}

/// Vega per unit of volatility (same for call and put)
pub fn vega(spot: f64, strike: f64, rate: f64, vol: f64, time: f64) -> f64 {
    let d1 = d1(spot, strike, rate, vol, time);
    spot * norm_pdf(d1) * time.sqrt()
}
