//! Expected move
//!
//! Lognormal one-sigma price band to expiration: the call volatility sets the
//! upper bound, the put volatility the lower one.

use serde::{Deserialize, Serialize};

use crate::core::{normalize_time, MoveResult};
use crate::models::VolatilityEstimate;

/// Price band implied by call and put volatility
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpectedMoveRange {
    /// Underlying price the band is centered on
    pub spot: f64,
    pub low: f64,
    pub high: f64,
}

impl ExpectedMoveRange {
    /// Points from spot up to the high
    pub fn upside(&self) -> f64 {
        (self.high - self.spot).abs()
    }

    /// Points from spot down to the low
    pub fn downside(&self) -> f64 {
        self.spot - self.low
    }
}

/// `high = S·e^(σ_call·√T)`, `low = S / e^(σ_put·√T)`
///
/// Fails with the non-convergence error of whichever side has no volatility.
pub fn compute_range(
    current_price: f64,
    call_vol: &VolatilityEstimate,
    put_vol: &VolatilityEstimate,
    time: f64,
) -> MoveResult<ExpectedMoveRange> {
    let call_vol = call_vol.value()?;
    let put_vol = put_vol.value()?;
    Ok(range_from_vols(current_price, call_vol, put_vol, time))
}

/// Band from plain volatilities
pub fn range_from_vols(
    current_price: f64,
    call_vol: f64,
    put_vol: f64,
    time: f64,
) -> ExpectedMoveRange {
    let sqrt_t = normalize_time(time).sqrt();
    ExpectedMoveRange {
        spot: current_price,
        low: current_price / (put_vol * sqrt_t).exp(),
        high: current_price * (call_vol * sqrt_t).exp(),
    }
}
