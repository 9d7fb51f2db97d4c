//! Market data interface
//!
//! What the analysis needs from a quote source. Implementations do their own
//! retrying, if any; errors reach the caller unchanged.

use crate::core::{ExpirationChain, MoveResult, SpotQuote};

/// Source of spot prices, the short-term rate and option chains
pub trait MarketData {
    /// Latest price and display name of the underlying
    fn spot(&self, symbol: &str) -> MoveResult<SpotQuote>;

    /// Most recent short-term risk-free rate as a fraction (4.5% -> 0.045)
    fn risk_free_rate(&self) -> MoveResult<f64>;

    /// Option chain for the nearest listed expiration
    fn nearest_expiration_chain(&self, symbol: &str) -> MoveResult<ExpirationChain>;

    /// Latest underlying price
    fn current_price(&self, symbol: &str) -> MoveResult<f64> {
        self.spot(symbol).map(|quote| quote.price)
    }
}

impl<M: MarketData + ?Sized> MarketData for &M {
    fn spot(&self, symbol: &str) -> MoveResult<SpotQuote> {
        (**self).spot(symbol)
    }

    fn risk_free_rate(&self) -> MoveResult<f64> {
        (**self).risk_free_rate()
    }

    fn nearest_expiration_chain(&self, symbol: &str) -> MoveResult<ExpirationChain> {
        (**self).nearest_expiration_chain(symbol)
    }
}
