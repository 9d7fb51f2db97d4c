//! Option definitions
//!
//! The option type tag and the immutable quote handed to the volatility solver.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{MoveError, MoveResult};

/// Option type (Call or Put)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::Call => "call",
            OptionType::Put => "put",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionType {
    type Err = MoveError;

    fn from_str(tag: &str) -> MoveResult<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "call" | "c" => Ok(OptionType::Call),
            "put" | "p" => Ok(OptionType::Put),
            _ => Err(MoveError::invalid_option_type(tag)),
        }
    }
}

/// Observed option price together with the contract terms needed to invert it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    /// Underlying spot price
    pub underlying_price: f64,
    /// Strike price
    pub strike_price: f64,
    /// Time to expiration in years (sign is normalized by consumers)
    pub time_to_expiration: f64,
    /// Observed market price of the option
    pub observed_price: f64,
    /// Option type (Call/Put)
    pub option_type: OptionType,
}

impl OptionQuote {
    pub fn new(
        underlying_price: f64,
        strike_price: f64,
        time_to_expiration: f64,
        observed_price: f64,
        option_type: OptionType,
    ) -> Self {
        Self {
            underlying_price,
            strike_price,
            time_to_expiration,
            observed_price,
            option_type,
        }
    }

    /// Build a quote from a free-text option type tag ("call" / "put")
    pub fn from_tag(
        underlying_price: f64,
        strike_price: f64,
        time_to_expiration: f64,
        observed_price: f64,
        tag: &str,
    ) -> MoveResult<Self> {
        let option_type = tag.parse()?;
        Ok(Self::new(
            underlying_price,
            strike_price,
            time_to_expiration,
            observed_price,
            option_type,
        ))
    }

    /// Check the pricing preconditions: positive spot and strike,
    /// non-negative observed price, finite time
    pub fn validate(&self) -> MoveResult<()> {
        if !(self.underlying_price.is_finite() && self.underlying_price > 0.0) {
            return Err(MoveError::invalid_input(format!(
                "underlying price must be positive, got {}",
                self.underlying_price
            )));
        }
        if !(self.strike_price.is_finite() && self.strike_price > 0.0) {
            return Err(MoveError::invalid_input(format!(
                "strike price must be positive, got {}",
                self.strike_price
            )));
        }
        if !(self.observed_price.is_finite() && self.observed_price >= 0.0) {
            return Err(MoveError::invalid_input(format!(
                "observed price must be non-negative, got {}",
                self.observed_price
            )));
        }
        if !self.time_to_expiration.is_finite() {
            return Err(MoveError::invalid_input("time to expiration is not finite"));
        }
        Ok(())
    }

    /// Time to expiration with a negative value folded onto its absolute value
    pub fn normalized_time(&self) -> f64 {
        normalize_time(self.time_to_expiration)
    }
}

/// Negative times (stale or mis-parsed expirations) are taken by magnitude
pub fn normalize_time(time: f64) -> f64 {
    time.abs()
}
