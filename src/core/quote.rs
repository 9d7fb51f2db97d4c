//! Option chain quote data
//!
//! Listed contracts for a single expiration and the near-the-money selection rule.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::error::{MoveError, MoveResult};

const MILLIS_PER_DAY: i64 = 86_400_000;
const DAYS_PER_YEAR: f64 = 365.0;

/// Spot quote for the underlying
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotQuote {
    pub symbol: String,
    /// Security name shown in the report
    pub display_name: String,
    pub price: f64,
}

/// One listed contract from an option chain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContractQuote {
    pub strike: f64,
    /// Last traded price
    pub last_price: f64,
    /// Exchange in-the-money flag
    pub in_the_money: bool,
}

impl ContractQuote {
    pub fn new(strike: f64, last_price: f64, in_the_money: bool) -> Self {
        Self {
            strike,
            last_price,
            in_the_money,
        }
    }
}

/// Calls and puts for the nearest listed expiration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpirationChain {
    pub underlying: String,
    pub expiration: NaiveDate,
    /// Call quotes, ascending by strike
    pub calls: Vec<ContractQuote>,
    /// Put quotes, ascending by strike
    pub puts: Vec<ContractQuote>,
}

impl ExpirationChain {
    pub fn new(underlying: impl Into<String>, expiration: NaiveDate) -> Self {
        Self {
            underlying: underlying.into(),
            expiration,
            calls: Vec::new(),
            puts: Vec::new(),
        }
    }

    /// Add a call quote
    pub fn add_call(&mut self, quote: ContractQuote) {
        self.calls.push(quote);
        self.calls.sort_by(|a, b| a.strike.total_cmp(&b.strike));
    }

    /// Add a put quote
    pub fn add_put(&mut self, quote: ContractQuote) {
        self.puts.push(quote);
        self.puts.sort_by(|a, b| a.strike.total_cmp(&b.strike));
    }

    /// Highest-strike in-the-money call: the ITM boundary just below the money
    pub fn nearest_itm_call(&self) -> MoveResult<&ContractQuote> {
        sorted_itm(&self.calls)
            .last()
            .copied()
            .ok_or_else(|| {
                MoveError::data_unavailable(format!(
                    "no in-the-money call for {} expiring {}",
                    self.underlying, self.expiration
                ))
            })
    }

    /// Lowest-strike in-the-money put: the ITM boundary just above the money
    pub fn nearest_itm_put(&self) -> MoveResult<&ContractQuote> {
        sorted_itm(&self.puts)
            .first()
            .copied()
            .ok_or_else(|| {
                MoveError::data_unavailable(format!(
                    "no in-the-money put for {} expiring {}",
                    self.underlying, self.expiration
                ))
            })
    }

    /// Time to this chain's expiration in years, measured from `now`
    pub fn time_to_expiration(&self, now: NaiveDateTime) -> f64 {
        time_to_expiration(self.expiration, now)
    }
}

/// In-the-money contracts ordered by strike, whatever order they arrived in
fn sorted_itm(quotes: &[ContractQuote]) -> Vec<&ContractQuote> {
    let mut itm: Vec<&ContractQuote> = quotes.iter().filter(|q| q.in_the_money).collect();
    itm.sort_by(|a, b| a.strike.total_cmp(&b.strike));
    itm
}

/// Whole days from `now` to midnight of the expiration date, floored,
/// over a 365-day year. A same-day expiration yields -1/365.
pub fn time_to_expiration(expiration: NaiveDate, now: NaiveDateTime) -> f64 {
    let expiry_start = expiration.and_time(chrono::NaiveTime::MIN);
    let days = (expiry_start - now)
        .num_milliseconds()
        .div_euclid(MILLIS_PER_DAY);
    days as f64 / DAYS_PER_YEAR
}
