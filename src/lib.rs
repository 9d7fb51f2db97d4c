//! # Implied Move - Option-Implied Volatility and Expected Price Range
//!
//! Estimates the implied volatility of a stock's near-the-money options by
//! inverting Black-Scholes with Newton-Raphson, then turns the call and put
//! volatilities into an expected price band to the nearest expiration.
//!
//! ## Key Components
//!
//! - **Data Fetching**: Yahoo Finance spot quote, nearest option chain, ^IRX rate
//! - **Black-Scholes**: Closed-form European pricing and vega
//! - **Implied Vol**: Newton-Raphson solver with an explicit outcome type
//! - **Expected Move**: `S·e^(σ√T)` up, `S/e^(σ√T)` down
//!
//! ## Usage
//!
//! ```rust,no_run
//! use implied_move::prelude::*;
//!
//! let yahoo = YahooClient::new().unwrap();
//! let now = chrono::Local::now().naive_local();
//! let analysis = analyze(&yahoo, "SPY", &ImpliedVolSolver::default(), now).unwrap();
//!
//! for line in analysis.report_lines() {
//!     println!("{line}");
//! }
//! ```
//!
//! ## What This Does NOT Do
//!
//! - Price American early exercise (European formula throughout)
//! - Adjust for dividends
//! - Look past the first listed expiration
//! - Bound or clamp the volatility iterate

pub mod core;
pub mod data;
pub mod models;
pub mod pricing;

/// Prelude with commonly used types
pub mod prelude {
    // Core types
    pub use crate::core::{
        normalize_time, time_to_expiration, ContractQuote, ExpirationChain, MoveError, MoveResult,
        OptionQuote, OptionType, SpotQuote,
    };

    // Data fetching
    pub use crate::data::{MarketData, YahooClient, YahooConfig};

    // Models
    pub use crate::models::{
        implied_volatility, norm_cdf, norm_pdf,
        // Black-Scholes
        black_scholes::price as bs_price,
        black_scholes::vega as bs_vega,
        ImpliedVolSolver, SolverConfig, VolatilityEstimate,
    };

    // Expected move
    pub use crate::pricing::{
        analyze, compute_range, range_from_vols, ExpectedMoveRange, MoveAnalysis,
    };
}

// Re-export main types at crate root
pub use crate::core::{MoveError, MoveResult};
pub use crate::models::{ImpliedVolSolver, VolatilityEstimate};
