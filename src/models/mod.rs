//! Pricing models
//!
//! Implements:
//! - Black-Scholes (closed-form pricing, vega)
//! - Newton-Raphson implied volatility solver

pub mod black_scholes;
pub mod implied_vol;

pub use black_scholes::{norm_cdf, norm_pdf};
pub use implied_vol::*;
