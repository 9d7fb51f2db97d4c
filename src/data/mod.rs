//! Market data
//!
//! Handles:
//! - The `MarketData` interface consumed by the analysis
//! - Yahoo Finance API for spot, option chains and the ^IRX rate (free)

pub mod market;
pub mod yahoo;

pub use market::*;
pub use yahoo::*;
