//! Expected move pricing
//!
//! - Expected move band from call/put implied volatility
//! - End-to-end analysis of one ticker and its report

pub mod analysis;
pub mod expected_move;

pub use analysis::*;
pub use expected_move::*;
