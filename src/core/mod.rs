//! Core data types
//!
//! Defines fundamental types:
//! - OptionType / OptionQuote: solver input
//! - ContractQuote / ExpirationChain / SpotQuote: market data as delivered by the adapter
//! - MoveError: crate-wide error taxonomy

pub mod option;
pub mod quote;
pub mod error;

pub use option::*;
pub use quote::*;
pub use error::*;
