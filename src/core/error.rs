//! Error types for implied move computation

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MoveError {
    #[error("Invalid option type: {0:?} (expected \"call\" or \"put\")")]
    InvalidOptionType(String),

    #[error("Solver did not converge after {iterations} iterations (last vol {last_vol})")]
    NotConverged { iterations: usize, last_vol: f64 },

    #[error("Solver diverged to a non-finite value at iteration {iteration}")]
    Diverged { iteration: usize },

    #[error("Solver matched the price at non-positive vol {vol} (iteration {iteration})")]
    NonPositiveVolatility { vol: f64, iteration: usize },

    #[error("Division hazard: {0}")]
    DivisionHazard(String),

    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
}

pub type MoveResult<T> = Result<T, MoveError>;

impl MoveError {
    pub fn invalid_option_type(tag: impl Into<String>) -> Self {
        Self::InvalidOptionType(tag.into())
    }

    pub fn division_hazard(msg: impl Into<String>) -> Self {
        Self::DivisionHazard(msg.into())
    }

    pub fn data_unavailable(msg: impl Into<String>) -> Self {
        Self::DataUnavailable(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// True when the solver ran out of iterations, left the finite domain or
    /// only matched the price at σ ≤ 0
    pub fn is_non_convergence(&self) -> bool {
        matches!(
            self,
            Self::NotConverged { .. } | Self::Diverged { .. } | Self::NonPositiveVolatility { .. }
        )
    }

    /// True when the market data adapter could not deliver what was asked for
    pub fn is_data_unavailable(&self) -> bool {
        matches!(self, Self::DataUnavailable(_) | Self::Network(_))
    }
}
