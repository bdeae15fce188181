//! Configuration errors
//!
//! Only configuration can fail. Runtime edge cases (stale entity references,
//! missing HP icons) are handled as state transitions inside the simulation.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },

    #[error("{field} must be greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },

    #[error("{field} range is inverted: min {min} > max {max}")]
    InvertedRange {
        field: &'static str,
        min: f64,
        max: f64,
    },

    #[error("{field} is too large")]
    TooLarge { field: &'static str },

    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),
}
