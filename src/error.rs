//! Error types shared across the estimator

use thiserror::Error;

/// Errors raised while building rate tables or running an estimate
#[derive(Debug, Error)]
pub enum EstimatorError {
    /// A rate-table entry that would make the sizing math undefined
    #[error("invalid rate for state '{code}': {field} = {value} (must be finite and > 0)")]
    InvalidRate {
        code: String,
        field: &'static str,
        value: f64,
    },

    /// Pricing constants that cannot produce a meaningful cost breakdown
    #[error("invalid estimate config: {0}")]
    InvalidConfig(String),

    #[error("duplicate state code '{0}' in rate table")]
    DuplicateStateCode(String),

    #[error("rate table is empty")]
    EmptyRateTable,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EstimatorError>;
