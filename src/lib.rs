//! Solar Estimator - residential solar sizing, cost and payback projections
//!
//! This library provides:
//! - Per-state electricity price / sun-hour tables with a defined fallback
//! - A pure estimate engine (system size, cost, tax credit, 25-year savings, payback)
//! - Parallel batch, cross-state and pricing-sensitivity runs
//! - Thin UI-shell helpers (theme preference, page metadata, text reports)
//! - Simulated installer quote requests

pub mod error;
pub mod rates;
pub mod household;
pub mod projection;
pub mod scenario;
pub mod presentation;
pub mod lead;

// Re-export commonly used types
pub use error::{EstimatorError, Result};
pub use rates::{RateTable, StateRate};
pub use household::{CalculatorInputs, Household};
pub use projection::{calculate, CalculationResult, ChartPoint, EstimateConfig, SolarEstimator};
pub use scenario::ScenarioRunner;
