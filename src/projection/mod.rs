//! Estimate engine: sizing, cost breakdown and savings projection

mod engine;
mod cashflows;
pub mod irr;

pub use engine::{
    calculate, estimate_with_rate, EstimateConfig, SolarEstimator, DEFAULT_COST_PER_WATT,
    DEFAULT_DERATE_FACTOR, DEFAULT_TAX_CREDIT_RATE, PROJECTION_YEARS,
};
pub use cashflows::{round_half_up, CalculationResult, ChartPoint};
pub use irr::internal_rate_of_return;
