//! Core estimate engine: system sizing, cost breakdown and 25-year savings projection

use super::cashflows::{round_half_up, CalculationResult, ChartPoint};
use crate::error::{EstimatorError, Result};
use crate::household::CalculatorInputs;
use crate::rates::{RateTable, StateRate};
use serde::{Deserialize, Serialize};
use std::env;

/// Projection horizon in years (chart has one extra point for year 0)
pub const PROJECTION_YEARS: u32 = 25;

/// Installed cost in USD per watt of capacity
pub const DEFAULT_COST_PER_WATT: f64 = 3.0;

/// Federal investment tax credit as a fraction of gross cost
pub const DEFAULT_TAX_CREDIT_RATE: f64 = 0.30;

/// System derate covering inverter, wiring and soiling losses
pub const DEFAULT_DERATE_FACTOR: f64 = 0.75;

const DAYS_PER_YEAR: f64 = 365.0;
const MONTHS_PER_YEAR: f64 = 12.0;
const WATTS_PER_KW: f64 = 1000.0;

/// Pricing constants for an estimate run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateConfig {
    pub cost_per_watt: f64,
    pub tax_credit_rate: f64,
    pub derate_factor: f64,
}

impl Default for EstimateConfig {
    fn default() -> Self {
        Self {
            cost_per_watt: DEFAULT_COST_PER_WATT,
            tax_credit_rate: DEFAULT_TAX_CREDIT_RATE,
            derate_factor: DEFAULT_DERATE_FACTOR,
        }
    }
}

impl EstimateConfig {
    /// Defaults overridden by SOLAR_COST_PER_WATT, SOLAR_TAX_CREDIT_RATE and SOLAR_DERATE_FACTOR
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cost_per_watt: env_f64("SOLAR_COST_PER_WATT", defaults.cost_per_watt),
            tax_credit_rate: env_f64("SOLAR_TAX_CREDIT_RATE", defaults.tax_credit_rate),
            derate_factor: env_f64("SOLAR_DERATE_FACTOR", defaults.derate_factor),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.cost_per_watt.is_finite() || self.cost_per_watt < 0.0 {
            return Err(EstimatorError::InvalidConfig(format!(
                "cost_per_watt must be finite and >= 0, got {}",
                self.cost_per_watt
            )));
        }
        if !(0.0..=1.0).contains(&self.tax_credit_rate) {
            return Err(EstimatorError::InvalidConfig(format!(
                "tax_credit_rate must be within [0, 1], got {}",
                self.tax_credit_rate
            )));
        }
        if !self.derate_factor.is_finite() || self.derate_factor <= 0.0 {
            return Err(EstimatorError::InvalidConfig(format!(
                "derate_factor must be finite and > 0, got {}",
                self.derate_factor
            )));
        }
        Ok(())
    }
}

fn env_f64(key: &str, default: f64) -> f64 {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Ignoring {}={:?}: not a number, using {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}

/// Main estimate engine
///
/// Holds the immutable rate table and pricing constants; every call to
/// [`SolarEstimator::estimate`] is a pure recomputation.
#[derive(Debug, Clone)]
pub struct SolarEstimator {
    rates: RateTable,
    config: EstimateConfig,
}

impl SolarEstimator {
    pub fn new(rates: RateTable, config: EstimateConfig) -> Self {
        Self { rates, config }
    }

    /// Engine over the built-in rate table and default pricing
    pub fn with_builtin_rates() -> Result<Self> {
        Ok(Self::new(RateTable::builtin()?, EstimateConfig::default()))
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    pub fn config(&self) -> &EstimateConfig {
        &self.config
    }

    /// Run an estimate; unknown state codes use the table's fallback entry
    pub fn estimate(&self, inputs: &CalculatorInputs) -> Result<CalculationResult> {
        estimate_with_rate(inputs, self.rates.resolve(&inputs.state_code), &self.config)
    }
}

/// Estimate against the given rate table with default pricing
pub fn calculate(inputs: &CalculatorInputs, rates: &RateTable) -> Result<CalculationResult> {
    estimate_with_rate(inputs, rates.resolve(&inputs.state_code), &EstimateConfig::default())
}

/// Estimate against a single, already resolved rate record
///
/// Out-of-range inputs are computed through as given. Only a broken rate
/// record or pricing config is an error.
pub fn estimate_with_rate(
    inputs: &CalculatorInputs,
    rate: &StateRate,
    config: &EstimateConfig,
) -> Result<CalculationResult> {
    rate.validate()?;
    config.validate()?;

    let system_size_kw = size_system(inputs, rate, config);

    let estimated_system_cost = system_size_kw * WATTS_PER_KW * config.cost_per_watt;
    let federal_tax_credit = estimated_system_cost * config.tax_credit_rate;
    let net_cost = estimated_system_cost - federal_tax_credit;

    let projection = project_savings(inputs, net_cost);

    Ok(CalculationResult {
        system_size_kw,
        estimated_system_cost,
        federal_tax_credit,
        net_cost,
        annual_savings: projection.initial_annual_saving,
        payback_period_years: projection.payback_period_years,
        twenty_five_year_savings: projection.final_cumulative,
        chart_data: projection.chart_data,
        yearly_savings: projection.yearly_savings,
    })
}

/// Capacity needed to produce the targeted share of annual consumption
fn size_system(inputs: &CalculatorInputs, rate: &StateRate, config: &EstimateConfig) -> f64 {
    let monthly_kwh = inputs.monthly_bill / rate.avg_cost_per_kwh;
    let annual_kwh_needed = monthly_kwh * MONTHS_PER_YEAR;
    let target_annual_production = annual_kwh_needed * (inputs.bill_offset / 100.0);

    let efficiency_factor = config.derate_factor * inputs.roof_sun_exposure;
    target_annual_production / (rate.peak_sun_hours * DAYS_PER_YEAR * efficiency_factor)
}

struct SavingsProjection {
    initial_annual_saving: f64,
    payback_period_years: f64,
    final_cumulative: f64,
    chart_data: Vec<ChartPoint>,
    yearly_savings: Vec<f64>,
}

/// Year-by-year cumulative position starting from the net outlay
fn project_savings(inputs: &CalculatorInputs, net_cost: f64) -> SavingsProjection {
    let initial_annual_saving =
        inputs.monthly_bill * MONTHS_PER_YEAR * (inputs.bill_offset / 100.0);
    let growth = 1.0 + inputs.inflation_rate / 100.0;

    let mut cumulative = -net_cost;
    let mut current_annual_saving = initial_annual_saving;
    let mut chart_data = Vec::with_capacity(PROJECTION_YEARS as usize + 1);
    let mut yearly_savings = Vec::with_capacity(PROJECTION_YEARS as usize);
    chart_data.push(ChartPoint::new(0, round_half_up(cumulative), 0));

    // Nothing to recoup when the net cost is zero or negative
    let mut payback = if cumulative >= 0.0 { Some(0.0) } else { None };

    for year in 1..=PROJECTION_YEARS {
        let previous = cumulative;
        cumulative += current_annual_saving;

        // First crossing only, interpolated within the year
        if payback.is_none() && previous < 0.0 && cumulative >= 0.0 {
            let fraction = previous.abs() / (cumulative - previous);
            payback = Some((year - 1) as f64 + fraction);
        }

        chart_data.push(ChartPoint::new(
            year,
            round_half_up(cumulative),
            round_half_up(current_annual_saving),
        ));

        yearly_savings.push(current_annual_saving);
        current_annual_saving *= growth;
    }

    // A position that ends underwater never paid back
    let payback_period_years = match payback {
        Some(years) if cumulative >= 0.0 => years,
        _ => PROJECTION_YEARS as f64,
    };

    SavingsProjection {
        initial_annual_saving,
        payback_period_years,
        final_cumulative: cumulative,
        chart_data,
        yearly_savings,
    }
}
