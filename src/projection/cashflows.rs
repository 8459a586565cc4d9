//! Estimate output structures

use super::irr::internal_rate_of_return;
use serde::{Deserialize, Serialize};

/// Round half up (toward +inf), the way the web chart rounds
///
/// Note `-2.5` rounds to `-2`, unlike `f64::round`.
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// One point of the cumulative-savings chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Years since installation (0 = install day)
    pub year: u32,

    /// Cumulative savings net of the upfront cost, whole USD
    pub savings: i64,

    /// Gross utility cost avoided in this year, whole USD
    pub cost: i64,
}

impl ChartPoint {
    pub fn new(year: u32, savings: i64, cost: i64) -> Self {
        Self { year, savings, cost }
    }
}

/// Complete estimate, regenerated wholesale on every input change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub system_size_kw: f64,
    pub estimated_system_cost: f64,
    pub federal_tax_credit: f64,
    pub net_cost: f64,

    /// Nominal year-1 saving (not inflated)
    pub annual_savings: f64,

    /// Years until cumulative savings reach zero, capped at 25
    pub payback_period_years: f64,

    /// Inflation-compounded cumulative position at year 25
    pub twenty_five_year_savings: f64,

    pub chart_data: Vec<ChartPoint>,

    /// Unrounded saving for years 1..=25 (not serialised)
    #[serde(skip)]
    pub yearly_savings: Vec<f64>,
}

impl CalculationResult {
    /// Still behind on the investment at the end of the horizon
    pub fn is_underwater(&self) -> bool {
        self.twenty_five_year_savings < 0.0
    }

    /// Year-0 outlay followed by each year's gross saving
    ///
    /// A deserialised result has no unrounded savings; the chart's
    /// whole-dollar values stand in for them.
    pub fn annual_cashflows(&self) -> Vec<f64> {
        let outlay = std::iter::once(-self.net_cost);
        if self.yearly_savings.is_empty() {
            outlay
                .chain(self.chart_data.iter().skip(1).map(|p| p.cost as f64))
                .collect()
        } else {
            outlay.chain(self.yearly_savings.iter().copied()).collect()
        }
    }

    /// Annualised return on the net investment over the horizon
    pub fn annual_return(&self) -> Option<f64> {
        internal_rate_of_return(&self.annual_cashflows())
    }

    /// Whole-year range quoted in copy: floor(payback) to ceil(payback) + 2
    pub fn payback_window(&self) -> (u32, u32) {
        let payback = self.payback_period_years.max(0.0);
        (payback.floor() as u32, payback.ceil() as u32 + 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CalculationResult {
        CalculationResult {
            system_size_kw: 1.0,
            estimated_system_cost: 3000.0,
            federal_tax_credit: 900.0,
            net_cost: 2100.0,
            annual_savings: 1000.0,
            payback_period_years: 2.1,
            twenty_five_year_savings: 900.0,
            chart_data: vec![
                ChartPoint::new(0, -2100, 0),
                ChartPoint::new(1, -1100, 1000),
                ChartPoint::new(2, -100, 1000),
                ChartPoint::new(3, 900, 1000),
            ],
            yearly_savings: vec![1000.0, 1000.4, 999.6],
        }
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.5), 3);
        assert_eq!(round_half_up(2.49), 2);
        assert_eq!(round_half_up(-2.5), -2);
        assert_eq!(round_half_up(-2.51), -3);
        assert_eq!(round_half_up(-0.0), 0);
    }

    #[test]
    fn test_annual_cashflows_use_unrounded_savings() {
        let result = sample();
        assert_eq!(result.annual_cashflows(), vec![-2100.0, 1000.0, 1000.4, 999.6]);
        assert!(!result.is_underwater());
    }

    #[test]
    fn test_deserialised_result_falls_back_to_chart() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(!json.contains("yearlySavings"));

        let restored: CalculationResult = serde_json::from_str(&json).unwrap();
        assert!(restored.yearly_savings.is_empty());
        assert_eq!(restored.annual_cashflows(), vec![-2100.0, 1000.0, 1000.0, 1000.0]);
    }

    #[test]
    fn test_payback_window() {
        let mut result = sample();
        assert_eq!(result.payback_window(), (2, 5));

        result.payback_period_years = 7.0;
        assert_eq!(result.payback_window(), (7, 9));
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("systemSizeKw").is_some());
        assert!(json.get("twentyFiveYearSavings").is_some());
        assert_eq!(json["chartData"][3]["savings"], 900);
    }
}
