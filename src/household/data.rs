//! Calculator inputs as entered by a household

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Default utility inflation assumption (percent per year)
pub const DEFAULT_INFLATION_RATE: f64 = 4.5;

/// Roof sun exposure multiplier range offered by the UI (1.0 = nominal)
pub const ROOF_SUN_EXPOSURE_RANGE: RangeInclusive<f64> = 0.7..=1.2;

/// Bill offset range in percent
pub const BILL_OFFSET_RANGE: RangeInclusive<f64> = 50.0..=120.0;

/// Utility inflation range in percent per year
pub const INFLATION_RATE_RANGE: RangeInclusive<f64> = 1.0..=8.0;

/// Inputs to a single estimate
///
/// Passed by value into the engine; the engine never clamps or rejects
/// out-of-range values, see [`CalculatorInputs::clamped`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatorInputs {
    /// Average monthly electricity bill in USD
    pub monthly_bill: f64,

    /// Two-letter state code
    pub state_code: String,

    /// Shading / orientation multiplier
    pub roof_sun_exposure: f64,

    /// Percent of the bill to offset
    pub bill_offset: f64,

    /// Utility price inflation, percent per year
    pub inflation_rate: f64,
}

impl Default for CalculatorInputs {
    fn default() -> Self {
        Self {
            monthly_bill: 200.0,
            state_code: "TX".to_string(),
            roof_sun_exposure: 1.0,
            bill_offset: 100.0,
            inflation_rate: DEFAULT_INFLATION_RATE,
        }
    }
}

impl CalculatorInputs {
    pub fn new(
        monthly_bill: f64,
        state_code: impl Into<String>,
        roof_sun_exposure: f64,
        bill_offset: f64,
        inflation_rate: f64,
    ) -> Self {
        Self {
            monthly_bill,
            state_code: state_code.into(),
            roof_sun_exposure,
            bill_offset,
            inflation_rate,
        }
    }

    /// Same inputs for a different state
    pub fn for_state(&self, state_code: &str) -> Self {
        Self {
            state_code: state_code.to_string(),
            ..self.clone()
        }
    }

    /// Clamp every field to the range the UI controls allow
    pub fn clamped(&self) -> Self {
        Self {
            monthly_bill: self.monthly_bill.max(0.0),
            state_code: self.state_code.trim().to_ascii_uppercase(),
            roof_sun_exposure: clamp_to(self.roof_sun_exposure, &ROOF_SUN_EXPOSURE_RANGE),
            bill_offset: clamp_to(self.bill_offset, &BILL_OFFSET_RANGE),
            inflation_rate: clamp_to(self.inflation_rate, &INFLATION_RATE_RANGE),
        }
    }

    /// True when every numeric field is inside its UI range
    pub fn in_declared_ranges(&self) -> bool {
        self.monthly_bill >= 0.0
            && ROOF_SUN_EXPOSURE_RANGE.contains(&self.roof_sun_exposure)
            && BILL_OFFSET_RANGE.contains(&self.bill_offset)
            && INFLATION_RATE_RANGE.contains(&self.inflation_rate)
    }
}

fn clamp_to(value: f64, range: &RangeInclusive<f64>) -> f64 {
    value.clamp(*range.start(), *range.end())
}

/// A batch row: one household's inputs plus an identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Household {
    pub household_id: u32,
    pub inputs: CalculatorInputs,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_calculator_start_state() {
        let inputs = CalculatorInputs::default();
        assert_eq!(inputs.monthly_bill, 200.0);
        assert_eq!(inputs.state_code, "TX");
        assert_eq!(inputs.roof_sun_exposure, 1.0);
        assert_eq!(inputs.bill_offset, 100.0);
        assert_eq!(inputs.inflation_rate, 4.5);
        assert!(inputs.in_declared_ranges());
    }

    #[test]
    fn test_clamped() {
        let inputs = CalculatorInputs::new(-50.0, " ca ", 2.0, 10.0, 12.0);
        assert!(!inputs.in_declared_ranges());

        let clamped = inputs.clamped();
        assert_eq!(clamped.monthly_bill, 0.0);
        assert_eq!(clamped.state_code, "CA");
        assert_eq!(clamped.roof_sun_exposure, 1.2);
        assert_eq!(clamped.bill_offset, 50.0);
        assert_eq!(clamped.inflation_rate, 8.0);
        assert!(clamped.in_declared_ranges());
    }

    #[test]
    fn test_camel_case_json() {
        let json = serde_json::json!({
            "monthlyBill": 150,
            "stateCode": "AZ",
            "roofSunExposure": 0.9,
            "billOffset": 80,
            "inflationRate": 3,
        });
        let inputs: CalculatorInputs = serde_json::from_value(json).unwrap();
        assert_eq!(inputs, CalculatorInputs::new(150.0, "AZ", 0.9, 80.0, 3.0));

        let out = serde_json::to_value(&inputs).unwrap();
        assert_eq!(out["stateCode"], "AZ");
    }

    #[test]
    fn test_partial_json_is_rejected() {
        let json = r#"{"monthlyBill":150,"stateCode":"AZ"}"#;
        assert!(serde_json::from_str::<CalculatorInputs>(json).is_err());
    }
}
