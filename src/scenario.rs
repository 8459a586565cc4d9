//! Scenario runner for batch estimates
//!
//! Loads the rate table once, then runs many estimates (households, states,
//! pricing assumptions) in parallel without re-reading CSV files.

use crate::error::Result;
use crate::household::{CalculatorInputs, Household};
use crate::projection::{estimate_with_rate, CalculationResult, EstimateConfig, SolarEstimator};
use crate::rates::{RateTable, StateRate};
use rayon::prelude::*;
use std::path::Path;

/// Outcome for one household in a batch
#[derive(Debug)]
pub struct HouseholdEstimate {
    pub household_id: u32,
    /// Code of the rate record actually used (after fallback)
    pub resolved_state: String,
    pub result: Result<CalculationResult>,
}

/// Estimate for the same household placed in one state
#[derive(Debug, Clone)]
pub struct StateEstimate {
    pub state: StateRate,
    pub result: CalculationResult,
}

/// Pre-loaded scenario runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new()?;
/// let ranked = runner.compare_states(&CalculatorInputs::default())?;
/// println!("fastest payback: {}", ranked[0].state.name);
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    estimator: SolarEstimator,
}

impl ScenarioRunner {
    /// Built-in rates, pricing from the environment
    pub fn new() -> Result<Self> {
        Ok(Self::with_rates(RateTable::builtin()?, EstimateConfig::from_env()))
    }

    /// Rates loaded from a CSV file
    pub fn from_csv_path(path: &Path, config: EstimateConfig) -> Result<Self> {
        Ok(Self::with_rates(RateTable::from_csv_path(path)?, config))
    }

    pub fn with_rates(rates: RateTable, config: EstimateConfig) -> Self {
        Self {
            estimator: SolarEstimator::new(rates, config),
        }
    }

    pub fn estimator(&self) -> &SolarEstimator {
        &self.estimator
    }

    pub fn rates(&self) -> &RateTable {
        self.estimator.rates()
    }

    /// Single estimate, logging when the state code falls back
    pub fn run(&self, inputs: &CalculatorInputs) -> Result<CalculationResult> {
        self.note_fallback(&inputs.state_code);
        self.estimator.estimate(inputs)
    }

    /// Estimate every household in parallel; failures are kept per household
    pub fn run_batch(&self, households: &[Household]) -> Vec<HouseholdEstimate> {
        log::info!("Running batch of {} households", households.len());

        let estimates: Vec<HouseholdEstimate> = households
            .par_iter()
            .map(|household| HouseholdEstimate {
                household_id: household.household_id,
                resolved_state: self.rates().resolve(&household.inputs.state_code).code.clone(),
                result: self.estimator.estimate(&household.inputs),
            })
            .collect();

        for household in households {
            self.note_fallback(&household.inputs.state_code);
        }
        let failed = estimates.iter().filter(|e| e.result.is_err()).count();
        if failed > 0 {
            log::warn!("{} of {} household estimates failed", failed, estimates.len());
        }

        estimates
    }

    /// Same household in every state, fastest payback first
    pub fn compare_states(&self, inputs: &CalculatorInputs) -> Result<Vec<StateEstimate>> {
        let mut ranked = self
            .rates()
            .entries()
            .par_iter()
            .map(|state| -> Result<StateEstimate> {
                let result = self.estimator.estimate(&inputs.for_state(&state.code))?;
                Ok(StateEstimate {
                    state: state.clone(),
                    result,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        ranked.sort_by(|a, b| {
            a.result
                .payback_period_years
                .total_cmp(&b.result.payback_period_years)
                .then_with(|| a.state.code.cmp(&b.state.code))
        });

        log::debug!("Compared {} states", ranked.len());
        Ok(ranked)
    }

    /// Same inputs under several pricing assumptions
    pub fn run_scenarios(
        &self,
        inputs: &CalculatorInputs,
        configs: &[EstimateConfig],
    ) -> Result<Vec<CalculationResult>> {
        self.note_fallback(&inputs.state_code);
        let rate = self.rates().resolve(&inputs.state_code);
        configs
            .par_iter()
            .map(|config| estimate_with_rate(inputs, rate, config))
            .collect()
    }

    fn note_fallback(&self, code: &str) {
        if !self.rates().contains(code) {
            log::warn!(
                "Unknown state code '{}', using {} rates",
                code,
                self.rates().fallback().code
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EstimatorError;

    fn runner() -> ScenarioRunner {
        ScenarioRunner::with_rates(RateTable::builtin().unwrap(), EstimateConfig::default())
    }

    #[test]
    fn test_run_batch_keeps_order_and_ids() {
        let households: Vec<Household> = (1..=20)
            .map(|id| Household {
                household_id: id,
                inputs: CalculatorInputs::new(100.0 + id as f64 * 10.0, "FL", 1.0, 100.0, 4.5),
            })
            .collect();

        let estimates = runner().run_batch(&households);
        assert_eq!(estimates.len(), 20);
        for (i, estimate) in estimates.iter().enumerate() {
            assert_eq!(estimate.household_id, i as u32 + 1);
            assert_eq!(estimate.resolved_state, "FL");
            assert!(estimate.result.is_ok());
        }
    }

    #[test]
    fn test_run_batch_reports_fallback_state() {
        let households = vec![Household {
            household_id: 7,
            inputs: CalculatorInputs::default().for_state("ZZ"),
        }];
        let estimates = runner().run_batch(&households);
        assert_eq!(estimates[0].resolved_state, "WY");
    }

    #[test]
    fn test_compare_states_sorted_by_payback() {
        let runner = runner();
        let ranked = runner.compare_states(&CalculatorInputs::default()).unwrap();
        assert_eq!(ranked.len(), runner.rates().len());

        for pair in ranked.windows(2) {
            assert!(pair[0].result.payback_period_years <= pair[1].result.payback_period_years);
        }

        let tx = ranked.iter().find(|s| s.state.code == "TX").unwrap();
        assert_eq!(tx.result, runner.run(&CalculatorInputs::default()).unwrap());
    }

    #[test]
    fn test_run_scenarios_pricing_sensitivity() {
        let configs: Vec<_> = [2.5, 3.0, 3.5]
            .iter()
            .map(|&cost_per_watt| EstimateConfig {
                cost_per_watt,
                ..Default::default()
            })
            .collect();

        let results = runner().run_scenarios(&CalculatorInputs::default(), &configs).unwrap();
        assert_eq!(results.len(), 3);
        assert!(results[0].net_cost < results[1].net_cost);
        assert!(results[1].net_cost < results[2].net_cost);
        assert!(results[0].payback_period_years < results[2].payback_period_years);
    }

    #[test]
    fn test_run_scenarios_matches_single_runs() {
        let inputs = CalculatorInputs::default().for_state("ZZ");
        let config = EstimateConfig {
            tax_credit_rate: 0.2,
            ..Default::default()
        };
        let configs = [EstimateConfig::default(), config.clone()];
        let results = runner().run_scenarios(&inputs, &configs).unwrap();

        assert_eq!(results[0], runner().run(&inputs).unwrap());
        let direct = ScenarioRunner::with_rates(RateTable::builtin().unwrap(), config);
        assert_eq!(results[1], direct.run(&inputs).unwrap());
        assert_eq!(direct.estimator().config().tax_credit_rate, 0.2);
    }

    #[test]
    fn test_new_uses_builtin_rates() {
        let runner = ScenarioRunner::new().unwrap();
        assert_eq!(runner.rates().len(), 51);
        assert_eq!(runner.rates().fallback().code, "WY");
    }

    #[test]
    fn test_run_scenarios_rejects_bad_config() {
        let configs = vec![EstimateConfig {
            derate_factor: 0.0,
            ..Default::default()
        }];
        let err = runner().run_scenarios(&CalculatorInputs::default(), &configs).unwrap_err();
        assert!(matches!(err, EstimatorError::InvalidConfig(_)));
    }
}
