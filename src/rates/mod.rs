//! Per-state electricity price and solar resource table

pub mod loader;

use crate::error::{EstimatorError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Electricity price and solar resource for one state or territory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateRate {
    /// Display name (e.g. "Texas")
    pub name: String,

    /// Two-letter code, unique within a table
    pub code: String,

    /// Average residential price in USD per kWh
    #[serde(rename = "avgCostPerKWh")]
    pub avg_cost_per_kwh: f64,

    /// Daily equivalent hours of full-intensity sunlight
    pub peak_sun_hours: f64,
}

impl StateRate {
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        avg_cost_per_kwh: f64,
        peak_sun_hours: f64,
    ) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            avg_cost_per_kwh,
            peak_sun_hours,
        }
    }

    /// Reject entries that would divide by zero or go negative in the sizing math
    pub fn validate(&self) -> Result<()> {
        check_positive(&self.code, "avgCostPerKWh", self.avg_cost_per_kwh)?;
        check_positive(&self.code, "peakSunHours", self.peak_sun_hours)
    }
}

fn check_positive(code: &str, field: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EstimatorError::InvalidRate {
            code: code.to_string(),
            field,
            value,
        })
    }
}

/// Immutable, ordered rate table with a code index
///
/// Order matters: the last entry is the fallback for unknown codes.
#[derive(Debug, Clone)]
pub struct RateTable {
    entries: Vec<StateRate>,
    index: HashMap<String, usize>,
}

impl RateTable {
    /// Build a table, validating every entry
    pub fn new(entries: Vec<StateRate>) -> Result<Self> {
        if entries.is_empty() {
            return Err(EstimatorError::EmptyRateTable);
        }

        let mut index = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            entry.validate()?;
            if index.insert(entry.code.clone(), i).is_some() {
                return Err(EstimatorError::DuplicateStateCode(entry.code.clone()));
            }
        }

        Ok(Self { entries, index })
    }

    /// The 2025 table shipped with the crate
    pub fn builtin() -> Result<Self> {
        Self::new(loader::parse_rates(loader::BUILTIN_RATES_CSV.as_bytes())?)
    }

    /// Load a replacement table from a CSV file
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        Self::new(loader::load_rates(path)?)
    }

    /// Exact match on state code
    pub fn lookup(&self, code: &str) -> Option<&StateRate> {
        self.index.get(code).map(|&i| &self.entries[i])
    }

    /// Exact match, falling back to the last entry for unknown codes
    pub fn resolve(&self, code: &str) -> &StateRate {
        match self.lookup(code) {
            Some(rate) => rate,
            None => self.fallback(),
        }
    }

    /// Entry used when a code is not present
    pub fn fallback(&self) -> &StateRate {
        // Non-empty by construction
        &self.entries[self.entries.len() - 1]
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &StateRate> {
        self.entries.iter()
    }

    pub fn entries(&self) -> &[StateRate] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_table() -> RateTable {
        RateTable::new(vec![
            StateRate::new("Texas", "TX", 0.16, 5.6),
            StateRate::new("Ohio", "OH", 0.16, 4.2),
            StateRate::new("Wyoming", "WY", 0.12, 5.3),
        ])
        .unwrap()
    }

    #[test]
    fn test_builtin_table_loads() {
        let table = RateTable::builtin().unwrap();
        assert_eq!(table.len(), 51);

        let tx = table.lookup("TX").unwrap();
        assert_eq!(tx.name, "Texas");
        assert_eq!(tx.avg_cost_per_kwh, 0.16);
        assert_eq!(tx.peak_sun_hours, 5.6);
    }

    #[test]
    fn test_unknown_code_falls_back_to_last_entry() {
        let table = small_table();
        assert!(table.lookup("ZZ").is_none());
        assert_eq!(table.resolve("ZZ").code, "WY");
        assert_eq!(table.resolve("OH").code, "OH");

        let builtin = RateTable::builtin().unwrap();
        assert_eq!(builtin.resolve("ZZ").code, "WY");
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let table = small_table();
        assert!(table.lookup("tx").is_none());
        assert_eq!(table.resolve("tx").code, "WY");
    }

    #[test]
    fn test_zero_cost_is_rejected() {
        let err = RateTable::new(vec![StateRate::new("Nowhere", "NW", 0.0, 5.0)]).unwrap_err();
        assert!(matches!(err, EstimatorError::InvalidRate { field: "avgCostPerKWh", .. }));
    }

    #[test]
    fn test_negative_sun_hours_is_rejected() {
        let err = RateTable::new(vec![StateRate::new("Nowhere", "NW", 0.15, -1.0)]).unwrap_err();
        assert!(matches!(err, EstimatorError::InvalidRate { field: "peakSunHours", .. }));
    }

    #[test]
    fn test_nan_is_rejected() {
        let err = RateTable::new(vec![StateRate::new("Nowhere", "NW", f64::NAN, 5.0)]).unwrap_err();
        assert!(matches!(err, EstimatorError::InvalidRate { .. }));
    }

    #[test]
    fn test_duplicate_codes_rejected() {
        let err = RateTable::new(vec![
            StateRate::new("Texas", "TX", 0.16, 5.6),
            StateRate::new("Texas again", "TX", 0.15, 5.5),
        ])
        .unwrap_err();
        assert!(matches!(err, EstimatorError::DuplicateStateCode(code) if code == "TX"));
    }

    #[test]
    fn test_empty_table_rejected() {
        assert!(matches!(RateTable::new(Vec::new()), Err(EstimatorError::EmptyRateTable)));
    }
}
