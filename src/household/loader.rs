//! Load household batches from CSV

use super::{CalculatorInputs, Household};
use crate::error::Result;
use csv::Reader;
use std::path::Path;

/// Raw CSV row matching the household batch columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "HouseholdID")]
    household_id: u32,
    #[serde(rename = "MonthlyBill")]
    monthly_bill: f64,
    #[serde(rename = "State")]
    state: String,
    #[serde(rename = "RoofSunExposure")]
    roof_sun_exposure: f64,
    #[serde(rename = "BillOffset")]
    bill_offset: f64,
    #[serde(rename = "InflationRate")]
    inflation_rate: f64,
}

impl From<CsvRow> for Household {
    fn from(row: CsvRow) -> Self {
        Household {
            household_id: row.household_id,
            inputs: CalculatorInputs {
                monthly_bill: row.monthly_bill,
                state_code: row.state.trim().to_string(),
                roof_sun_exposure: row.roof_sun_exposure,
                bill_offset: row.bill_offset,
                inflation_rate: row.inflation_rate,
            },
        }
    }
}

/// Load all households from a CSV file
pub fn load_households<P: AsRef<Path>>(path: P) -> Result<Vec<Household>> {
    let reader = Reader::from_path(path)?;
    collect_rows(reader)
}

/// Load households from any reader (e.g., string buffer, request body)
pub fn load_households_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Household>> {
    collect_rows(Reader::from_reader(reader))
}

fn collect_rows<R: std::io::Read>(mut reader: Reader<R>) -> Result<Vec<Household>> {
    let mut households = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRow = result?;
        households.push(row.into());
    }
    Ok(households)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
HouseholdID,MonthlyBill,State,RoofSunExposure,BillOffset,InflationRate
1,200,TX,1.0,100,4.5
2,85.5, CA ,0.8,70,3
";

    #[test]
    fn test_load_households() {
        let households = load_households_from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(households.len(), 2);

        assert_eq!(households[0].household_id, 1);
        assert_eq!(households[0].inputs, CalculatorInputs::default());

        assert_eq!(households[1].inputs.state_code, "CA");
        assert_eq!(households[1].inputs.monthly_bill, 85.5);
        assert_eq!(households[1].inputs.bill_offset, 70.0);
    }

    #[test]
    fn test_missing_column_fails() {
        let csv = "HouseholdID,MonthlyBill,State\n1,200,TX\n";
        assert!(load_households_from_reader(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_sample_file() {
        let households = load_households("data/sample_households.csv").unwrap();
        assert!(!households.is_empty());
        assert!(households.iter().all(|h| h.inputs.in_declared_ranges()));
    }
}
