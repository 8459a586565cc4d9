//! CSV-based rate table loader
//!
//! Expected columns: Name,Code,AvgCostPerKWh,PeakSunHours

use super::StateRate;
use crate::error::Result;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Default path to an on-disk rate table
pub const DEFAULT_RATES_PATH: &str = "data/state_rates.csv";

/// 2025 averages compiled into the binary
pub const BUILTIN_RATES_CSV: &str = include_str!("../../data/state_rates.csv");

/// Raw CSV row
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "AvgCostPerKWh")]
    avg_cost_per_kwh: f64,
    #[serde(rename = "PeakSunHours")]
    peak_sun_hours: f64,
}

impl From<CsvRow> for StateRate {
    fn from(row: CsvRow) -> Self {
        StateRate {
            name: row.name.trim().to_string(),
            code: row.code.trim().to_string(),
            avg_cost_per_kwh: row.avg_cost_per_kwh,
            peak_sun_hours: row.peak_sun_hours,
        }
    }
}

/// Parse rate rows from any reader, preserving file order
///
/// Values are not validated here; `RateTable::new` does that.
pub fn parse_rates<R: Read>(reader: R) -> Result<Vec<StateRate>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut rates = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        rates.push(row.into());
    }

    Ok(rates)
}

/// Load rate rows from a CSV file
pub fn load_rates(path: &Path) -> Result<Vec<StateRate>> {
    let file = File::open(path)?;
    let rates = parse_rates(file)?;
    log::info!("Loaded {} state rates from {}", rates.len(), path.display());
    Ok(rates)
}
