//! Solar Estimator CLI
//!
//! Command-line shell around the estimate engine

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rayon::prelude::*;
use solar_estimator::household::load_households;
use solar_estimator::lead::{submit_simulated, BillBand, QuoteRequest, RoofShade};
use solar_estimator::presentation::{
    format_currency, render_report, JsonFilePreferenceStore, PageMeta, Theme,
};
use solar_estimator::{CalculatorInputs, EstimateConfig, Household, RateTable, ScenarioRunner};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "solar_estimator",
    version,
    about = "Is solar worth it? Size, cost and payback by state"
)]
struct Cli {
    /// Rate table CSV (Name,Code,AvgCostPerKWh,PeakSunHours); built-in table if omitted
    #[arg(long, global = true)]
    rates: Option<PathBuf>,

    /// Disable colored output (NO_COLOR is honoured as well)
    #[arg(long, global = true)]
    no_color: bool,

    /// Preference file holding the theme
    #[arg(long, global = true, default_value = ".solar_prefs.json")]
    prefs: PathBuf,

    #[command(flatten)]
    pricing: PricingArgs,

    #[command(subcommand)]
    command: Command,
}

/// Overrides for pricing constants (defaults come from SOLAR_* env vars)
#[derive(Args)]
struct PricingArgs {
    /// Installed cost in USD per watt
    #[arg(long, global = true)]
    cost_per_watt: Option<f64>,

    /// Federal tax credit as a fraction (0.30 = 30%)
    #[arg(long, global = true)]
    tax_credit_rate: Option<f64>,
}

#[derive(Subcommand)]
enum Command {
    /// Estimate a single household
    Estimate {
        #[command(flatten)]
        inputs: InputArgs,

        /// Print JSON instead of the text report
        #[arg(long)]
        json: bool,

        /// Also write the year-by-year chart data to this CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Rank every state for the same household by payback period
    Compare {
        #[command(flatten)]
        inputs: InputArgs,

        /// Number of states to show
        #[arg(long, default_value_t = 10)]
        top: usize,
    },

    /// Estimate a CSV of households in parallel
    Batch {
        /// HouseholdID,MonthlyBill,State,RoofSunExposure,BillOffset,InflationRate
        input: PathBuf,

        #[arg(long, default_value = "batch_estimates.csv")]
        output: PathBuf,
    },

    /// List the rate table
    States,

    /// Show or change the saved theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },

    /// Request installer quotes (simulated, nothing is sent)
    Quote {
        #[arg(long, default_value = "TX")]
        state: String,
        #[arg(long)]
        zip: String,
        #[arg(long, default_value_t = 200.0)]
        bill: f64,
        #[arg(long)]
        shade: bool,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: String,
    },
}

#[derive(Subcommand)]
enum ThemeAction {
    Show,
    Toggle,
    Set { theme: ThemeArg },
}

#[derive(Clone, Copy, ValueEnum)]
enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

#[derive(Args)]
struct InputArgs {
    /// Average monthly electric bill in USD
    #[arg(long, default_value_t = 200.0)]
    bill: f64,

    /// Two-letter state code
    #[arg(long, default_value = "TX")]
    state: String,

    /// Roof sun exposure multiplier (0.7 - 1.2)
    #[arg(long, default_value_t = 1.0)]
    exposure: f64,

    /// Percent of the bill to offset (50 - 120)
    #[arg(long, default_value_t = 100.0)]
    offset: f64,

    /// Utility inflation in percent per year (1 - 8)
    #[arg(long, default_value_t = solar_estimator::household::DEFAULT_INFLATION_RATE)]
    inflation: f64,
}

impl InputArgs {
    /// Inputs clamped to the slider ranges, as the web calculator would send them
    fn to_inputs(&self) -> CalculatorInputs {
        let raw = CalculatorInputs::new(
            self.bill,
            self.state.as_str(),
            self.exposure,
            self.offset,
            self.inflation,
        );
        clamp_inputs(&raw)
    }
}

fn clamp_inputs(raw: &CalculatorInputs) -> CalculatorInputs {
    let clamped = raw.clamped();
    if !raw.in_declared_ranges() {
        log::warn!(
            "Inputs outside the calculator's ranges were clamped: {:?} -> {:?}",
            raw,
            clamped
        );
    }
    clamped
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    if cli.no_color {
        colored::control::set_override(false);
    }

    match &cli.command {
        Command::States => list_states(&load_rates(cli.rates.as_deref())?),
        Command::Theme { action } => theme_command(&cli.prefs, action.as_ref()),
        Command::Quote {
            state,
            zip,
            bill,
            shade,
            first_name,
            last_name,
            email,
            phone,
        } => {
            let request = QuoteRequest {
                zip: zip.clone(),
                monthly_bill_band: BillBand::from_bill(*bill),
                shade: if *shade { RoofShade::SomeShade } else { RoofShade::NoShade },
                first_name: first_name.clone(),
                last_name: last_name.clone(),
                email: email.clone(),
                phone: phone.clone(),
            };
            let confirmation = submit_simulated(&request, &state.trim().to_ascii_uppercase())
                .context("Quote request rejected")?;
            println!("Request Received! (ref {})", confirmation.reference);
            println!("{}", confirmation.message());
            Ok(())
        }
        Command::Estimate { inputs, json, csv } => {
            let runner = build_runner(&cli)?;
            estimate_command(&runner, &inputs.to_inputs(), *json, csv.as_deref(), &cli.prefs)
        }
        Command::Compare { inputs, top } => {
            compare_command(&build_runner(&cli)?, &inputs.to_inputs(), *top)
        }
        Command::Batch { input, output } => batch_command(&build_runner(&cli)?, input, output),
    }
}

fn load_rates(path: Option<&Path>) -> Result<RateTable> {
    match path {
        Some(path) => RateTable::from_csv_path(path)
            .with_context(|| format!("Failed to load rate table from {}", path.display())),
        None => RateTable::builtin().context("Built-in rate table is invalid"),
    }
}

fn build_runner(cli: &Cli) -> Result<ScenarioRunner> {
    let mut config = EstimateConfig::from_env();
    if let Some(cost_per_watt) = cli.pricing.cost_per_watt {
        config.cost_per_watt = cost_per_watt;
    }
    if let Some(rate) = cli.pricing.tax_credit_rate {
        config.tax_credit_rate = rate;
    }
    config.validate()?;

    Ok(ScenarioRunner::with_rates(load_rates(cli.rates.as_deref())?, config))
}

fn estimate_command(
    runner: &ScenarioRunner,
    inputs: &CalculatorInputs,
    json: bool,
    csv_path: Option<&Path>,
    prefs: &Path,
) -> Result<()> {
    let result = runner.run(inputs)?;
    let state = runner.rates().resolve(&inputs.state_code);

    if let Some(path) = csv_path {
        let mut file = File::create(path)
            .with_context(|| format!("Unable to create {}", path.display()))?;
        writeln!(file, "Year,CumulativeSavings,AnnualSaving")?;
        for point in &result.chart_data {
            writeln!(file, "{},{},{}", point.year, point.savings, point.cost)?;
        }
        log::info!("Chart data written to {}", path.display());
    }

    if json {
        let body = serde_json::json!({
            "inputs": inputs,
            "state": state,
            "meta": PageMeta::for_state(runner.rates().lookup(&inputs.state_code)),
            "result": result,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    let theme = match JsonFilePreferenceStore::open(prefs) {
        Ok(store) => Theme::load(&store),
        Err(e) => {
            log::warn!("Could not read preferences from {}: {}", prefs.display(), e);
            Theme::default()
        }
    };
    let tax_credit_rate = runner.estimator().config().tax_credit_rate;

    print!("{}", render_report(&result, state, tax_credit_rate, theme, true));
    if let Some(irr) = result.annual_return() {
        println!("Annualised return over 25 years: {:.1}%", irr * 100.0);
    }
    println!(
        "\nReady to save {}? Connect with pre-screened installers in {} (see `quote`).",
        format_currency(result.twenty_five_year_savings),
        inputs.state_code
    );
    Ok(())
}

fn compare_command(runner: &ScenarioRunner, inputs: &CalculatorInputs, top: usize) -> Result<()> {
    let ranked = runner.compare_states(inputs)?;

    println!(
        "{:>4} {:<22} {:>8} {:>10} {:>12} {:>10} {:>14}",
        "Rank", "State", "$/kWh", "Size kW", "Net Cost", "Payback", "25-Yr Savings"
    );
    println!("{}", "-".repeat(86));

    for (i, entry) in ranked.iter().take(top).enumerate() {
        println!(
            "{:>4} {:<22} {:>8.2} {:>10.1} {:>12} {:>10.1} {:>14}",
            i + 1,
            entry.state.name,
            entry.state.avg_cost_per_kwh,
            entry.result.system_size_kw,
            format_currency(entry.result.net_cost),
            entry.result.payback_period_years,
            format_currency(entry.result.twenty_five_year_savings),
        );
    }

    if ranked.len() > top {
        println!("... ({} more states)", ranked.len() - top);
    }
    Ok(())
}

fn batch_command(runner: &ScenarioRunner, input: &Path, output: &Path) -> Result<()> {
    let households = load_households(input)
        .with_context(|| format!("Failed to load households from {}", input.display()))?;
    println!("Loaded {} households", households.len());

    let households: Vec<Household> = households
        .into_iter()
        .map(|h| Household {
            inputs: clamp_inputs(&h.inputs),
            ..h
        })
        .collect();
    let estimates = runner.run_batch(&households);

    let mut file = File::create(output)
        .with_context(|| format!("Unable to create {}", output.display()))?;
    writeln!(
        file,
        "HouseholdID,State,SystemSizeKw,SystemCost,TaxCredit,NetCost,AnnualSavings,\
         PaybackYears,TwentyFiveYearSavings,Error"
    )?;

    let mut failures = 0;
    for estimate in &estimates {
        match &estimate.result {
            Ok(r) => writeln!(
                file,
                "{},{},{:.4},{:.2},{:.2},{:.2},{:.2},{:.4},{:.2},",
                estimate.household_id,
                estimate.resolved_state,
                r.system_size_kw,
                r.estimated_system_cost,
                r.federal_tax_credit,
                r.net_cost,
                r.annual_savings,
                r.payback_period_years,
                r.twenty_five_year_savings,
            )?,
            Err(e) => {
                failures += 1;
                writeln!(
                    file,
                    "{},{},,,,,,,,\"{}\"",
                    estimate.household_id, estimate.resolved_state, e
                )?
            }
        }
    }

    let paid_back: Vec<f64> = estimates
        .par_iter()
        .filter_map(|e| e.result.as_ref().ok())
        .filter(|r| !r.is_underwater())
        .map(|r| r.payback_period_years)
        .collect();
    let mean_payback = if paid_back.is_empty() {
        0.0
    } else {
        paid_back.iter().sum::<f64>() / paid_back.len() as f64
    };

    println!("Output written to {}", output.display());
    println!("  Estimated:     {}", estimates.len() - failures);
    println!("  Failed:        {}", failures);
    println!("  Mean payback:  {:.1} years", mean_payback);

    if failures == estimates.len() && !estimates.is_empty() {
        bail!("every household estimate failed");
    }
    Ok(())
}

fn list_states(rates: &RateTable) -> Result<()> {
    println!("{:<22} {:<4} {:>8} {:>10}", "State", "Code", "$/kWh", "Sun hrs");
    for state in rates.iter() {
        println!(
            "{:<22} {:<4} {:>8.2} {:>10.1}",
            state.name, state.code, state.avg_cost_per_kwh, state.peak_sun_hours
        );
    }
    println!("\nUnknown codes use {} ({}).", rates.fallback().name, rates.fallback().code);
    Ok(())
}

fn theme_command(prefs: &Path, action: Option<&ThemeAction>) -> Result<()> {
    let mut store = JsonFilePreferenceStore::open(prefs)
        .with_context(|| format!("Failed to open preferences at {}", prefs.display()))?;

    let theme = match action {
        None | Some(ThemeAction::Show) => Theme::load(&store),
        Some(ThemeAction::Toggle) => {
            let theme = Theme::load(&store).toggle();
            theme.save(&mut store)?;
            theme
        }
        Some(ThemeAction::Set { theme }) => {
            let theme = Theme::from(*theme);
            theme.save(&mut store)?;
            theme
        }
    };

    println!("Theme: {} (saved in {})", theme.as_str(), store.path().display());
    Ok(())
}
