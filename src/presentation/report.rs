//! Plain-text rendering of an estimate: summary cards, savings chart, breakdown list

use super::theme::Theme;
use crate::projection::CalculationResult;
use crate::rates::StateRate;
use colored::{Color, Colorize};
use std::fmt::Write;

const CHART_WIDTH: usize = 40;

/// Whole US dollars with thousands separators, e.g. `-$20,548`
pub fn format_currency(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{}", rounded.abs() as u64);

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Role a piece of text plays in the report
#[derive(Debug, Clone, Copy)]
enum Tone {
    Heading,
    Positive,
    Negative,
    Muted,
}

/// Per-theme styling; plain text when `color` is off
#[derive(Debug, Clone, Copy)]
struct Palette {
    theme: Theme,
    color: bool,
}

impl Palette {
    fn paint(&self, text: &str, tone: Tone) -> String {
        if !self.color {
            return text.to_string();
        }
        let fg = match (self.theme, tone) {
            (Theme::Light, Tone::Heading) => Color::Blue,
            (Theme::Light, Tone::Positive) => Color::Green,
            (Theme::Light, Tone::Negative) => Color::Red,
            (Theme::Light, Tone::Muted) => Color::BrightBlack,
            (Theme::Dark, Tone::Heading) => Color::BrightCyan,
            (Theme::Dark, Tone::Positive) => Color::BrightGreen,
            (Theme::Dark, Tone::Negative) => Color::BrightRed,
            (Theme::Dark, Tone::Muted) => Color::White,
        };
        match tone {
            Tone::Heading => text.color(fg).bold().to_string(),
            _ => text.color(fg).to_string(),
        }
    }
}

/// Render the full report for one estimate
///
/// `tax_credit_rate` is the fraction the estimate was priced with.
/// `color` = false produces plain text (files, pipes, tests); otherwise
/// `colored` decides, honouring NO_COLOR and its global override.
pub fn render_report(
    result: &CalculationResult,
    state: &StateRate,
    tax_credit_rate: f64,
    theme: Theme,
    color: bool,
) -> String {
    let palette = Palette { theme, color };
    let mut out = String::new();

    let heading = format!("Solar estimate for {} ({})", state.name, state.code);
    let _ = writeln!(out, "{}", palette.paint(&heading, Tone::Heading));
    let resource = format!(
        "{} per kWh, {} peak sun hours/day",
        format_rate(state.avg_cost_per_kwh),
        state.peak_sun_hours
    );
    let _ = writeln!(out, "{}", palette.paint(&resource, Tone::Muted));
    out.push('\n');

    let credit_pct = format_percent(tax_credit_rate);
    render_cards(&mut out, result, &credit_pct, &palette);
    out.push('\n');
    render_chart(&mut out, result, &palette);
    out.push('\n');
    render_breakdown(&mut out, result, &credit_pct, &palette);

    out
}

/// `0.3` -> `30%`, `0.255` -> `25.5%`
fn format_percent(rate: f64) -> String {
    let pct = rate * 100.0;
    if (pct - pct.round()).abs() < 1e-9 {
        format!("{}%", pct.round() as i64)
    } else {
        format!("{pct:.1}%")
    }
}

fn format_rate(value: f64) -> String {
    format!("${value:.2}")
}

fn render_cards(
    out: &mut String,
    result: &CalculationResult,
    credit_pct: &str,
    palette: &Palette,
) {
    let net_note = format!("After {credit_pct} Fed Tax Credit");
    let cards = [
        ("Est. Annual Savings", result.annual_savings, "Year 1 Projection"),
        ("Est. Net Cost", result.net_cost, net_note.as_str()),
        ("25-Year Savings", result.twenty_five_year_savings, "Inflation adjusted"),
        ("Est. System Cost", result.estimated_system_cost, "Before Tax Incentives"),
    ];

    for (label, value, note) in cards {
        let value = format_currency(value);
        let _ = writeln!(out, "  {label:<20} {value:>12}  {}", palette.paint(note, Tone::Muted));
    }
}

fn render_chart(out: &mut String, result: &CalculationResult, palette: &Palette) {
    let _ = writeln!(out, "{}", palette.paint("Cumulative Savings Over Time", Tone::Heading));

    let max_abs = result
        .chart_data
        .iter()
        .map(|p| p.savings.unsigned_abs())
        .max()
        .unwrap_or(0)
        .max(1);

    for point in &result.chart_data {
        let share = point.savings.unsigned_abs() as f64 / max_abs as f64;
        let filled = (share * CHART_WIDTH as f64).round() as usize;
        let (glyph, tone) = if point.savings < 0 {
            ('░', Tone::Negative)
        } else {
            ('█', Tone::Positive)
        };
        let bar: String = std::iter::repeat(glyph).take(filled).collect();
        let bar = format!("{:<width$}", bar, width = CHART_WIDTH);
        let _ = writeln!(
            out,
            "  {:>2} | {} {}",
            point.year,
            palette.paint(&bar, tone),
            format_currency(point.savings as f64),
        );
    }
}

fn render_breakdown(
    out: &mut String,
    result: &CalculationResult,
    credit_pct: &str,
    palette: &Palette,
) {
    let _ = writeln!(out, "{}", palette.paint("System Breakdown", Tone::Heading));
    let _ = writeln!(out, "  {:<26} {:.1} kW", "Recommended Size", result.system_size_kw);
    let gross = format_currency(result.estimated_system_cost);
    let _ = writeln!(out, "  {:<26} {}", "Gross Cost", gross);
    let credit = format!("-{}", format_currency(result.federal_tax_credit));
    let _ = writeln!(
        out,
        "  {:<26} {}",
        format!("Federal Tax Credit ({credit_pct})"),
        palette.paint(&credit, Tone::Positive)
    );
    let _ = writeln!(out, "  {:<26} {:.1} Years", "Payback Period", result.payback_period_years);

    let (low, high) = result.payback_window();
    let note = format!("Most systems like this pay for themselves within {low} to {high} years.");
    let _ = writeln!(out, "{}", palette.paint(&note, Tone::Muted));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::household::CalculatorInputs;
    use crate::projection::{EstimateConfig, SolarEstimator, DEFAULT_TAX_CREDIT_RATE};
    use crate::rates::RateTable;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(999.4), "$999");
        assert_eq!(format_currency(1000.0), "$1,000");
        assert_eq!(format_currency(29_354.207), "$29,354");
        assert_eq!(format_currency(-20_547.95), "-$20,548");
        assert_eq!(format_currency(1_234_567.0), "$1,234,567");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.30), "30%");
        assert_eq!(format_percent(0.1), "10%");
        assert_eq!(format_percent(0.255), "25.5%");
        assert_eq!(format_percent(0.0), "0%");
    }

    #[test]
    fn test_plain_report_contents() {
        let estimator = SolarEstimator::with_builtin_rates().unwrap();
        let inputs = CalculatorInputs::default();
        let result = estimator.estimate(&inputs).unwrap();
        let state = estimator.rates().resolve(&inputs.state_code);

        let report = render_report(&result, state, DEFAULT_TAX_CREDIT_RATE, Theme::Light, false);

        assert!(report.starts_with("Solar estimate for Texas (TX)"));
        assert!(report.contains("Est. Annual Savings"));
        assert!(report.contains("$2,400"));
        assert!(report.contains("After 30% Fed Tax Credit"));
        assert!(report.contains("Federal Tax Credit (30%)"));
        assert!(report.contains("Recommended Size"));
        assert!(report.contains("9.8 kW"));
        assert!(report.contains("-$8,806"));
        assert!(report.contains("7.4 Years"));
        assert!(report.contains("within 7 to 10 years"));
        assert!(!report.contains('\x1b'));
        // one chart line per year
        assert_eq!(report.lines().filter(|l| l.contains(" | ")).count(), 26);
    }

    #[test]
    fn test_credit_labels_follow_configured_rate() {
        let config = EstimateConfig {
            tax_credit_rate: 0.10,
            ..Default::default()
        };
        let estimator = SolarEstimator::new(RateTable::builtin().unwrap(), config);
        let result = estimator.estimate(&CalculatorInputs::default()).unwrap();
        let state = estimator.rates().resolve("TX");

        let rate = estimator.config().tax_credit_rate;
        let report = render_report(&result, state, rate, Theme::Light, false);

        assert!(report.contains("After 10% Fed Tax Credit"));
        assert!(report.contains("Federal Tax Credit (10%)"));
        assert!(report.contains("-$2,935"));
        assert!(!report.contains("30%"));
    }

    #[test]
    fn test_dark_theme_uses_different_palette() {
        let estimator = SolarEstimator::with_builtin_rates().unwrap();
        let result = estimator.estimate(&CalculatorInputs::default()).unwrap();
        let state = estimator.rates().resolve("TX");

        colored::control::set_override(true);
        let light = render_report(&result, state, DEFAULT_TAX_CREDIT_RATE, Theme::Light, true);
        let dark = render_report(&result, state, DEFAULT_TAX_CREDIT_RATE, Theme::Dark, true);
        colored::control::unset_override();

        assert!(light.contains('\x1b'));
        assert!(dark.contains('\x1b'));
        assert_ne!(light, dark);
        assert_eq!(strip_ansi(&light), strip_ansi(&dark));
    }

    fn strip_ansi(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut chars = text.chars();
        while let Some(ch) = chars.next() {
            if ch == '\x1b' {
                for c in chars.by_ref() {
                    if c == 'm' {
                        break;
                    }
                }
            } else {
                out.push(ch);
            }
        }
        out
    }
}
