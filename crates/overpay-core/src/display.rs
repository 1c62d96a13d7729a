//! Text rendering for the calculator's result fields and input masks.
//!
//! Single locale: en-GB grouping with a pound sign by default.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::amortization::OverpaymentAnalysis;
use crate::types::Money;

/// Presentation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub currency_symbol: String,
    /// Shown in every field whose schedule is unavailable.
    pub placeholder: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "£".into(),
            placeholder: "-".into(),
        }
    }
}

/// The eight output fields of the calculator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedResults {
    pub current_monthly_payment: String,
    pub current_total_cost: String,
    pub current_remaining_term: String,
    pub new_monthly_payment: String,
    pub new_total_cost: String,
    pub new_remaining_term: String,
    pub total_savings: String,
    pub total_time_saved: String,
}

/// `£1,234.57`: symbol, thousands separators, two decimals.
pub fn format_currency(value: Money) -> String {
    format_currency_with(value, "£")
}

pub fn format_currency_with(value: Money, symbol: &str) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.2}", rounded.abs());
    let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{symbol}{}.{frac}", group_thousands(whole))
}

pub fn format_years(years: u32) -> String {
    format!("{years} years")
}

/// Whole years plus the remaining months.
pub fn format_duration(months: u32) -> String {
    format!("{} years, {} months", months / 12, months % 12)
}

/// Currency mask for amount inputs: digits only, grouped, no decimals.
pub fn mask_currency_input(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let trimmed = digits.trim_start_matches('0');
    if digits.is_empty() {
        return String::new();
    }
    let whole = if trimmed.is_empty() { "0" } else { trimmed };
    format!("£{}", group_thousands(whole))
}

pub fn mask_rate_input(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

/// Rate shown outside the input: appends `%` when missing.
pub fn mask_rate_blur(raw: &str) -> String {
    if raw.is_empty() || raw.contains('%') {
        raw.to_string()
    } else {
        format!("{raw}%")
    }
}

pub fn mask_years_input(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.trim_start_matches('0') {
        "" if digits.is_empty() => String::new(),
        "" => format_years(0),
        d => format!("{d} years"),
    }
}

/// Render an analysis into the calculator's output fields.
pub fn render(analysis: &OverpaymentAnalysis, config: &DisplayConfig) -> RenderedResults {
    let money = |v: Decimal| format_currency_with(v, &config.currency_symbol);
    let blank = || config.placeholder.clone();

    let current = analysis.current.as_option();
    let accelerated = analysis.accelerated.as_option();

    RenderedResults {
        current_monthly_payment: current.map(|c| money(c.monthly_payment)).unwrap_or_else(blank),
        current_total_cost: current.map(|c| money(c.total_cost)).unwrap_or_else(blank),
        current_remaining_term: current.map(|c| format_years(c.term_years)).unwrap_or_else(blank),
        new_monthly_payment: accelerated.map(|a| money(a.monthly_payment)).unwrap_or_else(blank),
        new_total_cost: accelerated.map(|a| money(a.total_cost)).unwrap_or_else(blank),
        new_remaining_term: accelerated.map(|a| format_duration(a.term_months)).unwrap_or_else(blank),
        total_savings: accelerated.map(|a| money(a.total_savings)).unwrap_or_else(blank),
        total_time_saved: accelerated.map(|a| format_duration(a.months_saved)).unwrap_or_else(blank),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
