//! Raw form text to typed loan input.
//!
//! Form fields arrive formatted for display ("£200,000", "4.5%", "25 years").
//! Everything except digits, `.` and `-` is stripped before the numeric prefix
//! is read. An empty field means zero.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::amortization::LoanInput;
use crate::error::OverpayError;
use crate::OverpayResult;

/// Unparsed form values, exactly as typed or masked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawLoanInput {
    pub balance: String,
    pub interest_rate: String,
    pub remaining_term: String,
    pub overpayment: String,
}

/// Parse a currency amount or percentage.
///
/// Reads the longest numeric prefix of the stripped text, so `"1.2.3"` is
/// `1.2`. Text with no digits at all is zero; a bare sign or point is an error.
pub fn parse_amount(raw: &str) -> OverpayResult<Decimal> {
    parse_field("amount", raw)
}

/// Parse a whole number of years, ignoring every non-digit character.
pub fn parse_whole_years(raw: &str) -> OverpayResult<u32> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Ok(0);
    }
    digits.parse::<u32>().map_err(|_| OverpayError::ParseError {
        field: "remaining_term".into(),
        value: raw.to_string(),
    })
}

/// Strict conversion: the first field that fails to parse is an error.
pub fn parse_loan_input(raw: &RawLoanInput) -> OverpayResult<LoanInput> {
    Ok(LoanInput {
        balance: parse_field("balance", &raw.balance)?,
        annual_rate_percent: parse_field("interest_rate", &raw.interest_rate)?,
        remaining_term_years: parse_whole_years(&raw.remaining_term)?,
        overpayment: parse_field("overpayment", &raw.overpayment)?,
    })
}

/// Lenient conversion used by live recalculation: unparseable fields become
/// zero and the engine reports the result as unavailable.
pub fn coerce_loan_input(raw: &RawLoanInput) -> LoanInput {
    LoanInput {
        balance: parse_field("balance", &raw.balance).unwrap_or_default(),
        annual_rate_percent: parse_field("interest_rate", &raw.interest_rate).unwrap_or_default(),
        remaining_term_years: parse_whole_years(&raw.remaining_term).unwrap_or_default(),
        overpayment: parse_field("overpayment", &raw.overpayment).unwrap_or_default(),
    }
}

fn parse_field(field: &str, raw: &str) -> OverpayResult<Decimal> {
    let stripped: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if stripped.is_empty() {
        return Ok(Decimal::ZERO);
    }

    let prefix = numeric_prefix(&stripped);
    let parse_error = || OverpayError::ParseError {
        field: field.to_string(),
        value: raw.to_string(),
    };

    if !prefix.chars().any(|c| c.is_ascii_digit()) {
        return Err(parse_error());
    }
    let normalised = match prefix.trim_end_matches('.') {
        p if p.starts_with("-.") => format!("-0{}", &p[1..]),
        p if p.starts_with('.') => format!("0{p}"),
        p => p.to_string(),
    };
    Decimal::from_str(&normalised).map_err(|_| parse_error())
}

/// `-?digits*(.digits*)?` from the start of `s`.
fn numeric_prefix(s: &str) -> &str {
    let bytes = s.as_bytes();
    let mut end = 0;
    if bytes.first() == Some(&b'-') {
        end = 1;
    }
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }
    &s[..end]
}
