use napi::Result as NapiResult;
use napi_derive::napi;

use overpay_core::amortization::{self, LoanInput};
use overpay_core::display::{self, DisplayConfig};
use overpay_core::parse::{self, RawLoanInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Overpayment calculator
// ---------------------------------------------------------------------------

/// Typed `LoanInput` JSON in, computation envelope out.
#[napi]
pub fn calculate_overpayment(input_json: String) -> NapiResult<String> {
    let input: LoanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::analyze_overpayment(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn overpayment_schedule(input_json: String) -> NapiResult<String> {
    let input: LoanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let rows = amortization::build_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&rows).map_err(to_napi_error)
}

/// Raw form values in, the eight formatted result fields out. Unparseable
/// values count as zero, as in the live form.
#[napi]
pub fn render_overpayment(raw_json: String, config_json: Option<String>) -> NapiResult<String> {
    let raw: RawLoanInput = serde_json::from_str(&raw_json).map_err(to_napi_error)?;
    let config: DisplayConfig = match config_json {
        Some(ref json) => serde_json::from_str(json).map_err(to_napi_error)?,
        None => DisplayConfig::default(),
    };
    let analysis = amortization::analyze_schedules(&parse::coerce_loan_input(&raw));
    serde_json::to_string(&display::render(&analysis, &config)).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

#[napi]
pub fn time_ago(date: String) -> NapiResult<String> {
    overpay_core::time_ago::time_ago_str(&date, chrono::Utc::now()).map_err(to_napi_error)
}
