use clap::Args;
use log::debug;
use serde_json::Value;

use overpay_core::amortization::{self, LoanInput};
use overpay_core::display::{self, DisplayConfig};
use overpay_core::parse::{self, RawLoanInput};

use crate::input;

/// Loan figures, as formatted text or via a JSON file
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct LoanArgs {
    /// Outstanding balance (e.g. "£200,000")
    #[arg(long)]
    pub balance: Option<String>,

    /// Annual interest rate in percent (e.g. "4.5%")
    #[arg(long)]
    pub rate: Option<String>,

    /// Remaining term in whole years (e.g. "25 years")
    #[arg(long)]
    pub term: Option<String>,

    /// Extra amount paid every month
    #[arg(long)]
    pub overpayment: Option<String>,

    /// Reject unparseable values instead of treating them as zero
    #[arg(long)]
    pub strict: bool,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub loan: LoanArgs,

    /// YAML or JSON display config (currency_symbol, placeholder)
    #[arg(long)]
    pub config: Option<String>,
}

pub fn run_calculate(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan = load_loan(&args)?;
    let result = amortization::analyze_overpayment(&loan)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_schedule(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan = load_loan(&args)?;
    let rows = amortization::build_schedule(&loan)?;
    Ok(serde_json::to_value(rows)?)
}

pub fn run_render(args: RenderArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let config: DisplayConfig = match args.config {
        Some(ref path) => input::file::read_config(path)?,
        None => DisplayConfig::default(),
    };
    let loan = load_loan(&args.loan)?;
    let analysis = amortization::analyze_schedules(&loan);
    Ok(serde_json::to_value(display::render(&analysis, &config))?)
}

fn load_loan(args: &LoanArgs) -> Result<LoanInput, Box<dyn std::error::Error>> {
    if let Some(ref path) = args.input {
        return input::file::read_json(path);
    }

    let raw = RawLoanInput {
        balance: args.balance.clone().unwrap_or_default(),
        interest_rate: args.rate.clone().unwrap_or_default(),
        remaining_term: args.term.clone().unwrap_or_default(),
        overpayment: args.overpayment.clone().unwrap_or_default(),
    };
    let no_flags = raw == RawLoanInput::default();
    if no_flags {
        if let Some(loan) = input::stdin::read_stdin::<LoanInput>()? {
            return Ok(loan);
        }
        return Err("--balance, --rate and --term are required (or provide --input)".into());
    }

    let loan = if args.strict {
        parse::parse_loan_input(&raw)?
    } else {
        parse::coerce_loan_input(&raw)
    };
    debug!("parsed loan input {:?}", loan);
    Ok(loan)
}
