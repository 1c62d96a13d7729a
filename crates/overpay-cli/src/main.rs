mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::loan::{LoanArgs, RenderArgs};
use commands::reviews::TimeAgoArgs;

/// Mortgage overpayment calculations
#[derive(Parser)]
#[command(
    name = "overpay",
    version,
    about = "Mortgage overpayment calculations",
    long_about = "Computes the level monthly payment and total cost of a repayment \
                  mortgage, and how much time and interest a fixed monthly \
                  overpayment saves. Amounts may be given as formatted text \
                  (\"£200,000\", \"4.5%\", \"25 years\")."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Current and overpaid schedules with savings
    Calculate(LoanArgs),
    /// Month-by-month payment, interest, principal and balance
    Schedule(LoanArgs),
    /// Formatted result fields as shown in the calculator
    Render(RenderArgs),
    /// Relative "time ago" labels for review dates
    TimeAgo(TimeAgoArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Calculate(args) => commands::loan::run_calculate(args),
        Commands::Schedule(args) => commands::loan::run_schedule(args),
        Commands::Render(args) => commands::loan::run_render(args),
        Commands::TimeAgo(args) => commands::reviews::run_time_ago(args),
        Commands::Version => {
            println!("overpay {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
