use chrono::{DateTime, Utc};
use clap::Args;
use serde_json::{json, Value};

use overpay_core::time_ago;

#[derive(Args)]
pub struct TimeAgoArgs {
    /// Review date (repeatable), e.g. "2024-06-12" or RFC 3339
    #[arg(long = "date", required = true)]
    pub dates: Vec<String>,

    /// Reference time in RFC 3339 (defaults to now)
    #[arg(long)]
    pub now: Option<String>,
}

pub fn run_time_ago(args: TimeAgoArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let now: DateTime<Utc> = match args.now {
        Some(ref text) => time_ago::parse_review_date(text)?,
        None => Utc::now(),
    };

    let rows = args
        .dates
        .iter()
        .map(|date| {
            let label = time_ago::time_ago_str(date, now)?;
            Ok(json!({ "date": date, "time_ago": label }))
        })
        .collect::<Result<Vec<Value>, Box<dyn std::error::Error>>>()?;

    Ok(Value::Array(rows))
}
