use serde_json::Value;

use super::scalar_text;

/// Headline figures, most specific first. Pointers cover both the computation
/// envelope and the rendered field set.
const PRIORITY_POINTERS: [&str; 6] = [
    "/result/accelerated/schedule/total_savings",
    "/result/current/schedule/monthly_payment",
    "/total_savings",
    "/current_monthly_payment",
    "/0/time_ago",
    "/result/current/status",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    for pointer in PRIORITY_POINTERS {
        if let Some(val) = value.pointer(pointer) {
            if !val.is_null() && !is_placeholder(val) {
                println!("{}", scalar_text(val));
                return;
            }
        }
    }

    // Schedules: print the number of months.
    if let Value::Array(rows) = value {
        println!("{}", rows.len());
        return;
    }

    println!("{}", scalar_text(value));
}

fn is_placeholder(value: &Value) -> bool {
    value.as_str() == Some("-")
}
