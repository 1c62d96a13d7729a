use log::error;
use serde_json::Value;
use std::io::{self, Write};

/// Write `value` as indented JSON followed by a newline.
pub fn write_json<W: Write>(mut out: W, value: &Value) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)
}

/// Analysis envelope, schedule rows or rendered fields to stdout as JSON.
pub fn print_json(value: &Value) {
    if let Err(e) = write_json(io::stdout().lock(), value) {
        error!("failed to write JSON output: {e}");
    }
}
