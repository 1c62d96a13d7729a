pub mod amortization;
pub mod display;
pub mod error;
pub mod parse;
pub mod recalc;
pub mod time_ago;
pub mod types;

pub use error::OverpayError;
pub use types::*;

/// Standard result type for all overpay operations
pub type OverpayResult<T> = Result<T, OverpayError>;
