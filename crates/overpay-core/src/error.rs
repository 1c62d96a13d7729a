use thiserror::Error;

#[derive(Debug, Error)]
pub enum OverpayError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Could not parse {field}: '{value}' is not a number")]
    ParseError { field: String, value: String },

    #[error("Date error: {0}")]
    DateError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for OverpayError {
    fn from(e: serde_json::Error) -> Self {
        OverpayError::SerializationError(e.to_string())
    }
}
