//! Error type for decoding rclone reports.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The message was not valid JSON, or did not match the raw wire shape.
    #[error("Failed to decode report: {0}")]
    Decode(#[from] serde_json::Error),

    /// Strict decoding found a required field missing from the payload.
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// A timestamp field could not be parsed as RFC 3339.
    #[error("Invalid timestamp in {field}: {value:?}")]
    Timestamp { field: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, Error>;
