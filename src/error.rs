//! Error types for mail ingestion

use thiserror::Error;

/// Errors that can occur while normalizing an inbound message
#[derive(Error, Debug)]
pub enum ParseError {
    /// The MIME envelope itself could not be parsed. This is the only hard
    /// failure of the MIME path; field-level decode problems degrade instead.
    #[error("failed to parse message envelope: {0}")]
    Envelope(String),

    /// The input does not match any inbound format this crate understands
    #[error("unsupported inbound format: {0}")]
    UnsupportedFormat(String),
}

/// Result type for mail ingestion operations
pub type Result<T> = std::result::Result<T, ParseError>;
