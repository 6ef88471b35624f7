//! Error types for proration-engine.
//!
//! Only malformed input is an error. A configuration that cannot be prorated
//! is reported through `None`/`0`/`false` results instead.

use billing_core::error::AppError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProrationError {
    #[error("Invalid date '{input}': {source}")]
    DateParse {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Unknown time zone: {0}")]
    UnknownTimeZone(String),

    #[error(transparent)]
    Config(#[from] AppError),
}

pub type Result<T> = std::result::Result<T, ProrationError>;
