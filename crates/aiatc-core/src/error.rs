//! Error types for core lookups and parsing.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("airport {0} is not in the airport table")]
    UnknownAirport(String),
    #[error("airport table is empty")]
    EmptyAirportTable,
    #[error("invalid airport code {0:?}")]
    InvalidAirportCode(String),
    #[error("unknown language {0:?}")]
    UnknownLanguage(String),
    #[error("unknown ATC mode {0:?}")]
    UnknownMode(String),
    #[error("failed to parse airport catalog: {0}")]
    Catalog(#[from] serde_json::Error),
}
