use thiserror::Error;

use crate::config::ConfigError;
use crate::lookup::LookupError;

/// Application errors surfaced to the binary
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Logging setup failed: {0}")]
    Logging(String),
    #[error("Vehicle lookup failed: {0}")]
    Lookup(#[from] LookupError),
    #[error("Failed to encode vehicle record: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Lookup did not finish within {0:?}")]
    Stalled(std::time::Duration),
}
