//! Top-level error type shared across crates.

use thiserror::Error;

/// Validation errors raised when constructing core types.
#[derive(Debug, Error, PartialEq)]
pub enum QolError {
    #[error("invalid wallet address: {0:?}")]
    InvalidAddress(String),

    #[error("invalid coordinates: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("{0}")]
    Other(String),
}
