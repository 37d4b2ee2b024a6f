//! Verification results and error types

use thiserror::Error;

/// Main error type for verification operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("core operation failed: {0}")]
    Core(#[from] veil_core::Error),
    #[error("transform failed: {0}")]
    Transform(#[from] veil_transform::Error),
    #[error("unexpected token `{0}`")]
    UnexpectedToken(String),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("unbound identifier `{0}`")]
    UnboundIdentifier(String),
    #[error("non-integer result: {0}")]
    NonIntegerResult(String),
    #[error("integer overflow")]
    Overflow,
    #[error("Property verification failed: {property}")]
    PropertyFailed { property: String },
}

/// Result type for verification operations
pub type Result<T> = std::result::Result<T, Error>;
