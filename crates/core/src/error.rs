//! Core error types

use thiserror::Error;

/// Core error type for Sentinel
#[derive(Debug, Error)]
pub enum CoreError {
    /// Public key has the wrong size
    #[error("Invalid key length: {0} (expected 32)")]
    InvalidKeyLength(usize),

    /// Signature has the wrong size
    #[error("Invalid signature length: {0} (expected 64)")]
    InvalidSignatureLength(usize),

    /// Hex decoding failed
    #[error("Hex decoding error: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Configuration values are inconsistent
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file could not be parsed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Logging subscriber could not be installed
    #[error("Logging initialization error: {0}")]
    Logging(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
