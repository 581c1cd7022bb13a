//! Error handling for the bridge services
//!
//! A single error type covers configuration, transport and peripheral
//! failures; every variant carries a human-readable description that can
//! be rendered directly onto the wire.

use thiserror::Error;

/// Bridge service error type
#[derive(Error, Debug, Clone)]
pub enum BridgeError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input/Output operation errors
    #[error("IO error: {0}")]
    Io(String),

    /// Connection establishment and socket errors
    #[error("Connection error: {0}")]
    Connection(String),

    /// Command or data parsing errors
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid parameter errors
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Peripheral operation errors reported by the adapter
    #[error("Peripheral error: {0}")]
    Peripheral(String),

    /// Not supported error
    #[error("Not supported: {0}")]
    NotSupported(String),

    /// Operation timeout errors
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// General internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using BridgeError
pub type Result<T> = std::result::Result<T, BridgeError>;

impl BridgeError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an IO error
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Create a connection error
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Create a peripheral error
    pub fn peripheral(msg: impl Into<String>) -> Self {
        Self::Peripheral(msg.into())
    }
}

impl From<std::io::Error> for BridgeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<std::num::ParseIntError> for BridgeError {
    fn from(err: std::num::ParseIntError) -> Self {
        Self::InvalidParameter(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = BridgeError::Peripheral("bus fault".to_string());
        assert_eq!(error.to_string(), "Peripheral error: bus fault");

        let error = BridgeError::config("missing port");
        assert_eq!(error.to_string(), "Configuration error: missing port");
    }

    #[test]
    fn test_from_parse_int_error() {
        let parse_err = "abc".parse::<i64>().unwrap_err();
        let error: BridgeError = parse_err.into();
        assert!(matches!(error, BridgeError::InvalidParameter(_)));
        assert!(error.to_string().contains("invalid digit"));
    }
}
