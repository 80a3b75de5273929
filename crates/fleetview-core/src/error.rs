//! Error types for fleetview
//!
//! The heading algorithms are total and never fail; errors only arise at
//! the edges where configuration and JSON input enter the system.

use thiserror::Error;

/// Main error type for fleetview
#[derive(Error, Debug)]
pub enum FleetError {
    // ===== Configuration Errors =====
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file not found
    #[error("Configuration file not found: {0}")]
    ConfigNotFound(String),

    // ===== Serialization Errors =====
    /// Serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization failed
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ===== General Errors =====
    /// I/O failure while reading input
    #[error("I/O error: {0}")]
    Io(String),
}

impl FleetError {
    /// Check if this error is a client error (bad input)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            FleetError::InvalidConfig(_)
                | FleetError::ConfigNotFound(_)
                | FleetError::Deserialization(_)
        )
    }

    /// Get an error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            FleetError::InvalidConfig(_) => "INVALID_CONFIG",
            FleetError::ConfigNotFound(_) => "CONFIG_NOT_FOUND",
            FleetError::Serialization(_) => "SERIALIZATION_ERROR",
            FleetError::Deserialization(_) => "DESERIALIZATION_ERROR",
            FleetError::Io(_) => "IO_ERROR",
        }
    }
}

/// Result type alias for fleetview operations
pub type Result<T> = std::result::Result<T, FleetError>;

impl From<std::io::Error> for FleetError {
    fn from(err: std::io::Error) -> Self {
        FleetError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FleetError {
    fn from(err: serde_json::Error) -> Self {
        FleetError::Serialization(err.to_string())
    }
}
