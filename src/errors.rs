//! # Error Handling Module
//!
//! ## Purpose
//! Centralized error handling for the box-office query engine, providing the
//! error taxonomy every component reports through.
//!
//! ## Input/Output Specification
//! - **Input**: Error conditions from validation, HTTP transport, and parsing
//! - **Output**: Structured error types callers can branch on
//! - **Error Categories**: Validation, Network, MalformedResponse, Config
//!
//! ## Key Features
//! - Transport failures kept distinct from API-contract violations
//! - Recoverability and category helpers for logging and retry decisions
//! - Automatic conversion from common library errors
//!
//! Note that "title not found" and "no data for this date" are normal
//! outcomes, not errors; operations model them as result-enum variants so
//! callers branch instead of catching.

use thiserror::Error;

/// Result type used throughout the application
pub type Result<T> = std::result::Result<T, BoxOfficeError>;

/// Error taxonomy for the box-office query engine
#[derive(Debug, Error)]
pub enum BoxOfficeError {
    /// Locally detectable bad input: malformed date key, out-of-range
    /// selection index. Always recoverable by re-prompting.
    #[error("Validation failed for '{field}': {reason}")]
    Validation { field: String, reason: String },

    /// Transport failure, timeout, or non-success HTTP status.
    #[error("Network error: {details}")]
    Network { details: String },

    /// The endpoint answered, but the payload did not match the API
    /// contract. Distinct from `Network`: this signals a contract change
    /// upstream, not transient unavailability.
    #[error("Malformed response from {origin}: {details}")]
    MalformedResponse { origin: String, details: String },

    /// A dataset operation was requested before a dataset was loaded.
    #[error("no dataset loaded; select a date and load it first")]
    NotLoaded,

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Internal system errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl BoxOfficeError {
    /// Check if the error is recoverable within the session (the caller can
    /// re-prompt or retry with different input)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            BoxOfficeError::Validation { .. }
                | BoxOfficeError::Network { .. }
                | BoxOfficeError::NotLoaded
        )
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            BoxOfficeError::Validation { .. } => "validation",
            BoxOfficeError::Network { .. } => "network",
            BoxOfficeError::MalformedResponse { .. } => "malformed_response",
            BoxOfficeError::NotLoaded => "engine",
            BoxOfficeError::Config { .. } => "configuration",
            BoxOfficeError::Internal { .. } => "internal",
        }
    }
}

// Conversion from common error types
impl From<std::io::Error> for BoxOfficeError {
    fn from(err: std::io::Error) -> Self {
        BoxOfficeError::Internal {
            message: format!("IO error: {}", err),
        }
    }
}

impl From<reqwest::Error> for BoxOfficeError {
    fn from(err: reqwest::Error) -> Self {
        BoxOfficeError::Network {
            details: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for BoxOfficeError {
    fn from(err: serde_json::Error) -> Self {
        BoxOfficeError::MalformedResponse {
            origin: "json".to_string(),
            details: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for BoxOfficeError {
    fn from(err: toml::de::Error) -> Self {
        BoxOfficeError::Config {
            message: format!("TOML parse error: {}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverability() {
        let validation = BoxOfficeError::Validation {
            field: "date".to_string(),
            reason: "too short".to_string(),
        };
        assert!(validation.is_recoverable());

        let malformed = BoxOfficeError::MalformedResponse {
            origin: "ranking".to_string(),
            details: "missing field".to_string(),
        };
        assert!(!malformed.is_recoverable());
    }

    #[test]
    fn test_categories_are_distinct_for_network_and_contract_errors() {
        let network = BoxOfficeError::Network {
            details: "timeout".to_string(),
        };
        let malformed = BoxOfficeError::MalformedResponse {
            origin: "ranking".to_string(),
            details: "unexpected shape".to_string(),
        };
        assert_ne!(network.category(), malformed.category());
    }
}
