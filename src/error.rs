//! Error types for Claimdesk
//!
//! This module defines the error types used throughout the client,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Claimdesk operations
///
/// Covers configuration loading, backend interaction, terminal input,
/// and serialization failures that reach a command boundary.
#[derive(Error, Debug)]
pub enum ClaimdeskError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Decision service errors (status, transport, payload)
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// The service answered but reported itself unhealthy
    #[error("Decision service unhealthy: {0}")]
    Unhealthy(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Line editor errors
    #[error("Readline error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
}

/// Failure of a single call to the decision service
///
/// Every backend-facing operation reports one of these. Callers decide
/// how to recover: the query controller turns it into a synthetic error
/// entry, the mirrors keep their previous snapshot.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The request never produced a response (connection refused, reset, DNS)
    #[error("Decision service unreachable: {0}")]
    Transport(String),

    /// The service answered with a non-success status
    #[error("Decision service returned {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, possibly empty
        body: String,
    },

    /// The response body did not match the expected shape
    #[error("Malformed response from decision service: {0}")]
    Decode(String),
}

/// Result type alias for Claimdesk operations
///
/// Uses `anyhow::Error` so command handlers can attach context freely.
pub type Result<T> = anyhow::Result<T>;
