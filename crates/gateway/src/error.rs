//! Gateway error types.

use std::time::Duration;

use thiserror::Error;

/// Errors reported by the collaborator gateways.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// The owning service rejected the command (exceptional result).
    #[error("{0}")]
    Rejected(String),

    /// A bounded wait elapsed without a result.
    #[error("no result within {0:?}")]
    Timeout(Duration),

    /// A point query failed before producing a result.
    #[error("{0}")]
    QueryFailed(String),
}

/// Convenience type alias for gateway results.
pub type Result<T> = std::result::Result<T, GatewayError>;
