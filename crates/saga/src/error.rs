//! Saga error types.

use common::OrderId;
use thiserror::Error;

/// Errors that can occur during saga operations.
///
/// These never escape the orchestrator's event handlers; every failure
/// path converges on a compensating or rejecting command instead.
#[derive(Debug, Error)]
pub enum SagaError {
    /// An instance already exists for the order (idempotent-start guard).
    #[error("saga instance already exists for order {0}")]
    DuplicateInstance(OrderId),

    /// No instance exists for the order.
    #[error("no saga instance for order {0}")]
    InstanceNotFound(OrderId),
}

/// Convenience type alias for saga results.
pub type Result<T> = std::result::Result<T, SagaError>;
