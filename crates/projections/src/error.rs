//! Projection error types.

use common::OrderId;
use thiserror::Error;

/// Errors from the query side.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// No summary exists for the order. Recoverable: the caller can retry
    /// once the projection catches up, or treat it as "unknown order".
    #[error("no order summary for order {0}")]
    OrderNotFound(OrderId),
}

/// Convenience type alias for projection results.
pub type Result<T> = std::result::Result<T, ProjectionError>;
