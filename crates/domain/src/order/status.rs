//! Order status vocabulary pushed to the read model.

use common::OrderId;
use serde::{Deserialize, Serialize};

/// Queryable status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Order exists but the saga has not finished yet.
    Created,
    /// Terminal: the order was approved.
    Approved,
    /// Terminal: the order was rejected.
    Rejected,
}

impl OrderStatus {
    /// Returns true if no further status change can occur.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Approved | OrderStatus::Rejected)
    }

    /// Returns the status name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "Created",
            OrderStatus::Approved => "Approved",
            OrderStatus::Rejected => "Rejected",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The order record pushed to read-model subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    /// The order this summary describes.
    pub order_id: OrderId,
    /// Current status.
    pub status: OrderStatus,
    /// Rejection reason; empty for created/approved orders.
    pub reason: String,
}

impl OrderSummary {
    /// Summary for a freshly created order.
    pub fn created(order_id: OrderId) -> Self {
        Self {
            order_id,
            status: OrderStatus::Created,
            reason: String::new(),
        }
    }

    /// Terminal summary for an approved order.
    pub fn approved(order_id: OrderId) -> Self {
        Self {
            order_id,
            status: OrderStatus::Approved,
            reason: String::new(),
        }
    }

    /// Terminal summary for a rejected order.
    pub fn rejected(order_id: OrderId, reason: impl Into<String>) -> Self {
        Self {
            order_id,
            status: OrderStatus::Rejected,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(!OrderStatus::Created.is_terminal());
        assert!(OrderStatus::Approved.is_terminal());
        assert!(OrderStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_display() {
        assert_eq!(OrderStatus::Created.to_string(), "Created");
        assert_eq!(OrderStatus::Approved.to_string(), "Approved");
        assert_eq!(OrderStatus::Rejected.to_string(), "Rejected");
    }

    #[test]
    fn test_summary_constructors() {
        let order_id = OrderId::new();

        let approved = OrderSummary::approved(order_id);
        assert_eq!(approved.status, OrderStatus::Approved);
        assert!(approved.reason.is_empty());

        let rejected = OrderSummary::rejected(order_id, "Payment timeout");
        assert_eq!(rejected.status, OrderStatus::Rejected);
        assert_eq!(rejected.reason, "Payment timeout");
    }
}
