//! Order summary read model.

use std::collections::HashMap;
use std::sync::Arc;

use common::OrderId;
use domain::{OrderEvent, OrderSummary};
use tokio::sync::RwLock;

use crate::error::{ProjectionError, Result};

/// Read model holding the latest status summary per order.
///
/// Fed directly from the order event stream: orders enter as `Created`
/// and transition to `Approved` or `Rejected` on their terminal event.
/// Summaries are kept after the terminal transition so point queries
/// keep answering for finished orders.
#[derive(Debug, Clone, Default)]
pub struct OrderSummaryView {
    summaries: Arc<RwLock<HashMap<OrderId, OrderSummary>>>,
}

impl OrderSummaryView {
    /// Creates a new empty view.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one order event to the view.
    pub async fn handle(&self, event: &OrderEvent) {
        let mut summaries = self.summaries.write().await;

        match event {
            OrderEvent::OrderCreated(data) => {
                summaries.insert(data.order_id, OrderSummary::created(data.order_id));
            }
            OrderEvent::OrderApproved(data) => {
                summaries.insert(data.order_id, OrderSummary::approved(data.order_id));
            }
            OrderEvent::OrderRejected(data) => {
                summaries.insert(
                    data.order_id,
                    OrderSummary::rejected(data.order_id, data.reason.clone()),
                );
            }
            // Intermediate events do not change the summary status.
            OrderEvent::ProductReserved(_)
            | OrderEvent::ProductReservationCancelled(_)
            | OrderEvent::PaymentProcessed(_) => {}
        }
    }

    /// Point query: the latest summary for one order.
    pub async fn find_order(&self, order_id: OrderId) -> Result<OrderSummary> {
        self.summaries
            .read()
            .await
            .get(&order_id)
            .cloned()
            .ok_or(ProjectionError::OrderNotFound(order_id))
    }

    /// Returns the number of orders in the view.
    pub async fn count(&self) -> usize {
        self.summaries.read().await.len()
    }
}
