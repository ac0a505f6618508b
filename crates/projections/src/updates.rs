//! Subscription registry for order-status pushes.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use common::OrderId;
use domain::OrderSummary;
use gateway::StatusEmitter;
use tokio::sync::mpsc;

/// Fan-out registry that delivers order-status updates to subscribers.
///
/// Subscribers register per order and receive every summary pushed for
/// that order from then on. Delivery is fire-and-forget: a subscriber
/// that registers after a push has happened misses it, and closed
/// receivers are pruned on the next push.
#[derive(Debug, Clone, Default)]
pub struct OrderStatusUpdates {
    subscribers: Arc<RwLock<HashMap<OrderId, Vec<mpsc::UnboundedSender<OrderSummary>>>>>,
}

impl OrderStatusUpdates {
    /// Creates a registry with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to status updates for one order.
    pub fn subscribe(&self, order_id: OrderId) -> mpsc::UnboundedReceiver<OrderSummary> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .write()
            .unwrap()
            .entry(order_id)
            .or_default()
            .push(tx);
        rx
    }

    /// Returns the number of live subscribers for an order.
    pub fn subscriber_count(&self, order_id: OrderId) -> usize {
        self.subscribers
            .read()
            .unwrap()
            .get(&order_id)
            .map(|senders| senders.iter().filter(|tx| !tx.is_closed()).count())
            .unwrap_or(0)
    }
}

impl StatusEmitter for OrderStatusUpdates {
    fn emit_order_status(&self, summary: OrderSummary) {
        let mut subscribers = self.subscribers.write().unwrap();
        let Some(senders) = subscribers.get_mut(&summary.order_id) else {
            tracing::debug!(order_id = %summary.order_id, "status push with no subscribers");
            return;
        };

        senders.retain(|tx| tx.send(summary.clone()).is_ok());
        metrics::counter!("projections_status_pushes_total").increment(1);

        if senders.is_empty() {
            subscribers.remove(&summary.order_id);
        }
    }
}
