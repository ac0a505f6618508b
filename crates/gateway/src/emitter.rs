//! Read-model push contract.

use std::sync::{Arc, RwLock};

use domain::OrderSummary;

/// Trait for pushing order status to read-model subscribers.
///
/// The push is fire-and-forget from the saga's perspective; delivery to
/// currently active subscribers is at-least-once, subscribers not yet
/// present miss the push.
pub trait StatusEmitter: Send + Sync {
    /// Emits an order status update.
    fn emit_order_status(&self, summary: OrderSummary);
}

/// Status emitter that records every push, for testing.
#[derive(Debug, Clone, Default)]
pub struct RecordingStatusEmitter {
    emitted: Arc<RwLock<Vec<OrderSummary>>>,
}

impl RecordingStatusEmitter {
    /// Creates a new recording emitter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every emitted summary, in order.
    pub fn emitted(&self) -> Vec<OrderSummary> {
        self.emitted.read().unwrap().clone()
    }

    /// Returns the emitted summaries for one order.
    pub fn emitted_for(&self, order_id: common::OrderId) -> Vec<OrderSummary> {
        self.emitted
            .read()
            .unwrap()
            .iter()
            .filter(|s| s.order_id == order_id)
            .cloned()
            .collect()
    }
}

impl StatusEmitter for RecordingStatusEmitter {
    fn emit_order_status(&self, summary: OrderSummary) {
        self.emitted.write().unwrap().push(summary);
    }
}
