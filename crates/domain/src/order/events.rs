//! Inbound order domain events.
//!
//! Every event carries the `OrderId` correlation key that routes it to
//! exactly one saga instance.

use chrono::{DateTime, Utc};
use common::OrderId;
use serde::{Deserialize, Serialize};

use super::{PaymentId, ProductId, UserId};

/// Events consumed by the order-fulfillment saga.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum OrderEvent {
    /// A new order was created; starts the saga.
    OrderCreated(OrderCreatedData),

    /// The inventory service reserved the requested product quantity.
    ProductReserved(ProductReservedData),

    /// A previous reservation was rolled back (compensation confirmed).
    ProductReservationCancelled(ProductReservationCancelledData),

    /// The payment service charged the user.
    PaymentProcessed(PaymentProcessedData),

    /// The order reached its approved terminal state.
    OrderApproved(OrderApprovedData),

    /// The order reached its rejected terminal state.
    OrderRejected(OrderRejectedData),
}

impl OrderEvent {
    /// Returns the event type name.
    pub fn event_type(&self) -> &'static str {
        match self {
            OrderEvent::OrderCreated(_) => "OrderCreated",
            OrderEvent::ProductReserved(_) => "ProductReserved",
            OrderEvent::ProductReservationCancelled(_) => "ProductReservationCancelled",
            OrderEvent::PaymentProcessed(_) => "PaymentProcessed",
            OrderEvent::OrderApproved(_) => "OrderApproved",
            OrderEvent::OrderRejected(_) => "OrderRejected",
        }
    }

    /// Returns the correlation key carried by this event.
    pub fn order_id(&self) -> OrderId {
        match self {
            OrderEvent::OrderCreated(data) => data.order_id,
            OrderEvent::ProductReserved(data) => data.order_id,
            OrderEvent::ProductReservationCancelled(data) => data.order_id,
            OrderEvent::PaymentProcessed(data) => data.order_id,
            OrderEvent::OrderApproved(data) => data.order_id,
            OrderEvent::OrderRejected(data) => data.order_id,
        }
    }
}

/// Data for the OrderCreated event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreatedData {
    /// The order being created.
    pub order_id: OrderId,
    /// The user placing the order.
    pub user_id: UserId,
    /// The product being ordered.
    pub product_id: ProductId,
    /// Quantity ordered.
    pub quantity: u32,
    /// When the order was created.
    pub created_at: DateTime<Utc>,
}

/// Data for the ProductReserved event.
///
/// Also used as the payment-deadline payload so the deadline handler can
/// rebuild the compensation command without a store lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductReservedData {
    /// The order the reservation belongs to.
    pub order_id: OrderId,
    /// The user the reservation was made for.
    pub user_id: UserId,
    /// The reserved product.
    pub product_id: ProductId,
    /// Reserved quantity.
    pub quantity: u32,
}

/// Data for the ProductReservationCancelled event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductReservationCancelledData {
    /// The order whose reservation was rolled back.
    pub order_id: OrderId,
    /// Human-readable reason for the rollback.
    pub reason: String,
}

/// Data for the PaymentProcessed event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentProcessedData {
    /// The order the payment belongs to.
    pub order_id: OrderId,
    /// The payment attempt that succeeded.
    pub payment_id: PaymentId,
}

/// Data for the OrderApproved terminal event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderApprovedData {
    /// The approved order.
    pub order_id: OrderId,
}

/// Data for the OrderRejected terminal event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRejectedData {
    /// The rejected order.
    pub order_id: OrderId,
    /// Human-readable rejection reason.
    pub reason: String,
}

// Convenience constructors
impl OrderEvent {
    /// Creates an OrderCreated event.
    pub fn order_created(
        order_id: OrderId,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Self {
        OrderEvent::OrderCreated(OrderCreatedData {
            order_id,
            user_id,
            product_id,
            quantity,
            created_at: Utc::now(),
        })
    }

    /// Creates a ProductReserved event.
    pub fn product_reserved(
        order_id: OrderId,
        user_id: UserId,
        product_id: ProductId,
        quantity: u32,
    ) -> Self {
        OrderEvent::ProductReserved(ProductReservedData {
            order_id,
            user_id,
            product_id,
            quantity,
        })
    }

    /// Creates a ProductReservationCancelled event.
    pub fn product_reservation_cancelled(order_id: OrderId, reason: impl Into<String>) -> Self {
        OrderEvent::ProductReservationCancelled(ProductReservationCancelledData {
            order_id,
            reason: reason.into(),
        })
    }

    /// Creates a PaymentProcessed event.
    pub fn payment_processed(order_id: OrderId, payment_id: PaymentId) -> Self {
        OrderEvent::PaymentProcessed(PaymentProcessedData {
            order_id,
            payment_id,
        })
    }

    /// Creates an OrderApproved event.
    pub fn order_approved(order_id: OrderId) -> Self {
        OrderEvent::OrderApproved(OrderApprovedData { order_id })
    }

    /// Creates an OrderRejected event.
    pub fn order_rejected(order_id: OrderId, reason: impl Into<String>) -> Self {
        OrderEvent::OrderRejected(OrderRejectedData {
            order_id,
            reason: reason.into(),
        })
    }
}
