//! Outbound commands issued by the saga.

use common::OrderId;
use serde::{Deserialize, Serialize};

use super::events::ProductReservedData;
use super::{PaymentId, ProductId, UserId};

/// Command to reserve product inventory for an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReserveProduct {
    /// The order the reservation is for.
    pub order_id: OrderId,
    /// The product to reserve.
    pub product_id: ProductId,
    /// Quantity to reserve.
    pub quantity: u32,
    /// The user placing the order.
    pub user_id: UserId,
}

impl ReserveProduct {
    /// Creates a new ReserveProduct command.
    pub fn new(order_id: OrderId, product_id: ProductId, quantity: u32, user_id: UserId) -> Self {
        Self {
            order_id,
            product_id,
            quantity,
            user_id,
        }
    }
}

/// Compensating command that rolls back a product reservation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelProductReservation {
    /// The order whose reservation is rolled back.
    pub order_id: OrderId,
    /// The reserved product.
    pub product_id: ProductId,
    /// Reserved quantity to release.
    pub quantity: u32,
    /// The user the reservation was made for.
    pub user_id: UserId,
    /// Why the reservation is being cancelled.
    pub reason: String,
}

impl CancelProductReservation {
    /// Builds the compensation command from the reservation being unwound.
    pub fn from_reservation(reservation: &ProductReservedData, reason: impl Into<String>) -> Self {
        Self {
            order_id: reservation.order_id,
            product_id: reservation.product_id.clone(),
            quantity: reservation.quantity,
            user_id: reservation.user_id,
            reason: reason.into(),
        }
    }
}

/// Command to charge the user for an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessPayment {
    /// The order being paid for.
    pub order_id: OrderId,
    /// Fresh identifier for this payment attempt.
    pub payment_id: PaymentId,
    /// Payment details fetched for the user.
    pub payment_details: String,
}

impl ProcessPayment {
    /// Creates a ProcessPayment command with a freshly generated payment ID.
    pub fn new(order_id: OrderId, payment_details: impl Into<String>) -> Self {
        Self {
            order_id,
            payment_id: PaymentId::new(),
            payment_details: payment_details.into(),
        }
    }
}

/// Command to move an order to its approved terminal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproveOrder {
    /// The order to approve.
    pub order_id: OrderId,
}

impl ApproveOrder {
    /// Creates a new ApproveOrder command.
    pub fn new(order_id: OrderId) -> Self {
        Self { order_id }
    }
}

/// Command to move an order to its rejected terminal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectOrder {
    /// The order to reject.
    pub order_id: OrderId,
    /// Human-readable rejection reason.
    pub reason: String,
}

impl RejectOrder {
    /// Creates a new RejectOrder command.
    pub fn new(order_id: OrderId, reason: impl Into<String>) -> Self {
        Self {
            order_id,
            reason: reason.into(),
        }
    }
}

/// All commands the saga can dispatch, routed by the owning service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum OrderCommand {
    ReserveProduct(ReserveProduct),
    CancelProductReservation(CancelProductReservation),
    ProcessPayment(ProcessPayment),
    ApproveOrder(ApproveOrder),
    RejectOrder(RejectOrder),
}

impl OrderCommand {
    /// Returns the command type name.
    pub fn name(&self) -> &'static str {
        match self {
            OrderCommand::ReserveProduct(_) => "ReserveProduct",
            OrderCommand::CancelProductReservation(_) => "CancelProductReservation",
            OrderCommand::ProcessPayment(_) => "ProcessPayment",
            OrderCommand::ApproveOrder(_) => "ApproveOrder",
            OrderCommand::RejectOrder(_) => "RejectOrder",
        }
    }

    /// Returns the correlation key carried by this command.
    pub fn order_id(&self) -> OrderId {
        match self {
            OrderCommand::ReserveProduct(cmd) => cmd.order_id,
            OrderCommand::CancelProductReservation(cmd) => cmd.order_id,
            OrderCommand::ProcessPayment(cmd) => cmd.order_id,
            OrderCommand::ApproveOrder(cmd) => cmd.order_id,
            OrderCommand::RejectOrder(cmd) => cmd.order_id,
        }
    }
}

impl From<ReserveProduct> for OrderCommand {
    fn from(cmd: ReserveProduct) -> Self {
        OrderCommand::ReserveProduct(cmd)
    }
}

impl From<CancelProductReservation> for OrderCommand {
    fn from(cmd: CancelProductReservation) -> Self {
        OrderCommand::CancelProductReservation(cmd)
    }
}

impl From<ProcessPayment> for OrderCommand {
    fn from(cmd: ProcessPayment) -> Self {
        OrderCommand::ProcessPayment(cmd)
    }
}

impl From<ApproveOrder> for OrderCommand {
    fn from(cmd: ApproveOrder) -> Self {
        OrderCommand::ApproveOrder(cmd)
    }
}

impl From<RejectOrder> for OrderCommand {
    fn from(cmd: RejectOrder) -> Self {
        OrderCommand::RejectOrder(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_name_and_correlation() {
        let order_id = OrderId::new();
        let user_id = UserId::new();

        let commands: Vec<OrderCommand> = vec![
            ReserveProduct::new(order_id, ProductId::new("SKU-1"), 2, user_id).into(),
            CancelProductReservation::from_reservation(
                &ProductReservedData {
                    order_id,
                    user_id,
                    product_id: ProductId::new("SKU-1"),
                    quantity: 2,
                },
                "payment failed",
            )
            .into(),
            ProcessPayment::new(order_id, "card-123").into(),
            ApproveOrder::new(order_id).into(),
            RejectOrder::new(order_id, "payment failed").into(),
        ];

        let names: Vec<&str> = commands.iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            vec![
                "ReserveProduct",
                "CancelProductReservation",
                "ProcessPayment",
                "ApproveOrder",
                "RejectOrder"
            ]
        );

        for command in &commands {
            assert_eq!(command.order_id(), order_id);
        }
    }

    #[test]
    fn test_process_payment_generates_fresh_payment_ids() {
        let order_id = OrderId::new();
        let first = ProcessPayment::new(order_id, "card-123");
        let second = ProcessPayment::new(order_id, "card-123");
        assert_ne!(first.payment_id, second.payment_id);
    }

    #[test]
    fn test_cancel_reservation_copies_reservation_fields() {
        let reservation = ProductReservedData {
            order_id: OrderId::new(),
            user_id: UserId::new(),
            product_id: ProductId::new("SKU-7"),
            quantity: 3,
        };

        let cmd = CancelProductReservation::from_reservation(&reservation, "Payment timeout");

        assert_eq!(cmd.order_id, reservation.order_id);
        assert_eq!(cmd.user_id, reservation.user_id);
        assert_eq!(cmd.product_id, reservation.product_id);
        assert_eq!(cmd.quantity, 3);
        assert_eq!(cmd.reason, "Payment timeout");
    }

    #[test]
    fn test_serialization_roundtrip() {
        let cmd: OrderCommand = RejectOrder::new(OrderId::new(), "no payment details").into();
        let json = serde_json::to_string(&cmd).unwrap();
        let deserialized: OrderCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(cmd.name(), deserialized.name());
        assert_eq!(cmd.order_id(), deserialized.order_id());
    }
}
