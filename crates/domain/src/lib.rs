//! Domain layer for the order-fulfillment saga.
//!
//! This crate defines the message vocabulary the saga exchanges with its
//! collaborators:
//! - Inbound domain events, each correlated by `OrderId`
//! - Outbound commands issued by the saga
//! - The user payment-details query and its result model
//! - The order-status read-model vocabulary

pub mod order;

pub use order::{
    ApproveOrder, CancelProductReservation, FetchUserPaymentDetails, OrderApprovedData,
    OrderCommand, OrderCreatedData, OrderEvent, OrderRejectedData, OrderStatus, OrderSummary,
    PaymentId, PaymentProcessedData, ProcessPayment, ProductId, ProductReservationCancelledData,
    ProductReservedData, RejectOrder, ReserveProduct, User, UserId,
};
