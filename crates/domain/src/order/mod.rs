//! Order messages: events, commands, queries and value objects.

pub mod commands;
pub mod events;
pub mod queries;
pub mod status;
pub mod value_objects;

pub use commands::{
    ApproveOrder, CancelProductReservation, OrderCommand, ProcessPayment, RejectOrder,
    ReserveProduct,
};
pub use events::{
    OrderApprovedData, OrderCreatedData, OrderEvent, OrderRejectedData, PaymentProcessedData,
    ProductReservationCancelledData, ProductReservedData,
};
pub use queries::{FetchUserPaymentDetails, User};
pub use status::{OrderStatus, OrderSummary};
pub use value_objects::{PaymentId, ProductId, UserId};
