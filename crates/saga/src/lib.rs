//! Order-fulfillment saga.
//!
//! A long-lived process manager that coordinates order creation, inventory
//! reservation, payment processing and order finalization across services,
//! guaranteeing eventual consistency through compensation instead of
//! distributed locking.
//!
//! The flow for one order:
//! 1. `OrderCreated` starts a saga instance and reserves the product
//! 2. `ProductReserved` triggers the payment-details query and the payment
//!    command, guarded by a 60-second deadline
//! 3. `PaymentProcessed` (or the deadline, or any failure) decides between
//!    approval and compensation
//! 4. The terminal `OrderApproved`/`OrderRejected` event pushes the final
//!    status to read-model subscribers and discards the instance
//!
//! Every order ends in exactly one of two terminal outcomes, under message
//! reordering, duplicate delivery, partial failure and timer races.

pub mod config;
pub mod error;
pub mod instance;
pub mod orchestrator;
pub mod phase;
pub mod store;

pub use config::SagaConfig;
pub use error::SagaError;
pub use instance::SagaInstance;
pub use orchestrator::{PAYMENT_PROCESSING_DEADLINE, SagaOrchestrator, run_deadline_pump};
pub use phase::SagaPhase;
pub use store::SagaStore;
