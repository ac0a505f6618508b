//! Collaborator contracts consumed by the order-fulfillment saga.
//!
//! The saga depends only on the traits defined here:
//! - [`CommandDispatcher`] routes commands to their owning service
//! - [`QueryClient`] issues bounded point queries
//! - [`DeadlineTimer`] schedules and cancels payload-carrying deadlines
//! - [`StatusEmitter`] pushes terminal order status to the read model
//!
//! Each contract ships with an in-memory implementation used by tests and
//! local runs, plus a tokio-backed timer for real wiring.

pub mod command;
pub mod deadline;
pub mod emitter;
pub mod error;
pub mod query;

pub use command::{CommandDispatcher, InMemoryCommandGateway, PaymentResponse};
pub use deadline::{Deadline, DeadlineTimer, ManualDeadlineTimer, ScheduleId, TokioDeadlineTimer};
pub use emitter::{RecordingStatusEmitter, StatusEmitter};
pub use error::{GatewayError, Result};
pub use query::{InMemoryQueryClient, QueryClient};
