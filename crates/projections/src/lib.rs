//! Query side for order fulfillment.
//!
//! Two read-model pieces:
//! - [`OrderSummaryView`] answers point queries for the latest status of
//!   an order, fed from the order event stream.
//! - [`OrderStatusUpdates`] delivers status pushes from the saga to
//!   per-order subscribers.

pub mod error;
pub mod updates;
pub mod view;

pub use error::{ProjectionError, Result};
pub use updates::OrderStatusUpdates;
pub use view::OrderSummaryView;
