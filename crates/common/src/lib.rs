//! Shared types used across the order-fulfillment saga crates.

pub mod types;

pub use types::OrderId;
