//! Command dispatcher trait and in-memory implementation.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use domain::OrderCommand;

use crate::error::GatewayError;

/// Trait for dispatching commands to their owning service.
#[async_trait]
pub trait CommandDispatcher: Send + Sync {
    /// Sends a command and reports whether the owning service accepted it.
    ///
    /// An `Err` is the completion notification for an exceptional result;
    /// the command is never retried by the caller.
    async fn send(&self, command: OrderCommand) -> Result<(), GatewayError>;

    /// Sends a command and waits up to `timeout` for a synchronous result.
    ///
    /// `Ok(None)` means the service completed without producing a result.
    /// Exceeding the wait is reported as [`GatewayError::Timeout`], not a
    /// crash.
    async fn send_and_wait(
        &self,
        command: OrderCommand,
        timeout: Duration,
    ) -> Result<Option<String>, GatewayError>;
}

/// How the in-memory gateway answers a `ProcessPayment` wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaymentResponse {
    /// Return a confirmation string.
    #[default]
    Confirmed,
    /// Complete without a result (`Ok(None)`).
    NoResult,
    /// Reject the payment with an exceptional result.
    Rejected,
    /// Never answer; the bounded wait elapses.
    TimedOut,
}

#[derive(Debug, Default)]
struct InMemoryGatewayState {
    sent: Vec<OrderCommand>,
    fail_on_reserve: bool,
    payment_response: PaymentResponse,
}

/// In-memory command gateway for testing.
///
/// Records every dispatched command and answers waits according to the
/// configured [`PaymentResponse`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryCommandGateway {
    state: Arc<RwLock<InMemoryGatewayState>>,
}

impl InMemoryCommandGateway {
    /// Creates a new in-memory command gateway.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the gateway to reject the next ReserveProduct command.
    pub fn set_fail_on_reserve(&self, fail: bool) {
        self.state.write().unwrap().fail_on_reserve = fail;
    }

    /// Configures how ProcessPayment waits are answered.
    pub fn set_payment_response(&self, response: PaymentResponse) {
        self.state.write().unwrap().payment_response = response;
    }

    /// Returns a copy of every command dispatched so far, in order.
    pub fn sent(&self) -> Vec<OrderCommand> {
        self.state.read().unwrap().sent.clone()
    }

    /// Returns how many commands with the given type name were dispatched.
    pub fn sent_count(&self, name: &str) -> usize {
        self.state
            .read()
            .unwrap()
            .sent
            .iter()
            .filter(|c| c.name() == name)
            .count()
    }

    fn record(&self, command: &OrderCommand) {
        self.state.write().unwrap().sent.push(command.clone());
    }
}

#[async_trait]
impl CommandDispatcher for InMemoryCommandGateway {
    async fn send(&self, command: OrderCommand) -> Result<(), GatewayError> {
        let fail_reserve = self.state.read().unwrap().fail_on_reserve;

        if fail_reserve && matches!(command, OrderCommand::ReserveProduct(_)) {
            return Err(GatewayError::Rejected("Insufficient stock".to_string()));
        }

        self.record(&command);
        Ok(())
    }

    async fn send_and_wait(
        &self,
        command: OrderCommand,
        timeout: Duration,
    ) -> Result<Option<String>, GatewayError> {
        let response = self.state.read().unwrap().payment_response;

        match response {
            PaymentResponse::Confirmed => {
                self.record(&command);
                Ok(Some("payment accepted".to_string()))
            }
            PaymentResponse::NoResult => {
                self.record(&command);
                Ok(None)
            }
            PaymentResponse::Rejected => {
                self.record(&command);
                Err(GatewayError::Rejected("Payment declined".to_string()))
            }
            PaymentResponse::TimedOut => {
                self.record(&command);
                Err(GatewayError::Timeout(timeout))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::OrderId;
    use domain::{ApproveOrder, ProcessPayment, ProductId, ReserveProduct, UserId};

    #[tokio::test]
    async fn test_send_records_commands_in_order() {
        let gateway = InMemoryCommandGateway::new();
        let order_id = OrderId::new();

        gateway
            .send(ReserveProduct::new(order_id, ProductId::new("SKU-1"), 2, UserId::new()).into())
            .await
            .unwrap();
        gateway
            .send(ApproveOrder::new(order_id).into())
            .await
            .unwrap();

        let sent = gateway.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].name(), "ReserveProduct");
        assert_eq!(sent[1].name(), "ApproveOrder");
        assert_eq!(gateway.sent_count("ReserveProduct"), 1);
    }

    #[tokio::test]
    async fn test_fail_on_reserve_rejects_only_reserve() {
        let gateway = InMemoryCommandGateway::new();
        gateway.set_fail_on_reserve(true);
        let order_id = OrderId::new();

        let result = gateway
            .send(ReserveProduct::new(order_id, ProductId::new("SKU-1"), 2, UserId::new()).into())
            .await;
        assert!(matches!(result, Err(GatewayError::Rejected(_))));

        gateway
            .send(ApproveOrder::new(order_id).into())
            .await
            .unwrap();
        assert_eq!(gateway.sent_count("ApproveOrder"), 1);
    }

    #[tokio::test]
    async fn test_send_and_wait_responses() {
        let gateway = InMemoryCommandGateway::new();
        let order_id = OrderId::new();
        let timeout = Duration::from_secs(10);

        let result = gateway
            .send_and_wait(ProcessPayment::new(order_id, "card-123").into(), timeout)
            .await
            .unwrap();
        assert_eq!(result, Some("payment accepted".to_string()));

        gateway.set_payment_response(PaymentResponse::NoResult);
        let result = gateway
            .send_and_wait(ProcessPayment::new(order_id, "card-123").into(), timeout)
            .await
            .unwrap();
        assert!(result.is_none());

        gateway.set_payment_response(PaymentResponse::TimedOut);
        let result = gateway
            .send_and_wait(ProcessPayment::new(order_id, "card-123").into(), timeout)
            .await;
        assert!(matches!(result, Err(GatewayError::Timeout(_))));
    }
}
