//! Per-order saga instance state.

use common::OrderId;
use gateway::ScheduleId;
use serde::{Deserialize, Serialize};

use crate::phase::SagaPhase;

/// The mutable per-order state held by the orchestrator.
///
/// At most one instance exists per order ID at any time. The payment
/// deadline handle is set if and only if the phase is `AwaitingPayment`;
/// [`SagaInstance::complete`] clears it in the same transition that leaves
/// that phase, so cancellation can never be forgotten.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SagaInstance {
    order_id: OrderId,
    phase: SagaPhase,
    payment_deadline: Option<ScheduleId>,
}

impl SagaInstance {
    /// Creates a new instance in the `Started` phase.
    pub fn new(order_id: OrderId) -> Self {
        Self {
            order_id,
            phase: SagaPhase::Started,
            payment_deadline: None,
        }
    }

    /// Returns the correlation key of this instance.
    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    /// Returns the current phase.
    pub fn phase(&self) -> SagaPhase {
        self.phase
    }

    /// Returns the outstanding payment-deadline handle, if any.
    pub fn payment_deadline(&self) -> Option<ScheduleId> {
        self.payment_deadline
    }

    /// Moves into `AwaitingPayment`, recording the armed deadline handle.
    pub fn await_payment(&mut self, schedule_id: ScheduleId) {
        self.phase = SagaPhase::AwaitingPayment;
        self.payment_deadline = Some(schedule_id);
    }

    /// Moves into `Completed` and surrenders the deadline handle.
    ///
    /// The caller must cancel the returned handle; doing it here, inside
    /// the same transition that leaves `AwaitingPayment`, keeps the
    /// deadline invariant intact.
    pub fn complete(&mut self) -> Option<ScheduleId> {
        self.phase = SagaPhase::Completed;
        self.payment_deadline.take()
    }
}
