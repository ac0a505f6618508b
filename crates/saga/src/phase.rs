//! Saga phase state machine.

use serde::{Deserialize, Serialize};

/// The phase of one saga instance in its lifecycle.
///
/// Phase transitions:
/// ```text
/// Started ──► AwaitingPayment ──► Completed
///    └──────────────────────────────┘
/// ```
///
/// `Completed` is entered as soon as the saga has issued its final
/// approving or compensating command; the instance lingers there until the
/// terminal event arrives and is then discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SagaPhase {
    /// Instance created on OrderCreated; reservation in flight.
    #[default]
    Started,

    /// Payment command issued, payment deadline armed.
    AwaitingPayment,

    /// Final command issued; waiting for the terminal event (terminal
    /// phase).
    Completed,
}

impl SagaPhase {
    /// Returns true while the payment deadline may legitimately fire.
    pub fn is_awaiting_payment(&self) -> bool {
        matches!(self, SagaPhase::AwaitingPayment)
    }

    /// Returns true if no further commands may be issued for this order.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SagaPhase::Completed)
    }

    /// Returns the phase name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SagaPhase::Started => "Started",
            SagaPhase::AwaitingPayment => "AwaitingPayment",
            SagaPhase::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for SagaPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
