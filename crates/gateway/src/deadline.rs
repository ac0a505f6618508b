//! Deadline timer trait and implementations.
//!
//! A deadline is a named, payload-carrying timer. The payload is the
//! ProductReserved data that armed it, so the handler can rebuild the
//! compensation command without a store lookup.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

use domain::ProductReservedData;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Handle to one scheduled deadline, used for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScheduleId(Uuid);

impl ScheduleId {
    /// Creates a new unique schedule ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ScheduleId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ScheduleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A deadline that has fired.
#[derive(Debug, Clone)]
pub struct Deadline {
    /// The deadline name it was scheduled under.
    pub name: String,
    /// The schedule handle it was created with.
    pub schedule_id: ScheduleId,
    /// The reservation that armed the deadline.
    pub payload: ProductReservedData,
}

/// Trait for scheduling cancellable, payload-carrying deadlines.
pub trait DeadlineTimer: Send + Sync {
    /// Schedules a deadline to fire after `delay`.
    fn schedule(&self, delay: Duration, name: &str, payload: ProductReservedData) -> ScheduleId;

    /// Cancels a scheduled deadline.
    ///
    /// Cancelling a deadline that already fired or never existed is a
    /// no-op, never an error.
    fn cancel(&self, name: &str, schedule_id: ScheduleId);
}

/// Deadline timer backed by tokio sleep tasks.
///
/// Fired deadlines are delivered on the channel handed out by
/// [`TokioDeadlineTimer::channel`]; the consumer forwards them to the saga.
/// A deadline fires only if its `(name, schedule_id)` entry is still
/// pending when the sleep elapses, so cancellation and firing cannot both
/// deliver.
#[derive(Debug, Clone)]
pub struct TokioDeadlineTimer {
    tx: mpsc::UnboundedSender<Deadline>,
    pending: Arc<Mutex<HashSet<(String, ScheduleId)>>>,
}

impl TokioDeadlineTimer {
    /// Creates a timer and the receiver for its fired deadlines.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Deadline>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                pending: Arc::new(Mutex::new(HashSet::new())),
            },
            rx,
        )
    }

    /// Returns the number of deadlines that have not fired or been
    /// cancelled yet.
    pub fn pending_count(&self) -> usize {
        self.pending.lock().unwrap().len()
    }
}

impl DeadlineTimer for TokioDeadlineTimer {
    fn schedule(&self, delay: Duration, name: &str, payload: ProductReservedData) -> ScheduleId {
        let schedule_id = ScheduleId::new();
        let key = (name.to_string(), schedule_id);
        self.pending.lock().unwrap().insert(key.clone());

        let pending = Arc::clone(&self.pending);
        let tx = self.tx.clone();
        tracing::debug!(name, %schedule_id, ?delay, "deadline scheduled");

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            // Only deliver if nobody cancelled the entry while we slept.
            if pending.lock().unwrap().remove(&key) {
                let _ = tx.send(Deadline {
                    name: key.0,
                    schedule_id,
                    payload,
                });
            }
        });

        schedule_id
    }

    fn cancel(&self, name: &str, schedule_id: ScheduleId) {
        let removed = self
            .pending
            .lock()
            .unwrap()
            .remove(&(name.to_string(), schedule_id));
        tracing::debug!(name, %schedule_id, removed, "deadline cancel");
    }
}

/// Manually fired deadline timer for deterministic tests.
///
/// Scheduled deadlines never fire on their own; tests pop them with
/// [`ManualDeadlineTimer::fire`] and feed them to the saga by hand to
/// simulate either ordering of the payment/deadline race.
#[derive(Debug, Clone, Default)]
pub struct ManualDeadlineTimer {
    pending: Arc<RwLock<Vec<Deadline>>>,
}

impl ManualDeadlineTimer {
    /// Creates a new manual timer with no pending deadlines.
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns the oldest pending deadline with this name.
    pub fn fire(&self, name: &str) -> Option<Deadline> {
        let mut pending = self.pending.write().unwrap();
        let idx = pending.iter().position(|d| d.name == name)?;
        Some(pending.remove(idx))
    }

    /// Returns the number of pending deadlines.
    pub fn pending_count(&self) -> usize {
        self.pending.read().unwrap().len()
    }
}

impl DeadlineTimer for ManualDeadlineTimer {
    fn schedule(&self, _delay: Duration, name: &str, payload: ProductReservedData) -> ScheduleId {
        let schedule_id = ScheduleId::new();
        self.pending.write().unwrap().push(Deadline {
            name: name.to_string(),
            schedule_id,
            payload,
        });
        schedule_id
    }

    fn cancel(&self, name: &str, schedule_id: ScheduleId) {
        self.pending
            .write()
            .unwrap()
            .retain(|d| !(d.name == name && d.schedule_id == schedule_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::OrderId;
    use domain::{ProductId, UserId};

    fn payload() -> ProductReservedData {
        ProductReservedData {
            order_id: OrderId::new(),
            user_id: UserId::new(),
            product_id: ProductId::new("SKU-1"),
            quantity: 2,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_timer_fires_with_payload() {
        let (timer, mut rx) = TokioDeadlineTimer::channel();
        let payload = payload();

        let schedule_id = timer.schedule(
            Duration::from_secs(60),
            "payment-processing-deadline",
            payload.clone(),
        );
        assert_eq!(timer.pending_count(), 1);

        let deadline = rx.recv().await.unwrap();
        assert_eq!(deadline.name, "payment-processing-deadline");
        assert_eq!(deadline.schedule_id, schedule_id);
        assert_eq!(deadline.payload.order_id, payload.order_id);
        assert_eq!(timer.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_timer_cancel_suppresses_fire() {
        let (timer, mut rx) = TokioDeadlineTimer::channel();

        let schedule_id = timer.schedule(Duration::from_secs(60), "deadline", payload());
        timer.cancel("deadline", schedule_id);
        assert_eq!(timer.pending_count(), 0);

        // Let the sleep elapse; nothing may be delivered.
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_timer_cancel_after_fire_is_noop() {
        let (timer, mut rx) = TokioDeadlineTimer::channel();

        let schedule_id = timer.schedule(Duration::from_millis(10), "deadline", payload());
        let deadline = rx.recv().await.unwrap();
        assert_eq!(deadline.schedule_id, schedule_id);

        timer.cancel("deadline", schedule_id);
        timer.cancel("deadline", ScheduleId::new());
    }

    #[test]
    fn test_manual_timer_fire_and_cancel() {
        let timer = ManualDeadlineTimer::new();

        let id1 = timer.schedule(Duration::from_secs(60), "deadline", payload());
        let _id2 = timer.schedule(Duration::from_secs(60), "deadline", payload());
        assert_eq!(timer.pending_count(), 2);

        // Oldest first
        let fired = timer.fire("deadline").unwrap();
        assert_eq!(fired.schedule_id, id1);
        assert_eq!(timer.pending_count(), 1);

        // Cancelling a fired or unknown deadline is a no-op
        timer.cancel("deadline", id1);
        timer.cancel("other", ScheduleId::new());
        assert_eq!(timer.pending_count(), 1);
    }

    #[test]
    fn test_manual_timer_fire_unknown_name_is_none() {
        let timer = ManualDeadlineTimer::new();
        assert!(timer.fire("nope").is_none());
    }
}
