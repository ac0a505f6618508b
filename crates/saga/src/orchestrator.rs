//! The saga orchestrator state machine.
//!
//! Consumes correlated [`OrderEvent`]s one at a time per order, mutates the
//! instance held in the [`SagaStore`], and turns each event into at most
//! one outgoing command, timer operation or read-model push. Failures are
//! never propagated to the caller; every failure path converges on exactly
//! one compensating or rejecting command.

use std::sync::Arc;

use common::OrderId;
use domain::{
    ApproveOrder, CancelProductReservation, FetchUserPaymentDetails, OrderApprovedData,
    OrderCreatedData, OrderEvent, OrderRejectedData, OrderSummary, PaymentProcessedData,
    ProcessPayment, ProductReservationCancelledData, ProductReservedData, RejectOrder,
    ReserveProduct,
};
use gateway::{CommandDispatcher, Deadline, DeadlineTimer, QueryClient, StatusEmitter};
use tokio::sync::mpsc;

use crate::config::SagaConfig;
use crate::instance::SagaInstance;
use crate::store::SagaStore;

/// Name under which the payment deadline is scheduled.
pub const PAYMENT_PROCESSING_DEADLINE: &str = "payment-processing-deadline";

/// Orchestrates order-fulfillment sagas.
///
/// Generic over the collaborator contracts so the decision logic depends
/// only on their behavior, not their wiring: `D` dispatches commands, `Q`
/// issues the payment-details query, `T` arms and cancels the payment
/// deadline, `E` pushes terminal status to the read model.
pub struct SagaOrchestrator<D, Q, T, E>
where
    D: CommandDispatcher,
    Q: QueryClient,
    T: DeadlineTimer,
    E: StatusEmitter,
{
    store: SagaStore,
    commands: D,
    queries: Q,
    deadlines: T,
    updates: E,
    config: SagaConfig,
}

impl<D, Q, T, E> SagaOrchestrator<D, Q, T, E>
where
    D: CommandDispatcher,
    Q: QueryClient,
    T: DeadlineTimer,
    E: StatusEmitter,
{
    /// Creates a new orchestrator over the given collaborators.
    pub fn new(commands: D, queries: Q, deadlines: T, updates: E, config: SagaConfig) -> Self {
        Self {
            store: SagaStore::new(),
            commands,
            queries,
            deadlines,
            updates,
            config,
        }
    }

    /// Returns the instance store, for inspection.
    pub fn store(&self) -> &SagaStore {
        &self.store
    }

    /// Handles one correlated domain event.
    ///
    /// Events for the same order must be delivered in emission order; this
    /// method serializes them per order via the store's per-key lock.
    #[tracing::instrument(
        skip(self, event),
        fields(event_type = event.event_type(), order_id = %event.order_id())
    )]
    pub async fn handle(&self, event: OrderEvent) {
        match event {
            OrderEvent::OrderCreated(data) => self.on_order_created(data).await,
            OrderEvent::ProductReserved(data) => self.on_product_reserved(data).await,
            OrderEvent::ProductReservationCancelled(data) => {
                self.on_reservation_cancelled(data).await
            }
            OrderEvent::PaymentProcessed(data) => self.on_payment_processed(data).await,
            OrderEvent::OrderApproved(data) => self.on_order_approved(data).await,
            OrderEvent::OrderRejected(data) => self.on_order_rejected(data).await,
        }
    }

    /// Handles a fired payment deadline.
    ///
    /// The fire competes with a genuine payment result for the same order;
    /// whichever acquires the per-key lock first wins, and the phase check
    /// makes the loser a no-op.
    #[tracing::instrument(skip(self, deadline), fields(order_id = %deadline.payload.order_id))]
    pub async fn handle_deadline(&self, deadline: Deadline) {
        let order_id = deadline.payload.order_id;
        let Ok(instance) = self.store.get(order_id) else {
            tracing::debug!(%order_id, "deadline for finished saga discarded");
            return;
        };
        let mut instance = instance.lock().await;

        if !instance.phase().is_awaiting_payment() {
            tracing::debug!(%order_id, phase = %instance.phase(), "late deadline discarded");
            return;
        }
        if instance.payment_deadline() != Some(deadline.schedule_id) {
            tracing::debug!(%order_id, "deadline with stale schedule handle discarded");
            return;
        }

        metrics::counter!("saga_payment_deadlines_expired_total").increment(1);
        tracing::warn!(%order_id, "payment deadline expired, compensating");
        self.cancel_reservation(&mut instance, &deadline.payload, "Payment timeout")
            .await;
    }

    async fn on_order_created(&self, data: OrderCreatedData) {
        let Ok(instance) = self.store.start(data.order_id) else {
            metrics::counter!("saga_duplicate_starts_total").increment(1);
            tracing::warn!(order_id = %data.order_id, "duplicate OrderCreated ignored");
            return;
        };
        let mut instance = instance.lock().await;

        metrics::counter!("saga_started_total").increment(1);
        tracing::info!(
            order_id = %data.order_id,
            product_id = %data.product_id,
            quantity = data.quantity,
            "order created, reserving product"
        );

        let command = ReserveProduct::new(
            data.order_id,
            data.product_id.clone(),
            data.quantity,
            data.user_id,
        );
        if let Err(e) = self.commands.send(command.into()).await {
            tracing::warn!(order_id = %data.order_id, error = %e, "product reservation rejected");
            instance.complete();
            self.reject_order(data.order_id, e.to_string()).await;
        }
    }

    async fn on_product_reserved(&self, data: ProductReservedData) {
        let Ok(instance) = self.store.get(data.order_id) else {
            tracing::warn!(order_id = %data.order_id, "ProductReserved for unknown saga ignored");
            return;
        };
        let mut instance = instance.lock().await;

        if instance.phase() != crate::phase::SagaPhase::Started {
            metrics::counter!("saga_stale_events_total").increment(1);
            tracing::warn!(
                order_id = %data.order_id,
                phase = %instance.phase(),
                "duplicate ProductReserved ignored"
            );
            return;
        }

        tracing::info!(
            order_id = %data.order_id,
            product_id = %data.product_id,
            "product reserved, fetching user payment details"
        );

        let query = FetchUserPaymentDetails::new(data.user_id);
        let user = match self
            .queries
            .fetch_user_payment_details(query, self.config.query_timeout)
            .await
        {
            Ok(Some(user)) => user,
            Ok(None) => {
                self.cancel_reservation(
                    &mut instance,
                    &data,
                    "Could not fetch user payment details",
                )
                .await;
                return;
            }
            Err(e) => {
                tracing::error!(order_id = %data.order_id, error = %e, "payment details query failed");
                self.cancel_reservation(&mut instance, &data, e.to_string())
                    .await;
                return;
            }
        };

        tracing::info!(
            order_id = %data.order_id,
            first_name = %user.first_name,
            "fetched user payment details"
        );

        // Arm the deadline before issuing the payment so a lost response
        // cannot strand the saga in AwaitingPayment.
        let schedule_id = self.deadlines.schedule(
            self.config.payment_deadline,
            PAYMENT_PROCESSING_DEADLINE,
            data.clone(),
        );
        instance.await_payment(schedule_id);

        let command = ProcessPayment::new(data.order_id, user.payment_details);
        match self
            .commands
            .send_and_wait(command.into(), self.config.payment_wait)
            .await
        {
            Ok(Some(_)) => {
                // The PaymentProcessed event completes this leg.
            }
            Ok(None) => {
                tracing::warn!(order_id = %data.order_id, "payment produced no result");
                self.cancel_reservation(
                    &mut instance,
                    &data,
                    "Could not process user payment with provided payment details",
                )
                .await;
            }
            Err(e) => {
                tracing::warn!(order_id = %data.order_id, error = %e, "payment failed");
                self.cancel_reservation(&mut instance, &data, e.to_string())
                    .await;
            }
        }
    }

    async fn on_payment_processed(&self, data: PaymentProcessedData) {
        let Ok(instance) = self.store.get(data.order_id) else {
            tracing::warn!(order_id = %data.order_id, "PaymentProcessed for unknown saga ignored");
            return;
        };
        let mut instance = instance.lock().await;

        if !instance.phase().is_awaiting_payment() {
            metrics::counter!("saga_stale_events_total").increment(1);
            tracing::info!(
                order_id = %data.order_id,
                phase = %instance.phase(),
                "PaymentProcessed after saga already resolved, ignored"
            );
            return;
        }

        if let Some(schedule_id) = instance.complete() {
            self.deadlines.cancel(PAYMENT_PROCESSING_DEADLINE, schedule_id);
        }

        tracing::info!(
            order_id = %data.order_id,
            payment_id = %data.payment_id,
            "payment processed, approving order"
        );
        if let Err(e) = self
            .commands
            .send(ApproveOrder::new(data.order_id).into())
            .await
        {
            tracing::error!(order_id = %data.order_id, error = %e, "failed to dispatch ApproveOrder");
        }
    }

    async fn on_reservation_cancelled(&self, data: ProductReservationCancelledData) {
        let Ok(instance) = self.store.get(data.order_id) else {
            tracing::warn!(
                order_id = %data.order_id,
                "ProductReservationCancelled for unknown saga ignored"
            );
            return;
        };
        let mut instance = instance.lock().await;

        if let Some(schedule_id) = instance.complete() {
            self.deadlines.cancel(PAYMENT_PROCESSING_DEADLINE, schedule_id);
        }

        tracing::info!(
            order_id = %data.order_id,
            reason = %data.reason,
            "reservation cancelled, rejecting order"
        );
        self.reject_order(data.order_id, data.reason.clone()).await;
    }

    async fn on_order_approved(&self, data: OrderApprovedData) {
        if self.store.remove(data.order_id).is_none() {
            metrics::counter!("saga_stale_terminal_events_total").increment(1);
            tracing::warn!(order_id = %data.order_id, "duplicate OrderApproved ignored");
            return;
        }

        metrics::counter!("saga_approved_total").increment(1);
        tracing::info!(order_id = %data.order_id, "order approved, saga completed");
        self.updates
            .emit_order_status(OrderSummary::approved(data.order_id));
    }

    async fn on_order_rejected(&self, data: OrderRejectedData) {
        if self.store.remove(data.order_id).is_none() {
            metrics::counter!("saga_stale_terminal_events_total").increment(1);
            tracing::warn!(order_id = %data.order_id, "duplicate OrderRejected ignored");
            return;
        }

        metrics::counter!("saga_rejected_total").increment(1);
        tracing::info!(
            order_id = %data.order_id,
            reason = %data.reason,
            "order rejected, saga completed"
        );
        self.updates
            .emit_order_status(OrderSummary::rejected(data.order_id, data.reason));
    }

    /// Starts the compensating transaction for a reservation.
    ///
    /// Cancels the payment deadline (a no-op if it already fired or was
    /// never armed) inside the same locked transition that leaves
    /// `AwaitingPayment`, then dispatches the compensation command.
    async fn cancel_reservation(
        &self,
        instance: &mut SagaInstance,
        reservation: &ProductReservedData,
        reason: impl Into<String>,
    ) {
        let reason = reason.into();
        if let Some(schedule_id) = instance.complete() {
            self.deadlines.cancel(PAYMENT_PROCESSING_DEADLINE, schedule_id);
        }

        metrics::counter!("saga_compensations_total").increment(1);
        tracing::warn!(
            order_id = %reservation.order_id,
            %reason,
            "compensating: cancelling product reservation"
        );

        let command = CancelProductReservation::from_reservation(reservation, reason);
        if let Err(e) = self.commands.send(command.into()).await {
            tracing::error!(
                order_id = %reservation.order_id,
                error = %e,
                "failed to dispatch CancelProductReservation"
            );
        }
    }

    async fn reject_order(&self, order_id: OrderId, reason: String) {
        if let Err(e) = self
            .commands
            .send(RejectOrder::new(order_id, reason).into())
            .await
        {
            tracing::error!(%order_id, error = %e, "failed to dispatch RejectOrder");
        }
    }
}

/// Forwards fired deadlines from the timer channel into the orchestrator.
///
/// Runs until the timer side of the channel is dropped.
pub async fn run_deadline_pump<D, Q, T, E>(
    orchestrator: Arc<SagaOrchestrator<D, Q, T, E>>,
    mut deadlines: mpsc::UnboundedReceiver<Deadline>,
) where
    D: CommandDispatcher,
    Q: QueryClient,
    T: DeadlineTimer,
    E: StatusEmitter,
{
    while let Some(deadline) = deadlines.recv().await {
        orchestrator.handle_deadline(deadline).await;
    }
}
