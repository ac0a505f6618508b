//! Saga instance store with per-key locking.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use common::OrderId;
use tokio::sync::Mutex;

use crate::error::SagaError;
use crate::instance::SagaInstance;

/// Holds one mutable [`SagaInstance`] per order correlation key.
///
/// Each instance sits behind its own async mutex, giving single-writer
/// semantics per key: a handler holds the instance lock for the whole
/// transition, including any awaits, while instances for other orders
/// proceed independently. The outer map lock is only taken for short
/// lookups and never held across an await.
#[derive(Debug, Default)]
pub struct SagaStore {
    instances: RwLock<HashMap<OrderId, Arc<Mutex<SagaInstance>>>>,
}

impl SagaStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the instance for an order.
    ///
    /// Fails with [`SagaError::DuplicateInstance`] if the order already has
    /// one; a second start must not create a second instance.
    pub fn start(&self, order_id: OrderId) -> Result<Arc<Mutex<SagaInstance>>, SagaError> {
        let mut instances = self.instances.write().unwrap();
        if instances.contains_key(&order_id) {
            return Err(SagaError::DuplicateInstance(order_id));
        }

        let instance = Arc::new(Mutex::new(SagaInstance::new(order_id)));
        instances.insert(order_id, Arc::clone(&instance));
        Ok(instance)
    }

    /// Looks up the instance for an order.
    pub fn get(&self, order_id: OrderId) -> Result<Arc<Mutex<SagaInstance>>, SagaError> {
        self.instances
            .read()
            .unwrap()
            .get(&order_id)
            .cloned()
            .ok_or(SagaError::InstanceNotFound(order_id))
    }

    /// Applies a transition to an instance under its per-key lock.
    pub async fn mutate<F, R>(&self, order_id: OrderId, f: F) -> Result<R, SagaError>
    where
        F: FnOnce(&mut SagaInstance) -> R,
    {
        let instance = self.get(order_id)?;
        let mut guard = instance.lock().await;
        Ok(f(&mut guard))
    }

    /// Removes the instance for an order, returning it if present.
    pub fn remove(&self, order_id: OrderId) -> Option<Arc<Mutex<SagaInstance>>> {
        self.instances.write().unwrap().remove(&order_id)
    }

    /// Returns true if an instance exists for the order.
    pub fn contains(&self, order_id: OrderId) -> bool {
        self.instances.read().unwrap().contains_key(&order_id)
    }

    /// Returns the number of live instances.
    pub fn len(&self) -> usize {
        self.instances.read().unwrap().len()
    }

    /// Returns true if no instances are live.
    pub fn is_empty(&self) -> bool {
        self.instances.read().unwrap().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phase::SagaPhase;
    use gateway::ScheduleId;

    #[tokio::test]
    async fn test_start_get_remove_lifecycle() {
        let store = SagaStore::new();
        let order_id = OrderId::new();

        assert!(store.is_empty());
        store.start(order_id).unwrap();
        assert!(store.contains(order_id));
        assert_eq!(store.len(), 1);

        let instance = store.get(order_id).unwrap();
        assert_eq!(instance.lock().await.order_id(), order_id);

        assert!(store.remove(order_id).is_some());
        assert!(!store.contains(order_id));
        assert!(store.remove(order_id).is_none());
    }

    #[test]
    fn test_duplicate_start_is_rejected() {
        let store = SagaStore::new();
        let order_id = OrderId::new();

        store.start(order_id).unwrap();
        let result = store.start(order_id);

        assert!(matches!(result, Err(SagaError::DuplicateInstance(id)) if id == order_id));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_unknown_order_is_not_found() {
        let store = SagaStore::new();
        let order_id = OrderId::new();

        let result = store.get(order_id);
        assert!(matches!(result, Err(SagaError::InstanceNotFound(id)) if id == order_id));
    }

    #[tokio::test]
    async fn test_mutate_applies_under_lock() {
        let store = SagaStore::new();
        let order_id = OrderId::new();
        store.start(order_id).unwrap();

        let schedule_id = ScheduleId::new();
        store
            .mutate(order_id, |instance| instance.await_payment(schedule_id))
            .await
            .unwrap();

        let phase = store.mutate(order_id, |instance| instance.phase()).await.unwrap();
        assert_eq!(phase, SagaPhase::AwaitingPayment);
    }

    #[tokio::test]
    async fn test_independent_keys_do_not_block_each_other() {
        let store = Arc::new(SagaStore::new());
        let order_a = OrderId::new();
        let order_b = OrderId::new();
        store.start(order_a).unwrap();
        store.start(order_b).unwrap();

        // Hold the lock for order A across an await; order B must still
        // make progress.
        let instance_a = store.get(order_a).unwrap();
        let _guard_a = instance_a.lock().await;

        let store_b = Arc::clone(&store);
        let phase_b = tokio::time::timeout(std::time::Duration::from_secs(1), async move {
            store_b
                .mutate(order_b, |instance| instance.phase())
                .await
                .unwrap()
        })
        .await
        .expect("order B blocked behind order A's lock");

        assert_eq!(phase_b, SagaPhase::Started);
    }

    #[tokio::test]
    async fn test_mutate_unknown_order_fails() {
        let store = SagaStore::new();
        let result = store.mutate(OrderId::new(), |_| ()).await;
        assert!(matches!(result, Err(SagaError::InstanceNotFound(_))));
    }
}
