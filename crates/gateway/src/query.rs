//! Query client trait and in-memory implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use domain::{FetchUserPaymentDetails, User, UserId};

use crate::error::GatewayError;

/// Trait for issuing bounded point queries to other services.
#[async_trait]
pub trait QueryClient: Send + Sync {
    /// Fetches the payment details of a user.
    ///
    /// Resolves within `timeout`; `Ok(None)` means the query completed but
    /// no matching user record exists.
    async fn fetch_user_payment_details(
        &self,
        query: FetchUserPaymentDetails,
        timeout: Duration,
    ) -> Result<Option<User>, GatewayError>;
}

#[derive(Debug, Default)]
struct InMemoryQueryState {
    users: HashMap<UserId, User>,
    fail_on_fetch: bool,
}

/// In-memory query client for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryQueryClient {
    state: Arc<RwLock<InMemoryQueryState>>,
}

impl InMemoryQueryClient {
    /// Creates a new in-memory query client with no user records.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user record the client will serve.
    pub fn insert_user(&self, user_id: UserId, user: User) {
        self.state.write().unwrap().users.insert(user_id, user);
    }

    /// Configures the client to fail the next fetch call.
    pub fn set_fail_on_fetch(&self, fail: bool) {
        self.state.write().unwrap().fail_on_fetch = fail;
    }
}

#[async_trait]
impl QueryClient for InMemoryQueryClient {
    async fn fetch_user_payment_details(
        &self,
        query: FetchUserPaymentDetails,
        _timeout: Duration,
    ) -> Result<Option<User>, GatewayError> {
        let state = self.state.read().unwrap();

        if state.fail_on_fetch {
            return Err(GatewayError::QueryFailed(
                "users service unavailable".to_string(),
            ));
        }

        Ok(state.users.get(&query.user_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(10);

    #[tokio::test]
    async fn test_fetch_known_user() {
        let client = InMemoryQueryClient::new();
        let user_id = UserId::new();
        client.insert_user(user_id, User::new("Ann", "card-123"));

        let result = client
            .fetch_user_payment_details(FetchUserPaymentDetails::new(user_id), TIMEOUT)
            .await
            .unwrap();

        assert_eq!(result, Some(User::new("Ann", "card-123")));
    }

    #[tokio::test]
    async fn test_fetch_unknown_user_returns_none() {
        let client = InMemoryQueryClient::new();

        let result = client
            .fetch_user_payment_details(FetchUserPaymentDetails::new(UserId::new()), TIMEOUT)
            .await
            .unwrap();

        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_fail_on_fetch() {
        let client = InMemoryQueryClient::new();
        let user_id = UserId::new();
        client.insert_user(user_id, User::new("Ann", "card-123"));
        client.set_fail_on_fetch(true);

        let result = client
            .fetch_user_payment_details(FetchUserPaymentDetails::new(user_id), TIMEOUT)
            .await;

        assert!(matches!(result, Err(GatewayError::QueryFailed(_))));
    }
}
