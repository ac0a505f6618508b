//! Saga timing configuration loaded from environment variables.

use std::time::Duration;

/// Timing budgets for the saga, with production defaults.
///
/// Reads from environment variables:
/// - `SAGA_PAYMENT_DEADLINE_SECS` — payment deadline (default: `60`)
/// - `SAGA_PAYMENT_WAIT_SECS` — synchronous payment wait (default: `10`)
/// - `SAGA_QUERY_TIMEOUT_SECS` — point-query bound (default: `10`)
#[derive(Debug, Clone)]
pub struct SagaConfig {
    /// How long the saga waits in `AwaitingPayment` before compensating.
    pub payment_deadline: Duration,
    /// Bounded wait for the synchronous ProcessPayment result.
    pub payment_wait: Duration,
    /// Bound on the payment-details point query.
    pub query_timeout: Duration,
}

impl SagaConfig {
    /// Loads configuration from environment variables, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        Self {
            payment_deadline: env_secs("SAGA_PAYMENT_DEADLINE_SECS", 60),
            payment_wait: env_secs("SAGA_PAYMENT_WAIT_SECS", 10),
            query_timeout: env_secs("SAGA_QUERY_TIMEOUT_SECS", 10),
        }
    }
}

impl Default for SagaConfig {
    fn default() -> Self {
        Self {
            payment_deadline: Duration::from_secs(60),
            payment_wait: Duration::from_secs(10),
            query_timeout: Duration::from_secs(10),
        }
    }
}

fn env_secs(var: &str, default: u64) -> Duration {
    let secs = std::env::var(var)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default);
    Duration::from_secs(secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = SagaConfig::default();
        assert_eq!(config.payment_deadline, Duration::from_secs(60));
        assert_eq!(config.payment_wait, Duration::from_secs(10));
        assert_eq!(config.query_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_from_env_falls_back_to_defaults() {
        // Unset variables fall back; invalid values fall back too.
        let config = SagaConfig::from_env();
        assert!(config.payment_deadline >= Duration::from_secs(1));
        assert!(config.payment_wait >= Duration::from_secs(1));
    }
}
