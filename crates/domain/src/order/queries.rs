//! Point queries issued by the saga.

use serde::{Deserialize, Serialize};

use super::UserId;

/// Query for the payment details of a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchUserPaymentDetails {
    /// The user whose payment details are requested.
    pub user_id: UserId,
}

impl FetchUserPaymentDetails {
    /// Creates a new query for the given user.
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

/// Query result: the user record held by the users service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// The user's first name.
    pub first_name: String,
    /// Opaque payment details passed through to the payment service.
    pub payment_details: String,
}

impl User {
    /// Creates a user record.
    pub fn new(first_name: impl Into<String>, payment_details: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            payment_details: payment_details.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_carries_user_id() {
        let user_id = UserId::new();
        let query = FetchUserPaymentDetails::new(user_id);
        assert_eq!(query.user_id, user_id);
    }

    #[test]
    fn test_user_roundtrip() {
        let user = User::new("Ann", "card-123");
        let json = serde_json::to_string(&user).unwrap();
        let deserialized: User = serde_json::from_str(&json).unwrap();
        assert_eq!(user, deserialized);
    }
}
