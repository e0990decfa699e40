//! Subscription-specific error types.

use crate::domain::foundation::{DomainError, ErrorCode, SubscriptionId};

/// Subscription-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionError {
    /// Subscription was not found.
    NotFound(SubscriptionId),

    /// Subscription is inactive (soft-deleted).
    Inactive(SubscriptionId),

    /// Subscription cannot be renewed (one-time frequency).
    NotRenewable(SubscriptionId),

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl SubscriptionError {
    pub fn not_found(id: SubscriptionId) -> Self {
        SubscriptionError::NotFound(id)
    }

    pub fn inactive(id: SubscriptionId) -> Self {
        SubscriptionError::Inactive(id)
    }

    pub fn not_renewable(id: SubscriptionId) -> Self {
        SubscriptionError::NotRenewable(id)
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        SubscriptionError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        SubscriptionError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            SubscriptionError::NotFound(_) => ErrorCode::SubscriptionNotFound,
            SubscriptionError::Inactive(_) => ErrorCode::SubscriptionInactive,
            SubscriptionError::NotRenewable(_) => ErrorCode::NotRenewable,
            SubscriptionError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            SubscriptionError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            SubscriptionError::NotFound(id) => format!("Subscription not found: {}", id),
            SubscriptionError::Inactive(id) => {
                format!("Subscription {} is no longer active", id)
            }
            SubscriptionError::NotRenewable(id) => {
                format!("Subscription {} is one-time and cannot be renewed", id)
            }
            SubscriptionError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            SubscriptionError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for SubscriptionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for SubscriptionError {}

impl From<DomainError> for SubscriptionError {
    fn from(err: DomainError) -> Self {
        SubscriptionError::Infrastructure(err.to_string())
    }
}

impl From<SubscriptionError> for DomainError {
    fn from(err: SubscriptionError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_carries_id_and_code() {
        let id = SubscriptionId::new();
        let err = SubscriptionError::not_found(id);
        assert_eq!(err.code(), ErrorCode::SubscriptionNotFound);
        assert!(err.message().contains(&id.to_string()));
    }

    #[test]
    fn not_renewable_mentions_one_time() {
        let err = SubscriptionError::not_renewable(SubscriptionId::new());
        assert_eq!(err.code(), ErrorCode::NotRenewable);
        assert!(err.message().contains("one-time"));
    }

    #[test]
    fn converts_to_domain_error() {
        let err = SubscriptionError::inactive(SubscriptionId::new());
        let domain_err: DomainError = err.clone().into();
        assert_eq!(domain_err.code, err.code());
    }
}
