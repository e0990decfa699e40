//! Subscription repository port (write side).

use crate::domain::foundation::{BookingId, DomainError, SubscriptionId};
use crate::domain::subscription::Subscription;
use async_trait::async_trait;

/// Repository port for Subscription aggregate persistence.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Save a new subscription.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, subscription: &Subscription) -> Result<(), DomainError>;

    /// Update an existing subscription. Always stamps `updated_at`.
    ///
    /// # Errors
    ///
    /// - `SubscriptionNotFound` if the subscription doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError>;

    /// Find a subscription by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &SubscriptionId)
        -> Result<Option<Subscription>, DomainError>;

    /// Repoint the subscription's current-booking reference.
    ///
    /// Used by renewal to swap the old occurrence for the new one in a single
    /// focused write.
    ///
    /// # Errors
    ///
    /// - `SubscriptionNotFound` if the subscription doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn set_current_booking(
        &self,
        id: &SubscriptionId,
        booking_id: &BookingId,
    ) -> Result<(), DomainError>;

    /// Soft-deactivate a subscription (`is_active = false`).
    ///
    /// Does not touch the linked booking; cancellation of both is an
    /// application-level concern.
    ///
    /// # Errors
    ///
    /// - `SubscriptionNotFound` if the subscription doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn deactivate(&self, id: &SubscriptionId) -> Result<(), DomainError>;
}
