//! Booking reader port (read side / aggregate queries).
//!
//! These queries back best-effort listing and batch features: implementations
//! must degrade to an empty list or zero on query failure (logging the cause)
//! rather than propagate, so a broken report never takes down a scheduler run.
//!
//! # Example
//!
//! ```ignore
//! async fn renewal_pass(reader: &dyn BookingReader) {
//!     for expired in reader.find_expired().await {
//!         // each row carries the joined subscription + subscriber contact
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::booking::Booking;
use crate::domain::foundation::{SubscriptionId, UserId};
use crate::domain::subscription::Frequency;

/// Contact details of a subscriber, resolved through the join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriberContact {
    /// Subscriber identifier.
    pub user_id: UserId,

    /// Email address reminders and renewal notices go to.
    pub email: String,

    /// Display name used in email greetings.
    pub name: String,
}

/// An expired booking joined with its owning subscription and subscriber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpiredBooking {
    /// The expired occurrence.
    pub booking: Booking,

    /// Owning subscription.
    pub subscription_id: SubscriptionId,

    /// Recurrence interval of the owning subscription.
    pub frequency: Frequency,

    /// Subscriber to notify about the renewal.
    pub subscriber: SubscriberContact,
}

/// Reader port for booking aggregate queries.
///
/// All methods are best-effort: on storage failure they log and return
/// empty/zero instead of erroring.
#[async_trait]
pub trait BookingReader: Send + Sync {
    /// Every active booking whose owning subscription is active, recurring
    /// (frequency != one-time), and whose cleaning date is at least one full
    /// frequency period in the past (inclusive at the threshold).
    ///
    /// Inner-join semantics: bookings without a resolvable active
    /// subscription or subscriber are excluded. Ordered newest-created
    /// first; the order carries no semantic weight, each row is processed
    /// independently.
    async fn find_expired(&self) -> Vec<ExpiredBooking>;

    /// Sum of `total_amount` across bookings with status Completed and
    /// payment Completed. Returns 0 when nothing matches.
    async fn total_earnings(&self) -> i64;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn booking_reader_is_object_safe() {
        fn _accepts_dyn(_reader: &dyn BookingReader) {}
    }
}
