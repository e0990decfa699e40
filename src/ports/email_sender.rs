//! Outbound email port.
//!
//! Notifications are fire-and-observe: callers log send failures and move on,
//! they never roll back domain state because an email bounced.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, Timestamp};
use crate::domain::subscription::Frequency;

/// Payload for a booking lifecycle notification.
///
/// Shared by renewal notices and upcoming-visit reminders; only the template
/// differs between the two sends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingNotice {
    /// Recipient address.
    pub to: String,

    /// Recipient display name for the greeting.
    pub name: String,

    /// Cleaning date the notice refers to.
    pub cleaning_date: Timestamp,

    /// Duration of the visit in hours.
    pub duration_hours: u32,

    /// Recurrence of the subscription.
    pub frequency: Frequency,
}

/// Port for sending transactional email.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Notify the subscriber that their booking was renewed onto a new date.
    ///
    /// # Errors
    ///
    /// - `EmailSendFailed` when the provider rejects or the transport fails
    async fn send_booking_renewed(&self, notice: &BookingNotice) -> Result<(), DomainError>;

    /// Remind the subscriber of a cleaning coming up in a few days.
    ///
    /// # Errors
    ///
    /// - `EmailSendFailed` when the provider rejects or the transport fails
    async fn send_upcoming_reminder(&self, notice: &BookingNotice) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn email_sender_is_object_safe() {
        fn _accepts_dyn(_sender: &dyn EmailSender) {}
    }
}
