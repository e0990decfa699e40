//! RenewExpiredBookingsHandler - rolls expired bookings onto their next
//! occurrence.
//!
//! For every expired booking the pass runs a fixed sequence: create the next
//! occurrence, repoint the subscription, deactivate the old booking, then
//! notify the subscriber. Per-item failures are isolated; one bad row never
//! aborts the batch. There is no cross-step transaction: a crash mid-sequence
//! can leave a created booking with a stale subscription pointer, which the
//! next pass tolerates because the old booking is no longer current.

use std::sync::Arc;

use crate::domain::booking::Booking;
use crate::domain::foundation::{BookingId, DomainError};
use crate::ports::{
    BookingNotice, BookingReader, BookingRepository, EmailSender, ExpiredBooking,
    SubscriptionRepository,
};

/// Outcome counts of one renewal pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenewalSummary {
    /// Bookings rolled onto a new occurrence.
    pub renewed: u32,

    /// Rows skipped: one-time frequency, or the subscription vanished or
    /// went inactive between query and processing.
    pub skipped: u32,

    /// Rows where a mutation step failed; logged and left for the next pass.
    pub failed: u32,
}

/// Handler for the renewal pass.
pub struct RenewExpiredBookingsHandler {
    reader: Arc<dyn BookingReader>,
    bookings: Arc<dyn BookingRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    email: Arc<dyn EmailSender>,
}

impl RenewExpiredBookingsHandler {
    pub fn new(
        reader: Arc<dyn BookingReader>,
        bookings: Arc<dyn BookingRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        email: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            reader,
            bookings,
            subscriptions,
            email,
        }
    }

    /// Runs one full renewal pass.
    ///
    /// Immediately re-running after a successful pass performs no work: every
    /// renewed booking's replacement is dated in the future, so nothing
    /// matches the expiry query again.
    pub async fn handle(&self) -> RenewalSummary {
        let expired = self.reader.find_expired().await;
        let mut summary = RenewalSummary::default();

        for item in expired {
            match self.renew_one(&item).await {
                Ok(Some(_)) => summary.renewed += 1,
                Ok(None) => summary.skipped += 1,
                Err(e) => {
                    summary.failed += 1;
                    tracing::warn!(
                        booking_id = %item.booking.id,
                        subscription_id = %item.subscription_id,
                        error = %e,
                        "renewal failed for booking, will retry next pass"
                    );
                }
            }
        }

        tracing::info!(
            renewed = summary.renewed,
            skipped = summary.skipped,
            failed = summary.failed,
            "renewal pass finished"
        );
        summary
    }

    /// Renews a single expired booking. Returns `Ok(None)` for skips.
    async fn renew_one(&self, item: &ExpiredBooking) -> Result<Option<Booking>, DomainError> {
        // Re-check renewability: the reader query already excludes one-time
        // and inactive rows, but the world may have moved since.
        if !item.frequency.is_recurring() {
            return Ok(None);
        }
        let mut subscription = match self.subscriptions.find_by_id(&item.subscription_id).await? {
            Some(s) => s,
            None => return Ok(None),
        };
        if !subscription.is_renewable() {
            return Ok(None);
        }

        // 1. Clone the expiring booking onto the next date
        let next_date = item.frequency.advance(item.booking.cleaning_date);
        let next = Booking::renew_from(&item.booking, BookingId::new(), next_date);
        self.bookings.save(&next).await?;

        // 2. Repoint the subscription and advance its schedule
        subscription.attach_booking(next.id)?;
        subscription.set_next_schedule_date(next_date);
        self.subscriptions.update(&subscription).await?;

        // 3. Retire the old occurrence
        self.bookings.deactivate(&item.booking.id).await?;

        // 4. Notify; a bounced email never undoes the renewal
        let notice = BookingNotice {
            to: item.subscriber.email.clone(),
            name: item.subscriber.name.clone(),
            cleaning_date: next_date,
            duration_hours: next.duration_hours,
            frequency: item.frequency,
        };
        if let Err(e) = self.email.send_booking_renewed(&notice).await {
            tracing::warn!(
                booking_id = %next.id,
                to = %notice.to,
                error = %e,
                "renewal notice failed to send"
            );
        }

        tracing::info!(
            old_booking_id = %item.booking.id,
            new_booking_id = %next.id,
            subscription_id = %subscription.id,
            next_date = %next_date.as_datetime(),
            "booking renewed"
        );
        Ok(Some(next))
    }
}
