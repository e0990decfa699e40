//! CancelSubscriptionHandler - soft-cancels a subscription.

use std::sync::Arc;

use crate::domain::foundation::{SubscriptionId, UserId};
use crate::domain::subscription::{Subscription, SubscriptionError};
use crate::ports::{BookingRepository, SubscriptionRepository};

/// Command to cancel a subscription.
#[derive(Debug, Clone)]
pub struct CancelSubscriptionCommand {
    pub subscription_id: SubscriptionId,
    pub cancelled_by: Option<UserId>,
}

/// Result of a cancellation.
#[derive(Debug, Clone)]
pub struct CancelSubscriptionResult {
    pub subscription: Subscription,

    /// Whether the current booking was still open and got cancelled too.
    pub booking_cancelled: bool,
}

/// Handler for cancelling a subscription.
///
/// Cancellation is soft: the subscription is deactivated, never deleted. The
/// current booking is cancelled only if it is still mutable; a served or paid
/// visit keeps its history untouched.
pub struct CancelSubscriptionHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    bookings: Arc<dyn BookingRepository>,
}

impl CancelSubscriptionHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        bookings: Arc<dyn BookingRepository>,
    ) -> Self {
        Self {
            subscriptions,
            bookings,
        }
    }

    pub async fn handle(
        &self,
        cmd: CancelSubscriptionCommand,
    ) -> Result<CancelSubscriptionResult, SubscriptionError> {
        // 1. Load the subscription
        let mut subscription = self
            .subscriptions
            .find_by_id(&cmd.subscription_id)
            .await?
            .ok_or_else(|| SubscriptionError::not_found(cmd.subscription_id))?;

        // 2. Deactivate and persist (idempotent)
        subscription.deactivate(cmd.cancelled_by);
        self.subscriptions.update(&subscription).await?;

        // 3. Cancel the open current booking, if any
        let mut booking_cancelled = false;
        if let Some(booking_id) = subscription.current_booking {
            if let Some(mut booking) = self.bookings.find_by_id(&booking_id).await? {
                if booking.is_mutable() && booking.cancel().is_ok() {
                    self.bookings.update(&booking).await?;
                    booking_cancelled = true;
                }
            }
        }

        tracing::info!(
            subscription_id = %subscription.id,
            booking_cancelled,
            "subscription cancelled"
        );

        Ok(CancelSubscriptionResult {
            subscription,
            booking_cancelled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::booking::{Booking, BookingCharges, BookingStatus};
    use crate::domain::foundation::{BookingId, PriceTierId, Timestamp};
    use crate::domain::subscription::{Frequency, NewSubscription};

    fn handler(store: &Arc<InMemoryStore>) -> CancelSubscriptionHandler {
        CancelSubscriptionHandler::new(store.clone(), store.clone())
    }

    async fn seeded(store: &Arc<InMemoryStore>) -> (Subscription, Booking) {
        let booking = Booking::create(
            BookingId::new(),
            Timestamp::now().add_days(5),
            3,
            PriceTierId::new(),
            BookingCharges {
                cleaning_price: 120.0,
                supplies_charges: 15.0,
                discount_amount: 0.0,
                vat_amount: 33.75,
            },
            None,
        );
        let mut subscription = Subscription::create(
            SubscriptionId::new(),
            NewSubscription {
                subscriber: UserId::new("user-1").unwrap(),
                area_sqm: 85,
                address: "12 Elm Street".to_string(),
                postal_code: "10115".to_string(),
                session_hours: 3,
                price_tier: PriceTierId::new(),
                start_date: Timestamp::now(),
                has_cat: false,
                has_dog: false,
                other_pets: None,
                coupon_discount: 0.0,
                frequency: Frequency::Weekly,
                created_by: None,
            },
        );
        subscription.attach_booking(booking.id).unwrap();
        BookingRepository::save(&**store, &booking).await.unwrap();
        SubscriptionRepository::save(&**store, &subscription)
            .await
            .unwrap();
        (subscription, booking)
    }

    #[tokio::test]
    async fn cancels_subscription_and_open_booking() {
        let store = Arc::new(InMemoryStore::new());
        let (subscription, booking) = seeded(&store).await;

        let result = handler(&store)
            .handle(CancelSubscriptionCommand {
                subscription_id: subscription.id,
                cancelled_by: None,
            })
            .await
            .unwrap();

        assert!(!result.subscription.is_active);
        assert!(result.booking_cancelled);

        let stored = BookingRepository::find_by_id(&*store, &booking.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, BookingStatus::Cancelled);
    }

    #[tokio::test]
    async fn finished_booking_is_left_untouched() {
        let store = Arc::new(InMemoryStore::new());
        let (subscription, mut booking) = seeded(&store).await;
        booking.mark_served().unwrap();
        booking.complete().unwrap();
        BookingRepository::update(&*store, &booking).await.unwrap();

        let result = handler(&store)
            .handle(CancelSubscriptionCommand {
                subscription_id: subscription.id,
                cancelled_by: None,
            })
            .await
            .unwrap();

        assert!(!result.subscription.is_active);
        assert!(!result.booking_cancelled);

        let stored = BookingRepository::find_by_id(&*store, &booking.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, BookingStatus::Completed);
    }

    #[tokio::test]
    async fn missing_subscription_reports_not_found() {
        let store = Arc::new(InMemoryStore::new());
        let err = handler(&store)
            .handle(CancelSubscriptionCommand {
                subscription_id: SubscriptionId::new(),
                cancelled_by: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, SubscriptionError::NotFound(_)));
    }
}
