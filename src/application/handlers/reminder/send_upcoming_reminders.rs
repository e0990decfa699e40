//! SendUpcomingRemindersHandler - mails subscribers whose next visit is close.

use std::sync::Arc;

use crate::ports::{BookingNotice, EmailSender, SubscriptionReader};

/// Outcome counts of one reminder pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReminderSummary {
    pub sent: u32,
    pub failed: u32,
}

/// Handler for the reminder pass.
///
/// Reads the subscriptions whose next visit falls in the reminder window and
/// sends one notice each. A bounced notice is counted and logged; it never
/// stops the rest of the batch.
pub struct SendUpcomingRemindersHandler {
    reader: Arc<dyn SubscriptionReader>,
    email: Arc<dyn EmailSender>,
}

impl SendUpcomingRemindersHandler {
    pub fn new(reader: Arc<dyn SubscriptionReader>, email: Arc<dyn EmailSender>) -> Self {
        Self { reader, email }
    }

    pub async fn handle(&self) -> ReminderSummary {
        let due = self.reader.due_for_reminder().await;
        let mut summary = ReminderSummary::default();

        for row in due {
            // Rows without a current booking carry no visit to remind about.
            let Some(booking) = &row.booking else {
                continue;
            };
            let notice = BookingNotice {
                to: row.subscriber.email.clone(),
                name: row.subscriber.name.clone(),
                cleaning_date: booking.cleaning_date,
                duration_hours: booking.duration_hours,
                frequency: row.subscription.frequency,
            };
            match self.email.send_upcoming_reminder(&notice).await {
                Ok(()) => summary.sent += 1,
                Err(e) => {
                    summary.failed += 1;
                    tracing::warn!(
                        subscription_id = %row.subscription.id,
                        to = %notice.to,
                        error = %e,
                        "reminder failed to send"
                    );
                }
            }
        }

        tracing::info!(
            sent = summary.sent,
            failed = summary.failed,
            "reminder pass finished"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::email::LoggingEmailSender;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::booking::{Booking, BookingCharges};
    use crate::domain::foundation::{
        BookingId, PriceTierId, SubscriptionId, Timestamp, UserId,
    };
    use crate::domain::subscription::{Frequency, NewSubscription, Subscription};
    use crate::ports::{BookingRepository, SubscriberContact, SubscriptionRepository};

    async fn seed(store: &Arc<InMemoryStore>, user: &str, cleaning_date: Timestamp) {
        store.register_subscriber(SubscriberContact {
            user_id: UserId::new(user).unwrap(),
            email: format!("{user}@example.com"),
            name: user.to_string(),
        });
        let booking = Booking::create(
            BookingId::new(),
            cleaning_date,
            2,
            PriceTierId::new(),
            BookingCharges {
                cleaning_price: 80.0,
                supplies_charges: 0.0,
                discount_amount: 0.0,
                vat_amount: 20.0,
            },
            None,
        );
        let mut subscription = Subscription::create(
            SubscriptionId::new(),
            NewSubscription {
                subscriber: UserId::new(user).unwrap(),
                area_sqm: 60,
                address: "4 Birch Road".to_string(),
                postal_code: "11421".to_string(),
                session_hours: 2,
                price_tier: PriceTierId::new(),
                start_date: cleaning_date,
                has_cat: false,
                has_dog: false,
                other_pets: None,
                coupon_discount: 0.0,
                frequency: Frequency::Weekly,
                created_by: None,
            },
        );
        subscription.attach_booking(booking.id).unwrap();
        subscription.set_next_schedule_date(cleaning_date);
        BookingRepository::save(&**store, &booking).await.unwrap();
        SubscriptionRepository::save(&**store, &subscription)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn reminds_only_subscriptions_inside_the_window() {
        let store = Arc::new(InMemoryStore::new());
        let email = Arc::new(LoggingEmailSender::new());
        let in_window = Timestamp::start_of_today().add_days(4);
        seed(&store, "due-user", in_window).await;
        seed(&store, "early-user", Timestamp::start_of_today().add_days(1)).await;
        seed(&store, "late-user", Timestamp::start_of_today().add_days(9)).await;

        let summary = SendUpcomingRemindersHandler::new(store.clone(), email.clone())
            .handle()
            .await;

        assert_eq!(summary, ReminderSummary { sent: 1, failed: 0 });
        let sent = email.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "upcoming_reminder");
        assert_eq!(sent[0].1.to, "due-user@example.com");
        assert_eq!(sent[0].1.cleaning_date, in_window);
    }

    #[tokio::test]
    async fn empty_window_sends_nothing() {
        let store = Arc::new(InMemoryStore::new());
        let email = Arc::new(LoggingEmailSender::new());

        let summary = SendUpcomingRemindersHandler::new(store, email.clone())
            .handle()
            .await;

        assert_eq!(summary, ReminderSummary::default());
        assert!(email.sent().is_empty());
    }
}
