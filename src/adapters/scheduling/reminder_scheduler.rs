//! ReminderScheduler - background service driving the reminder pass.
//!
//! Same loop shape as the renewal scheduler, on a much slower clock: the
//! reminder window is a whole day wide, so a handful of passes per day is
//! plenty. Overlapping ticks are no-ops.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use crate::application::handlers::reminder::SendUpcomingRemindersHandler;

/// Configuration for the ReminderScheduler service.
#[derive(Debug, Clone)]
pub struct ReminderSchedulerConfig {
    /// How often to run the reminder pass.
    pub tick_interval: Duration,
}

impl Default for ReminderSchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(6 * 60 * 60),
        }
    }
}

impl ReminderSchedulerConfig {
    /// Create config with a custom tick interval.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }
}

/// Background service that mails upcoming-visit reminders.
pub struct ReminderScheduler {
    handler: Arc<SendUpcomingRemindersHandler>,
    config: ReminderSchedulerConfig,
    running: AtomicBool,
}

impl ReminderScheduler {
    /// Create a scheduler with default configuration.
    pub fn new(handler: Arc<SendUpcomingRemindersHandler>) -> Self {
        Self::with_config(handler, ReminderSchedulerConfig::default())
    }

    /// Create a scheduler with custom configuration.
    pub fn with_config(
        handler: Arc<SendUpcomingRemindersHandler>,
        config: ReminderSchedulerConfig,
    ) -> Self {
        Self {
            handler,
            config,
            running: AtomicBool::new(false),
        }
    }

    /// Run the scheduler loop until the shutdown signal is received.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = time::interval(self.config.tick_interval);
        tracing::info!(
            interval_secs = self.config.tick_interval.as_secs(),
            "reminder scheduler started"
        );

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        tracing::info!("reminder scheduler stopped");
                        return;
                    }
                }

                _ = interval.tick() => {
                    self.tick().await;
                }
            }
        }
    }

    /// Run one pass unless the previous one is still in flight.
    pub async fn tick(&self) {
        if self
            .running
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            tracing::debug!("reminder pass still running, tick skipped");
            return;
        }
        self.handler.handle().await;
        self.running.store(false, Ordering::Release);
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

    #[tokio::test]
    async fn run_sends_due_reminders_and_stops_on_shutdown() {
        let store = Arc::new(InMemoryStore::new());
        let email = Arc::new(LoggingEmailSender::new());

        store.register_subscriber(SubscriberContact {
            user_id: UserId::new("user-1").unwrap(),
            email: "user-1@example.com".to_string(),
            name: "User One".to_string(),
        });
        let due_date = Timestamp::start_of_today().add_days(4);
        let booking = Booking::create(
            BookingId::new(),
            due_date,
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
                subscriber: UserId::new("user-1").unwrap(),
                area_sqm: 60,
                address: "4 Birch Road".to_string(),
                postal_code: "11421".to_string(),
                session_hours: 2,
                price_tier: PriceTierId::new(),
                start_date: due_date,
                has_cat: false,
                has_dog: false,
                other_pets: None,
                coupon_discount: 0.0,
                frequency: Frequency::Weekly,
                created_by: None,
            },
        );
        subscription.attach_booking(booking.id).unwrap();
        BookingRepository::save(&*store, &booking).await.unwrap();
        SubscriptionRepository::save(&*store, &subscription)
            .await
            .unwrap();

        let handler = Arc::new(SendUpcomingRemindersHandler::new(
            store.clone(),
            email.clone(),
        ));
        let config = ReminderSchedulerConfig::default()
            .with_tick_interval(Duration::from_millis(10));
        let scheduler = Arc::new(ReminderScheduler::with_config(handler, config));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let runner = scheduler.clone();
        let handle = tokio::spawn(async move { runner.run(shutdown_rx).await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();

        assert!(!email.sent().is_empty());
        assert_eq!(email.sent()[0].1.to, "user-1@example.com");
    }

    #[tokio::test]
    async fn config_defaults_to_six_hours() {
        let config = ReminderSchedulerConfig::default();
        assert_eq!(config.tick_interval, Duration::from_secs(21_600));
    }
}
