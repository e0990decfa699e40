//! RenewalScheduler - background service driving the renewal pass.
//!
//! Ticks on a fixed interval and runs one renewal pass per tick. A pass that
//! is still running when the next tick fires makes that tick a no-op, so
//! passes never overlap. Pass failures are logged inside the handler and
//! never stop the loop.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `tick_interval` | 60s | How often to look for expired bookings |
//!
//! ## Graceful Shutdown
//!
//! The service listens for a shutdown signal and runs one final pass before
//! stopping, so bookings that expired moments ago are not left behind.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use crate::application::handlers::renewal::RenewExpiredBookingsHandler;

/// Configuration for the RenewalScheduler service.
#[derive(Debug, Clone)]
pub struct RenewalSchedulerConfig {
    /// How often to run the renewal pass.
    pub tick_interval: Duration,
}

impl Default for RenewalSchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(60),
        }
    }
}

impl RenewalSchedulerConfig {
    /// Create config with a custom tick interval.
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }
}

/// Background service that renews expired bookings.
pub struct RenewalScheduler {
    handler: Arc<RenewExpiredBookingsHandler>,
    config: RenewalSchedulerConfig,
    running: AtomicBool,
}

impl RenewalScheduler {
    /// Create a scheduler with default configuration.
    pub fn new(handler: Arc<RenewExpiredBookingsHandler>) -> Self {
        Self::with_config(handler, RenewalSchedulerConfig::default())
    }

    /// Create a scheduler with custom configuration.
    pub fn with_config(
        handler: Arc<RenewExpiredBookingsHandler>,
        config: RenewalSchedulerConfig,
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
            "renewal scheduler started"
        );

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        // Shutdown requested: one final pass, then exit
                        self.tick().await;
                        tracing::info!("renewal scheduler stopped");
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
            tracing::debug!("renewal pass still running, tick skipped");
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

    async fn seed_expired(store: &Arc<InMemoryStore>) {
        store.register_subscriber(SubscriberContact {
            user_id: UserId::new("user-1").unwrap(),
            email: "user-1@example.com".to_string(),
            name: "User One".to_string(),
        });
        let booking = Booking::create(
            BookingId::new(),
            Timestamp::now().minus_days(8),
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
                start_date: booking.cleaning_date,
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
    }

    fn scheduler(store: &Arc<InMemoryStore>, config: RenewalSchedulerConfig) -> RenewalScheduler {
        let handler = Arc::new(RenewExpiredBookingsHandler::new(
            store.clone(),
            store.clone(),
            store.clone(),
            Arc::new(LoggingEmailSender::new()),
        ));
        RenewalScheduler::with_config(handler, config)
    }

    #[tokio::test]
    async fn run_renews_and_stops_on_shutdown_signal() {
        let store = Arc::new(InMemoryStore::new());
        seed_expired(&store).await;

        let config = RenewalSchedulerConfig::default()
            .with_tick_interval(Duration::from_millis(10));
        let scheduler = Arc::new(scheduler(&store, config));

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let runner = scheduler.clone();
        let handle = tokio::spawn(async move { runner.run(shutdown_rx).await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        shutdown_tx.send(true).unwrap();
        handle.await.unwrap();

        // The seeded booking got rolled forward and is no longer expired
        assert!(crate::ports::BookingReader::find_expired(&*store)
            .await
            .is_empty());
        assert_eq!(BookingRepository::count(&*store).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn config_defaults_to_one_minute() {
        let config = RenewalSchedulerConfig::default();
        assert_eq!(config.tick_interval, Duration::from_secs(60));
    }
}
