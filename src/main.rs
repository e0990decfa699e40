//! Homeshine service entry point.
//!
//! Wires the Postgres adapters, the Resend email sender, and the two
//! background schedulers, then runs until Ctrl-C.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use homeshine::adapters::email::{ResendConfig, ResendEmailSender};
use homeshine::adapters::postgres::{
    PostgresBookingReader, PostgresBookingRepository, PostgresSubscriptionReader,
    PostgresSubscriptionRepository,
};
use homeshine::adapters::scheduling::{
    ReminderScheduler, ReminderSchedulerConfig, RenewalScheduler, RenewalSchedulerConfig,
};
use homeshine::application::handlers::reminder::SendUpcomingRemindersHandler;
use homeshine::application::handlers::renewal::RenewExpiredBookingsHandler;
use homeshine::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::load()?;
    config.validate()?;

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;
    tracing::info!("database pool established");

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("migrations applied");
    }

    let bookings = Arc::new(PostgresBookingRepository::new(pool.clone()));
    let subscriptions = Arc::new(PostgresSubscriptionRepository::new(pool.clone()));
    let booking_reader = Arc::new(PostgresBookingReader::new(pool.clone()));
    let subscription_reader = Arc::new(PostgresSubscriptionReader::new(pool.clone()));

    let email = Arc::new(ResendEmailSender::new(
        ResendConfig::new(config.email.resend_api_key.clone())
            .with_from(&config.email.from_name, &config.email.from_email),
    ));

    let renewal = Arc::new(RenewalScheduler::with_config(
        Arc::new(RenewExpiredBookingsHandler::new(
            booking_reader,
            bookings,
            subscriptions,
            email.clone(),
        )),
        RenewalSchedulerConfig::default()
            .with_tick_interval(config.scheduler.renewal_interval()),
    ));
    let reminder = Arc::new(ReminderScheduler::with_config(
        Arc::new(SendUpcomingRemindersHandler::new(subscription_reader, email)),
        ReminderSchedulerConfig::default()
            .with_tick_interval(config.scheduler.reminder_interval()),
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let renewal_task = {
        let rx = shutdown_rx.clone();
        tokio::spawn(async move { renewal.run(rx).await })
    };
    let reminder_task = tokio::spawn(async move { reminder.run(shutdown_rx).await });

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutdown signal received");
    shutdown_tx.send(true)?;

    renewal_task.await?;
    reminder_task.await?;
    pool.close().await;

    Ok(())
}
