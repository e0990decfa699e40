//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Values are read with the `HOMESHINE`
//! prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use homeshine::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod email;
mod error;
mod scheduler;

pub use database::DatabaseConfig;
pub use email::EmailConfig;
pub use error::{ConfigError, ValidationError};
pub use scheduler::SchedulerConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Email configuration (Resend)
    pub email: EmailConfig,

    /// Background scheduler configuration
    #[serde(default)]
    pub scheduler: SchedulerConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads a `.env` file if present, then reads environment variables with
    /// the `HOMESHINE` prefix:
    ///
    /// - `HOMESHINE__DATABASE__URL=...` -> `database.url`
    /// - `HOMESHINE__EMAIL__RESEND_API_KEY=...` -> `email.resend_api_key`
    /// - `HOMESHINE__SCHEDULER__RENEWAL_INTERVAL_SECS=30` -> `scheduler.renewal_interval_secs`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("HOMESHINE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.database.validate()?;
        self.email.validate()?;
        self.scheduler.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global; serialize the tests that touch them.
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var(
            "HOMESHINE__DATABASE__URL",
            "postgresql://test@localhost/homeshine",
        );
        env::set_var("HOMESHINE__EMAIL__RESEND_API_KEY", "re_test_key");
    }

    fn clear_env() {
        env::remove_var("HOMESHINE__DATABASE__URL");
        env::remove_var("HOMESHINE__EMAIL__RESEND_API_KEY");
        env::remove_var("HOMESHINE__SCHEDULER__RENEWAL_INTERVAL_SECS");
    }

    #[test]
    fn loads_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config should load");
        assert_eq!(config.database.url, "postgresql://test@localhost/homeshine");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn scheduler_interval_can_be_overridden() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("HOMESHINE__SCHEDULER__RENEWAL_INTERVAL_SECS", "30");
        let result = AppConfig::load();
        clear_env();

        let config = result.expect("config should load");
        assert_eq!(config.scheduler.renewal_interval_secs, 30);
    }
}
