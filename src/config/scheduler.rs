//! Background scheduler configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Scheduler configuration (renewal and reminder passes)
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Seconds between renewal passes
    #[serde(default = "default_renewal_interval")]
    pub renewal_interval_secs: u64,

    /// Seconds between reminder passes
    #[serde(default = "default_reminder_interval")]
    pub reminder_interval_secs: u64,
}

impl SchedulerConfig {
    pub fn renewal_interval(&self) -> Duration {
        Duration::from_secs(self.renewal_interval_secs)
    }

    pub fn reminder_interval(&self) -> Duration {
        Duration::from_secs(self.reminder_interval_secs)
    }

    /// Validate scheduler configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.renewal_interval_secs == 0 || self.reminder_interval_secs == 0 {
            return Err(ValidationError::IntervalTooShort);
        }
        Ok(())
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            renewal_interval_secs: default_renewal_interval(),
            reminder_interval_secs: default_reminder_interval(),
        }
    }
}

fn default_renewal_interval() -> u64 {
    60
}

fn default_reminder_interval() -> u64 {
    6 * 60 * 60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_pass_cadence() {
        let config = SchedulerConfig::default();
        assert_eq!(config.renewal_interval(), Duration::from_secs(60));
        assert_eq!(config.reminder_interval(), Duration::from_secs(21_600));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_interval_is_rejected() {
        let config = SchedulerConfig {
            renewal_interval_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
