mod reminder_scheduler;
mod renewal_scheduler;

pub use reminder_scheduler::{ReminderScheduler, ReminderSchedulerConfig};
pub use renewal_scheduler::{RenewalScheduler, RenewalSchedulerConfig};
