mod send_upcoming_reminders;

pub use send_upcoming_reminders::{ReminderSummary, SendUpcomingRemindersHandler};
