//! Logging implementation of EmailSender for development and tests.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::foundation::DomainError;
use crate::ports::{BookingNotice, EmailSender};

/// EmailSender that records notices and logs instead of sending.
///
/// Useful when running without email credentials; also doubles as a
/// test double that remembers everything it was asked to send.
#[derive(Default)]
pub struct LoggingEmailSender {
    sent: Mutex<Vec<(String, BookingNotice)>>,
}

impl LoggingEmailSender {
    /// Creates a new sender with an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// All notices recorded so far, tagged with the template name.
    pub fn sent(&self) -> Vec<(String, BookingNotice)> {
        self.sent.lock().unwrap().clone()
    }

    fn record(&self, template: &str, notice: &BookingNotice) {
        tracing::info!(
            template,
            to = %notice.to,
            cleaning_date = %notice.cleaning_date.as_datetime(),
            "email send suppressed (logging sender)"
        );
        self.sent
            .lock()
            .unwrap()
            .push((template.to_string(), notice.clone()));
    }
}

#[async_trait]
impl EmailSender for LoggingEmailSender {
    async fn send_booking_renewed(&self, notice: &BookingNotice) -> Result<(), DomainError> {
        self.record("booking_renewed", notice);
        Ok(())
    }

    async fn send_upcoming_reminder(&self, notice: &BookingNotice) -> Result<(), DomainError> {
        self.record("upcoming_reminder", notice);
        Ok(())
    }
}
