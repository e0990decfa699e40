//! Resend-backed implementation of EmailSender.
//!
//! Sends transactional email through the Resend HTTP API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = ResendConfig::new(api_key)
//!     .with_from("Homeshine", "noreply@homeshine.example")
//!     .with_base_url("https://api.resend.com");
//!
//! let sender = ResendEmailSender::new(config);
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{BookingNotice, EmailSender};

/// Configuration for the Resend email adapter.
#[derive(Debug, Clone)]
pub struct ResendConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// From name shown in the mail client.
    pub from_name: String,
    /// From address.
    pub from_email: String,
    /// Base URL for the API (default: https://api.resend.com).
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl ResendConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            from_name: "Homeshine".to_string(),
            from_email: "noreply@homeshine.example".to_string(),
            base_url: "https://api.resend.com".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the sender identity.
    pub fn with_from(mut self, name: impl Into<String>, email: impl Into<String>) -> Self {
        self.from_name = name.into();
        self.from_email = email.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Formatted "From" header value.
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: String,
    to: [&'a str; 1],
    subject: String,
    html: String,
}

/// Resend implementation of the EmailSender port.
pub struct ResendEmailSender {
    config: ResendConfig,
    client: Client,
}

impl ResendEmailSender {
    /// Creates a new sender with the given configuration.
    pub fn new(config: ResendConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn emails_url(&self) -> String {
        format!("{}/emails", self.config.base_url)
    }

    async fn send(&self, to: &str, subject: String, html: String) -> Result<(), DomainError> {
        let request = SendRequest {
            from: self.config.from_header(),
            to: [to],
            subject,
            html,
        };

        let response = self
            .client
            .post(self.emails_url())
            .bearer_auth(self.config.api_key())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::EmailSendFailed,
                    format!("Email transport error: {}", e),
                )
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::new(
                ErrorCode::EmailSendFailed,
                format!("Email provider rejected send: {} {}", status, body),
            ));
        }

        Ok(())
    }
}

fn format_date(notice: &BookingNotice) -> String {
    notice
        .cleaning_date
        .as_datetime()
        .format("%A, %e %B %Y")
        .to_string()
}

#[async_trait]
impl EmailSender for ResendEmailSender {
    async fn send_booking_renewed(&self, notice: &BookingNotice) -> Result<(), DomainError> {
        let subject = "Your next cleaning is scheduled".to_string();
        let html = format!(
            "<p>Hi {name},</p>\
             <p>Your {frequency} cleaning subscription has been renewed. The next \
             {hours}-hour visit is scheduled for <strong>{date}</strong>.</p>\
             <p>See you then!</p>",
            name = notice.name,
            frequency = notice.frequency.as_str(),
            hours = notice.duration_hours,
            date = format_date(notice),
        );
        self.send(&notice.to, subject, html).await
    }

    async fn send_upcoming_reminder(&self, notice: &BookingNotice) -> Result<(), DomainError> {
        let subject = "Reminder: your cleaning is coming up".to_string();
        let html = format!(
            "<p>Hi {name},</p>\
             <p>A quick reminder that your {hours}-hour cleaning visit is scheduled \
             for <strong>{date}</strong>.</p>\
             <p>Reply to this email if you need to reschedule.</p>",
            name = notice.name,
            hours = notice.duration_hours,
            date = format_date(notice),
        );
        self.send(&notice.to, subject, html).await
    }
}
