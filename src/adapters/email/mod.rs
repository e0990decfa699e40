//! Email adapters implementing the EmailSender port.

mod logging_sender;
mod resend_sender;

pub use logging_sender::LoggingEmailSender;
pub use resend_sender::{ResendConfig, ResendEmailSender};
