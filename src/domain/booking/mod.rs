//! Booking domain module.
//!
//! One Booking per scheduled occurrence, with independent booking and
//! payment lifecycles.
//!
//! # Module Structure
//!
//! - `aggregate` - Booking aggregate entity
//! - `status` - BookingStatus state machine
//! - `payment_status` - PaymentStatus state machine
//! - `errors` - Booking error types

mod aggregate;
mod errors;
mod payment_status;
mod status;

pub use aggregate::{Booking, BookingCharges};
pub use errors::BookingError;
pub use payment_status::PaymentStatus;
pub use status::BookingStatus;
