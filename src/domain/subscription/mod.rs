//! Subscription domain module.
//!
//! Handles the recurring commitment lifecycle and recurrence rules.
//!
//! # Module Structure
//!
//! - `aggregate` - Subscription aggregate entity
//! - `frequency` - Frequency value object and period arithmetic
//! - `errors` - Subscription error types

mod aggregate;
mod errors;
mod frequency;

pub use aggregate::{NewSubscription, Subscription};
pub use errors::SubscriptionError;
pub use frequency::Frequency;
