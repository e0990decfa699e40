//! Domain layer - aggregates, value objects, and state machines.
//!
//! # Module Structure
//!
//! - `foundation` - Shared primitives (ids, timestamps, errors)
//! - `booking` - Booking aggregate and its status lifecycles
//! - `subscription` - Subscription aggregate and recurrence rules
//! - `pricing` - PriceTier and Coupon reference entities

pub mod booking;
pub mod foundation;
pub mod pricing;
pub mod subscription;
