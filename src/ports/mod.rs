//! Ports - interfaces between the application core and the outside world.
//!
//! Following hexagonal architecture, these traits define what the application
//! needs from infrastructure without prescribing how it is provided. Adapters
//! under `crate::adapters` supply the implementations.
//!
//! # Port Inventory
//!
//! **Persistence (write side)**
//! - [`BookingRepository`] - Booking aggregate CRUD
//! - [`SubscriptionRepository`] - Subscription aggregate CRUD
//!
//! **Persistence (read side)**
//! - [`BookingReader`] - expired-booking scan, earnings aggregate
//! - [`SubscriptionReader`] - listings, reminder and renewal candidates
//!
//! **Reference data**
//! - [`PricingCatalog`] - per-frequency price lookup
//! - [`CouponValidator`] - coupon code resolution
//!
//! **Notifications**
//! - [`EmailSender`] - renewal notices and upcoming reminders

mod booking_reader;
mod booking_repository;
mod coupon_validator;
mod email_sender;
mod pricing_catalog;
mod subscription_reader;
mod subscription_repository;

pub use booking_reader::{BookingReader, ExpiredBooking, SubscriberContact};
pub use booking_repository::BookingRepository;
pub use coupon_validator::{CouponInvalidReason, CouponValidation, CouponValidator};
pub use email_sender::{BookingNotice, EmailSender};
pub use pricing_catalog::PricingCatalog;
pub use subscription_reader::{
    SubscriptionPage, SubscriptionQuery, SubscriptionReader, SubscriptionSortKey,
    SubscriptionWithBooking,
};
pub use subscription_repository::SubscriptionRepository;
