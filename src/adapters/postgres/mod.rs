//! PostgreSQL adapters for the persistence and reference-data ports.

mod booking_reader;
mod booking_repository;
mod coupon_validator;
mod pricing_catalog;
mod rows;
mod subscription_reader;
mod subscription_repository;

pub use booking_reader::PostgresBookingReader;
pub use booking_repository::PostgresBookingRepository;
pub use coupon_validator::PostgresCouponValidator;
pub use pricing_catalog::PostgresPricingCatalog;
pub use subscription_reader::PostgresSubscriptionReader;
pub use subscription_repository::PostgresSubscriptionRepository;
