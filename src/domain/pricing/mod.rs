//! Pricing domain module - reference data.
//!
//! # Module Structure
//!
//! - `price_tier` - One price per subscription frequency
//! - `coupon` - Discount codes

mod coupon;
mod price_tier;

pub use coupon::Coupon;
pub use price_tier::PriceTier;
