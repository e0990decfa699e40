//! Coupon reference entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{CouponId, Percentage, Timestamp};

/// Discount code with a percentage discount capped at a maximum amount.
///
/// Codes are unique; duplicates surface as a conflict error at the
/// persistence boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    /// Unique identifier for this coupon.
    pub id: CouponId,

    /// Exact code the customer enters. Unique.
    pub code: String,

    /// Percentage taken off the order (0-100).
    pub discount_percent: Percentage,

    /// Upper bound on the discount, in currency units.
    pub max_discount: f64,

    /// Whether the coupon can still be redeemed.
    pub is_active: bool,

    /// When the coupon was created.
    pub created_at: Timestamp,

    /// When the coupon was last updated.
    pub updated_at: Timestamp,
}

impl Coupon {
    /// Creates a new active coupon.
    pub fn new(
        id: CouponId,
        code: impl Into<String>,
        discount_percent: Percentage,
        max_discount: f64,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            code: code.into(),
            discount_percent,
            max_discount,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Discount this coupon grants on the given amount.
    ///
    /// The percentage discount is capped at `max_discount`.
    pub fn discount_for(&self, amount: f64) -> f64 {
        let discount = amount * self.discount_percent.as_fraction();
        discount.min(self.max_discount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coupon(percent: u8, max: f64) -> Coupon {
        Coupon::new(CouponId::new(), "SPRING20", Percentage::new(percent), max)
    }

    #[test]
    fn new_coupon_is_active() {
        let c = coupon(20, 50.0);
        assert!(c.is_active);
        assert_eq!(c.code, "SPRING20");
    }

    #[test]
    fn discount_applies_percentage() {
        let c = coupon(20, 100.0);
        assert_eq!(c.discount_for(200.0), 40.0);
    }

    #[test]
    fn discount_is_capped_at_max() {
        let c = coupon(50, 30.0);
        assert_eq!(c.discount_for(200.0), 30.0);
    }

    #[test]
    fn zero_percent_gives_no_discount() {
        let c = coupon(0, 100.0);
        assert_eq!(c.discount_for(500.0), 0.0);
    }
}
