//! Coupon validation port.
//!
//! Validation outcomes are data, not errors: an unknown or inactive code is a
//! normal answer the caller folds into pricing (zero discount), while
//! infrastructure failures surface as `Err`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::DomainError;
use crate::domain::pricing::Coupon;

/// Why a coupon code did not validate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponInvalidReason {
    /// No coupon exists with this code.
    NotFound,

    /// The coupon exists but has been deactivated.
    Inactive,
}

impl CouponInvalidReason {
    /// Human-readable message suitable for surfacing to a customer.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NotFound => "This coupon code is not recognized",
            Self::Inactive => "This coupon code is no longer active",
        }
    }
}

/// Result of validating a coupon code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CouponValidation {
    /// The code resolved to an active coupon.
    Valid {
        /// The matched coupon, carrying percentage and cap.
        coupon: Coupon,
    },

    /// The code did not resolve to a usable coupon.
    Invalid {
        /// Why validation failed.
        reason: CouponInvalidReason,
    },
}

impl CouponValidation {
    /// Whether the validation succeeded.
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    /// The matched coupon, if valid.
    pub fn coupon(&self) -> Option<&Coupon> {
        match self {
            Self::Valid { coupon } => Some(coupon),
            Self::Invalid { .. } => None,
        }
    }
}

/// Port for resolving customer-entered coupon codes.
#[async_trait]
pub trait CouponValidator: Send + Sync {
    /// Validate a coupon code.
    ///
    /// Codes match exactly (case-sensitive). Unknown and inactive codes are
    /// `Ok(Invalid { .. })`, not errors.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on lookup failure
    async fn validate(&self, code: &str) -> Result<CouponValidation, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{CouponId, Percentage};

    // Trait object safety test
    #[test]
    fn coupon_validator_is_object_safe() {
        fn _accepts_dyn(_validator: &dyn CouponValidator) {}
    }

    #[test]
    fn valid_exposes_coupon() {
        let coupon = Coupon::new(CouponId::new(), "WELCOME10", Percentage::new(10), 25.0);
        let validation = CouponValidation::Valid {
            coupon: coupon.clone(),
        };
        assert!(validation.is_valid());
        assert_eq!(validation.coupon(), Some(&coupon));
    }

    #[test]
    fn invalid_has_no_coupon() {
        let validation = CouponValidation::Invalid {
            reason: CouponInvalidReason::NotFound,
        };
        assert!(!validation.is_valid());
        assert!(validation.coupon().is_none());
    }

    #[test]
    fn reasons_have_user_messages() {
        assert!(CouponInvalidReason::NotFound
            .user_message()
            .contains("not recognized"));
        assert!(CouponInvalidReason::Inactive
            .user_message()
            .contains("no longer active"));
    }
}
