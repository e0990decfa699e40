//! PostgreSQL implementation of CouponValidator.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::pricing::Coupon;
use crate::ports::{CouponInvalidReason, CouponValidation, CouponValidator};

use super::rows::CouponRow;

/// PostgreSQL implementation of the CouponValidator port.
///
/// Codes match exactly, including case.
pub struct PostgresCouponValidator {
    pool: PgPool,
}

impl PostgresCouponValidator {
    /// Creates a new PostgresCouponValidator with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CouponValidator for PostgresCouponValidator {
    async fn validate(&self, code: &str) -> Result<CouponValidation, DomainError> {
        let row: Option<CouponRow> = sqlx::query_as(
            r#"
            SELECT id, code, discount_percent, max_discount, is_active,
                   created_at, updated_at
            FROM coupons
            WHERE code = $1
            "#,
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to look up coupon: {}", e),
            )
        })?;

        match row {
            None => Ok(CouponValidation::Invalid {
                reason: CouponInvalidReason::NotFound,
            }),
            Some(row) if !row.is_active => Ok(CouponValidation::Invalid {
                reason: CouponInvalidReason::Inactive,
            }),
            Some(row) => Ok(CouponValidation::Valid {
                coupon: Coupon::try_from(row)?,
            }),
        }
    }
}
