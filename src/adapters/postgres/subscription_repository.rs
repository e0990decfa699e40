//! PostgreSQL implementation of SubscriptionRepository.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{BookingId, DomainError, ErrorCode, SubscriptionId};
use crate::domain::subscription::Subscription;
use crate::ports::SubscriptionRepository;

use super::rows::SubscriptionRow;

const SUBSCRIPTION_COLUMNS: &str = "id, subscriber_id, area_sqm, address, postal_code, \
     session_hours, price_tier_id, start_date, next_schedule_date, has_cat, has_dog, \
     other_pets, coupon_discount, frequency, current_booking_id, is_active, created_at, \
     updated_at, created_by, updated_by";

/// PostgreSQL implementation of the SubscriptionRepository port.
///
/// Uses sqlx for type-safe database operations with connection pooling.
pub struct PostgresSubscriptionRepository {
    pool: PgPool,
}

impl PostgresSubscriptionRepository {
    /// Creates a new PostgresSubscriptionRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    async fn save(&self, subscription: &Subscription) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO subscriptions (
                id, subscriber_id, area_sqm, address, postal_code, session_hours,
                price_tier_id, start_date, next_schedule_date, has_cat, has_dog,
                other_pets, coupon_discount, frequency, current_booking_id, is_active,
                created_at, updated_at, created_by, updated_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                      $15, $16, $17, $18, $19, $20)
            "#,
        )
        .bind(subscription.id.as_uuid())
        .bind(subscription.subscriber.as_str())
        .bind(subscription.area_sqm as i32)
        .bind(&subscription.address)
        .bind(&subscription.postal_code)
        .bind(subscription.session_hours as i32)
        .bind(subscription.price_tier.as_uuid())
        .bind(subscription.start_date.as_datetime())
        .bind(subscription.next_schedule_date.map(|t| *t.as_datetime()))
        .bind(subscription.has_cat)
        .bind(subscription.has_dog)
        .bind(&subscription.other_pets)
        .bind(subscription.coupon_discount)
        .bind(subscription.frequency.as_str())
        .bind(subscription.current_booking.map(|b| *b.as_uuid()))
        .bind(subscription.is_active)
        .bind(subscription.created_at.as_datetime())
        .bind(subscription.updated_at.as_datetime())
        .bind(subscription.created_by.as_ref().map(|u| u.as_str()))
        .bind(subscription.updated_by.as_ref().map(|u| u.as_str()))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to save subscription: {}", e),
            )
        })?;

        Ok(())
    }

    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE subscriptions SET
                area_sqm = $2,
                address = $3,
                postal_code = $4,
                session_hours = $5,
                price_tier_id = $6,
                start_date = $7,
                next_schedule_date = $8,
                has_cat = $9,
                has_dog = $10,
                other_pets = $11,
                coupon_discount = $12,
                frequency = $13,
                current_booking_id = $14,
                is_active = $15,
                updated_at = NOW(),
                updated_by = $16
            WHERE id = $1
            "#,
        )
        .bind(subscription.id.as_uuid())
        .bind(subscription.area_sqm as i32)
        .bind(&subscription.address)
        .bind(&subscription.postal_code)
        .bind(subscription.session_hours as i32)
        .bind(subscription.price_tier.as_uuid())
        .bind(subscription.start_date.as_datetime())
        .bind(subscription.next_schedule_date.map(|t| *t.as_datetime()))
        .bind(subscription.has_cat)
        .bind(subscription.has_dog)
        .bind(&subscription.other_pets)
        .bind(subscription.coupon_discount)
        .bind(subscription.frequency.as_str())
        .bind(subscription.current_booking.map(|b| *b.as_uuid()))
        .bind(subscription.is_active)
        .bind(subscription.updated_by.as_ref().map(|u| u.as_str()))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update subscription: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::SubscriptionNotFound,
                "Subscription not found",
            ));
        }

        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &SubscriptionId,
    ) -> Result<Option<Subscription>, DomainError> {
        let row: Option<SubscriptionRow> = sqlx::query_as(&format!(
            "SELECT {SUBSCRIPTION_COLUMNS} FROM subscriptions WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find subscription: {}", e),
            )
        })?;

        row.map(Subscription::try_from).transpose()
    }

    async fn set_current_booking(
        &self,
        id: &SubscriptionId,
        booking_id: &BookingId,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE subscriptions
            SET current_booking_id = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(booking_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to repoint subscription booking: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::SubscriptionNotFound,
                "Subscription not found",
            ));
        }

        Ok(())
    }

    async fn deactivate(&self, id: &SubscriptionId) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE subscriptions SET is_active = FALSE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to deactivate subscription: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::SubscriptionNotFound,
                "Subscription not found",
            ));
        }

        Ok(())
    }
}
