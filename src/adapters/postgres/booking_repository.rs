//! PostgreSQL implementation of BookingRepository.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::booking::Booking;
use crate::domain::foundation::{BookingId, DomainError, ErrorCode};
use crate::ports::BookingRepository;

use super::rows::{booking_status_to_str, payment_status_to_str, BookingRow};

const BOOKING_COLUMNS: &str = "id, cleaning_date, duration_hours, price_tier_id, \
     cleaning_price, additional_charges, supplies_charges, discount_amount, vat_amount, \
     total_amount, status, payment_status, remarks, is_active, created_at, updated_at, \
     created_by, updated_by";

/// PostgreSQL implementation of the BookingRepository port.
///
/// Uses sqlx for type-safe database operations with connection pooling.
pub struct PostgresBookingRepository {
    pool: PgPool,
}

impl PostgresBookingRepository {
    /// Creates a new PostgresBookingRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PostgresBookingRepository {
    async fn save(&self, booking: &Booking) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, cleaning_date, duration_hours, price_tier_id, cleaning_price,
                additional_charges, supplies_charges, discount_amount, vat_amount,
                total_amount, status, payment_status, remarks, is_active,
                created_at, updated_at, created_by, updated_by
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                      $15, $16, $17, $18)
            "#,
        )
        .bind(booking.id.as_uuid())
        .bind(booking.cleaning_date.as_datetime())
        .bind(booking.duration_hours as i32)
        .bind(booking.price_tier.as_uuid())
        .bind(booking.cleaning_price)
        .bind(booking.additional_charges)
        .bind(booking.supplies_charges)
        .bind(booking.discount_amount)
        .bind(booking.vat_amount)
        .bind(booking.total_amount)
        .bind(booking_status_to_str(&booking.status))
        .bind(payment_status_to_str(&booking.payment_status))
        .bind(&booking.remarks)
        .bind(booking.is_active)
        .bind(booking.created_at.as_datetime())
        .bind(booking.updated_at.as_datetime())
        .bind(booking.created_by.as_ref().map(|u| u.as_str()))
        .bind(booking.updated_by.as_ref().map(|u| u.as_str()))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to save booking: {}", e),
            )
        })?;

        Ok(())
    }

    async fn update(&self, booking: &Booking) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE bookings SET
                cleaning_date = $2,
                duration_hours = $3,
                cleaning_price = $4,
                additional_charges = $5,
                supplies_charges = $6,
                discount_amount = $7,
                vat_amount = $8,
                total_amount = $9,
                status = $10,
                payment_status = $11,
                remarks = $12,
                is_active = $13,
                updated_at = NOW(),
                updated_by = $14
            WHERE id = $1
            "#,
        )
        .bind(booking.id.as_uuid())
        .bind(booking.cleaning_date.as_datetime())
        .bind(booking.duration_hours as i32)
        .bind(booking.cleaning_price)
        .bind(booking.additional_charges)
        .bind(booking.supplies_charges)
        .bind(booking.discount_amount)
        .bind(booking.vat_amount)
        .bind(booking.total_amount)
        .bind(booking_status_to_str(&booking.status))
        .bind(payment_status_to_str(&booking.payment_status))
        .bind(&booking.remarks)
        .bind(booking.is_active)
        .bind(booking.updated_by.as_ref().map(|u| u.as_str()))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update booking: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::BookingNotFound,
                "Booking not found",
            ));
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError> {
        let row: Option<BookingRow> = sqlx::query_as(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find booking: {}", e),
            )
        })?;

        row.map(Booking::try_from).transpose()
    }

    async fn count(&self) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to count bookings: {}", e),
                )
            })?;

        Ok(count as u64)
    }

    async fn deactivate(&self, id: &BookingId) -> Result<(), DomainError> {
        let result = sqlx::query(
            "UPDATE bookings SET is_active = FALSE, updated_at = NOW() WHERE id = $1",
        )
        .bind(id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to deactivate booking: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::BookingNotFound,
                "Booking not found",
            ));
        }

        Ok(())
    }
}
