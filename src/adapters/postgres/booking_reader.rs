//! PostgreSQL implementation of BookingReader.
//!
//! Aggregate queries degrade to empty/zero on failure: the renewal and
//! reporting paths log the cause and keep running.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::booking::Booking;
use crate::domain::foundation::{DomainError, ErrorCode, SubscriptionId, UserId};
use crate::ports::{BookingReader, ExpiredBooking, SubscriberContact};

use super::rows::{parse_frequency, BookingRow};

/// PostgreSQL implementation of the BookingReader port.
pub struct PostgresBookingReader {
    pool: PgPool,
}

impl PostgresBookingReader {
    /// Creates a new PostgresBookingReader with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Expired booking joined with its subscription and subscriber.
#[derive(Debug, FromRow)]
struct ExpiredBookingRow {
    id: Uuid,
    cleaning_date: DateTime<Utc>,
    duration_hours: i32,
    price_tier_id: Uuid,
    cleaning_price: f64,
    additional_charges: f64,
    supplies_charges: f64,
    discount_amount: f64,
    vat_amount: f64,
    total_amount: i64,
    status: String,
    payment_status: String,
    remarks: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    created_by: Option<String>,
    updated_by: Option<String>,
    subscription_id: Uuid,
    frequency: String,
    subscriber_id: String,
    subscriber_email: String,
    subscriber_name: String,
}

impl TryFrom<ExpiredBookingRow> for ExpiredBooking {
    type Error = DomainError;

    fn try_from(row: ExpiredBookingRow) -> Result<Self, Self::Error> {
        let booking = Booking::try_from(BookingRow {
            id: row.id,
            cleaning_date: row.cleaning_date,
            duration_hours: row.duration_hours,
            price_tier_id: row.price_tier_id,
            cleaning_price: row.cleaning_price,
            additional_charges: row.additional_charges,
            supplies_charges: row.supplies_charges,
            discount_amount: row.discount_amount,
            vat_amount: row.vat_amount,
            total_amount: row.total_amount,
            status: row.status,
            payment_status: row.payment_status,
            remarks: row.remarks,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
            created_by: row.created_by,
            updated_by: row.updated_by,
        })?;

        Ok(ExpiredBooking {
            booking,
            subscription_id: SubscriptionId::from_uuid(row.subscription_id),
            frequency: parse_frequency(&row.frequency)?,
            subscriber: SubscriberContact {
                user_id: UserId::new(row.subscriber_id).map_err(|e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Invalid subscriber_id: {}", e),
                    )
                })?,
                email: row.subscriber_email,
                name: row.subscriber_name,
            },
        })
    }
}

#[async_trait]
impl BookingReader for PostgresBookingReader {
    async fn find_expired(&self) -> Vec<ExpiredBooking> {
        // Inclusive threshold: a booking exactly one period old is expired.
        // Monthly is a fixed 28 days, matching the renewal date arithmetic.
        let rows: Result<Vec<ExpiredBookingRow>, sqlx::Error> = sqlx::query_as(
            r#"
            SELECT b.id, b.cleaning_date, b.duration_hours, b.price_tier_id,
                   b.cleaning_price, b.additional_charges, b.supplies_charges,
                   b.discount_amount, b.vat_amount, b.total_amount, b.status,
                   b.payment_status, b.remarks, b.is_active, b.created_at,
                   b.updated_at, b.created_by, b.updated_by,
                   s.id AS subscription_id, s.frequency,
                   u.user_id AS subscriber_id, u.email AS subscriber_email,
                   u.name AS subscriber_name
            FROM subscriptions s
            JOIN bookings b ON b.id = s.current_booking_id
            JOIN subscribers u ON u.user_id = s.subscriber_id
            WHERE s.is_active = TRUE
              AND b.is_active = TRUE
              AND s.frequency <> 'one_time'
              AND b.cleaning_date <= NOW() - make_interval(days => CASE s.frequency
                    WHEN 'weekly' THEN 7
                    WHEN 'biweekly' THEN 14
                    WHEN 'monthly' THEN 28
                  END)
            ORDER BY b.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;

        let rows = match rows {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(error = %e, "expired booking query failed, returning none");
                return Vec::new();
            }
        };

        rows.into_iter()
            .filter_map(|row| match ExpiredBooking::try_from(row) {
                Ok(expired) => Some(expired),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unmappable expired booking row");
                    None
                }
            })
            .collect()
    }

    async fn total_earnings(&self) -> i64 {
        let total: Result<Option<i64>, sqlx::Error> = sqlx::query_scalar(
            r#"
            SELECT SUM(total_amount)
            FROM bookings
            WHERE status = 'completed' AND payment_status = 'completed'
            "#,
        )
        .fetch_one(&self.pool)
        .await;

        match total {
            Ok(sum) => sum.unwrap_or(0),
            Err(e) => {
                tracing::warn!(error = %e, "earnings query failed, returning zero");
                0
            }
        }
    }
}
