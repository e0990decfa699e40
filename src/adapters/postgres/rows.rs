//! Database row representations and enum mappings shared by the
//! PostgreSQL adapters.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::booking::{Booking, BookingStatus, PaymentStatus};
use crate::domain::foundation::{
    BookingId, DomainError, ErrorCode, PriceTierId, SubscriptionId, Timestamp, UserId,
};
use crate::domain::pricing::{Coupon, PriceTier};
use crate::domain::foundation::{CouponId, Percentage};
use crate::domain::subscription::{Frequency, Subscription};

/// Database row representation of a booking.
#[derive(Debug, FromRow)]
pub(super) struct BookingRow {
    pub id: Uuid,
    pub cleaning_date: DateTime<Utc>,
    pub duration_hours: i32,
    pub price_tier_id: Uuid,
    pub cleaning_price: f64,
    pub additional_charges: f64,
    pub supplies_charges: f64,
    pub discount_amount: f64,
    pub vat_amount: f64,
    pub total_amount: i64,
    pub status: String,
    pub payment_status: String,
    pub remarks: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = DomainError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        Ok(Booking {
            id: BookingId::from_uuid(row.id),
            cleaning_date: Timestamp::from_datetime(row.cleaning_date),
            duration_hours: u32::try_from(row.duration_hours).map_err(|_| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Invalid duration_hours: {}", row.duration_hours),
                )
            })?,
            price_tier: PriceTierId::from_uuid(row.price_tier_id),
            cleaning_price: row.cleaning_price,
            additional_charges: row.additional_charges,
            supplies_charges: row.supplies_charges,
            discount_amount: row.discount_amount,
            vat_amount: row.vat_amount,
            total_amount: row.total_amount,
            status: parse_booking_status(&row.status)?,
            payment_status: parse_payment_status(&row.payment_status)?,
            remarks: row.remarks,
            is_active: row.is_active,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
            created_by: parse_opt_user(row.created_by)?,
            updated_by: parse_opt_user(row.updated_by)?,
        })
    }
}

/// Database row representation of a subscription.
#[derive(Debug, FromRow)]
pub(super) struct SubscriptionRow {
    pub id: Uuid,
    pub subscriber_id: String,
    pub area_sqm: i32,
    pub address: String,
    pub postal_code: String,
    pub session_hours: i32,
    pub price_tier_id: Uuid,
    pub start_date: DateTime<Utc>,
    pub next_schedule_date: Option<DateTime<Utc>>,
    pub has_cat: bool,
    pub has_dog: bool,
    pub other_pets: Option<String>,
    pub coupon_discount: f64,
    pub frequency: String,
    pub current_booking_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = DomainError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        Ok(Subscription {
            id: SubscriptionId::from_uuid(row.id),
            subscriber: UserId::new(row.subscriber_id).map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Invalid subscriber_id: {}", e),
                )
            })?,
            area_sqm: u32::try_from(row.area_sqm).map_err(|_| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Invalid area_sqm: {}", row.area_sqm),
                )
            })?,
            address: row.address,
            postal_code: row.postal_code,
            session_hours: u32::try_from(row.session_hours).map_err(|_| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Invalid session_hours: {}", row.session_hours),
                )
            })?,
            price_tier: PriceTierId::from_uuid(row.price_tier_id),
            start_date: Timestamp::from_datetime(row.start_date),
            next_schedule_date: row.next_schedule_date.map(Timestamp::from_datetime),
            has_cat: row.has_cat,
            has_dog: row.has_dog,
            other_pets: row.other_pets,
            coupon_discount: row.coupon_discount,
            frequency: parse_frequency(&row.frequency)?,
            current_booking: row.current_booking_id.map(BookingId::from_uuid),
            is_active: row.is_active,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
            created_by: parse_opt_user(row.created_by)?,
            updated_by: parse_opt_user(row.updated_by)?,
        })
    }
}

/// Database row representation of a price tier.
#[derive(Debug, FromRow)]
pub(super) struct PriceTierRow {
    pub id: Uuid,
    pub frequency: String,
    pub price_per_hour: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<PriceTierRow> for PriceTier {
    type Error = DomainError;

    fn try_from(row: PriceTierRow) -> Result<Self, Self::Error> {
        Ok(PriceTier {
            id: PriceTierId::from_uuid(row.id),
            frequency: parse_frequency(&row.frequency)?,
            price_per_hour: row.price_per_hour,
            is_active: row.is_active,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

/// Database row representation of a coupon.
#[derive(Debug, FromRow)]
pub(super) struct CouponRow {
    pub id: Uuid,
    pub code: String,
    pub discount_percent: i16,
    pub max_discount: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<CouponRow> for Coupon {
    type Error = DomainError;

    fn try_from(row: CouponRow) -> Result<Self, Self::Error> {
        let percent = u8::try_from(row.discount_percent)
            .ok()
            .and_then(|p| Percentage::try_new(p).ok())
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Invalid discount_percent: {}", row.discount_percent),
                )
            })?;
        Ok(Coupon {
            id: CouponId::from_uuid(row.id),
            code: row.code,
            discount_percent: percent,
            max_discount: row.max_discount,
            is_active: row.is_active,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

pub(super) fn parse_booking_status(s: &str) -> Result<BookingStatus, DomainError> {
    match s.to_lowercase().as_str() {
        "initiated" => Ok(BookingStatus::Initiated),
        "served" => Ok(BookingStatus::Served),
        "completed" => Ok(BookingStatus::Completed),
        "cancelled" => Ok(BookingStatus::Cancelled),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid booking status value: {}", s),
        )),
    }
}

pub(super) fn booking_status_to_str(status: &BookingStatus) -> &'static str {
    match status {
        BookingStatus::Initiated => "initiated",
        BookingStatus::Served => "served",
        BookingStatus::Completed => "completed",
        BookingStatus::Cancelled => "cancelled",
    }
}

pub(super) fn parse_payment_status(s: &str) -> Result<PaymentStatus, DomainError> {
    match s.to_lowercase().as_str() {
        "pending" => Ok(PaymentStatus::Pending),
        "initiated" => Ok(PaymentStatus::Initiated),
        "created" => Ok(PaymentStatus::Created),
        "completed" => Ok(PaymentStatus::Completed),
        "failed" => Ok(PaymentStatus::Failed),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid payment status value: {}", s),
        )),
    }
}

pub(super) fn payment_status_to_str(status: &PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Pending => "pending",
        PaymentStatus::Initiated => "initiated",
        PaymentStatus::Created => "created",
        PaymentStatus::Completed => "completed",
        PaymentStatus::Failed => "failed",
    }
}

pub(super) fn parse_frequency(s: &str) -> Result<Frequency, DomainError> {
    s.parse().map_err(|_| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid frequency value: {}", s),
        )
    })
}

fn parse_opt_user(value: Option<String>) -> Result<Option<UserId>, DomainError> {
    value
        .map(|v| {
            UserId::new(v).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid user id: {}", e))
            })
        })
        .transpose()
}
