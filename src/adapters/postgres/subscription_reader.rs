//! PostgreSQL implementation of SubscriptionReader.
//!
//! All queries join subscriptions with their current booking (left join, a
//! subscription may transiently have none) and the subscriber contact row
//! (inner join, rows without a resolvable subscriber are dropped). Failures
//! degrade to empty results with a logged warning.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::booking::Booking;
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, UserId};
use crate::domain::subscription::Subscription;
use crate::ports::{
    SubscriberContact, SubscriptionPage, SubscriptionQuery, SubscriptionReader,
    SubscriptionSortKey, SubscriptionWithBooking,
};

use super::rows::{BookingRow, SubscriptionRow};

const DEFAULT_PAGE_SIZE: u32 = 20;

const JOINED_SELECT: &str = r#"
    SELECT s.id, s.subscriber_id, s.area_sqm, s.address, s.postal_code,
           s.session_hours, s.price_tier_id, s.start_date, s.next_schedule_date,
           s.has_cat, s.has_dog, s.other_pets, s.coupon_discount, s.frequency,
           s.current_booking_id, s.is_active, s.created_at, s.updated_at,
           s.created_by, s.updated_by,
           b.id AS b_id, b.cleaning_date AS b_cleaning_date,
           b.duration_hours AS b_duration_hours, b.price_tier_id AS b_price_tier_id,
           b.cleaning_price AS b_cleaning_price,
           b.additional_charges AS b_additional_charges,
           b.supplies_charges AS b_supplies_charges,
           b.discount_amount AS b_discount_amount, b.vat_amount AS b_vat_amount,
           b.total_amount AS b_total_amount, b.status AS b_status,
           b.payment_status AS b_payment_status, b.remarks AS b_remarks,
           b.is_active AS b_is_active, b.created_at AS b_created_at,
           b.updated_at AS b_updated_at, b.created_by AS b_created_by,
           b.updated_by AS b_updated_by,
           u.email AS subscriber_email, u.name AS subscriber_name
    FROM subscriptions s
    LEFT JOIN bookings b ON b.id = s.current_booking_id
    JOIN subscribers u ON u.user_id = s.subscriber_id
"#;

/// PostgreSQL implementation of the SubscriptionReader port.
pub struct PostgresSubscriptionReader {
    pool: PgPool,
}

impl PostgresSubscriptionReader {
    /// Creates a new PostgresSubscriptionReader with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_joined(
        &self,
        sql: &str,
        binds: &[Timestamp],
        context: &str,
    ) -> Vec<SubscriptionWithBooking> {
        let mut query = sqlx::query_as::<_, JoinedRow>(sql);
        for ts in binds {
            query = query.bind(*ts.as_datetime());
        }

        match query.fetch_all(&self.pool).await {
            Ok(rows) => map_rows(rows),
            Err(e) => {
                tracing::warn!(error = %e, query = context, "subscription query failed, returning none");
                Vec::new()
            }
        }
    }
}

/// Subscription joined with its optional current booking and subscriber.
#[derive(Debug, FromRow)]
struct JoinedRow {
    id: Uuid,
    subscriber_id: String,
    area_sqm: i32,
    address: String,
    postal_code: String,
    session_hours: i32,
    price_tier_id: Uuid,
    start_date: DateTime<Utc>,
    next_schedule_date: Option<DateTime<Utc>>,
    has_cat: bool,
    has_dog: bool,
    other_pets: Option<String>,
    coupon_discount: f64,
    frequency: String,
    current_booking_id: Option<Uuid>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    created_by: Option<String>,
    updated_by: Option<String>,
    b_id: Option<Uuid>,
    b_cleaning_date: Option<DateTime<Utc>>,
    b_duration_hours: Option<i32>,
    b_price_tier_id: Option<Uuid>,
    b_cleaning_price: Option<f64>,
    b_additional_charges: Option<f64>,
    b_supplies_charges: Option<f64>,
    b_discount_amount: Option<f64>,
    b_vat_amount: Option<f64>,
    b_total_amount: Option<i64>,
    b_status: Option<String>,
    b_payment_status: Option<String>,
    b_remarks: Option<String>,
    b_is_active: Option<bool>,
    b_created_at: Option<DateTime<Utc>>,
    b_updated_at: Option<DateTime<Utc>>,
    b_created_by: Option<String>,
    b_updated_by: Option<String>,
    subscriber_email: String,
    subscriber_name: String,
}

fn require<T>(value: Option<T>, column: &str) -> Result<T, DomainError> {
    value.ok_or_else(|| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Joined booking missing column: {}", column),
        )
    })
}

impl TryFrom<JoinedRow> for SubscriptionWithBooking {
    type Error = DomainError;

    fn try_from(row: JoinedRow) -> Result<Self, Self::Error> {
        let booking = match row.b_id {
            Some(id) => Some(Booking::try_from(BookingRow {
                id,
                cleaning_date: require(row.b_cleaning_date, "cleaning_date")?,
                duration_hours: require(row.b_duration_hours, "duration_hours")?,
                price_tier_id: require(row.b_price_tier_id, "price_tier_id")?,
                cleaning_price: require(row.b_cleaning_price, "cleaning_price")?,
                additional_charges: require(row.b_additional_charges, "additional_charges")?,
                supplies_charges: require(row.b_supplies_charges, "supplies_charges")?,
                discount_amount: require(row.b_discount_amount, "discount_amount")?,
                vat_amount: require(row.b_vat_amount, "vat_amount")?,
                total_amount: require(row.b_total_amount, "total_amount")?,
                status: require(row.b_status, "status")?,
                payment_status: require(row.b_payment_status, "payment_status")?,
                remarks: row.b_remarks,
                is_active: require(row.b_is_active, "is_active")?,
                created_at: require(row.b_created_at, "created_at")?,
                updated_at: require(row.b_updated_at, "updated_at")?,
                created_by: row.b_created_by,
                updated_by: row.b_updated_by,
            })?),
            None => None,
        };

        let subscriber = SubscriberContact {
            user_id: UserId::new(row.subscriber_id.clone()).map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Invalid subscriber_id: {}", e),
                )
            })?,
            email: row.subscriber_email.clone(),
            name: row.subscriber_name.clone(),
        };

        let subscription = Subscription::try_from(SubscriptionRow {
            id: row.id,
            subscriber_id: row.subscriber_id,
            area_sqm: row.area_sqm,
            address: row.address,
            postal_code: row.postal_code,
            session_hours: row.session_hours,
            price_tier_id: row.price_tier_id,
            start_date: row.start_date,
            next_schedule_date: row.next_schedule_date,
            has_cat: row.has_cat,
            has_dog: row.has_dog,
            other_pets: row.other_pets,
            coupon_discount: row.coupon_discount,
            frequency: row.frequency,
            current_booking_id: row.current_booking_id,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
            created_by: row.created_by,
            updated_by: row.updated_by,
        })?;

        Ok(SubscriptionWithBooking {
            subscription,
            booking,
            subscriber,
        })
    }
}

fn map_rows(rows: Vec<JoinedRow>) -> Vec<SubscriptionWithBooking> {
    rows.into_iter()
        .filter_map(|row| match SubscriptionWithBooking::try_from(row) {
            Ok(joined) => Some(joined),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unmappable subscription row");
                None
            }
        })
        .collect()
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &SubscriptionQuery) {
    builder.push(" WHERE 1 = 1");
    if !query.include_inactive {
        builder.push(" AND s.is_active = TRUE");
    }
    if let Some(frequency) = query.frequency {
        builder.push(" AND s.frequency = ");
        builder.push_bind(frequency.as_str());
    }
    if let Some(from) = query.cleaning_date_from {
        builder.push(" AND b.cleaning_date >= ");
        builder.push_bind(*from.as_datetime());
    }
    if let Some(to) = query.cleaning_date_to {
        builder.push(" AND b.cleaning_date < ");
        builder.push_bind(*to.as_datetime());
    }
    if let Some(from) = query.next_schedule_from {
        builder.push(" AND s.next_schedule_date >= ");
        builder.push_bind(*from.as_datetime());
    }
    if let Some(to) = query.next_schedule_to {
        builder.push(" AND s.next_schedule_date < ");
        builder.push_bind(*to.as_datetime());
    }
}

#[async_trait]
impl SubscriptionReader for PostgresSubscriptionReader {
    async fn list(&self, query: &SubscriptionQuery) -> SubscriptionPage {
        // One query for the whole filtered set; count and page are sliced
        // from the same result so they can never disagree.
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new(JOINED_SELECT);
        push_filters(&mut builder, query);
        // Listings use inner-join semantics: no resolvable current booking,
        // no row.
        builder.push(" AND b.id IS NOT NULL");
        match query.sort.unwrap_or_default() {
            SubscriptionSortKey::NextScheduleDate => {
                builder.push(" ORDER BY s.next_schedule_date DESC NULLS LAST");
            }
            SubscriptionSortKey::BookingDate => {
                builder.push(" ORDER BY b.cleaning_date DESC NULLS LAST");
            }
        }

        let rows: Vec<JoinedRow> = match builder.build_query_as().fetch_all(&self.pool).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!(error = %e, "subscription list query failed, returning empty page");
                return SubscriptionPage::empty();
            }
        };

        let joined = map_rows(rows);
        let count = joined.len() as u64;
        let per_page = if query.per_page == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            query.per_page
        } as usize;
        let start = (query.page as usize).saturating_mul(per_page);
        let results = joined.into_iter().skip(start).take(per_page).collect();

        SubscriptionPage { count, results }
    }

    async fn due_for_reminder(&self) -> Vec<SubscriptionWithBooking> {
        let window_start = Timestamp::start_of_today().add_days(4);
        let window_end = Timestamp::start_of_today().add_days(5);

        let sql = format!(
            "{JOINED_SELECT} WHERE s.is_active = TRUE AND u.is_active = TRUE \
             AND b.is_active = TRUE \
             AND b.cleaning_date >= $1 AND b.cleaning_date < $2"
        );
        self.fetch_joined(&sql, &[window_start, window_end], "due_for_reminder")
            .await
    }

    async fn eligible_for_renewal(&self) -> Vec<SubscriptionWithBooking> {
        // Finished before today: up to the end of yesterday, fully settled.
        let cutoff = Timestamp::start_of_today().minus_days(1).end_of_day();

        let sql = format!(
            "{JOINED_SELECT} WHERE s.is_active = TRUE AND s.frequency <> 'one_time' \
             AND b.cleaning_date <= $1 \
             AND b.status = 'completed' AND b.payment_status = 'completed'"
        );
        self.fetch_joined(&sql, &[cutoff], "eligible_for_renewal")
            .await
    }

    async fn upcoming_week(&self) -> Vec<SubscriptionWithBooking> {
        let now = Timestamp::now();
        let window_end = now.add_days(7).end_of_day();

        let sql = format!(
            "{JOINED_SELECT} WHERE s.is_active = TRUE AND b.is_active = TRUE \
             AND b.status = 'initiated' AND b.payment_status = 'pending' \
             AND b.cleaning_date >= $1 AND b.cleaning_date <= $2 \
             ORDER BY b.cleaning_date ASC"
        );
        self.fetch_joined(&sql, &[now, window_end], "upcoming_week")
            .await
    }
}
