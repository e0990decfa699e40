//! In-memory implementation of the persistence and reference-data ports.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::booking::{Booking, BookingStatus, PaymentStatus};
use crate::domain::foundation::{
    BookingId, CouponId, DomainError, ErrorCode, PriceTierId, SubscriptionId, Timestamp, UserId,
};
use crate::domain::pricing::{Coupon, PriceTier};
use crate::domain::subscription::{Frequency, Subscription};
use crate::ports::{
    BookingReader, BookingRepository, CouponInvalidReason, CouponValidation, CouponValidator,
    ExpiredBooking, PricingCatalog, SubscriberContact, SubscriptionPage, SubscriptionQuery,
    SubscriptionReader, SubscriptionRepository, SubscriptionSortKey, SubscriptionWithBooking,
};

const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Default)]
struct Tables {
    subscriptions: HashMap<SubscriptionId, Subscription>,
    bookings: HashMap<BookingId, Booking>,
    price_tiers: HashMap<PriceTierId, PriceTier>,
    coupons: HashMap<CouponId, Coupon>,
    subscribers: HashMap<UserId, SubscriberRecord>,
}

struct SubscriberRecord {
    contact: SubscriberContact,
    is_active: bool,
}

/// In-memory store implementing all persistence ports.
///
/// Thread-safe via internal `Mutex`. Does not persist data across restarts.
///
/// # Example
///
/// ```ignore
/// let store = InMemoryStore::new();
/// store.register_subscriber(contact);
/// store.save(&subscription).await?;
/// ```
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber's contact details so joined queries can
    /// resolve them. New subscribers start active.
    pub fn register_subscriber(&self, contact: SubscriberContact) {
        let mut tables = self.tables.lock().unwrap();
        tables.subscribers.insert(
            contact.user_id.clone(),
            SubscriberRecord {
                contact,
                is_active: true,
            },
        );
    }

    /// Marks a subscriber inactive. Their contact stays resolvable for
    /// joins, but reminder queries skip them.
    pub fn deactivate_subscriber(&self, user: &UserId) {
        let mut tables = self.tables.lock().unwrap();
        if let Some(record) = tables.subscribers.get_mut(user) {
            record.is_active = false;
        }
    }

    /// Seeds a price tier.
    pub fn insert_price_tier(&self, tier: PriceTier) {
        self.tables.lock().unwrap().price_tiers.insert(tier.id, tier);
    }

    /// Seeds a coupon.
    pub fn insert_coupon(&self, coupon: Coupon) {
        self.tables.lock().unwrap().coupons.insert(coupon.id, coupon);
    }

    /// Number of stored subscriptions, active or not.
    pub fn subscription_count(&self) -> usize {
        self.tables.lock().unwrap().subscriptions.len()
    }

    fn join_row(tables: &Tables, subscription: &Subscription) -> Option<SubscriptionWithBooking> {
        let subscriber = tables
            .subscribers
            .get(&subscription.subscriber)?
            .contact
            .clone();
        let booking = subscription
            .current_booking
            .and_then(|id| tables.bookings.get(&id))
            .cloned();
        Some(SubscriptionWithBooking {
            subscription: subscription.clone(),
            booking,
            subscriber,
        })
    }

    fn matches(query: &SubscriptionQuery, row: &SubscriptionWithBooking) -> bool {
        if !query.include_inactive && !row.subscription.is_active {
            return false;
        }
        if let Some(frequency) = query.frequency {
            if row.subscription.frequency != frequency {
                return false;
            }
        }
        if query.cleaning_date_from.is_some() || query.cleaning_date_to.is_some() {
            let Some(booking) = &row.booking else {
                return false;
            };
            if let Some(from) = query.cleaning_date_from {
                if booking.cleaning_date < from {
                    return false;
                }
            }
            if let Some(to) = query.cleaning_date_to {
                if booking.cleaning_date >= to {
                    return false;
                }
            }
        }
        if let Some(from) = query.next_schedule_from {
            match row.subscription.next_schedule_date {
                Some(date) if date >= from => {}
                _ => return false,
            }
        }
        if let Some(to) = query.next_schedule_to {
            match row.subscription.next_schedule_date {
                Some(date) if date < to => {}
                _ => return false,
            }
        }
        true
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn save(&self, booking: &Booking) -> Result<(), DomainError> {
        let mut tables = self.tables.lock().unwrap();
        tables.bookings.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn update(&self, booking: &Booking) -> Result<(), DomainError> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.bookings.contains_key(&booking.id) {
            return Err(DomainError::new(
                ErrorCode::BookingNotFound,
                format!("Booking {} not found", booking.id),
            ));
        }
        let mut updated = booking.clone();
        updated.updated_at = Timestamp::now();
        tables.bookings.insert(updated.id, updated);
        Ok(())
    }

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError> {
        Ok(self.tables.lock().unwrap().bookings.get(id).cloned())
    }

    async fn count(&self) -> Result<u64, DomainError> {
        Ok(self.tables.lock().unwrap().bookings.len() as u64)
    }

    async fn deactivate(&self, id: &BookingId) -> Result<(), DomainError> {
        let mut tables = self.tables.lock().unwrap();
        let booking = tables.bookings.get_mut(id).ok_or_else(|| {
            DomainError::new(
                ErrorCode::BookingNotFound,
                format!("Booking {} not found", id),
            )
        })?;
        booking.is_active = false;
        booking.updated_at = Timestamp::now();
        Ok(())
    }
}

#[async_trait]
impl SubscriptionRepository for InMemoryStore {
    async fn save(&self, subscription: &Subscription) -> Result<(), DomainError> {
        let mut tables = self.tables.lock().unwrap();
        tables
            .subscriptions
            .insert(subscription.id, subscription.clone());
        Ok(())
    }

    async fn update(&self, subscription: &Subscription) -> Result<(), DomainError> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.subscriptions.contains_key(&subscription.id) {
            return Err(DomainError::new(
                ErrorCode::SubscriptionNotFound,
                format!("Subscription {} not found", subscription.id),
            ));
        }
        let mut updated = subscription.clone();
        updated.updated_at = Timestamp::now();
        tables.subscriptions.insert(updated.id, updated);
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &SubscriptionId,
    ) -> Result<Option<Subscription>, DomainError> {
        Ok(self.tables.lock().unwrap().subscriptions.get(id).cloned())
    }

    async fn set_current_booking(
        &self,
        id: &SubscriptionId,
        booking_id: &BookingId,
    ) -> Result<(), DomainError> {
        let mut tables = self.tables.lock().unwrap();
        let subscription = tables.subscriptions.get_mut(id).ok_or_else(|| {
            DomainError::new(
                ErrorCode::SubscriptionNotFound,
                format!("Subscription {} not found", id),
            )
        })?;
        subscription.current_booking = Some(*booking_id);
        subscription.updated_at = Timestamp::now();
        Ok(())
    }

    async fn deactivate(&self, id: &SubscriptionId) -> Result<(), DomainError> {
        let mut tables = self.tables.lock().unwrap();
        let subscription = tables.subscriptions.get_mut(id).ok_or_else(|| {
            DomainError::new(
                ErrorCode::SubscriptionNotFound,
                format!("Subscription {} not found", id),
            )
        })?;
        subscription.is_active = false;
        subscription.updated_at = Timestamp::now();
        Ok(())
    }
}

#[async_trait]
impl BookingReader for InMemoryStore {
    async fn find_expired(&self) -> Vec<ExpiredBooking> {
        let tables = self.tables.lock().unwrap();
        let now = Timestamp::now();

        let mut expired: Vec<ExpiredBooking> = tables
            .subscriptions
            .values()
            .filter(|s| s.is_active && s.frequency.is_recurring())
            .filter_map(|s| {
                let booking = tables.bookings.get(&s.current_booking?)?;
                if !booking.is_active {
                    return None;
                }
                // Inclusive threshold: exactly one period old is expired.
                let threshold = now.minus_days(s.frequency.period_days());
                if booking.cleaning_date > threshold {
                    return None;
                }
                let subscriber = tables.subscribers.get(&s.subscriber)?.contact.clone();
                Some(ExpiredBooking {
                    booking: booking.clone(),
                    subscription_id: s.id,
                    frequency: s.frequency,
                    subscriber,
                })
            })
            .collect();

        expired.sort_by(|a, b| b.booking.created_at.cmp(&a.booking.created_at));
        expired
    }

    async fn total_earnings(&self) -> i64 {
        let tables = self.tables.lock().unwrap();
        tables
            .bookings
            .values()
            .filter(|b| {
                b.status == BookingStatus::Completed
                    && b.payment_status == PaymentStatus::Completed
            })
            .map(|b| b.total_amount)
            .sum()
    }
}

#[async_trait]
impl SubscriptionReader for InMemoryStore {
    async fn list(&self, query: &SubscriptionQuery) -> SubscriptionPage {
        let tables = self.tables.lock().unwrap();

        // Inner-join semantics: a subscription without a resolvable current
        // booking never appears in listings.
        let mut rows: Vec<SubscriptionWithBooking> = tables
            .subscriptions
            .values()
            .filter_map(|s| Self::join_row(&tables, s))
            .filter(|row| row.booking.is_some())
            .filter(|row| Self::matches(query, row))
            .collect();

        match query.sort.unwrap_or_default() {
            SubscriptionSortKey::NextScheduleDate => {
                rows.sort_by(|a, b| {
                    b.subscription
                        .next_schedule_date
                        .cmp(&a.subscription.next_schedule_date)
                });
            }
            SubscriptionSortKey::BookingDate => {
                rows.sort_by(|a, b| {
                    let date = |r: &SubscriptionWithBooking| {
                        r.booking.as_ref().map(|bk| bk.cleaning_date)
                    };
                    date(b).cmp(&date(a))
                });
            }
        }

        let count = rows.len() as u64;
        let per_page = if query.per_page == 0 {
            DEFAULT_PAGE_SIZE
        } else {
            query.per_page
        } as usize;
        let start = (query.page as usize).saturating_mul(per_page);
        let results = rows.into_iter().skip(start).take(per_page).collect();

        SubscriptionPage { count, results }
    }

    async fn due_for_reminder(&self) -> Vec<SubscriptionWithBooking> {
        let window_start = Timestamp::start_of_today().add_days(4);
        let window_end = Timestamp::start_of_today().add_days(5);

        let tables = self.tables.lock().unwrap();
        tables
            .subscriptions
            .values()
            .filter(|s| s.is_active)
            // Subscription and subscriber must both be active to remind.
            .filter(|s| {
                tables
                    .subscribers
                    .get(&s.subscriber)
                    .map_or(false, |r| r.is_active)
            })
            .filter_map(|s| Self::join_row(&tables, s))
            .filter(|row| match &row.booking {
                Some(b) => {
                    b.is_active && b.cleaning_date >= window_start && b.cleaning_date < window_end
                }
                None => false,
            })
            .collect()
    }

    async fn eligible_for_renewal(&self) -> Vec<SubscriptionWithBooking> {
        // Finished before today: up to the end of yesterday, fully settled.
        let cutoff = Timestamp::start_of_today().minus_days(1).end_of_day();

        let tables = self.tables.lock().unwrap();
        tables
            .subscriptions
            .values()
            .filter(|s| s.is_active && s.frequency.is_recurring())
            .filter_map(|s| Self::join_row(&tables, s))
            .filter(|row| match &row.booking {
                Some(b) => {
                    b.cleaning_date <= cutoff
                        && b.status == BookingStatus::Completed
                        && b.payment_status == PaymentStatus::Completed
                }
                None => false,
            })
            .collect()
    }

    async fn upcoming_week(&self) -> Vec<SubscriptionWithBooking> {
        let now = Timestamp::now();
        let window_end = now.add_days(7).end_of_day();

        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<SubscriptionWithBooking> = tables
            .subscriptions
            .values()
            .filter(|s| s.is_active)
            .filter_map(|s| Self::join_row(&tables, s))
            .filter(|row| match &row.booking {
                Some(b) => {
                    b.is_active
                        && b.status == BookingStatus::Initiated
                        && b.payment_status == PaymentStatus::Pending
                        && b.cleaning_date >= now
                        && b.cleaning_date <= window_end
                }
                None => false,
            })
            .collect();
        rows.sort_by_key(|r| r.booking.as_ref().map(|b| b.cleaning_date));
        rows
    }
}

#[async_trait]
impl PricingCatalog for InMemoryStore {
    async fn price_for(&self, frequency: Frequency) -> Result<Option<PriceTier>, DomainError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .price_tiers
            .values()
            .find(|t| t.frequency == frequency && t.is_active)
            .cloned())
    }
}

#[async_trait]
impl CouponValidator for InMemoryStore {
    async fn validate(&self, code: &str) -> Result<CouponValidation, DomainError> {
        let tables = self.tables.lock().unwrap();
        match tables.coupons.values().find(|c| c.code == code) {
            Some(coupon) if coupon.is_active => Ok(CouponValidation::Valid {
                coupon: coupon.clone(),
            }),
            Some(_) => Ok(CouponValidation::Invalid {
                reason: CouponInvalidReason::Inactive,
            }),
            None => Ok(CouponValidation::Invalid {
                reason: CouponInvalidReason::NotFound,
            }),
        }
    }
}
