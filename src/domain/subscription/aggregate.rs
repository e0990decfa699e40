//! Subscription aggregate entity.
//!
//! A Subscription represents a recurring cleaning commitment. It owns a
//! pointer to its current Booking occurrence; renewals reassign that pointer
//! and the superseded Booking is deactivated, never deleted.
//!
//! # Design Decisions
//!
//! - **Soft delete only**: cancellation flips `is_active`; rows are kept for
//!   reporting and audit history
//! - **Back-reference relation**: the Booking link is id-valued in both
//!   directions; deactivating a Subscription never cascades to Bookings
//! - **One-time never renews**: enforced here and re-checked by the renewal
//!   scheduler

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{BookingId, PriceTierId, SubscriptionId, Timestamp, UserId};

use super::{Frequency, SubscriptionError};

/// Subscription aggregate - a recurring cleaning commitment.
///
/// # Invariants
///
/// - `id` is globally unique
/// - `frequency == OneTime` implies the subscription is never renewal-eligible
/// - `current_booking` is mutated only by renewal or an explicit booking update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    /// Unique identifier for this subscription.
    pub id: SubscriptionId,

    /// Subscriber who owns this subscription.
    pub subscriber: UserId,

    /// Service area in square meters.
    pub area_sqm: u32,

    /// Street address of the serviced home.
    pub address: String,

    /// Postal code of the serviced home.
    pub postal_code: String,

    /// Duration of each cleaning session in hours.
    pub session_hours: u32,

    /// Pricing tier applied to this subscription.
    pub price_tier: PriceTierId,

    /// Date the subscription starts.
    pub start_date: Timestamp,

    /// Next scheduled occurrence, as tracked on the subscription itself.
    pub next_schedule_date: Option<Timestamp>,

    /// Whether a cat lives in the home.
    pub has_cat: bool,

    /// Whether a dog lives in the home.
    pub has_dog: bool,

    /// Free-form description of other pets, if any.
    pub other_pets: Option<String>,

    /// Discount granted by a coupon at subscribe time.
    pub coupon_discount: f64,

    /// Recurrence interval.
    pub frequency: Frequency,

    /// Pointer to the current Booking occurrence.
    pub current_booking: Option<BookingId>,

    /// Soft-delete flag. Inactive subscriptions are excluded from all joins.
    pub is_active: bool,

    /// When the subscription was created.
    pub created_at: Timestamp,

    /// When the subscription was last updated.
    pub updated_at: Timestamp,

    /// Who created the subscription, when an authenticated caller is known.
    pub created_by: Option<UserId>,

    /// Who last updated the subscription.
    pub updated_by: Option<UserId>,
}

/// Fields required to open a new subscription.
#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub subscriber: UserId,
    pub area_sqm: u32,
    pub address: String,
    pub postal_code: String,
    pub session_hours: u32,
    pub price_tier: PriceTierId,
    pub start_date: Timestamp,
    pub has_cat: bool,
    pub has_dog: bool,
    pub other_pets: Option<String>,
    pub coupon_discount: f64,
    pub frequency: Frequency,
    pub created_by: Option<UserId>,
}

impl Subscription {
    /// Creates a new active subscription with no booking attached yet.
    pub fn create(id: SubscriptionId, new: NewSubscription) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            subscriber: new.subscriber,
            area_sqm: new.area_sqm,
            address: new.address,
            postal_code: new.postal_code,
            session_hours: new.session_hours,
            price_tier: new.price_tier,
            start_date: new.start_date,
            next_schedule_date: Some(new.start_date),
            has_cat: new.has_cat,
            has_dog: new.has_dog,
            other_pets: new.other_pets,
            coupon_discount: new.coupon_discount,
            frequency: new.frequency,
            current_booking: None,
            is_active: true,
            created_at: now,
            updated_at: now,
            created_by: new.created_by.clone(),
            updated_by: new.created_by,
        }
    }

    /// Returns true if this subscription can be rolled forward to a new
    /// occurrence: it must be active and on a recurring frequency.
    pub fn is_renewable(&self) -> bool {
        self.is_active && self.frequency.is_recurring()
    }

    /// Points this subscription at a new current booking.
    ///
    /// Called by the renewal path after the next occurrence is created, and
    /// by explicit booking updates.
    ///
    /// # Errors
    ///
    /// Returns error if the subscription is inactive.
    pub fn attach_booking(&mut self, booking_id: BookingId) -> Result<(), SubscriptionError> {
        if !self.is_active {
            return Err(SubscriptionError::inactive(self.id));
        }
        self.current_booking = Some(booking_id);
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Records the next scheduled occurrence date.
    pub fn set_next_schedule_date(&mut self, date: Timestamp) {
        self.next_schedule_date = Some(date);
        self.updated_at = Timestamp::now();
    }

    /// Soft-deactivates the subscription.
    ///
    /// Idempotent; rows are never physically deleted.
    pub fn deactivate(&mut self, by: Option<UserId>) {
        self.is_active = false;
        self.updated_at = Timestamp::now();
        if by.is_some() {
            self.updated_by = by;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_subscription(frequency: Frequency) -> Subscription {
        Subscription::create(
            SubscriptionId::new(),
            NewSubscription {
                subscriber: UserId::new("user-1").unwrap(),
                area_sqm: 85,
                address: "12 Elm Street".to_string(),
                postal_code: "10115".to_string(),
                session_hours: 3,
                price_tier: PriceTierId::new(),
                start_date: Timestamp::now(),
                has_cat: true,
                has_dog: false,
                other_pets: None,
                coupon_discount: 0.0,
                frequency,
                created_by: None,
            },
        )
    }

    #[test]
    fn create_starts_active_without_booking() {
        let sub = new_subscription(Frequency::Weekly);
        assert!(sub.is_active);
        assert!(sub.current_booking.is_none());
        assert_eq!(sub.next_schedule_date, Some(sub.start_date));
    }

    #[test]
    fn recurring_active_subscription_is_renewable() {
        let sub = new_subscription(Frequency::Biweekly);
        assert!(sub.is_renewable());
    }

    #[test]
    fn one_time_subscription_is_never_renewable() {
        let sub = new_subscription(Frequency::OneTime);
        assert!(!sub.is_renewable());
    }

    #[test]
    fn inactive_subscription_is_not_renewable() {
        let mut sub = new_subscription(Frequency::Weekly);
        sub.deactivate(None);
        assert!(!sub.is_renewable());
    }

    #[test]
    fn attach_booking_sets_pointer() {
        let mut sub = new_subscription(Frequency::Weekly);
        let booking_id = BookingId::new();
        sub.attach_booking(booking_id).unwrap();
        assert_eq!(sub.current_booking, Some(booking_id));
    }

    #[test]
    fn attach_booking_fails_on_inactive_subscription() {
        let mut sub = new_subscription(Frequency::Weekly);
        sub.deactivate(None);
        let result = sub.attach_booking(BookingId::new());
        assert!(matches!(result, Err(SubscriptionError::Inactive(_))));
    }

    #[test]
    fn deactivate_is_soft_and_idempotent() {
        let mut sub = new_subscription(Frequency::Monthly);
        let booking_id = BookingId::new();
        sub.attach_booking(booking_id).unwrap();

        sub.deactivate(None);
        sub.deactivate(None);

        assert!(!sub.is_active);
        // No cascade: the booking pointer survives deactivation.
        assert_eq!(sub.current_booking, Some(booking_id));
    }

    #[test]
    fn deactivate_stamps_updated_by() {
        let mut sub = new_subscription(Frequency::Weekly);
        let admin = UserId::new("admin-1").unwrap();
        sub.deactivate(Some(admin.clone()));
        assert_eq!(sub.updated_by, Some(admin));
    }
}
