//! Booking aggregate entity.
//!
//! A Booking is one concrete scheduled cleaning occurrence. It carries its own
//! status and payment lifecycles, and a money breakdown whose total is always
//! the ceiling of its components.
//!
//! # Design Decisions
//!
//! - **Ceiling total**: charge components are fractional currency units; the
//!   amount actually due is rounded up to a whole unit
//! - **Frozen once finished**: no field changes after the booking is
//!   cancelled/completed or its payment has settled
//! - **Renewal clones**: the next occurrence copies price, duration, and
//!   charges from the expiring booking, shifted by one period

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{BookingId, PriceTierId, StateMachine, Timestamp, UserId};

use super::{BookingError, BookingStatus, PaymentStatus};

/// Booking aggregate - one scheduled cleaning occurrence.
///
/// # Invariants
///
/// - `total_amount == ceil(cleaning_price + additional_charges +
///   supplies_charges - discount_amount)`
/// - Mutations are rejected once `status` is Cancelled/Completed or
///   `payment_status` is Completed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Unique identifier for this booking.
    pub id: BookingId,

    /// Scheduled date and time of the cleaning visit.
    pub cleaning_date: Timestamp,

    /// Duration of the visit in hours.
    pub duration_hours: u32,

    /// Pricing tier this booking was priced against.
    pub price_tier: PriceTierId,

    /// Base price of the cleaning session.
    pub cleaning_price: f64,

    /// Extra charges added after booking (e.g. oven, windows).
    pub additional_charges: f64,

    /// Surcharge for cleaning supplies.
    pub supplies_charges: f64,

    /// Discount applied to this occurrence.
    pub discount_amount: f64,

    /// VAT portion of the total, tracked for invoicing.
    pub vat_amount: f64,

    /// Amount due, always the ceiling of the component sum.
    pub total_amount: i64,

    /// Booking lifecycle status.
    pub status: BookingStatus,

    /// Payment lifecycle status, advances independently.
    pub payment_status: PaymentStatus,

    /// Free-form notes from the customer or cleaner.
    pub remarks: Option<String>,

    /// Soft-delete flag. A booking superseded by renewal is deactivated.
    pub is_active: bool,

    /// When the booking was created.
    pub created_at: Timestamp,

    /// When the booking was last updated.
    pub updated_at: Timestamp,

    /// Who created the booking, when an authenticated caller is known.
    pub created_by: Option<UserId>,

    /// Who last updated the booking.
    pub updated_by: Option<UserId>,
}

/// Money breakdown for a new booking.
#[derive(Debug, Clone)]
pub struct BookingCharges {
    pub cleaning_price: f64,
    pub supplies_charges: f64,
    pub discount_amount: f64,
    pub vat_amount: f64,
}

impl Booking {
    /// Creates the first occurrence for a subscription.
    ///
    /// Starts at `Initiated`/`Pending`, active, with no additional charges.
    pub fn create(
        id: BookingId,
        cleaning_date: Timestamp,
        duration_hours: u32,
        price_tier: PriceTierId,
        charges: BookingCharges,
        created_by: Option<UserId>,
    ) -> Self {
        let now = Timestamp::now();
        let mut booking = Self {
            id,
            cleaning_date,
            duration_hours,
            price_tier,
            cleaning_price: charges.cleaning_price,
            additional_charges: 0.0,
            supplies_charges: charges.supplies_charges,
            discount_amount: charges.discount_amount,
            vat_amount: charges.vat_amount,
            total_amount: 0,
            status: BookingStatus::Initiated,
            payment_status: PaymentStatus::Pending,
            remarks: None,
            is_active: true,
            created_at: now,
            updated_at: now,
            created_by: created_by.clone(),
            updated_by: created_by,
        };
        booking.recompute_total();
        booking
    }

    /// Clones an expiring booking into its next occurrence.
    ///
    /// Price, duration, and charges carry over; the date shifts to
    /// `next_date`, and both lifecycles restart at `Initiated`/`Pending`.
    pub fn renew_from(previous: &Booking, id: BookingId, next_date: Timestamp) -> Self {
        let now = Timestamp::now();
        let mut booking = Self {
            id,
            cleaning_date: next_date,
            duration_hours: previous.duration_hours,
            price_tier: previous.price_tier,
            cleaning_price: previous.cleaning_price,
            additional_charges: previous.additional_charges,
            supplies_charges: previous.supplies_charges,
            discount_amount: previous.discount_amount,
            vat_amount: previous.vat_amount,
            total_amount: 0,
            status: BookingStatus::Initiated,
            payment_status: PaymentStatus::Pending,
            remarks: None,
            is_active: true,
            created_at: now,
            updated_at: now,
            created_by: previous.created_by.clone(),
            updated_by: None,
        };
        booking.recompute_total();
        booking
    }

    /// Returns true if the booking can still be modified.
    ///
    /// Frozen once the booking is cancelled/completed or payment settled.
    pub fn is_mutable(&self) -> bool {
        self.status.is_mutable() && !self.payment_status.is_settled()
    }

    /// Reschedules the cleaning visit.
    ///
    /// # Errors
    ///
    /// Returns error if the booking is frozen.
    pub fn reschedule(&mut self, new_date: Timestamp) -> Result<(), BookingError> {
        self.ensure_mutable("reschedule")?;
        self.cleaning_date = new_date;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Replaces the remarks text.
    ///
    /// # Errors
    ///
    /// Returns error if the booking is frozen.
    pub fn set_remarks(&mut self, remarks: Option<String>) -> Result<(), BookingError> {
        self.ensure_mutable("update remarks on")?;
        self.remarks = remarks;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Sets the additional charges and recomputes the total due.
    ///
    /// # Errors
    ///
    /// Returns error if the booking is frozen.
    pub fn set_additional_charges(&mut self, charges: f64) -> Result<(), BookingError> {
        self.ensure_mutable("change charges on")?;
        self.additional_charges = charges;
        self.recompute_total();
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Marks the visit as carried out.
    ///
    /// # Errors
    ///
    /// Returns error if the booking is frozen or the transition is invalid.
    pub fn mark_served(&mut self) -> Result<(), BookingError> {
        self.ensure_mutable("mark served")?;
        self.transition_status(BookingStatus::Served)?;
        Ok(())
    }

    /// Closes out a served visit.
    pub fn complete(&mut self) -> Result<(), BookingError> {
        self.transition_status(BookingStatus::Completed)?;
        Ok(())
    }

    /// Calls the booking off.
    pub fn cancel(&mut self) -> Result<(), BookingError> {
        self.transition_status(BookingStatus::Cancelled)?;
        Ok(())
    }

    /// Advances the payment lifecycle.
    ///
    /// # Errors
    ///
    /// Returns error if the transition is invalid.
    pub fn advance_payment(&mut self, target: PaymentStatus) -> Result<(), BookingError> {
        self.payment_status = self.payment_status.transition_to(target).map_err(|_| {
            BookingError::invalid_state(
                format!("{:?}", self.payment_status),
                format!("move payment to {:?}", target),
            )
        })?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Soft-deactivates the booking, typically when superseded by renewal.
    ///
    /// Idempotent; the row is never physically deleted.
    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.updated_at = Timestamp::now();
    }

    /// Recomputes `total_amount` as the ceiling of the component sum.
    fn recompute_total(&mut self) {
        let sum = self.cleaning_price + self.additional_charges + self.supplies_charges
            - self.discount_amount;
        self.total_amount = sum.ceil() as i64;
    }

    fn ensure_mutable(&self, attempted: &str) -> Result<(), BookingError> {
        if !self.is_mutable() {
            return Err(BookingError::locked(self.id, attempted));
        }
        Ok(())
    }

    fn transition_status(&mut self, target: BookingStatus) -> Result<(), BookingError> {
        self.status = self.status.transition_to(target).map_err(|_| {
            BookingError::invalid_state(format!("{:?}", self.status), format!("{:?}", target))
        })?;
        self.updated_at = Timestamp::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_charges() -> BookingCharges {
        BookingCharges {
            cleaning_price: 120.0,
            supplies_charges: 15.0,
            discount_amount: 10.0,
            vat_amount: 23.75,
        }
    }

    fn test_booking() -> Booking {
        Booking::create(
            BookingId::new(),
            Timestamp::now().add_days(7),
            3,
            PriceTierId::new(),
            test_charges(),
            None,
        )
    }

    // Construction tests

    #[test]
    fn create_starts_initiated_pending_active() {
        let booking = test_booking();
        assert_eq!(booking.status, BookingStatus::Initiated);
        assert_eq!(booking.payment_status, PaymentStatus::Pending);
        assert!(booking.is_active);
        assert_eq!(booking.additional_charges, 0.0);
    }

    #[test]
    fn create_computes_ceiling_total() {
        let booking = test_booking();
        // 120 + 0 + 15 - 10 = 125
        assert_eq!(booking.total_amount, 125);
    }

    #[test]
    fn fractional_sum_rounds_up() {
        let mut charges = test_charges();
        charges.cleaning_price = 120.40;
        let booking = Booking::create(
            BookingId::new(),
            Timestamp::now(),
            2,
            PriceTierId::new(),
            charges,
            None,
        );
        // 120.40 + 15 - 10 = 125.40 -> 126
        assert_eq!(booking.total_amount, 126);
    }

    // Charge update tests

    #[test]
    fn set_additional_charges_recomputes_total() {
        let mut booking = test_booking();
        booking.set_additional_charges(30.5).unwrap();
        // 120 + 30.5 + 15 - 10 = 155.5 -> 156
        assert_eq!(booking.total_amount, 156);
    }

    #[test]
    fn charges_rejected_once_completed() {
        let mut booking = test_booking();
        booking.mark_served().unwrap();
        booking.complete().unwrap();

        let result = booking.set_additional_charges(5.0);
        assert!(matches!(result, Err(BookingError::Locked { .. })));
    }

    #[test]
    fn charges_rejected_once_cancelled() {
        let mut booking = test_booking();
        booking.cancel().unwrap();
        assert!(booking.set_additional_charges(5.0).is_err());
        assert!(booking.reschedule(Timestamp::now()).is_err());
    }

    #[test]
    fn mutations_rejected_once_payment_settled() {
        let mut booking = test_booking();
        booking.advance_payment(PaymentStatus::Initiated).unwrap();
        booking.advance_payment(PaymentStatus::Created).unwrap();
        booking.advance_payment(PaymentStatus::Completed).unwrap();

        assert!(!booking.is_mutable());
        assert!(booking.set_remarks(Some("late".into())).is_err());
    }

    // Lifecycle tests

    #[test]
    fn served_then_completed_happy_path() {
        let mut booking = test_booking();
        booking.mark_served().unwrap();
        assert_eq!(booking.status, BookingStatus::Served);
        booking.complete().unwrap();
        assert_eq!(booking.status, BookingStatus::Completed);
    }

    #[test]
    fn cannot_complete_before_served() {
        let mut booking = test_booking();
        assert!(booking.complete().is_err());
    }

    #[test]
    fn cannot_mark_served_twice() {
        let mut booking = test_booking();
        booking.mark_served().unwrap();
        assert!(booking.mark_served().is_err());
    }

    #[test]
    fn payment_failure_is_terminal() {
        let mut booking = test_booking();
        booking.advance_payment(PaymentStatus::Failed).unwrap();
        assert!(booking.advance_payment(PaymentStatus::Initiated).is_err());
    }

    // Renewal clone tests

    #[test]
    fn renew_from_copies_charges_and_shifts_date() {
        let mut previous = test_booking();
        previous.set_additional_charges(20.0).unwrap();
        let next_date = previous.cleaning_date.add_days(7);

        let next = Booking::renew_from(&previous, BookingId::new(), next_date);

        assert_eq!(next.cleaning_date, next_date);
        assert_eq!(next.duration_hours, previous.duration_hours);
        assert_eq!(next.cleaning_price, previous.cleaning_price);
        assert_eq!(next.additional_charges, previous.additional_charges);
        assert_eq!(next.total_amount, previous.total_amount);
        assert_ne!(next.id, previous.id);
    }

    #[test]
    fn renew_from_restarts_both_lifecycles() {
        let mut previous = test_booking();
        previous.mark_served().unwrap();
        previous.complete().unwrap();

        let next = Booking::renew_from(
            &previous,
            BookingId::new(),
            previous.cleaning_date.add_days(14),
        );

        assert_eq!(next.status, BookingStatus::Initiated);
        assert_eq!(next.payment_status, PaymentStatus::Pending);
        assert!(next.is_active);
        assert!(next.remarks.is_none());
    }

    #[test]
    fn deactivate_is_idempotent() {
        let mut booking = test_booking();
        booking.deactivate();
        booking.deactivate();
        assert!(!booking.is_active);
    }

    proptest! {
        // total_amount == ceil(price + additional + supplies - discount)
        #[test]
        fn total_is_ceiling_of_components(
            price in 0.0f64..10_000.0,
            additional in 0.0f64..1_000.0,
            supplies in 0.0f64..500.0,
            discount in 0.0f64..500.0,
        ) {
            let mut booking = Booking::create(
                BookingId::new(),
                Timestamp::now(),
                2,
                PriceTierId::new(),
                BookingCharges {
                    cleaning_price: price,
                    supplies_charges: supplies,
                    discount_amount: discount,
                    vat_amount: 0.0,
                },
                None,
            );
            booking.set_additional_charges(additional).unwrap();

            let expected = (price + additional + supplies - discount).ceil() as i64;
            prop_assert_eq!(booking.total_amount, expected);
        }
    }
}
