//! UpdateBookingHandler - applies customer/operator edits to a booking.

use std::sync::Arc;

use crate::domain::booking::{Booking, BookingError};
use crate::domain::foundation::{BookingId, Timestamp, UserId};
use crate::ports::BookingRepository;

/// Command describing the edits to apply. Absent fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct UpdateBookingCommand {
    pub booking_id: BookingId,

    /// Move the visit to a new date.
    pub new_date: Option<Timestamp>,

    /// Replace the remarks text.
    pub remarks: Option<String>,

    /// Replace the additional charges; recomputes the total due.
    pub additional_charges: Option<f64>,

    /// Record that the visit was carried out.
    pub mark_served: bool,

    pub updated_by: Option<UserId>,
}

/// Handler for booking edits.
///
/// Every edit goes through the aggregate's mutation guard: a cancelled,
/// completed, or settled booking rejects all of them.
pub struct UpdateBookingHandler {
    bookings: Arc<dyn BookingRepository>,
}

impl UpdateBookingHandler {
    pub fn new(bookings: Arc<dyn BookingRepository>) -> Self {
        Self { bookings }
    }

    pub async fn handle(&self, cmd: UpdateBookingCommand) -> Result<Booking, BookingError> {
        // 1. Load the booking
        let mut booking = self
            .bookings
            .find_by_id(&cmd.booking_id)
            .await?
            .ok_or_else(|| BookingError::not_found(cmd.booking_id))?;

        // 2. Apply the edits in order; the first guard violation aborts
        if let Some(date) = cmd.new_date {
            booking.reschedule(date)?;
        }
        if let Some(remarks) = cmd.remarks {
            booking.set_remarks(Some(remarks))?;
        }
        if let Some(charges) = cmd.additional_charges {
            booking.set_additional_charges(charges)?;
        }
        if cmd.mark_served {
            booking.mark_served()?;
        }
        if cmd.updated_by.is_some() {
            booking.updated_by = cmd.updated_by;
        }

        // 3. Persist
        self.bookings.update(&booking).await?;

        tracing::debug!(booking_id = %booking.id, "booking updated");
        Ok(booking)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::booking::{BookingCharges, BookingStatus};
    use crate::domain::foundation::PriceTierId;

    async fn seeded(store: &Arc<InMemoryStore>) -> Booking {
        let booking = Booking::create(
            BookingId::new(),
            Timestamp::now().add_days(7),
            3,
            PriceTierId::new(),
            BookingCharges {
                cleaning_price: 120.0,
                supplies_charges: 15.0,
                discount_amount: 10.0,
                vat_amount: 31.25,
            },
            None,
        );
        store.save(&booking).await.unwrap();
        booking
    }

    fn handler(store: &Arc<InMemoryStore>) -> UpdateBookingHandler {
        UpdateBookingHandler::new(store.clone())
    }

    #[tokio::test]
    async fn reschedule_and_remarks_are_persisted() {
        let store = Arc::new(InMemoryStore::new());
        let booking = seeded(&store).await;
        let new_date = Timestamp::now().add_days(10);

        let updated = handler(&store)
            .handle(UpdateBookingCommand {
                booking_id: booking.id,
                new_date: Some(new_date),
                remarks: Some("Keys under the mat".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.cleaning_date, new_date);
        assert_eq!(updated.remarks.as_deref(), Some("Keys under the mat"));

        let stored = store.find_by_id(&booking.id).await.unwrap().unwrap();
        assert_eq!(stored.cleaning_date, new_date);
    }

    #[tokio::test]
    async fn charges_update_recomputes_total() {
        let store = Arc::new(InMemoryStore::new());
        let booking = seeded(&store).await;

        let updated = handler(&store)
            .handle(UpdateBookingCommand {
                booking_id: booking.id,
                additional_charges: Some(30.5),
                ..Default::default()
            })
            .await
            .unwrap();

        // 120 + 30.5 + 15 - 10 = 155.5 -> 156
        assert_eq!(updated.total_amount, 156);
    }

    #[tokio::test]
    async fn mark_served_advances_status() {
        let store = Arc::new(InMemoryStore::new());
        let booking = seeded(&store).await;

        let updated = handler(&store)
            .handle(UpdateBookingCommand {
                booking_id: booking.id,
                mark_served: true,
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.status, BookingStatus::Served);
    }

    #[tokio::test]
    async fn cancelled_booking_rejects_all_edits() {
        let store = Arc::new(InMemoryStore::new());
        let mut booking = seeded(&store).await;
        booking.cancel().unwrap();
        store.update(&booking).await.unwrap();

        let err = handler(&store)
            .handle(UpdateBookingCommand {
                booking_id: booking.id,
                additional_charges: Some(5.0),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::Locked { .. }));
    }

    #[tokio::test]
    async fn missing_booking_reports_not_found() {
        let store = Arc::new(InMemoryStore::new());
        let err = handler(&store)
            .handle(UpdateBookingCommand {
                booking_id: BookingId::new(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::NotFound(_)));
    }
}
