//! Booking repository port (write side).
//!
//! Defines the contract for persisting Booking aggregates. Direct CRUD
//! operations propagate errors to the caller; there is no silent degradation
//! on this side of the split.
//!
//! # Design
//!
//! - **Soft delete**: "delete" in this domain means `is_active = false` via
//!   update; rows are never physically removed
//! - **Stamped updates**: every update refreshes `updated_at`

use crate::domain::booking::Booking;
use crate::domain::foundation::{BookingId, DomainError};
use async_trait::async_trait;

/// Repository port for Booking aggregate persistence.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Save a new booking.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, booking: &Booking) -> Result<(), DomainError>;

    /// Update an existing booking. Always stamps `updated_at`.
    ///
    /// # Errors
    ///
    /// - `BookingNotFound` if the booking doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, booking: &Booking) -> Result<(), DomainError>;

    /// Find a booking by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError>;

    /// Count all bookings, active or not.
    async fn count(&self) -> Result<u64, DomainError>;

    /// Soft-deactivate a booking (`is_active = false`).
    ///
    /// # Errors
    ///
    /// - `BookingNotFound` if the booking doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn deactivate(&self, id: &BookingId) -> Result<(), DomainError>;
}
