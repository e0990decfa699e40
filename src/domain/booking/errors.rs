//! Booking-specific error types.

use crate::domain::foundation::{BookingId, DomainError, ErrorCode};

/// Booking-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// Booking was not found.
    NotFound(BookingId),

    /// Booking is frozen: cancelled, completed, or payment settled.
    Locked { id: BookingId, attempted: String },

    /// Invalid state for the requested transition.
    InvalidState { current: String, attempted: String },

    /// Validation failed.
    ValidationFailed { field: String, message: String },

    /// Infrastructure error.
    Infrastructure(String),
}

impl BookingError {
    pub fn not_found(id: BookingId) -> Self {
        BookingError::NotFound(id)
    }

    pub fn locked(id: BookingId, attempted: impl Into<String>) -> Self {
        BookingError::Locked {
            id,
            attempted: attempted.into(),
        }
    }

    pub fn invalid_state(current: impl Into<String>, attempted: impl Into<String>) -> Self {
        BookingError::InvalidState {
            current: current.into(),
            attempted: attempted.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        BookingError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        BookingError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            BookingError::NotFound(_) => ErrorCode::BookingNotFound,
            BookingError::Locked { .. } => ErrorCode::BookingLocked,
            BookingError::InvalidState { .. } => ErrorCode::InvalidStateTransition,
            BookingError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            BookingError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-friendly error message.
    pub fn message(&self) -> String {
        match self {
            BookingError::NotFound(id) => format!("Booking not found: {}", id),
            BookingError::Locked { id, attempted } => format!(
                "Cannot {} booking {}: it is completed, cancelled, or already paid",
                attempted, id
            ),
            BookingError::InvalidState { current, attempted } => {
                format!("Cannot move booking from {} to {}", current, attempted)
            }
            BookingError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            BookingError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }
}

impl std::fmt::Display for BookingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for BookingError {}

impl From<DomainError> for BookingError {
    fn from(err: DomainError) -> Self {
        BookingError::Infrastructure(err.to_string())
    }
}

impl From<BookingError> for DomainError {
    fn from(err: BookingError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_carries_id_and_code() {
        let id = BookingId::new();
        let err = BookingError::not_found(id);
        assert_eq!(err.code(), ErrorCode::BookingNotFound);
        assert!(err.message().contains(&id.to_string()));
    }

    #[test]
    fn locked_message_names_the_attempt() {
        let err = BookingError::locked(BookingId::new(), "reschedule");
        assert!(err.message().contains("reschedule"));
        assert_eq!(err.code(), ErrorCode::BookingLocked);
    }

    #[test]
    fn converts_to_domain_error() {
        let err = BookingError::invalid_state("Completed", "Served");
        let domain_err: DomainError = err.clone().into();
        assert_eq!(domain_err.code, err.code());
    }
}
