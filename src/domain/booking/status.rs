//! Booking status state machine.
//!
//! Booking states advance forward only; `Cancelled` is terminal and
//! reachable from any non-terminal state.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Lifecycle status of one booking occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Booked, not yet carried out.
    Initiated,

    /// The cleaning visit took place.
    Served,

    /// Visit confirmed and closed out.
    Completed,

    /// Called off before completion. Terminal.
    Cancelled,
}

impl BookingStatus {
    /// Returns true if the booking can still be modified.
    ///
    /// Completed and cancelled bookings are frozen.
    pub fn is_mutable(&self) -> bool {
        matches!(self, BookingStatus::Initiated | BookingStatus::Served)
    }
}

impl StateMachine for BookingStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use BookingStatus::*;
        matches!(
            (self, target),
            (Initiated, Served)
                | (Served, Completed)
                | (Initiated, Cancelled)
                | (Served, Cancelled)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use BookingStatus::*;
        match self {
            Initiated => vec![Served, Cancelled],
            Served => vec![Completed, Cancelled],
            Completed => vec![],
            Cancelled => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initiated_can_be_served_or_cancelled() {
        assert!(BookingStatus::Initiated.can_transition_to(&BookingStatus::Served));
        assert!(BookingStatus::Initiated.can_transition_to(&BookingStatus::Cancelled));
    }

    #[test]
    fn initiated_cannot_skip_to_completed() {
        assert!(!BookingStatus::Initiated.can_transition_to(&BookingStatus::Completed));
    }

    #[test]
    fn served_can_complete_or_cancel() {
        assert!(BookingStatus::Served.can_transition_to(&BookingStatus::Completed));
        assert!(BookingStatus::Served.can_transition_to(&BookingStatus::Cancelled));
    }

    #[test]
    fn status_never_moves_backward() {
        assert!(!BookingStatus::Served.can_transition_to(&BookingStatus::Initiated));
        assert!(!BookingStatus::Completed.can_transition_to(&BookingStatus::Served));
    }

    #[test]
    fn completed_and_cancelled_are_terminal() {
        assert!(BookingStatus::Completed.is_terminal());
        assert!(BookingStatus::Cancelled.is_terminal());
    }

    #[test]
    fn only_open_states_are_mutable() {
        assert!(BookingStatus::Initiated.is_mutable());
        assert!(BookingStatus::Served.is_mutable());
        assert!(!BookingStatus::Completed.is_mutable());
        assert!(!BookingStatus::Cancelled.is_mutable());
    }
}
