//! Payment status state machine.
//!
//! Payment advances independently of the booking status:
//! `Pending → Initiated → Created → Completed`, with `Failed` terminal and
//! reachable from any non-completed state.

use crate::domain::foundation::StateMachine;
use serde::{Deserialize, Serialize};

/// Payment lifecycle of a booking occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// No payment attempt yet.
    Pending,

    /// Payment flow started by the customer.
    Initiated,

    /// Payment intent created at the gateway.
    Created,

    /// Funds captured. Terminal.
    Completed,

    /// Payment attempt failed. Terminal.
    Failed,
}

impl PaymentStatus {
    /// Returns true once funds have been captured.
    pub fn is_settled(&self) -> bool {
        matches!(self, PaymentStatus::Completed)
    }
}

impl StateMachine for PaymentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use PaymentStatus::*;
        matches!(
            (self, target),
            (Pending, Initiated)
                | (Initiated, Created)
                | (Created, Completed)
                | (Pending, Failed)
                | (Initiated, Failed)
                | (Created, Failed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use PaymentStatus::*;
        match self {
            Pending => vec![Initiated, Failed],
            Initiated => vec![Created, Failed],
            Created => vec![Completed, Failed],
            Completed => vec![],
            Failed => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_advances_in_order() {
        let status = PaymentStatus::Pending
            .transition_to(PaymentStatus::Initiated)
            .unwrap()
            .transition_to(PaymentStatus::Created)
            .unwrap()
            .transition_to(PaymentStatus::Completed)
            .unwrap();
        assert_eq!(status, PaymentStatus::Completed);
    }

    #[test]
    fn any_non_completed_state_can_fail() {
        assert!(PaymentStatus::Pending.can_transition_to(&PaymentStatus::Failed));
        assert!(PaymentStatus::Initiated.can_transition_to(&PaymentStatus::Failed));
        assert!(PaymentStatus::Created.can_transition_to(&PaymentStatus::Failed));
    }

    #[test]
    fn completed_cannot_fail() {
        assert!(!PaymentStatus::Completed.can_transition_to(&PaymentStatus::Failed));
    }

    #[test]
    fn stages_cannot_be_skipped() {
        assert!(!PaymentStatus::Pending.can_transition_to(&PaymentStatus::Created));
        assert!(!PaymentStatus::Pending.can_transition_to(&PaymentStatus::Completed));
        assert!(!PaymentStatus::Initiated.can_transition_to(&PaymentStatus::Completed));
    }

    #[test]
    fn completed_and_failed_are_terminal() {
        assert!(PaymentStatus::Completed.is_terminal());
        assert!(PaymentStatus::Failed.is_terminal());
    }

    #[test]
    fn only_completed_is_settled() {
        assert!(PaymentStatus::Completed.is_settled());
        assert!(!PaymentStatus::Pending.is_settled());
        assert!(!PaymentStatus::Failed.is_settled());
    }
}
