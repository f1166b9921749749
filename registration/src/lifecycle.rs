//! Registration status transition engine.
//!
//! The state machine governing a registration's payment lifecycle:
//!
//! ```text
//! Pending ──► Completed        (verified callback, or bypass at creation)
//! Pending ──► Failed           (dismissed/failed checkout, repeatable)
//! Failed  ──► Completed        (explicit retry after a dismissed checkout)
//! Failed  ──► Failed           (repeated failure callbacks)
//! PreRegistered                (terminal, never entered from Pending)
//! ```
//!
//! Stores apply transitions as atomic conditional updates guarded by
//! [`Transition::allowed_from`]. When the guard finds no matching row, the
//! current row is classified by [`replay_outcome`]: an identical success
//! replay reports [`TransitionOutcome::AlreadyApplied`] (so callers skip
//! re-notification); anything else is an invalid transition.

use crate::error::{RegistrationError, Result};
use crate::types::{PaymentStatus, Registration};

/// A requested change to a registration's payment status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Record a verified payment: status `Completed`, gateway payment id set.
    Complete {
        /// Gateway-assigned payment identifier.
        payment_id: String,
    },
    /// Record a dismissed or rejected payment attempt.
    Fail {
        /// Free-text reason for audit.
        reason: String,
    },
}

impl Transition {
    /// The status this transition moves the registration to.
    #[must_use]
    pub const fn target(&self) -> PaymentStatus {
        match self {
            Self::Complete { .. } => PaymentStatus::Completed,
            Self::Fail { .. } => PaymentStatus::Failed,
        }
    }

    /// Statuses this transition may be applied from.
    ///
    /// `Failed` is deliberately retryable: a successful callback after a
    /// dismissed checkout still completes the registration.
    #[must_use]
    pub const fn allowed_from(&self) -> &'static [PaymentStatus] {
        match self {
            Self::Complete { .. } | Self::Fail { .. } => {
                &[PaymentStatus::Pending, PaymentStatus::Failed]
            }
        }
    }
}

/// Result of applying a transition through a store.
#[derive(Debug, Clone, PartialEq)]
pub enum TransitionOutcome {
    /// The transition was applied; the registration reflects the new state.
    Applied(Registration),
    /// The registration already carried the requested final state
    /// (duplicate callback delivery). Side effects must NOT fire again.
    AlreadyApplied(Registration),
}

impl TransitionOutcome {
    /// The registration after the transition (applied or replayed).
    #[must_use]
    pub const fn registration(&self) -> &Registration {
        match self {
            Self::Applied(registration) | Self::AlreadyApplied(registration) => registration,
        }
    }
}

/// Classify a transition whose conditional update matched no row.
///
/// Called by stores with the row as currently persisted. A `Complete`
/// transition against a row that is already `Completed` with the same
/// gateway payment id is an idempotent replay and succeeds without
/// side effects; every other miss is an invalid transition.
///
/// # Errors
///
/// Returns [`RegistrationError::InvalidTransition`] when the current
/// status does not admit the requested transition.
pub fn replay_outcome(current: Registration, transition: &Transition) -> Result<TransitionOutcome> {
    if let Transition::Complete { payment_id } = transition {
        if current.payment_status == PaymentStatus::Completed
            && current.payment_id.as_deref() == Some(payment_id.as_str())
        {
            return Ok(TransitionOutcome::AlreadyApplied(current));
        }
    }

    Err(RegistrationError::InvalidTransition {
        id: current.id,
        from: current.payment_status,
        to: transition.target(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{
        Amount, Attendee, PassId, Registration, RegistrationId, TicketId,
    };
    use chrono::Utc;

    fn registration(status: PaymentStatus, payment_id: Option<&str>) -> Registration {
        Registration {
            id: RegistrationId::new(),
            ticket_id: TicketId::new("SP1234"),
            pass_id: PassId::new(),
            event_ids: vec![],
            attendee: Attendee {
                name: "Asha".to_string(),
                roll_no: "21CS042".to_string(),
                email: "asha@example.com".to_string(),
                phone: "9876543210".to_string(),
                department: "CSE".to_string(),
                year: "3".to_string(),
                college: "Govt Engineering College".to_string(),
                district: "Kochi".to_string(),
            },
            amount: Amount::from_raw("600"),
            payment_status: status,
            payment_id: payment_id.map(str::to_string),
            failure_reason: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_complete_targets_completed() {
        let transition = Transition::Complete {
            payment_id: "pay_1".to_string(),
        };
        assert_eq!(transition.target(), PaymentStatus::Completed);
        assert_eq!(
            transition.allowed_from(),
            &[PaymentStatus::Pending, PaymentStatus::Failed]
        );
    }

    #[test]
    fn test_pre_registered_is_terminal() {
        let transition = Transition::Complete {
            payment_id: "pay_1".to_string(),
        };
        assert!(!transition
            .allowed_from()
            .contains(&PaymentStatus::PreRegistered));

        let transition = Transition::Fail {
            reason: "dismissed".to_string(),
        };
        assert!(!transition
            .allowed_from()
            .contains(&PaymentStatus::PreRegistered));
    }

    #[test]
    fn test_completed_is_not_a_source() {
        let transition = Transition::Fail {
            reason: "late callback".to_string(),
        };
        assert!(!transition.allowed_from().contains(&PaymentStatus::Completed));
    }

    #[test]
    fn test_duplicate_success_callback_is_idempotent() {
        let current = registration(PaymentStatus::Completed, Some("pay_1"));
        let transition = Transition::Complete {
            payment_id: "pay_1".to_string(),
        };

        let outcome = replay_outcome(current.clone(), &transition).unwrap();
        assert_eq!(outcome, TransitionOutcome::AlreadyApplied(current));
    }

    #[test]
    fn test_success_callback_with_different_payment_id_rejected() {
        let current = registration(PaymentStatus::Completed, Some("pay_1"));
        let transition = Transition::Complete {
            payment_id: "pay_2".to_string(),
        };

        let err = replay_outcome(current, &transition).unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::InvalidTransition {
                from: PaymentStatus::Completed,
                to: PaymentStatus::Completed,
                ..
            }
        ));
    }

    #[test]
    fn test_failure_against_completed_rejected() {
        let current = registration(PaymentStatus::Completed, Some("pay_1"));
        let transition = Transition::Fail {
            reason: "late dismissal".to_string(),
        };

        assert!(replay_outcome(current, &transition).is_err());
    }

    #[test]
    fn test_transition_against_pre_registered_rejected() {
        let current = registration(PaymentStatus::PreRegistered, None);
        let transition = Transition::Complete {
            payment_id: "pay_1".to_string(),
        };

        let err = replay_outcome(current, &transition).unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::InvalidTransition {
                from: PaymentStatus::PreRegistered,
                ..
            }
        ));
    }
}
