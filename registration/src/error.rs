//! Error types for registration and payment operations.

use crate::types::{PassId, PaymentStatus, RegistrationId, TicketId};
use thiserror::Error;

/// Result type alias for registration operations.
pub type Result<T> = std::result::Result<T, RegistrationError>;

/// Error taxonomy for the registration and payment workflow.
///
/// Organized by category so callers can distinguish client mistakes
/// (rejected with no side effects) from infrastructure failures.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RegistrationError {
    // ═══════════════════════════════════════════════════════════
    // Validation Errors
    // ═══════════════════════════════════════════════════════════

    /// A required attendee field is missing or empty.
    #[error("Missing required field: {field}")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// The referenced pass does not exist.
    #[error("Pass {pass_id} not found")]
    PassNotFound {
        /// Requested pass.
        pass_id: PassId,
    },

    /// The referenced pass exists but is not purchasable.
    #[error("Pass {pass_id} is not active")]
    PassInactive {
        /// Requested pass.
        pass_id: PassId,
    },

    /// One or more selected sub-events do not exist.
    #[error("Selected events not found: requested {requested}, found {found}")]
    EventCountMismatch {
        /// Number of event ids in the request.
        requested: usize,
        /// Number resolved from the catalog.
        found: usize,
    },

    /// The referenced registration does not exist.
    #[error("Registration {id} not found")]
    RegistrationNotFound {
        /// Requested registration.
        id: RegistrationId,
    },

    // ═══════════════════════════════════════════════════════════
    // Ticket Identifier Errors
    // ═══════════════════════════════════════════════════════════

    /// The minted ticket identifier collided with an existing one.
    #[error("Ticket identifier {ticket_id} already exists")]
    DuplicateTicketId {
        /// The colliding identifier.
        ticket_id: TicketId,
    },

    /// Every regeneration attempt collided; intake gave up.
    #[error("Could not mint a unique ticket identifier after {attempts} attempts")]
    TicketIdExhausted {
        /// How many identifiers were tried.
        attempts: u32,
    },

    // ═══════════════════════════════════════════════════════════
    // Payment Errors
    // ═══════════════════════════════════════════════════════════

    /// The gateway callback signature did not match.
    #[error("Invalid payment signature")]
    InvalidSignature,

    /// The requested status transition is not allowed.
    #[error("Cannot transition registration {id} from {from} to {to}")]
    InvalidTransition {
        /// Registration being transitioned.
        id: RegistrationId,
        /// Status observed in the store.
        from: PaymentStatus,
        /// Requested target status.
        to: PaymentStatus,
    },

    /// The payment gateway rejected or failed an order request.
    #[error("Payment gateway error: {0}")]
    Gateway(String),

    // ═══════════════════════════════════════════════════════════
    // Notification Errors
    // ═══════════════════════════════════════════════════════════

    /// Confirmation email delivery failed.
    #[error("Email delivery failed: {0}")]
    Email(String),

    /// Ledger append failed.
    #[error("Ledger append failed: {0}")]
    Ledger(String),

    /// Automation webhook dispatch failed.
    #[error("Webhook dispatch failed: {0}")]
    Webhook(String),

    // ═══════════════════════════════════════════════════════════
    // System Errors
    // ═══════════════════════════════════════════════════════════

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(String),
}

impl RegistrationError {
    /// Returns `true` if this error is due to invalid client input.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::MissingField { .. }
                | Self::PassNotFound { .. }
                | Self::PassInactive { .. }
                | Self::EventCountMismatch { .. }
                | Self::RegistrationNotFound { .. }
                | Self::InvalidSignature
        )
    }
}
