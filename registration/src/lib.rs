//! # FestPass Registration
//!
//! Registration and payment orchestration for event passes: attendees buy
//! an access pass bundled with optional per-event selections, pay through
//! a third-party gateway, and receive a durable, uniquely identified
//! registration record.
//!
//! ## Architecture
//!
//! The workflow is a pipeline of small, separately testable pieces:
//!
//! ```text
//! intake ─► pricing ─► ticket id ─► store (Pending | Completed)
//!                                      │
//!        gateway order ◄───────────────┘ (client pays)
//!                                      │
//!   callback verifier ─► transition engine ─► notification fan-out
//! ```
//!
//! External collaborators (gateway, mailer, ledger, webhook, stores) sit
//! behind traits in [`providers`] and [`stores`] and are injected through
//! [`environment::RegistrationEnvironment`] — never loaded mid-request.
//!
//! Payment truth comes first: once a `Completed` transition commits,
//! notification failures are logged and swallowed, never surfaced to the
//! client and never rolled back.

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

// Public modules
pub mod config;
pub mod environment;
pub mod error;
pub mod lifecycle;
pub mod metrics;
pub mod mocks;
pub mod notifications;
pub mod pricing;
pub mod providers;
pub mod service;
pub mod signature;
pub mod stores;
pub mod ticket;
pub mod types;

// Re-export main types for convenience
pub use config::Config;
pub use environment::RegistrationEnvironment;
pub use error::{RegistrationError, Result};
pub use service::{RegistrationRequest, RegistrationService};
pub use types::{
    Amount, Attendee, EventId, Pass, PassId, PaymentStatus, Registration, RegistrationId,
    SubEvent, TicketId,
};
