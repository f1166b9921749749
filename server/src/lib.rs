//! # FestPass Server
//!
//! Axum HTTP surface for the FestPass registration and payment workflow.
//!
//! The server is a thin shell: handlers decode DTOs, call into
//! [`festpass_registration::RegistrationService`], and map domain errors
//! to HTTP responses. All orchestration lives in the registration crate.

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use routes::build_router;
pub use state::AppState;
