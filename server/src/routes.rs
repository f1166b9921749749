//! Router configuration.
//!
//! Builds the complete Axum router with all endpoints.

use crate::handlers::{health, payments, registrations};
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Build the complete Axum router.
///
/// # Routes
///
/// ## Registrations
/// - `POST /registrations` - Create a paid/bypassed registration
/// - `POST /registrations/pre-register` - Capture interest
/// - `GET /registrations/events/:event_id/export` - CSV export
///
/// ## Payments
/// - `POST /payment/order` - Create a gateway order
/// - `POST /payment/verify` - Confirm a completed payment
/// - `POST /payment/failed` - Record an abandonment/failure
///
/// ## Probes
/// - `GET /health`, `GET /ready`
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health checks
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Registrations
        .route("/registrations", post(registrations::register))
        .route(
            "/registrations/pre-register",
            post(registrations::pre_register),
        )
        .route(
            "/registrations/events/:event_id/export",
            get(registrations::export_event),
        )
        // Payments
        .route("/payment/order", post(payments::create_order))
        .route("/payment/verify", post(payments::verify_payment))
        .route("/payment/failed", post(payments::payment_failed))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
