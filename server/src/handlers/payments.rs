//! Payment API endpoints.
//!
//! - `POST /payment/order` - Create a gateway order for an existing
//!   registration
//! - `POST /payment/verify` - Confirm a completed payment via the
//!   gateway's signature callback
//! - `POST /payment/failed` - Record a payment abandonment/failure
//!
//! # Payment Flow
//!
//! 1. Client registers (`POST /registrations`), gets a Pending record
//! 2. Client requests a gateway order and opens the checkout widget
//! 3. Gateway reports success to the client with a signature
//! 4. Client posts the signature here for server-side verification
//! 5. Verified payment transitions the registration and fans out
//!    notifications; the response never depends on notification outcomes

use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use festpass_registration::providers::GatewayOrder;
use festpass_registration::types::{Amount, RegistrationId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to create a gateway order.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderRequest {
    /// Amount to collect (raw catalog string; only the first tier of a
    /// dual-tier `"X/Y"` price is charged).
    pub amount: String,
    /// Idempotency receipt, conventionally the registration id.
    pub receipt: String,
}

/// Request to verify a completed payment.
///
/// The `razorpay_*` field names are the gateway's own callback fields,
/// passed through by the checkout widget.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyPaymentRequest {
    /// Gateway order identifier.
    pub razorpay_order_id: String,
    /// Gateway payment identifier.
    pub razorpay_payment_id: String,
    /// Gateway-supplied HMAC signature.
    pub razorpay_signature: String,
    /// Registration to credit.
    #[serde(rename = "registrationId")]
    pub registration_id: Uuid,
}

/// Request to record a payment failure.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentFailedRequest {
    /// Registration whose payment attempt failed.
    #[serde(rename = "registrationId")]
    pub registration_id: Uuid,
    /// Free-text reason for audit.
    pub reason: String,
}

/// Simple message response.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    /// Message for the user.
    pub message: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Create a gateway order.
///
/// The registration already exists in Pending state, so a gateway outage
/// here leaves a valid, payable-later registration rather than blocking
/// registration capture.
pub async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<GatewayOrder>), AppError> {
    let order = state
        .service
        .create_order(&Amount::from_raw(request.amount), request.receipt)
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// Verify a completed payment.
///
/// On a signature match the registration transitions to `Completed` and
/// the notification fan-out runs; a duplicate delivery replays
/// idempotently without re-notifying. On mismatch the registration stays
/// Pending.
pub async fn verify_payment(
    State(state): State<AppState>,
    Json(request): Json<VerifyPaymentRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .service
        .verify_payment(
            RegistrationId::from_uuid(request.registration_id),
            &request.razorpay_order_id,
            &request.razorpay_payment_id,
            &request.razorpay_signature,
        )
        .await?;

    Ok(Json(MessageResponse {
        message: "Payment verified successfully".to_string(),
    }))
}

/// Record a payment abandonment or failure.
///
/// Leaves the registration in `Failed`, which is still payable: a later
/// successful callback completes it.
pub async fn payment_failed(
    State(state): State<AppState>,
    Json(request): Json<PaymentFailedRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    state
        .service
        .record_failure(
            RegistrationId::from_uuid(request.registration_id),
            request.reason,
        )
        .await?;

    Ok(Json(MessageResponse {
        message: "Payment failure recorded".to_string(),
    }))
}
