//! Provider traits for external collaborators.
//!
//! Each integration the workflow touches — the payment gateway, the
//! confirmation mailer, the spreadsheet ledger, and the automation
//! webhook — is abstracted behind an object-safe trait so the environment
//! can hold `Arc<dyn …>` and tests can substitute mocks (see
//! [`crate::mocks`]).

use crate::error::Result;
use crate::types::{Pass, Registration};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

mod razorpay;
mod sheets_ledger;
mod smtp_email;
mod webhook;

pub use razorpay::RazorpayGateway;
pub use sheets_ledger::HttpLedgerClient;
pub use smtp_email::SmtpConfirmationMailer;
pub use webhook::HttpWebhookNotifier;

/// A payment-gateway-side order: an intent to collect a specific amount,
/// referenced by the client-side checkout widget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayOrder {
    /// Gateway-assigned order identifier.
    pub id: String,
    /// Amount in integer minor units (the gateway's native unit).
    pub amount: i64,
    /// ISO currency code.
    pub currency: String,
    /// Caller-supplied idempotency receipt (the registration identifier).
    pub receipt: String,
    /// Gateway-side order status (e.g. `created`).
    pub status: String,
}

/// Payment gateway order broker.
///
/// Abstraction over Razorpay-style order-creation APIs. Amounts are
/// integer minor units; convert with [`crate::types::Amount::to_minor_units`].
pub trait PaymentGateway: Send + Sync {
    /// Create a gateway order for the given amount.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RegistrationError::Gateway`] if the gateway
    /// rejects or fails the request. The caller's registration is NOT
    /// rolled back on failure; it stays Pending and payable later.
    fn create_order(
        &self,
        amount_minor_units: i64,
        currency: String,
        receipt: String,
    ) -> Pin<Box<dyn Future<Output = Result<GatewayOrder>> + Send>>;
}

/// Confirmation email sender.
pub trait ConfirmationMailer: Send + Sync {
    /// Send the themed confirmation email for a completed registration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RegistrationError::Email`] if the message
    /// cannot be built or delivered.
    fn send_confirmation(
        &self,
        registration: Registration,
        pass: Pass,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send>>;
}

/// External ledger append (spreadsheet-backed system of record).
pub trait LedgerClient: Send + Sync {
    /// Append a flattened registration record to the ledger.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RegistrationError::Ledger`] if the endpoint
    /// rejects or fails the request.
    fn append(
        &self,
        registration: Registration,
        pass: Pass,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send>>;
}

/// Generic automation webhook for downstream report generation.
pub trait WebhookNotifier: Send + Sync {
    /// Post the full registration payload to the automation endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RegistrationError::Webhook`] if the endpoint
    /// rejects or fails the request.
    fn notify(
        &self,
        registration: Registration,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send>>;
}
