//! Razorpay order-creation client.
//!
//! Calls the Razorpay orders API with basic auth. The gateway's native
//! unit is the smallest currency subdivision, so callers pass integer
//! minor units (see [`crate::types::Amount::to_minor_units`]).

use crate::error::{RegistrationError, Result};
use crate::providers::{GatewayOrder, PaymentGateway};
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;

const DEFAULT_BASE_URL: &str = "https://api.razorpay.com/v1";

/// Razorpay payment gateway client.
#[derive(Clone)]
pub struct RazorpayGateway {
    client: reqwest::Client,
    key_id: String,
    key_secret: String,
    base_url: String,
}

#[derive(Serialize)]
struct CreateOrderBody {
    amount: i64,
    currency: String,
    receipt: String,
}

impl RazorpayGateway {
    /// Create a new gateway client with the integration key pair.
    #[must_use]
    pub fn new(key_id: String, key_secret: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            key_id,
            key_secret,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the API base URL (for tests against a local stub).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl PaymentGateway for RazorpayGateway {
    fn create_order(
        &self,
        amount_minor_units: i64,
        currency: String,
        receipt: String,
    ) -> Pin<Box<dyn Future<Output = Result<GatewayOrder>> + Send>> {
        let client = self.client.clone();
        let key_id = self.key_id.clone();
        let key_secret = self.key_secret.clone();
        let url = format!("{}/orders", self.base_url);

        Box::pin(async move {
            let body = CreateOrderBody {
                amount: amount_minor_units,
                currency,
                receipt,
            };

            let response = client
                .post(&url)
                .basic_auth(&key_id, Some(&key_secret))
                .json(&body)
                .send()
                .await
                .map_err(|e| RegistrationError::Gateway(format!("Order request failed: {e}")))?;

            let status = response.status();
            if !status.is_success() {
                let detail = response.text().await.unwrap_or_default();
                return Err(RegistrationError::Gateway(format!(
                    "Order creation rejected ({status}): {detail}"
                )));
            }

            let order: GatewayOrder = response.json().await.map_err(|e| {
                RegistrationError::Gateway(format!("Malformed order response: {e}"))
            })?;

            tracing::info!(
                order_id = %order.id,
                amount = order.amount,
                receipt = %order.receipt,
                "Gateway order created"
            );

            Ok(order)
        })
    }
}
