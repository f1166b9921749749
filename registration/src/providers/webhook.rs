//! Automation webhook notifier.
//!
//! Posts the full registration payload to a configurable automation
//! endpoint for downstream report generation. The fan-out dispatches this
//! provider without awaiting it inline with the response.

use crate::error::{RegistrationError, Result};
use crate::providers::WebhookNotifier;
use crate::types::Registration;
use std::future::Future;
use std::pin::Pin;

/// HTTP automation webhook notifier.
#[derive(Clone)]
pub struct HttpWebhookNotifier {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpWebhookNotifier {
    /// Create a new notifier for the given automation endpoint.
    #[must_use]
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

impl WebhookNotifier for HttpWebhookNotifier {
    fn notify(
        &self,
        registration: Registration,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send>> {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();

        Box::pin(async move {
            let response = client
                .post(&endpoint)
                .json(&registration)
                .send()
                .await
                .map_err(|e| RegistrationError::Webhook(format!("Dispatch failed: {e}")))?;

            let status = response.status();
            if !status.is_success() {
                return Err(RegistrationError::Webhook(format!(
                    "Dispatch rejected ({status})"
                )));
            }

            tracing::debug!(registration_id = %registration.id, "Automation webhook notified");
            Ok(())
        })
    }
}
