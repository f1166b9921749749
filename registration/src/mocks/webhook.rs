//! Mock automation webhook notifier for testing.

use crate::error::{RegistrationError, Result};
use crate::providers::WebhookNotifier;
use crate::types::{Registration, RegistrationId};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

/// Mock webhook notifier.
///
/// Records notified registration ids instead of posting to an endpoint.
#[derive(Clone, Default)]
pub struct MockWebhookNotifier {
    notified: Arc<Mutex<Vec<RegistrationId>>>,
    should_succeed: bool,
}

impl MockWebhookNotifier {
    /// Create a mock notifier that succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            notified: Arc::new(Mutex::new(Vec::new())),
            should_succeed: true,
        }
    }

    /// Create a mock notifier that fails every dispatch.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            notified: Arc::new(Mutex::new(Vec::new())),
            should_succeed: false,
        }
    }

    /// Number of dispatches recorded so far.
    #[must_use]
    pub fn notified_count(&self) -> usize {
        self.notified.lock().map(|ids| ids.len()).unwrap_or(0)
    }
}

impl WebhookNotifier for MockWebhookNotifier {
    fn notify(
        &self,
        registration: Registration,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send>> {
        let notified = Arc::clone(&self.notified);
        let should_succeed = self.should_succeed;

        Box::pin(async move {
            if !should_succeed {
                return Err(RegistrationError::Webhook(
                    "Mock notifier configured to fail".to_string(),
                ));
            }

            if let Ok(mut recorded) = notified.lock() {
                recorded.push(registration.id);
            }
            Ok(())
        })
    }
}
