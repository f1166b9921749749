//! Mock ledger client for testing.

use crate::error::{RegistrationError, Result};
use crate::providers::LedgerClient;
use crate::types::{Pass, Registration, TicketId};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

/// Mock ledger client.
///
/// Records appended ticket ids instead of posting to a webhook.
#[derive(Clone, Default)]
pub struct MockLedgerClient {
    appended: Arc<Mutex<Vec<TicketId>>>,
    should_succeed: bool,
}

impl MockLedgerClient {
    /// Create a mock ledger that succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            appended: Arc::new(Mutex::new(Vec::new())),
            should_succeed: true,
        }
    }

    /// Create a mock ledger that fails every append.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            appended: Arc::new(Mutex::new(Vec::new())),
            should_succeed: false,
        }
    }

    /// Number of rows appended so far.
    #[must_use]
    pub fn appended_count(&self) -> usize {
        self.appended.lock().map(|rows| rows.len()).unwrap_or(0)
    }
}

impl LedgerClient for MockLedgerClient {
    fn append(
        &self,
        registration: Registration,
        _pass: Pass,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send>> {
        let appended = Arc::clone(&self.appended);
        let should_succeed = self.should_succeed;

        Box::pin(async move {
            if !should_succeed {
                return Err(RegistrationError::Ledger(
                    "Mock ledger configured to fail".to_string(),
                ));
            }

            if let Ok(mut recorded) = appended.lock() {
                recorded.push(registration.ticket_id.clone());
            }
            Ok(())
        })
    }
}
