//! Mock confirmation mailer for testing.

use crate::error::{RegistrationError, Result};
use crate::providers::ConfirmationMailer;
use crate::types::{Pass, Registration, TicketId};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

/// Mock confirmation mailer.
///
/// Records (ticket id, recipient) pairs instead of sending email.
#[derive(Clone, Default)]
pub struct MockConfirmationMailer {
    sent: Arc<Mutex<Vec<(TicketId, String)>>>,
    should_succeed: bool,
}

impl MockConfirmationMailer {
    /// Create a mock mailer that succeeds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            should_succeed: true,
        }
    }

    /// Create a mock mailer that fails every send.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            should_succeed: false,
        }
    }

    /// Emails recorded so far as (ticket id, recipient) pairs.
    #[must_use]
    pub fn sent(&self) -> Vec<(TicketId, String)> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }

    /// Number of emails recorded so far.
    #[must_use]
    pub fn sent_count(&self) -> usize {
        self.sent.lock().map(|sent| sent.len()).unwrap_or(0)
    }
}

impl ConfirmationMailer for MockConfirmationMailer {
    fn send_confirmation(
        &self,
        registration: Registration,
        _pass: Pass,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send>> {
        let sent = Arc::clone(&self.sent);
        let should_succeed = self.should_succeed;

        Box::pin(async move {
            if !should_succeed {
                return Err(RegistrationError::Email(
                    "Mock mailer configured to fail".to_string(),
                ));
            }

            if let Ok(mut recorded) = sent.lock() {
                recorded.push((
                    registration.ticket_id.clone(),
                    registration.attendee.email.clone(),
                ));
            }
            Ok(())
        })
    }
}
