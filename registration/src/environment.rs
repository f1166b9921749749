//! Registration environment.
//!
//! Explicit dependency injection for the orchestration workflow: every
//! external collaborator the service touches is handed in here, never
//! loaded mid-request.

use crate::config::{NotificationConfig, PaymentConfig};
use crate::providers::{ConfirmationMailer, LedgerClient, PaymentGateway, WebhookNotifier};
use crate::stores::{PassRepository, RegistrationStore, SubEventRepository};
use std::sync::Arc;

/// Registration environment.
///
/// Contains all external dependencies needed by the registration and
/// payment workflow. Cloning is cheap (`Arc` handles).
#[derive(Clone)]
pub struct RegistrationEnvironment {
    /// Registration store (`PostgreSQL` in production).
    pub registrations: Arc<dyn RegistrationStore>,

    /// Pass catalog (read-only).
    pub passes: Arc<dyn PassRepository>,

    /// Sub-event catalog (read-only).
    pub sub_events: Arc<dyn SubEventRepository>,

    /// Payment gateway order broker.
    pub gateway: Arc<dyn PaymentGateway>,

    /// Confirmation email sender.
    pub mailer: Arc<dyn ConfirmationMailer>,

    /// External ledger client. `None` means appends are skipped entirely.
    pub ledger: Option<Arc<dyn LedgerClient>>,

    /// Automation webhook notifier. `None` means dispatch is skipped.
    pub webhook: Option<Arc<dyn WebhookNotifier>>,

    /// Payment gateway configuration.
    pub payment: PaymentConfig,

    /// Notification fan-out configuration.
    pub notifications: NotificationConfig,
}

impl RegistrationEnvironment {
    /// Create a new environment with the required collaborators.
    ///
    /// Optional collaborators (ledger, automation webhook) start unset;
    /// attach them with [`Self::with_ledger`] / [`Self::with_webhook`].
    #[must_use]
    pub fn new(
        registrations: Arc<dyn RegistrationStore>,
        passes: Arc<dyn PassRepository>,
        sub_events: Arc<dyn SubEventRepository>,
        gateway: Arc<dyn PaymentGateway>,
        mailer: Arc<dyn ConfirmationMailer>,
        payment: PaymentConfig,
        notifications: NotificationConfig,
    ) -> Self {
        Self {
            registrations,
            passes,
            sub_events,
            gateway,
            mailer,
            ledger: None,
            webhook: None,
            payment,
            notifications,
        }
    }

    /// Attach an external ledger client.
    #[must_use]
    pub fn with_ledger(mut self, ledger: Arc<dyn LedgerClient>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    /// Attach an automation webhook notifier.
    #[must_use]
    pub fn with_webhook(mut self, webhook: Arc<dyn WebhookNotifier>) -> Self {
        self.webhook = Some(webhook);
        self
    }
}
