//! Notification fan-out for completed registrations.
//!
//! Triggered exactly once per applied `Completed` transition. Three
//! independent side effects, each isolated so that one's failure never
//! prevents the others and never fails the client response — the
//! registration's payment state is already committed truth by the time
//! this module runs.

use crate::environment::RegistrationEnvironment;
use crate::metrics;
use crate::types::{Pass, Registration};
use std::sync::Arc;

/// Run the notification fan-out for a completed registration.
///
/// - Confirmation email: awaited; failures logged and swallowed. Skipped
///   when the send-email flag is off.
/// - Ledger append: awaited; failures logged and swallowed. Skipped
///   entirely (not merely failed) when no endpoint is configured.
/// - Automation webhook: dispatched on a spawned task so the HTTP response
///   never waits on it and never fails because of it.
pub async fn dispatch(env: &RegistrationEnvironment, registration: &Registration, pass: &Pass) {
    if env.notifications.send_confirmation_email {
        if let Err(error) = env
            .mailer
            .send_confirmation(registration.clone(), pass.clone())
            .await
        {
            metrics::record_notification_failure("email");
            tracing::warn!(
                ticket_id = %registration.ticket_id,
                %error,
                "Confirmation email failed"
            );
        }
    } else {
        tracing::debug!(
            ticket_id = %registration.ticket_id,
            "Confirmation email disabled, skipping"
        );
    }

    match &env.ledger {
        Some(ledger) => {
            if let Err(error) = ledger
                .append(registration.clone(), pass.clone())
                .await
            {
                metrics::record_notification_failure("ledger");
                tracing::warn!(
                    ticket_id = %registration.ticket_id,
                    %error,
                    "Ledger append failed"
                );
            }
        }
        None => {
            tracing::debug!("Ledger endpoint not configured, skipping append");
        }
    }

    if let Some(webhook) = &env.webhook {
        let webhook = Arc::clone(webhook);
        let registration = registration.clone();
        tokio::spawn(async move {
            if let Err(error) = webhook.notify(registration.clone()).await {
                metrics::record_notification_failure("webhook");
                tracing::error!(
                    registration_id = %registration.id,
                    %error,
                    "Automation webhook dispatch failed"
                );
            }
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::{NotificationConfig, PaymentConfig};
    use crate::mocks::{
        MockConfirmationMailer, MockLedgerClient, MockPaymentGateway, MockWebhookNotifier,
    };
    use crate::stores::{
        InMemoryPassRepository, InMemoryRegistrationStore, InMemorySubEventRepository,
    };
    use crate::types::{
        Amount, Attendee, PassId, PaymentStatus, RegistrationId, TicketId,
    };
    use chrono::Utc;

    fn notification_config(send_email: bool) -> NotificationConfig {
        NotificationConfig {
            send_confirmation_email: send_email,
            smtp_host: "localhost".to_string(),
            smtp_port: 587,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: "noreply@festpass.example.com".to_string(),
            from_name: "FestPass".to_string(),
            ledger_webhook_url: None,
            automation_webhook_url: None,
        }
    }

    fn payment_config() -> PaymentConfig {
        PaymentConfig {
            key_id: "rzp_test_key".to_string(),
            key_secret: "secret_placeholder".to_string(),
            currency: "INR".to_string(),
            bypass: false,
        }
    }

    fn env_with(
        mailer: MockConfirmationMailer,
        ledger: Option<MockLedgerClient>,
        webhook: Option<MockWebhookNotifier>,
        send_email: bool,
    ) -> RegistrationEnvironment {
        let mut env = RegistrationEnvironment::new(
            Arc::new(InMemoryRegistrationStore::new()),
            Arc::new(InMemoryPassRepository::new()),
            Arc::new(InMemorySubEventRepository::new()),
            Arc::new(MockPaymentGateway::new()),
            Arc::new(mailer),
            payment_config(),
            notification_config(send_email),
        );
        if let Some(ledger) = ledger {
            env = env.with_ledger(Arc::new(ledger));
        }
        if let Some(webhook) = webhook {
            env = env.with_webhook(Arc::new(webhook));
        }
        env
    }

    fn completed_registration() -> (Registration, Pass) {
        let pass = Pass {
            id: PassId::new(),
            name: "Elite Pass".to_string(),
            price: Amount::from_raw("500/1000"),
            is_active: true,
            color: "green".to_string(),
        };
        let registration = Registration {
            id: RegistrationId::new(),
            ticket_id: TicketId::new("E2048"),
            pass_id: pass.id,
            event_ids: vec![],
            attendee: Attendee {
                name: "Devi".to_string(),
                roll_no: "21IT009".to_string(),
                email: "devi@example.com".to_string(),
                phone: "9111111111".to_string(),
                department: "IT".to_string(),
                year: "1".to_string(),
                college: "CUSAT".to_string(),
                district: "Ernakulam".to_string(),
            },
            amount: Amount::from_raw("500/1000"),
            payment_status: PaymentStatus::Completed,
            payment_id: Some("pay_77".to_string()),
            failure_reason: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        (registration, pass)
    }

    #[tokio::test]
    async fn test_all_channels_fire_on_success() {
        let mailer = MockConfirmationMailer::new();
        let ledger = MockLedgerClient::new();
        let webhook = MockWebhookNotifier::new();
        let env = env_with(
            mailer.clone(),
            Some(ledger.clone()),
            Some(webhook.clone()),
            true,
        );
        let (registration, pass) = completed_registration();

        dispatch(&env, &registration, &pass).await;
        // The webhook runs on a spawned task.
        tokio::task::yield_now().await;

        assert_eq!(mailer.sent_count(), 1);
        assert_eq!(ledger.appended_count(), 1);
        assert_eq!(webhook.notified_count(), 1);
    }

    #[tokio::test]
    async fn test_email_failure_does_not_block_ledger() {
        let mailer = MockConfirmationMailer::failing();
        let ledger = MockLedgerClient::new();
        let env = env_with(mailer.clone(), Some(ledger.clone()), None, true);
        let (registration, pass) = completed_registration();

        dispatch(&env, &registration, &pass).await;

        assert_eq!(mailer.sent_count(), 0);
        assert_eq!(ledger.appended_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_ledger_is_skipped_not_failed() {
        let mailer = MockConfirmationMailer::new();
        let env = env_with(mailer.clone(), None, None, true);
        let (registration, pass) = completed_registration();

        // No panic, no error: skipped entirely.
        dispatch(&env, &registration, &pass).await;
        assert_eq!(mailer.sent_count(), 1);
    }

    #[tokio::test]
    async fn test_email_flag_off_skips_send() {
        let mailer = MockConfirmationMailer::new();
        let env = env_with(mailer.clone(), None, None, false);
        let (registration, pass) = completed_registration();

        dispatch(&env, &registration, &pass).await;
        assert_eq!(mailer.sent_count(), 0);
    }
}
