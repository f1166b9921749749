//! Registration and payment orchestration.
//!
//! The service wires the pricing resolver, the ticket generator, the
//! store, the gateway broker, the callback verifier, the transition
//! engine, and the notification fan-out into the request-facing workflow:
//!
//! ```text
//! client → register() → store (Pending, or Completed under bypass)
//!        → [client pays via gateway widget]
//!        → verify_payment() → signature check → transition → fan-out
//! ```

use crate::environment::RegistrationEnvironment;
use crate::error::{RegistrationError, Result};
use crate::lifecycle::{Transition, TransitionOutcome};
use crate::providers::GatewayOrder;
use crate::types::{
    Amount, Attendee, EventId, NewRegistration, Pass, PassId, PaymentStatus, Registration,
    RegistrationId,
};
use crate::{metrics, notifications, pricing, signature, ticket};

/// A registration request after DTO decoding: the pass, the selected
/// sub-events, and the attendee details.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    /// Chosen pass.
    pub pass_id: PassId,
    /// Selected sub-events (zero or more).
    pub event_ids: Vec<EventId>,
    /// Attendee details.
    pub attendee: Attendee,
}

/// Registration and payment orchestration service.
#[derive(Clone)]
pub struct RegistrationService {
    env: RegistrationEnvironment,
}

impl RegistrationService {
    /// Create a service over an environment.
    #[must_use]
    pub const fn new(env: RegistrationEnvironment) -> Self {
        Self { env }
    }

    /// Access the underlying environment.
    #[must_use]
    pub const fn env(&self) -> &RegistrationEnvironment {
        &self.env
    }

    /// Create a registration for the paid (or bypassed) flow.
    ///
    /// Validates the request, resolves the amount, mints a ticket
    /// identifier (with bounded retry on collision), and persists the
    /// record in `Pending` — or directly in `Completed` when payment is
    /// bypassed, in which case the notification fan-out runs immediately
    /// and no gateway order is ever requested.
    ///
    /// # Errors
    ///
    /// Returns a validation error when required fields are missing, the
    /// pass is unknown/inactive, or selected events don't resolve; a
    /// [`RegistrationError::TicketIdExhausted`] when every minted
    /// identifier collided; or a storage error.
    pub async fn register(&self, request: RegistrationRequest) -> Result<Registration> {
        let (pass, events) = self.validate(&request).await?;
        let amount = pricing::resolve_amount(&pass, &events);

        let status = if self.env.payment.bypass {
            PaymentStatus::Completed
        } else {
            PaymentStatus::Pending
        };

        let registration = self
            .persist_with_retry(&request, &pass, amount, status, false)
            .await?;

        metrics::record_registration_created(status.as_str());
        tracing::info!(
            registration_id = %registration.id,
            ticket_id = %registration.ticket_id,
            amount = %registration.amount,
            status = %registration.payment_status,
            "Registration created"
        );

        if status == PaymentStatus::Completed {
            // Bypass mode: the registration is already committed truth, so
            // the fan-out runs now rather than on a verification callback.
            notifications::dispatch(&self.env, &registration, &pass).await;
        }

        Ok(registration)
    }

    /// Capture interest before registration opens.
    ///
    /// Same shape as [`Self::register`] but the ticket identifier carries
    /// the unconditional `PRE` prefix and the record lands in the terminal
    /// `PreRegistered` status. No payment, no notifications.
    ///
    /// # Errors
    ///
    /// Same classes as [`Self::register`].
    pub async fn pre_register(&self, request: RegistrationRequest) -> Result<Registration> {
        let (pass, events) = self.validate(&request).await?;
        let amount = pricing::resolve_amount(&pass, &events);

        let registration = self
            .persist_with_retry(&request, &pass, amount, PaymentStatus::PreRegistered, true)
            .await?;

        metrics::record_registration_created(PaymentStatus::PreRegistered.as_str());
        tracing::info!(
            registration_id = %registration.id,
            ticket_id = %registration.ticket_id,
            "Pre-registration captured"
        );

        Ok(registration)
    }

    /// Create a gateway order for an existing registration's amount.
    ///
    /// Only the first price tier is charged; the amount is converted to
    /// integer minor units before transmission. The registration itself is
    /// not touched: a gateway outage leaves a valid, payable-later Pending
    /// registration.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::Gateway`] when the gateway rejects or
    /// fails the request.
    pub async fn create_order(&self, amount: &Amount, receipt: String) -> Result<GatewayOrder> {
        let order = self
            .env
            .gateway
            .create_order(
                amount.to_minor_units(),
                self.env.payment.currency.clone(),
                receipt,
            )
            .await?;

        metrics::record_gateway_order();
        Ok(order)
    }

    /// Verify a payment callback and complete the registration.
    ///
    /// Authenticates the gateway signature, applies the
    /// `Pending/Failed → Completed` transition atomically, and — only when
    /// the transition actually applied — runs the notification fan-out
    /// before returning. A duplicate callback replays idempotently and
    /// skips re-notification.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::InvalidSignature`] on a signature
    /// mismatch (the registration stays Pending),
    /// [`RegistrationError::RegistrationNotFound`] for an unknown id, or
    /// [`RegistrationError::InvalidTransition`] when the current status
    /// does not admit completion.
    pub async fn verify_payment(
        &self,
        registration_id: RegistrationId,
        order_id: &str,
        payment_id: &str,
        supplied_signature: &str,
    ) -> Result<Registration> {
        if !signature::verify_callback_signature(
            order_id,
            payment_id,
            supplied_signature,
            &self.env.payment.key_secret,
        ) {
            tracing::warn!(
                registration_id = %registration_id,
                order_id,
                "Payment callback signature mismatch"
            );
            return Err(RegistrationError::InvalidSignature);
        }

        let outcome = self
            .env
            .registrations
            .transition(
                registration_id,
                Transition::Complete {
                    payment_id: payment_id.to_string(),
                },
            )
            .await?;

        match outcome {
            TransitionOutcome::Applied(registration) => {
                metrics::record_payment_completed();
                tracing::info!(
                    registration_id = %registration.id,
                    ticket_id = %registration.ticket_id,
                    payment_id,
                    "Payment verified"
                );

                match self.env.passes.find_by_id(registration.pass_id).await {
                    Ok(pass) => notifications::dispatch(&self.env, &registration, &pass).await,
                    Err(error) => {
                        // Payment truth first: a missing pass must not fail
                        // the committed payment, only the notifications.
                        metrics::record_notification_failure("email");
                        tracing::error!(
                            registration_id = %registration.id,
                            %error,
                            "Pass lookup failed, skipping notification fan-out"
                        );
                    }
                }

                Ok(registration)
            }
            TransitionOutcome::AlreadyApplied(registration) => {
                metrics::record_payment_replayed();
                tracing::info!(
                    registration_id = %registration.id,
                    payment_id,
                    "Duplicate payment callback, skipping notifications"
                );
                Ok(registration)
            }
        }
    }

    /// Record a payment abandonment or failure.
    ///
    /// Transitions the registration to `Failed` with the supplied reason.
    /// `Failed` is not terminal: a later successful callback still
    /// completes the registration. No notifications fire.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::RegistrationNotFound`] for an unknown
    /// id or [`RegistrationError::InvalidTransition`] when the
    /// registration is already Completed or Pre-Registered.
    pub async fn record_failure(
        &self,
        registration_id: RegistrationId,
        reason: String,
    ) -> Result<Registration> {
        let outcome = self
            .env
            .registrations
            .transition(registration_id, Transition::Fail { reason })
            .await?;

        metrics::record_payment_failed();
        let registration = outcome.registration().clone();
        tracing::info!(
            registration_id = %registration.id,
            reason = registration.failure_reason.as_deref().unwrap_or(""),
            "Payment failure recorded"
        );
        Ok(registration)
    }

    /// Load all registrations that selected the given sub-event, for the
    /// per-event export.
    ///
    /// # Errors
    ///
    /// Returns a storage error when the query fails.
    pub async fn registrations_for_event(&self, event_id: EventId) -> Result<Vec<Registration>> {
        self.env.registrations.find_by_event_id(event_id).await
    }

    /// Validate the request: required fields, pass existence/activity, and
    /// event resolution. No side effects on failure.
    async fn validate(&self, request: &RegistrationRequest) -> Result<(Pass, Vec<crate::types::SubEvent>)> {
        for (field, value) in request.attendee.fields() {
            if value.trim().is_empty() {
                return Err(RegistrationError::MissingField { field });
            }
        }

        let pass = self.env.passes.find_by_id(request.pass_id).await?;
        if !pass.is_active {
            return Err(RegistrationError::PassInactive {
                pass_id: request.pass_id,
            });
        }

        let events = self
            .env
            .sub_events
            .find_by_ids(request.event_ids.clone())
            .await?;
        if events.len() != request.event_ids.len() {
            return Err(RegistrationError::EventCountMismatch {
                requested: request.event_ids.len(),
                found: events.len(),
            });
        }

        Ok((pass, events))
    }

    /// Mint a ticket identifier and persist, regenerating on collision up
    /// to [`ticket::MAX_MINT_ATTEMPTS`] times before failing loudly.
    async fn persist_with_retry(
        &self,
        request: &RegistrationRequest,
        pass: &Pass,
        amount: Amount,
        status: PaymentStatus,
        pre_registration: bool,
    ) -> Result<Registration> {
        for attempt in 1..=ticket::MAX_MINT_ATTEMPTS {
            let ticket_id = if pre_registration {
                ticket::mint_pre_registration()
            } else {
                ticket::mint(&pass.name)
            };

            let new_registration = NewRegistration {
                id: RegistrationId::new(),
                ticket_id,
                pass_id: request.pass_id,
                event_ids: request.event_ids.clone(),
                attendee: request.attendee.clone(),
                amount: amount.clone(),
                payment_status: status,
            };

            match self.env.registrations.create(new_registration).await {
                Ok(registration) => return Ok(registration),
                Err(RegistrationError::DuplicateTicketId { ticket_id }) => {
                    tracing::warn!(
                        ticket_id = %ticket_id,
                        attempt,
                        "Ticket identifier collision, regenerating"
                    );
                }
                Err(other) => return Err(other),
            }
        }

        Err(RegistrationError::TicketIdExhausted {
            attempts: ticket::MAX_MINT_ATTEMPTS,
        })
    }
}
