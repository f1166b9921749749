//! Metrics instrumentation for the registration workflow.
//!
//! Thin wrappers over the `metrics` facade so call sites stay terse and
//! metric names stay in one place.

use metrics::{describe_counter, Unit};

/// Register metric descriptions with the installed recorder.
///
/// Call once at startup, after installing an exporter.
pub fn register_metrics() {
    describe_counter!(
        "festpass_registrations_total",
        Unit::Count,
        "Registrations created, labeled by initial status"
    );
    describe_counter!(
        "festpass_payments_total",
        Unit::Count,
        "Payment callbacks processed, labeled by outcome"
    );
    describe_counter!(
        "festpass_gateway_orders_total",
        Unit::Count,
        "Gateway orders requested"
    );
    describe_counter!(
        "festpass_notification_failures_total",
        Unit::Count,
        "Notification side effects that failed, labeled by channel"
    );
}

/// Record a created registration.
pub fn record_registration_created(status: &'static str) {
    metrics::counter!("festpass_registrations_total", "status" => status).increment(1);
}

/// Record a verified (completed) payment.
pub fn record_payment_completed() {
    metrics::counter!("festpass_payments_total", "outcome" => "completed").increment(1);
}

/// Record a duplicate callback replay.
pub fn record_payment_replayed() {
    metrics::counter!("festpass_payments_total", "outcome" => "replayed").increment(1);
}

/// Record a failed/dismissed payment.
pub fn record_payment_failed() {
    metrics::counter!("festpass_payments_total", "outcome" => "failed").increment(1);
}

/// Record a gateway order request.
pub fn record_gateway_order() {
    metrics::counter!("festpass_gateway_orders_total").increment(1);
}

/// Record a failed notification side effect.
pub fn record_notification_failure(channel: &'static str) {
    metrics::counter!("festpass_notification_failures_total", "channel" => channel).increment(1);
}
