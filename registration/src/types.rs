//! Core domain types for registrations, passes, and sub-events.
//!
//! All types are `Clone` to support the functional architecture pattern.
//! Catalog types (`Pass`, `SubEvent`) are owned by content management and
//! read-only from this crate's perspective.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════
// ID Types
// ═══════════════════════════════════════════════════════════════════════

/// Unique identifier for a registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistrationId(pub uuid::Uuid);

impl RegistrationId {
    /// Generate a new random `RegistrationId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(id: uuid::Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for RegistrationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RegistrationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PassId(pub uuid::Uuid);

impl PassId {
    /// Generate a new random `PassId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(id: uuid::Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for PassId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a sub-event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub uuid::Uuid);

impl EventId {
    /// Generate a new random `EventId`.
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(id: uuid::Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &uuid::Uuid {
        &self.0
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Short human-facing ticket identifier (e.g. `SP4821`, `PRE1034`).
///
/// Uniqueness is enforced by the registration store, not by the generator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    /// Wrap a ticket identifier string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Access the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Amount
// ═══════════════════════════════════════════════════════════════════════

/// A decimal-as-text amount, as stored in the pass catalog.
///
/// The catalog may encode two price tiers as `"X/Y"`. Only the first tier
/// is ever charged by this system; the second tier's intended meaning is
/// not resolved upstream, so the raw string is preserved untouched and the
/// split happens only at charge time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(String);

impl Amount {
    /// Wrap a raw amount string from the catalog.
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Build an amount from an integer number of currency units.
    #[must_use]
    pub fn from_units(units: i64) -> Self {
        Self(units.to_string())
    }

    /// Access the raw amount string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The first price tier: the substring before any `/` separator.
    #[must_use]
    pub fn first_tier(&self) -> &str {
        match self.0.split_once('/') {
            Some((first, _)) => first,
            None => &self.0,
        }
    }

    /// Convert the first tier to integer minor units (×100) for the
    /// payment gateway. Unparseable amounts coerce to `0`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // catalog prices fit comfortably in i64 paise
    pub fn to_minor_units(&self) -> i64 {
        let value: f64 = self.first_tier().trim().parse().unwrap_or(0.0);
        (value * 100.0).round() as i64
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Payment Status
// ═══════════════════════════════════════════════════════════════════════

/// Lifecycle status of a registration's payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Created, awaiting a verified gateway callback.
    Pending,
    /// Payment verified (or bypassed at creation time).
    Completed,
    /// A payment attempt was dismissed or rejected. Not terminal: a later
    /// successful callback may still complete the registration.
    Failed,
    /// Interest captured before registration opened. Terminal.
    PreRegistered,
}

impl PaymentStatus {
    /// Database/text representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::PreRegistered => "pre_registered",
        }
    }

    /// Parse the database/text representation.
    ///
    /// # Errors
    ///
    /// Returns the unrecognized input if it is not a known status.
    pub fn parse(s: &str) -> Result<Self, String> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "pre_registered" => Ok(Self::PreRegistered),
            other => Err(format!("Unknown payment status: {other}")),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Completed => write!(f, "Completed"),
            Self::Failed => write!(f, "Failed"),
            Self::PreRegistered => write!(f, "Pre-Registered"),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Catalog Types (read-only here)
// ═══════════════════════════════════════════════════════════════════════

/// A purchasable access tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pass {
    /// Pass identifier.
    pub id: PassId,
    /// Display name (drives ticket prefix and team-pricing detection).
    pub name: String,
    /// Price, possibly dual-tier (`"X/Y"`).
    pub price: Amount,
    /// Whether the pass is currently purchasable.
    pub is_active: bool,
    /// Color attribute driving the confirmation email theme.
    pub color: String,
}

impl Pass {
    /// Whether this pass uses per-event team pricing.
    ///
    /// True when the name case-insensitively contains a team/sports marker.
    #[must_use]
    pub fn has_team_pricing(&self) -> bool {
        let name = self.name.to_lowercase();
        name.contains("sports") || name.contains("team")
    }
}

/// Subset of a catalog event relevant to registration pricing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubEvent {
    /// Event identifier.
    pub id: EventId,
    /// Display name.
    pub name: String,
    /// Per-team price override, used only for team/sports passes.
    pub team_price: Option<i64>,
}

// ═══════════════════════════════════════════════════════════════════════
// Registration
// ═══════════════════════════════════════════════════════════════════════

/// Attendee details captured at registration time.
///
/// All fields are required free text; no cross-validation against a
/// canonical list is performed here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendee {
    /// Full name.
    pub name: String,
    /// Roll/ID string.
    pub roll_no: String,
    /// Email address.
    pub email: String,
    /// Phone number.
    pub phone: String,
    /// Department.
    pub department: String,
    /// Year of study.
    pub year: String,
    /// College name.
    pub college: String,
    /// District.
    pub district: String,
}

impl Attendee {
    /// Field names paired with their values, for required-field checks.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, &str); 8] {
        [
            ("name", &self.name),
            ("roll_no", &self.roll_no),
            ("email", &self.email),
            ("phone", &self.phone),
            ("department", &self.department),
            ("year", &self.year),
            ("college", &self.college),
            ("district", &self.district),
        ]
    }
}

/// A persisted registration record.
///
/// `amount` equals the pricing resolver's output at creation time and is
/// never mutated afterwards. Only `payment_status`, `payment_id`,
/// `failure_reason`, and `updated_at` change post-creation, and only
/// through the status transition engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Registration {
    /// Primary key.
    pub id: RegistrationId,
    /// Short human-facing ticket code (store-enforced unique).
    pub ticket_id: TicketId,
    /// Purchased pass.
    pub pass_id: PassId,
    /// Selected sub-events (zero or more).
    pub event_ids: Vec<EventId>,
    /// Attendee details.
    pub attendee: Attendee,
    /// Amount payable, fixed at creation.
    pub amount: Amount,
    /// Payment lifecycle status.
    pub payment_status: PaymentStatus,
    /// Gateway payment identifier, present only after success.
    pub payment_id: Option<String>,
    /// Free-text failure reason recorded for audit.
    pub failure_reason: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input to [`crate::stores::RegistrationStore::create`].
///
/// The store assigns timestamps; the intake flow assigns everything else.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRegistration {
    /// Primary key, generated by intake.
    pub id: RegistrationId,
    /// Minted ticket code.
    pub ticket_id: TicketId,
    /// Purchased pass.
    pub pass_id: PassId,
    /// Selected sub-events.
    pub event_ids: Vec<EventId>,
    /// Attendee details.
    pub attendee: Attendee,
    /// Resolved amount.
    pub amount: Amount,
    /// Initial status (`Pending`, `Completed` under bypass, or
    /// `PreRegistered` for interest capture).
    pub payment_status: PaymentStatus,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_first_tier_splits_dual_prices() {
        assert_eq!(Amount::from_raw("500/1000").first_tier(), "500");
        assert_eq!(Amount::from_raw("250").first_tier(), "250");
    }

    #[test]
    fn test_minor_units_use_first_tier() {
        assert_eq!(Amount::from_raw("500/1000").to_minor_units(), 50_000);
        assert_eq!(Amount::from_raw("200").to_minor_units(), 20_000);
        assert_eq!(Amount::from_raw("748.5").to_minor_units(), 74_850);
    }

    #[test]
    fn test_minor_units_default_to_zero_on_garbage() {
        assert_eq!(Amount::from_raw("free").to_minor_units(), 0);
        assert_eq!(Amount::from_raw("").to_minor_units(), 0);
    }

    #[test]
    fn test_payment_status_roundtrip() {
        for status in [
            PaymentStatus::Pending,
            PaymentStatus::Completed,
            PaymentStatus::Failed,
            PaymentStatus::PreRegistered,
        ] {
            assert_eq!(PaymentStatus::parse(status.as_str()).unwrap(), status);
        }
        assert!(PaymentStatus::parse("refunded").is_err());
    }

    #[test]
    fn test_team_pricing_detection() {
        let mut pass = Pass {
            id: PassId::new(),
            name: "Sports Pass".to_string(),
            price: Amount::from_raw("200"),
            is_active: true,
            color: "red".to_string(),
        };
        assert!(pass.has_team_pricing());

        pass.name = "Standard Pass".to_string();
        assert!(!pass.has_team_pricing());

        pass.name = "TEAM Combo".to_string();
        assert!(pass.has_team_pricing());
    }

    #[test]
    fn test_registration_id_generation() {
        let id1 = RegistrationId::new();
        let id2 = RegistrationId::new();

        // IDs should be unique
        assert_ne!(id1, id2);
    }
}
