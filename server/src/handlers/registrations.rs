//! Registration API endpoints.
//!
//! - `POST /registrations` - Create a paid (or bypassed) registration
//! - `POST /registrations/pre-register` - Capture interest before opening
//! - `GET /registrations/events/:event_id/export` - CSV of one event's
//!   registrants (admin tooling)

use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use festpass_registration::types::{Attendee, EventId, PassId, Registration};
use festpass_registration::RegistrationRequest;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request to create a registration (paid or pre-registration flow).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Chosen pass.
    pub pass_id: Uuid,
    /// Selected sub-events (may be empty).
    #[serde(default)]
    pub event_ids: Vec<Uuid>,
    /// Attendee name.
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

impl RegisterRequest {
    fn into_domain(self) -> RegistrationRequest {
        RegistrationRequest {
            pass_id: PassId::from_uuid(self.pass_id),
            event_ids: self
                .event_ids
                .into_iter()
                .map(EventId::from_uuid)
                .collect(),
            attendee: Attendee {
                name: self.name,
                roll_no: self.roll_no,
                email: self.email,
                phone: self.phone,
                department: self.department,
                year: self.year,
                college: self.college,
                district: self.district,
            },
        }
    }
}

/// Response after creating a registration.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    /// Message for the user.
    pub message: String,
    /// Created registration id.
    pub registration_id: Uuid,
    /// Minted ticket code.
    pub ticket_id: String,
    /// Amount payable (raw catalog string).
    pub amount: String,
    /// Payment status after creation.
    pub payment_status: String,
}

/// Response after capturing a pre-registration.
#[derive(Debug, Clone, Serialize)]
pub struct PreRegisterResponse {
    /// Message for the user.
    pub message: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Create a registration.
///
/// Under normal operation the registration lands in `Pending` and the
/// client continues to the gateway checkout. Under payment bypass it is
/// created directly `Completed` and no gateway order is ever requested.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let registration = state.service.register(request.into_domain()).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Registration created".to_string(),
            registration_id: *registration.id.as_uuid(),
            ticket_id: registration.ticket_id.as_str().to_string(),
            amount: registration.amount.as_str().to_string(),
            payment_status: registration.payment_status.to_string(),
        }),
    ))
}

/// Capture interest before registration opens.
pub async fn pre_register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<PreRegisterResponse>), AppError> {
    state.service.pre_register(request.into_domain()).await?;

    Ok((
        StatusCode::CREATED,
        Json(PreRegisterResponse {
            message: "Pre-registration captured. We'll notify you when registration opens."
                .to_string(),
        }),
    ))
}

/// Export a single event's registrants as CSV.
pub async fn export_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let registrations = state
        .service
        .registrations_for_event(EventId::from_uuid(event_id))
        .await?;

    let body = render_csv(&registrations)
        .map_err(|e| AppError::internal(format!("CSV rendering failed: {e}")))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"event-{event_id}-registrations.csv\""),
            ),
        ],
        body,
    ))
}

fn render_csv(registrations: &[Registration]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record([
        "ticket_id",
        "name",
        "roll_no",
        "email",
        "phone",
        "department",
        "year",
        "college",
        "district",
        "amount",
        "payment_status",
        "payment_id",
    ])?;

    for registration in registrations {
        let attendee = &registration.attendee;
        writer.write_record([
            registration.ticket_id.as_str(),
            &attendee.name,
            &attendee.roll_no,
            &attendee.email,
            &attendee.phone,
            &attendee.department,
            &attendee.year,
            &attendee.college,
            &attendee.district,
            registration.amount.as_str(),
            registration.payment_status.as_str(),
            registration.payment_id.as_deref().unwrap_or(""),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use festpass_registration::types::{
        Amount, PaymentStatus, RegistrationId, TicketId,
    };

    #[test]
    fn test_csv_includes_header_and_rows() {
        let registration = Registration {
            id: RegistrationId::new(),
            ticket_id: TicketId::new("SP4242"),
            pass_id: PassId::new(),
            event_ids: vec![],
            attendee: Attendee {
                name: "Asha, Nair".to_string(),
                roll_no: "21CS042".to_string(),
                email: "asha@example.com".to_string(),
                phone: "9876543210".to_string(),
                department: "CSE".to_string(),
                year: "3".to_string(),
                college: "Govt Engineering College".to_string(),
                district: "Kochi".to_string(),
            },
            amount: Amount::from_raw("600"),
            payment_status: PaymentStatus::Completed,
            payment_id: Some("pay_1".to_string()),
            failure_reason: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let csv = render_csv(&[registration]).unwrap();
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("ticket_id,name"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("SP4242,"));
        // Comma inside a field is quoted, not split.
        assert!(row.contains("\"Asha, Nair\""));
        assert!(row.ends_with("600,completed,pay_1"));
    }

    #[test]
    fn test_csv_empty_export_is_header_only() {
        let csv = render_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }
}
