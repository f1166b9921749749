//! Spreadsheet ledger append over a webhook endpoint.
//!
//! Posts one flattened record per completed registration to an external
//! spreadsheet-backed system of record. The caller skips this provider
//! entirely when no endpoint is configured.

use crate::error::{RegistrationError, Result};
use crate::providers::LedgerClient;
use crate::types::{Pass, Registration};
use serde::Serialize;
use std::future::Future;
use std::pin::Pin;

/// Flattened ledger row: attendee + pass + payment fields.
#[derive(Debug, Clone, Serialize)]
pub struct LedgerRecord {
    /// Ticket code.
    pub ticket_id: String,
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
    /// Pass name.
    pub pass: String,
    /// Amount charged (raw catalog string).
    pub amount: String,
    /// Payment status.
    pub payment_status: String,
    /// Gateway payment identifier, when present.
    pub payment_id: Option<String>,
}

impl LedgerRecord {
    /// Flatten a registration and its pass into a ledger row.
    #[must_use]
    pub fn from_registration(registration: &Registration, pass: &Pass) -> Self {
        let attendee = &registration.attendee;
        Self {
            ticket_id: registration.ticket_id.as_str().to_string(),
            name: attendee.name.clone(),
            roll_no: attendee.roll_no.clone(),
            email: attendee.email.clone(),
            phone: attendee.phone.clone(),
            department: attendee.department.clone(),
            year: attendee.year.clone(),
            college: attendee.college.clone(),
            district: attendee.district.clone(),
            pass: pass.name.clone(),
            amount: registration.amount.as_str().to_string(),
            payment_status: registration.payment_status.to_string(),
            payment_id: registration.payment_id.clone(),
        }
    }
}

/// HTTP ledger client posting flattened records to a webhook endpoint.
#[derive(Clone)]
pub struct HttpLedgerClient {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpLedgerClient {
    /// Create a new ledger client for the given webhook endpoint.
    #[must_use]
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

impl LedgerClient for HttpLedgerClient {
    fn append(
        &self,
        registration: Registration,
        pass: Pass,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send>> {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();

        Box::pin(async move {
            let record = LedgerRecord::from_registration(&registration, &pass);

            let response = client
                .post(&endpoint)
                .json(&record)
                .send()
                .await
                .map_err(|e| RegistrationError::Ledger(format!("Append request failed: {e}")))?;

            let status = response.status();
            if !status.is_success() {
                return Err(RegistrationError::Ledger(format!(
                    "Append rejected ({status})"
                )));
            }

            tracing::debug!(ticket_id = %registration.ticket_id, "Ledger row appended");
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        Amount, Attendee, PassId, PaymentStatus, RegistrationId, TicketId,
    };
    use chrono::Utc;

    #[test]
    fn test_record_flattening() {
        let pass = Pass {
            id: PassId::new(),
            name: "Sports Pass".to_string(),
            price: Amount::from_raw("200"),
            is_active: true,
            color: "red".to_string(),
        };
        let registration = Registration {
            id: RegistrationId::new(),
            ticket_id: TicketId::new("SP7777"),
            pass_id: pass.id,
            event_ids: vec![],
            attendee: Attendee {
                name: "Ravi".to_string(),
                roll_no: "21ME101".to_string(),
                email: "ravi@example.com".to_string(),
                phone: "9000000001".to_string(),
                department: "ME".to_string(),
                year: "4".to_string(),
                college: "TKM College".to_string(),
                district: "Kollam".to_string(),
            },
            amount: Amount::from_raw("600"),
            payment_status: PaymentStatus::Completed,
            payment_id: Some("pay_9".to_string()),
            failure_reason: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let record = LedgerRecord::from_registration(&registration, &pass);
        assert_eq!(record.ticket_id, "SP7777");
        assert_eq!(record.pass, "Sports Pass");
        assert_eq!(record.amount, "600");
        assert_eq!(record.payment_status, "Completed");
        assert_eq!(record.payment_id.as_deref(), Some("pay_9"));
    }
}
