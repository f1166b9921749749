//! SMTP confirmation mailer implementation using Lettre.
//!
//! Sends the themed registration confirmation email. The template theme is
//! keyed by the pass's color attribute: a closed palette of six named
//! themes, with a default used for unrecognized colors.

use crate::error::{RegistrationError, Result};
use crate::providers::ConfirmationMailer;
use crate::types::{Pass, Registration};
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use std::future::Future;
use std::pin::Pin;

/// A named email theme from the closed palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmailTheme {
    /// Palette name, matched against the pass color.
    pub name: &'static str,
    /// Header/button color.
    pub primary: &'static str,
    /// Banner background color.
    pub banner: &'static str,
}

/// The closed palette of pass-color themes.
const THEMES: [EmailTheme; 6] = [
    EmailTheme { name: "red", primary: "#dc2626", banner: "#fef2f2" },
    EmailTheme { name: "blue", primary: "#2563eb", banner: "#eff6ff" },
    EmailTheme { name: "green", primary: "#16a34a", banner: "#f0fdf4" },
    EmailTheme { name: "purple", primary: "#7c3aed", banner: "#f5f3ff" },
    EmailTheme { name: "orange", primary: "#ea580c", banner: "#fff7ed" },
    EmailTheme { name: "teal", primary: "#0d9488", banner: "#f0fdfa" },
];

/// Default theme for unrecognized pass colors.
const DEFAULT_THEME: EmailTheme = THEMES[1];

/// Resolve the theme for a pass color.
#[must_use]
pub fn theme_for(color: &str) -> EmailTheme {
    let color = color.to_lowercase();
    THEMES
        .into_iter()
        .find(|theme| theme.name == color)
        .unwrap_or(DEFAULT_THEME)
}

/// SMTP confirmation mailer using Lettre.
///
/// Sends real emails via SMTP, suitable for production use.
#[derive(Clone)]
pub struct SmtpConfirmationMailer {
    /// SMTP server address.
    smtp_server: String,

    /// SMTP server port.
    smtp_port: u16,

    /// SMTP credentials.
    credentials: Credentials,

    /// Sender email address.
    from_email: String,

    /// Sender display name.
    from_name: String,
}

impl SmtpConfirmationMailer {
    /// Create a new SMTP confirmation mailer.
    #[must_use]
    pub fn new(
        smtp_server: String,
        smtp_port: u16,
        smtp_username: String,
        smtp_password: String,
        from_email: String,
        from_name: String,
    ) -> Self {
        let credentials = Credentials::new(smtp_username, smtp_password);

        Self {
            smtp_server,
            smtp_port,
            credentials,
            from_email,
            from_name,
        }
    }

    /// Build SMTP transport for sending emails.
    ///
    /// Creates a new transport for each email to avoid connection pooling
    /// issues.
    fn build_transport(&self) -> Result<SmtpTransport> {
        let transport = SmtpTransport::relay(&self.smtp_server)
            .map_err(|e| RegistrationError::Email(format!("SMTP relay error: {e}")))?
            .port(self.smtp_port)
            .credentials(self.credentials.clone())
            .build();
        Ok(transport)
    }

    /// Build the "From" header.
    fn from_header(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_email)
    }
}

/// Render the confirmation email body for a registration.
#[must_use]
pub fn render_confirmation(registration: &Registration, pass: &Pass) -> String {
    let theme = theme_for(&pass.color);
    let primary = theme.primary;
    let banner = theme.banner;
    let ticket_id = registration.ticket_id.as_str();
    let attendee = &registration.attendee;
    let name = &attendee.name;
    let college = &attendee.college;
    let department = &attendee.department;
    let year = &attendee.year;
    let pass_name = &pass.name;
    let amount = registration.amount.first_tier();

    format!(
        r#"
<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>Your registration is confirmed</title>
</head>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px;">
        <h2 style="color: {primary};">Registration confirmed</h2>
        <p>Hi {name}, your {pass_name} registration is confirmed. Show this
        ticket code at the entry desk.</p>
        <div style="background-color: {banner}; border-left: 4px solid {primary}; padding: 15px; margin: 20px 0;">
            <p style="margin: 0; font-size: 24px; font-weight: bold; letter-spacing: 2px;">{ticket_id}</p>
        </div>
        <table style="width: 100%; border-collapse: collapse; font-size: 14px;">
            <tr><td style="padding: 6px 0; color: #666;">Pass</td><td style="padding: 6px 0;">{pass_name}</td></tr>
            <tr><td style="padding: 6px 0; color: #666;">Amount</td><td style="padding: 6px 0;">{amount}</td></tr>
            <tr><td style="padding: 6px 0; color: #666;">College</td><td style="padding: 6px 0;">{college}</td></tr>
            <tr><td style="padding: 6px 0; color: #666;">Department</td><td style="padding: 6px 0;">{department}, year {year}</td></tr>
        </table>
        <p style="color: #666; font-size: 12px; margin-top: 40px;">
            If you didn't register, you can safely ignore this email.
        </p>
    </div>
</body>
</html>
            "#
    )
}

impl ConfirmationMailer for SmtpConfirmationMailer {
    fn send_confirmation(
        &self,
        registration: Registration,
        pass: Pass,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send>> {
        let from_header = self.from_header();
        let transport = self.build_transport();

        Box::pin(async move {
            let html_body = render_confirmation(&registration, &pass);

            let email = Message::builder()
                .from(
                    from_header
                        .parse()
                        .map_err(|e| RegistrationError::Email(format!("Invalid from address: {e}")))?,
                )
                .to(registration
                    .attendee
                    .email
                    .parse()
                    .map_err(|e| RegistrationError::Email(format!("Invalid to address: {e}")))?)
                .subject(format!(
                    "Your {} registration is confirmed ({})",
                    pass.name, registration.ticket_id
                ))
                .header(ContentType::TEXT_HTML)
                .body(html_body)
                .map_err(|e| RegistrationError::Email(format!("Failed to build email: {e}")))?;

            let mailer = transport?;

            // Send email
            tokio::task::spawn_blocking(move || {
                mailer
                    .send(&email)
                    .map_err(|e| RegistrationError::Email(format!("Failed to send email: {e}")))
            })
            .await
            .map_err(|e| RegistrationError::Email(format!("Email task failed: {e}")))?
            .map(|_| ())
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{
        Amount, Attendee, PassId, PaymentStatus, RegistrationId, TicketId,
    };
    use chrono::Utc;

    fn sample() -> (Registration, Pass) {
        let pass = Pass {
            id: PassId::new(),
            name: "Cultural Pass".to_string(),
            price: Amount::from_raw("350"),
            is_active: true,
            color: "purple".to_string(),
        };
        let registration = Registration {
            id: RegistrationId::new(),
            ticket_id: TicketId::new("C4821"),
            pass_id: pass.id,
            event_ids: vec![],
            attendee: Attendee {
                name: "Meera".to_string(),
                roll_no: "21EC017".to_string(),
                email: "meera@example.com".to_string(),
                phone: "9123456780".to_string(),
                department: "ECE".to_string(),
                year: "2".to_string(),
                college: "NSS College".to_string(),
                district: "Palakkad".to_string(),
            },
            amount: Amount::from_raw("350"),
            payment_status: PaymentStatus::Completed,
            payment_id: Some("pay_abc".to_string()),
            failure_reason: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        (registration, pass)
    }

    #[test]
    fn test_theme_lookup() {
        assert_eq!(theme_for("red").name, "red");
        assert_eq!(theme_for("TEAL").name, "teal");
        // Unrecognized colors fall back to the default theme.
        assert_eq!(theme_for("chartreuse"), DEFAULT_THEME);
        assert_eq!(theme_for(""), DEFAULT_THEME);
    }

    #[test]
    fn test_rendered_body_embeds_ticket_and_theme() {
        let (registration, pass) = sample();
        let body = render_confirmation(&registration, &pass);

        assert!(body.contains("C4821"));
        assert!(body.contains("Meera"));
        assert!(body.contains("Cultural Pass"));
        // Purple theme colors, not the default.
        assert!(body.contains("#7c3aed"));
    }

    #[test]
    fn test_rendered_amount_is_first_tier() {
        let (mut registration, pass) = sample();
        registration.amount = Amount::from_raw("350/500");
        let body = render_confirmation(&registration, &pass);

        assert!(body.contains(">350<"));
        assert!(!body.contains("350/500"));
    }
}
