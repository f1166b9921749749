//! `PostgreSQL` store implementations.
//!
//! The registrations table carries a unique index on `ticket_id` (the
//! system's only uniqueness guarantee for ticket codes) and status
//! transitions are applied as conditional `UPDATE … WHERE payment_status =
//! ANY(…)` statements, so concurrent duplicate callbacks cannot double-apply.
//!
//! Queries are checked at runtime rather than via the sqlx macros, so the
//! crate builds without a live database (see `migrations/0001_init.sql`
//! for the schema).

use crate::error::{RegistrationError, Result};
use crate::lifecycle::{replay_outcome, Transition, TransitionOutcome};
use crate::stores::{PassRepository, RegistrationStore, SubEventRepository};
use crate::types::{
    Amount, Attendee, EventId, NewRegistration, Pass, PassId, PaymentStatus, Registration,
    RegistrationId, SubEvent, TicketId,
};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

const REGISTRATION_COLUMNS: &str = "id, ticket_id, pass_id, name, roll_no, email, phone, \
     department, year, college, district, amount, payment_status, payment_id, failure_reason, \
     created_at, updated_at";

/// Row shape for the `registrations` table.
#[derive(Debug, sqlx::FromRow)]
struct RegistrationRow {
    id: sqlx::types::Uuid,
    ticket_id: String,
    pass_id: sqlx::types::Uuid,
    name: String,
    roll_no: String,
    email: String,
    phone: String,
    department: String,
    year: String,
    college: String,
    district: String,
    amount: String,
    payment_status: String,
    payment_id: Option<String>,
    failure_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl RegistrationRow {
    fn into_registration(self, event_ids: Vec<EventId>) -> Result<Registration> {
        let payment_status = PaymentStatus::parse(&self.payment_status)
            .map_err(RegistrationError::Database)?;

        Ok(Registration {
            id: RegistrationId::from_uuid(self.id),
            ticket_id: TicketId::new(self.ticket_id),
            pass_id: PassId::from_uuid(self.pass_id),
            event_ids,
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
            amount: Amount::from_raw(self.amount),
            payment_status,
            payment_id: self.payment_id,
            failure_reason: self.failure_reason,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// `PostgreSQL` registration store.
#[derive(Clone)]
pub struct PostgresRegistrationStore {
    pool: PgPool,
}

impl PostgresRegistrationStore {
    /// Create a new store over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

async fn load_event_ids(pool: &PgPool, id: RegistrationId) -> Result<Vec<EventId>> {
    let rows: Vec<(sqlx::types::Uuid,)> = sqlx::query_as(
        "SELECT event_id FROM registration_events WHERE registration_id = $1 ORDER BY position",
    )
    .bind(id.as_uuid())
    .fetch_all(pool)
    .await
    .map_err(|e| RegistrationError::Database(format!("Failed to load event links: {e}")))?;

    Ok(rows
        .into_iter()
        .map(|(event_id,)| EventId::from_uuid(event_id))
        .collect())
}

impl RegistrationStore for PostgresRegistrationStore {
    fn create(
        &self,
        registration: NewRegistration,
    ) -> Pin<Box<dyn Future<Output = Result<Registration>> + Send>> {
        let pool = self.pool.clone();

        Box::pin(async move {
            let now = Utc::now();

            let mut tx = pool
                .begin()
                .await
                .map_err(|e| RegistrationError::Database(format!("Failed to begin tx: {e}")))?;

            let attendee = &registration.attendee;
            sqlx::query(
                "INSERT INTO registrations
                     (id, ticket_id, pass_id, name, roll_no, email, phone, department,
                      year, college, district, amount, payment_status, created_at, updated_at)
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $14)",
            )
            .bind(registration.id.as_uuid())
            .bind(registration.ticket_id.as_str())
            .bind(registration.pass_id.as_uuid())
            .bind(&attendee.name)
            .bind(&attendee.roll_no)
            .bind(&attendee.email)
            .bind(&attendee.phone)
            .bind(&attendee.department)
            .bind(&attendee.year)
            .bind(&attendee.college)
            .bind(&attendee.district)
            .bind(registration.amount.as_str())
            .bind(registration.payment_status.as_str())
            .bind(now)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                // The unique index on ticket_id is the collision detector.
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return RegistrationError::DuplicateTicketId {
                            ticket_id: registration.ticket_id.clone(),
                        };
                    }
                }
                RegistrationError::Database(format!("Failed to create registration: {e}"))
            })?;

            for (position, event_id) in registration.event_ids.iter().enumerate() {
                #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
                let position = position as i32;
                sqlx::query(
                    "INSERT INTO registration_events (registration_id, event_id, position)
                     VALUES ($1, $2, $3)",
                )
                .bind(registration.id.as_uuid())
                .bind(event_id.as_uuid())
                .bind(position)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    RegistrationError::Database(format!("Failed to link event: {e}"))
                })?;
            }

            tx.commit()
                .await
                .map_err(|e| RegistrationError::Database(format!("Failed to commit: {e}")))?;

            Ok(Registration {
                id: registration.id,
                ticket_id: registration.ticket_id,
                pass_id: registration.pass_id,
                event_ids: registration.event_ids,
                attendee: registration.attendee,
                amount: registration.amount,
                payment_status: registration.payment_status,
                payment_id: None,
                failure_reason: None,
                created_at: now,
                updated_at: now,
            })
        })
    }

    fn find_by_id(
        &self,
        id: RegistrationId,
    ) -> Pin<Box<dyn Future<Output = Result<Registration>> + Send>> {
        let pool = self.pool.clone();

        Box::pin(async move {
            let query = format!("SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE id = $1");
            let row: RegistrationRow = sqlx::query_as(&query)
                .bind(id.as_uuid())
                .fetch_optional(&pool)
                .await
                .map_err(|e| {
                    RegistrationError::Database(format!("Failed to load registration: {e}"))
                })?
                .ok_or(RegistrationError::RegistrationNotFound { id })?;

            let event_ids = load_event_ids(&pool, id).await?;
            row.into_registration(event_ids)
        })
    }

    fn find_by_event_id(
        &self,
        event_id: EventId,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Registration>>> + Send>> {
        let pool = self.pool.clone();

        Box::pin(async move {
            // The join table carries no overlapping column names, so the
            // shared column list stays unqualified.
            let query = format!(
                "SELECT {REGISTRATION_COLUMNS}
                 FROM registrations r
                 JOIN registration_events re ON re.registration_id = r.id
                 WHERE re.event_id = $1
                 ORDER BY r.created_at"
            );

            let rows: Vec<RegistrationRow> = sqlx::query_as(&query)
                .bind(event_id.as_uuid())
                .fetch_all(&pool)
                .await
                .map_err(|e| {
                    RegistrationError::Database(format!("Failed to query registrations: {e}"))
                })?;

            let mut registrations = Vec::with_capacity(rows.len());
            for row in rows {
                let id = RegistrationId::from_uuid(row.id);
                let event_ids = load_event_ids(&pool, id).await?;
                registrations.push(row.into_registration(event_ids)?);
            }
            Ok(registrations)
        })
    }

    fn transition(
        &self,
        id: RegistrationId,
        transition: Transition,
    ) -> Pin<Box<dyn Future<Output = Result<TransitionOutcome>> + Send>> {
        let pool = self.pool.clone();

        Box::pin(async move {
            let expected: Vec<String> = transition
                .allowed_from()
                .iter()
                .map(|status| status.as_str().to_string())
                .collect();

            let (payment_id, failure_reason) = match &transition {
                Transition::Complete { payment_id } => (Some(payment_id.clone()), None),
                Transition::Fail { reason } => (None, Some(reason.clone())),
            };

            let query = format!(
                "UPDATE registrations
                 SET payment_status = $2,
                     payment_id = COALESCE($3, payment_id),
                     failure_reason = COALESCE($4, failure_reason),
                     updated_at = NOW()
                 WHERE id = $1 AND payment_status = ANY($5)
                 RETURNING {REGISTRATION_COLUMNS}"
            );

            let updated: Option<RegistrationRow> = sqlx::query_as(&query)
                .bind(id.as_uuid())
                .bind(transition.target().as_str())
                .bind(payment_id)
                .bind(failure_reason)
                .bind(&expected)
                .fetch_optional(&pool)
                .await
                .map_err(|e| {
                    RegistrationError::Database(format!("Failed to transition status: {e}"))
                })?;

            match updated {
                Some(row) => {
                    let event_ids = load_event_ids(&pool, id).await?;
                    Ok(TransitionOutcome::Applied(row.into_registration(event_ids)?))
                }
                None => {
                    // Guard matched nothing: classify against the current row.
                    let query =
                        format!("SELECT {REGISTRATION_COLUMNS} FROM registrations WHERE id = $1");
                    let row: RegistrationRow = sqlx::query_as(&query)
                        .bind(id.as_uuid())
                        .fetch_optional(&pool)
                        .await
                        .map_err(|e| {
                            RegistrationError::Database(format!(
                                "Failed to load registration: {e}"
                            ))
                        })?
                        .ok_or(RegistrationError::RegistrationNotFound { id })?;

                    let event_ids = load_event_ids(&pool, id).await?;
                    replay_outcome(row.into_registration(event_ids)?, &transition)
                }
            }
        })
    }
}

/// `PostgreSQL` pass catalog.
#[derive(Clone)]
pub struct PostgresPassRepository {
    pool: PgPool,
}

impl PostgresPassRepository {
    /// Create a new repository over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PassRepository for PostgresPassRepository {
    fn find_by_id(&self, id: PassId) -> Pin<Box<dyn Future<Output = Result<Pass>> + Send>> {
        let pool = self.pool.clone();

        Box::pin(async move {
            let row: Option<(sqlx::types::Uuid, String, String, bool, String)> = sqlx::query_as(
                "SELECT id, name, price, is_active, color FROM passes WHERE id = $1",
            )
            .bind(id.as_uuid())
            .fetch_optional(&pool)
            .await
            .map_err(|e| RegistrationError::Database(format!("Failed to load pass: {e}")))?;

            let (pass_id, name, price, is_active, color) =
                row.ok_or(RegistrationError::PassNotFound { pass_id: id })?;

            Ok(Pass {
                id: PassId::from_uuid(pass_id),
                name,
                price: Amount::from_raw(price),
                is_active,
                color,
            })
        })
    }
}

/// `PostgreSQL` sub-event catalog.
#[derive(Clone)]
pub struct PostgresSubEventRepository {
    pool: PgPool,
}

impl PostgresSubEventRepository {
    /// Create a new repository over a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl SubEventRepository for PostgresSubEventRepository {
    fn find_by_ids(
        &self,
        ids: Vec<EventId>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<SubEvent>>> + Send>> {
        let pool = self.pool.clone();

        Box::pin(async move {
            if ids.is_empty() {
                return Ok(Vec::new());
            }

            let uuids: Vec<sqlx::types::Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
            let rows: Vec<(sqlx::types::Uuid, String, Option<i64>)> = sqlx::query_as(
                "SELECT id, name, team_price FROM sub_events WHERE id = ANY($1)",
            )
            .bind(&uuids)
            .fetch_all(&pool)
            .await
            .map_err(|e| RegistrationError::Database(format!("Failed to load events: {e}")))?;

            // Preserve the request order: pricing consults the FIRST selection.
            let mut by_id: HashMap<EventId, SubEvent> = rows
                .into_iter()
                .map(|(event_id, name, team_price)| {
                    let event_id = EventId::from_uuid(event_id);
                    (
                        event_id,
                        SubEvent {
                            id: event_id,
                            name,
                            team_price,
                        },
                    )
                })
                .collect();

            Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
        })
    }
}
