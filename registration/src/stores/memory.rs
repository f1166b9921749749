//! In-memory store implementations.
//!
//! Mirror the PostgreSQL semantics — ticket-id uniqueness and guarded
//! status transitions — so the orchestration flow can be exercised at
//! memory speed in tests and local development.

use crate::error::{RegistrationError, Result};
use crate::lifecycle::{replay_outcome, Transition, TransitionOutcome};
use crate::stores::{PassRepository, RegistrationStore, SubEventRepository};
use crate::types::{
    EventId, NewRegistration, Pass, PassId, Registration, RegistrationId, SubEvent,
};
use chrono::Utc;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};

type Registrations = Arc<RwLock<HashMap<RegistrationId, Registration>>>;

/// In-memory registration store.
#[derive(Clone, Default)]
pub struct InMemoryRegistrationStore {
    rows: Registrations,
}

impl InMemoryRegistrationStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.read().map(|rows| rows.len()).unwrap_or(0)
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Seed a registration directly, bypassing intake. Test helper.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::DuplicateTicketId`] on a ticket-id
    /// collision, mirroring the unique index.
    pub fn seed(&self, registration: Registration) -> Result<()> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| RegistrationError::Database("Lock poisoned".to_string()))?;

        if rows
            .values()
            .any(|existing| existing.ticket_id == registration.ticket_id)
        {
            return Err(RegistrationError::DuplicateTicketId {
                ticket_id: registration.ticket_id,
            });
        }

        rows.insert(registration.id, registration);
        Ok(())
    }
}

impl RegistrationStore for InMemoryRegistrationStore {
    fn create(
        &self,
        registration: NewRegistration,
    ) -> Pin<Box<dyn Future<Output = Result<Registration>> + Send>> {
        let rows = Arc::clone(&self.rows);

        Box::pin(async move {
            let mut rows = rows
                .write()
                .map_err(|_| RegistrationError::Database("Lock poisoned".to_string()))?;

            // The unique index equivalent.
            if rows
                .values()
                .any(|existing| existing.ticket_id == registration.ticket_id)
            {
                return Err(RegistrationError::DuplicateTicketId {
                    ticket_id: registration.ticket_id,
                });
            }

            let now = Utc::now();
            let persisted = Registration {
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
            };

            rows.insert(persisted.id, persisted.clone());
            Ok(persisted)
        })
    }

    fn find_by_id(
        &self,
        id: RegistrationId,
    ) -> Pin<Box<dyn Future<Output = Result<Registration>> + Send>> {
        let rows = Arc::clone(&self.rows);

        Box::pin(async move {
            let rows = rows
                .read()
                .map_err(|_| RegistrationError::Database("Lock poisoned".to_string()))?;
            rows.get(&id)
                .cloned()
                .ok_or(RegistrationError::RegistrationNotFound { id })
        })
    }

    fn find_by_event_id(
        &self,
        event_id: EventId,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Registration>>> + Send>> {
        let rows = Arc::clone(&self.rows);

        Box::pin(async move {
            let rows = rows
                .read()
                .map_err(|_| RegistrationError::Database("Lock poisoned".to_string()))?;

            let mut matching: Vec<Registration> = rows
                .values()
                .filter(|registration| registration.event_ids.contains(&event_id))
                .cloned()
                .collect();
            matching.sort_by_key(|registration| registration.created_at);
            Ok(matching)
        })
    }

    fn transition(
        &self,
        id: RegistrationId,
        transition: Transition,
    ) -> Pin<Box<dyn Future<Output = Result<TransitionOutcome>> + Send>> {
        let rows = Arc::clone(&self.rows);

        Box::pin(async move {
            let mut rows = rows
                .write()
                .map_err(|_| RegistrationError::Database("Lock poisoned".to_string()))?;

            let registration = rows
                .get_mut(&id)
                .ok_or(RegistrationError::RegistrationNotFound { id })?;

            if !transition
                .allowed_from()
                .contains(&registration.payment_status)
            {
                return replay_outcome(registration.clone(), &transition);
            }

            registration.payment_status = transition.target();
            match &transition {
                Transition::Complete { payment_id } => {
                    registration.payment_id = Some(payment_id.clone());
                }
                Transition::Fail { reason } => {
                    registration.failure_reason = Some(reason.clone());
                }
            }
            registration.updated_at = Utc::now();

            Ok(TransitionOutcome::Applied(registration.clone()))
        })
    }
}

/// In-memory pass catalog.
#[derive(Clone, Default)]
pub struct InMemoryPassRepository {
    passes: Arc<RwLock<HashMap<PassId, Pass>>>,
}

impl InMemoryPassRepository {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pass to the catalog.
    pub fn insert(&self, pass: Pass) {
        if let Ok(mut passes) = self.passes.write() {
            passes.insert(pass.id, pass);
        }
    }
}

impl PassRepository for InMemoryPassRepository {
    fn find_by_id(&self, id: PassId) -> Pin<Box<dyn Future<Output = Result<Pass>> + Send>> {
        let passes = Arc::clone(&self.passes);

        Box::pin(async move {
            let passes = passes
                .read()
                .map_err(|_| RegistrationError::Database("Lock poisoned".to_string()))?;
            passes
                .get(&id)
                .cloned()
                .ok_or(RegistrationError::PassNotFound { pass_id: id })
        })
    }
}

/// In-memory sub-event catalog.
#[derive(Clone, Default)]
pub struct InMemorySubEventRepository {
    events: Arc<RwLock<HashMap<EventId, SubEvent>>>,
}

impl InMemorySubEventRepository {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sub-event to the catalog.
    pub fn insert(&self, event: SubEvent) {
        if let Ok(mut events) = self.events.write() {
            events.insert(event.id, event);
        }
    }
}

impl SubEventRepository for InMemorySubEventRepository {
    fn find_by_ids(
        &self,
        ids: Vec<EventId>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<SubEvent>>> + Send>> {
        let events = Arc::clone(&self.events);

        Box::pin(async move {
            let events = events
                .read()
                .map_err(|_| RegistrationError::Database("Lock poisoned".to_string()))?;
            Ok(ids
                .iter()
                .filter_map(|id| events.get(id).cloned())
                .collect())
        })
    }
}
