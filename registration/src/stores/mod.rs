//! Storage traits and implementations.
//!
//! The registration store is the only shared resource in the system and is
//! relied upon for the ticket-identifier uniqueness guarantee and the
//! atomicity of status transitions. Pass and sub-event repositories are
//! read-only views of the content-management catalog.

use crate::error::Result;
use crate::lifecycle::{Transition, TransitionOutcome};
use crate::types::{
    EventId, NewRegistration, Pass, PassId, Registration, RegistrationId, SubEvent,
};
use std::future::Future;
use std::pin::Pin;

mod memory;
mod postgres;

pub use memory::{InMemoryPassRepository, InMemoryRegistrationStore, InMemorySubEventRepository};
pub use postgres::{PostgresPassRepository, PostgresRegistrationStore, PostgresSubEventRepository};

/// Persistent store for registration records.
pub trait RegistrationStore: Send + Sync {
    /// Persist a new registration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RegistrationError::DuplicateTicketId`] when
    /// the minted ticket identifier collides with an existing row, or
    /// [`crate::error::RegistrationError::Database`] on storage failure.
    fn create(
        &self,
        registration: NewRegistration,
    ) -> Pin<Box<dyn Future<Output = Result<Registration>> + Send>>;

    /// Load a registration by primary key.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RegistrationError::RegistrationNotFound`]
    /// when no such registration exists.
    fn find_by_id(
        &self,
        id: RegistrationId,
    ) -> Pin<Box<dyn Future<Output = Result<Registration>> + Send>>;

    /// Load all registrations that selected the given sub-event, oldest
    /// first. Used by the per-event export.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RegistrationError::Database`] on storage
    /// failure.
    fn find_by_event_id(
        &self,
        event_id: EventId,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<Registration>>> + Send>>;

    /// Apply a status transition as an atomic conditional update.
    ///
    /// The update only matches rows whose current status is in
    /// [`Transition::allowed_from`]. A miss is classified by
    /// [`crate::lifecycle::replay_outcome`]: duplicate success callbacks
    /// report [`TransitionOutcome::AlreadyApplied`] instead of failing.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RegistrationError::InvalidTransition`] when
    /// the current status does not admit the transition, or
    /// [`crate::error::RegistrationError::RegistrationNotFound`] /
    /// [`crate::error::RegistrationError::Database`] on lookup/storage
    /// failure.
    fn transition(
        &self,
        id: RegistrationId,
        transition: Transition,
    ) -> Pin<Box<dyn Future<Output = Result<TransitionOutcome>> + Send>>;
}

/// Read-only access to the pass catalog.
pub trait PassRepository: Send + Sync {
    /// Load a pass by id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RegistrationError::PassNotFound`] when no
    /// such pass exists.
    fn find_by_id(&self, id: PassId) -> Pin<Box<dyn Future<Output = Result<Pass>> + Send>>;
}

/// Read-only access to the sub-event catalog.
pub trait SubEventRepository: Send + Sync {
    /// Load the sub-events for the given ids, in the order requested.
    /// Unknown ids are silently dropped; callers compare counts.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::RegistrationError::Database`] on storage
    /// failure.
    fn find_by_ids(
        &self,
        ids: Vec<EventId>,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<SubEvent>>> + Send>>;
}
