//! Application state for the HTTP server.

use festpass_registration::RegistrationService;
use sqlx::PgPool;

/// Application state shared across all HTTP handlers.
///
/// Cloned (cheaply via `Arc` handles) for each request.
#[derive(Clone)]
pub struct AppState {
    /// Registration and payment orchestration service.
    pub service: RegistrationService,

    /// Database pool, used by the readiness probe. Absent in tests that
    /// run against the in-memory store.
    pub pool: Option<PgPool>,
}

impl AppState {
    /// Create application state for production use.
    #[must_use]
    pub const fn new(service: RegistrationService, pool: PgPool) -> Self {
        Self {
            service,
            pool: Some(pool),
        }
    }

    /// Create application state without a database pool (tests).
    #[must_use]
    pub const fn without_pool(service: RegistrationService) -> Self {
        Self {
            service,
            pool: None,
        }
    }
}
