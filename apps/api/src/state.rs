use crate::interview::services::InterviewServices;
use crate::interview::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Model client and prompt store, shared by every session.
    pub services: InterviewServices,
    pub sessions: SessionStore,
}
