use crate::screening::machine::Screener;
use crate::screening::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Stateless driver for the screening flow; owns the collaborator handle.
    pub screener: Screener,
    pub sessions: SessionStore,
}
