use std::sync::Arc;

use crate::llm_client::ModelGateway;
use crate::session::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    /// Gemini in production, scripted doubles in tests.
    pub gateway: Arc<dyn ModelGateway>,
}
