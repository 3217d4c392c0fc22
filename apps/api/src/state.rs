use std::sync::Arc;

use sqlx::PgPool;

use crate::assessment::handlers::{AptitudeRunner, IqRunner};
use crate::assessment::store::SessionStore;
use crate::generation::GenerationService;

/// Shared application state injected into all route handlers via Axum
/// extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Pluggable generation backend. Production wires `GeminiGeneration`;
    /// tests script a fake.
    pub generator: Arc<dyn GenerationService>,
    pub aptitude_sessions: SessionStore<AptitudeRunner>,
    pub iq_sessions: SessionStore<IqRunner>,
}
