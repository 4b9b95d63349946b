use std::sync::Arc;

use crate::config::Config;
use crate::remote::AnalysisService;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Remote analysis service. Default: `JamAiClient`; tests use an in-process fake.
    pub analysis: Arc<dyn AnalysisService>,
    pub sessions: SessionStore,
    pub config: Config,
}
