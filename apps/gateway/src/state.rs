use std::sync::Arc;

use crate::config::Config;
use crate::proxy::gateway::Gateway;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Built once in `main` around the process-wide upstream client.
    pub gateway: Arc<Gateway>,
    pub config: Config,
}
