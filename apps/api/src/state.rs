use std::sync::Arc;

use crate::llm_client::ChatStreamer;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Streaming completion client. Built once at startup and shared read-only.
    pub llm: Arc<dyn ChatStreamer>,
}
