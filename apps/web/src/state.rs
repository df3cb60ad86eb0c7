use std::sync::Arc;

use crate::llm_client::GenerativeModel;
use crate::related::RelatedClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Generative backend behind a trait object so tests can use a canned model.
    pub model: Arc<dyn GenerativeModel>,
    pub related: RelatedClient,
}
